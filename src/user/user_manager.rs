use super::{
    AuthToken, AuthTokenValue, UserProfile, UserStore, UsernamePasswordCredentials,
};
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already exists")]
    Duplicate,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Emails are compared case-insensitively and without surrounding spaces.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct UserManager {
    user_store: Box<dyn UserStore>,
}

impl UserManager {
    pub fn new(user_store: Box<dyn UserStore>) -> Self {
        Self { user_store }
    }

    /// Registers a user and signs them in, returning their first session
    /// token.
    pub fn create_account(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthToken, AuthError> {
        let username = username.trim();
        let email = normalize_email(email);
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Username, email and password are required".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(AuthError::Validation("Invalid email address".to_string()));
        }

        if self.user_store.get_user_id_by_email(&email)?.is_some() {
            return Err(AuthError::Duplicate);
        }

        let user_id = self.user_store.create_user(username, &email)?;
        let credentials = UsernamePasswordCredentials::create(user_id, password)?;
        self.user_store.set_password_credentials(&credentials)?;
        info!("Created account {} for {}", user_id, email);

        self.generate_auth_token(user_id)
    }

    /// Unknown emails and wrong passwords fail the same way.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<AuthToken, AuthError> {
        let email = normalize_email(email);
        let user_id = self
            .user_store
            .get_user_id_by_email(&email)?
            .ok_or(AuthError::InvalidCredentials)?;
        let credentials = self
            .user_store
            .get_password_credentials(user_id)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !credentials.matches(password)? {
            debug!("Wrong password for user {}", user_id);
            return Err(AuthError::InvalidCredentials);
        }
        self.user_store.update_password_last_used_timestamp(user_id)?;

        self.generate_auth_token(user_id)
    }

    pub fn get_profile(&self, user_id: usize) -> Result<UserProfile, AuthError> {
        self.user_store
            .get_user(user_id)?
            .map(UserProfile::from)
            .ok_or(AuthError::NotFound)
    }

    /// Looks up the session a token belongs to and marks it as used.
    pub fn resolve_session(&self, value: &AuthTokenValue) -> Result<Option<AuthToken>, AuthError> {
        let token = match self.user_store.get_user_auth_token(value)? {
            Some(token) => token,
            None => return Ok(None),
        };
        self.user_store
            .update_user_auth_token_last_used_timestamp(value)?;
        Ok(Some(token))
    }

    /// Returns false when the token was not a live session.
    pub fn logout(&self, value: &AuthTokenValue) -> Result<bool, AuthError> {
        Ok(self.user_store.delete_user_auth_token(value)?.is_some())
    }

    fn generate_auth_token(&self, user_id: usize) -> Result<AuthToken, AuthError> {
        let token = AuthToken {
            user_id,
            value: AuthTokenValue::generate(),
            created: SystemTime::now(),
            last_used: None,
        };
        self.user_store.add_user_auth_token(&token)?;
        Ok(token)
    }
}
