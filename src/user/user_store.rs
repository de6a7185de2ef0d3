use super::auth::{AuthToken, AuthTokenValue, UsernamePasswordCredentials};
use super::user_models::User;
use anyhow::Result;

pub trait UserAuthCredentialsStore: Send + Sync {
    /// Returns the user's password credentials.
    /// Returns Ok(None) if the user has none.
    fn get_password_credentials(&self, user_id: usize)
        -> Result<Option<UsernamePasswordCredentials>>;

    /// Inserts or replaces the user's password credentials.
    fn set_password_credentials(&self, credentials: &UsernamePasswordCredentials) -> Result<()>;

    /// Records a successful login with the password.
    fn update_password_last_used_timestamp(&self, user_id: usize) -> Result<()>;
}

pub trait UserAuthTokenStore: Send + Sync {
    /// Returns Ok(None) if the token does not exist.
    fn get_user_auth_token(&self, token: &AuthTokenValue) -> Result<Option<AuthToken>>;

    /// Returns Ok(None) if the token does not exist.
    fn delete_user_auth_token(&self, token: &AuthTokenValue) -> Result<Option<AuthToken>>;

    fn update_user_auth_token_last_used_timestamp(&self, token: &AuthTokenValue) -> Result<()>;

    fn add_user_auth_token(&self, token: &AuthToken) -> Result<()>;
}

pub trait UserStore: UserAuthTokenStore + UserAuthCredentialsStore + Send + Sync {
    /// Creates a new user and returns the user id. Fails if the email is
    /// already taken.
    fn create_user(&self, username: &str, email: &str) -> Result<usize>;

    /// Returns Ok(None) if the user does not exist.
    fn get_user(&self, user_id: usize) -> Result<Option<User>>;

    /// Returns Ok(None) if no user has this email.
    fn get_user_id_by_email(&self, email: &str) -> Result<Option<usize>>;
}
