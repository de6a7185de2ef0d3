use serde::Serialize;
use std::time::SystemTime;

#[derive(Debug, Clone)]
pub struct User {
    pub id: usize,
    pub username: String,
    pub email: String,
    pub created: SystemTime,
}

/// What a signed-in user gets to see about themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
        }
    }
}
