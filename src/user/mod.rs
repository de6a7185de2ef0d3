pub mod auth;
mod sqlite_user_store;
mod user_manager;
mod user_models;
mod user_store;

pub use auth::{AuthToken, AuthTokenValue, MoodifyHasher, UsernamePasswordCredentials};
pub use sqlite_user_store::SqliteUserStore;
pub use user_manager::{normalize_email, AuthError, UserManager};
pub use user_models::{User, UserProfile};
pub use user_store::{UserAuthCredentialsStore, UserAuthTokenStore, UserStore};
