//! Password hashing and session tokens

use anyhow::{bail, Result};

use rand::Rng;
use rand_distr::Alphanumeric;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct AuthTokenValue(pub String);

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct AuthToken {
    pub user_id: usize,
    pub created: SystemTime,
    pub last_used: Option<SystemTime>,
    pub value: AuthTokenValue,
}

impl AuthTokenValue {
    pub fn generate() -> AuthTokenValue {
        let rng = rand::rng();
        let random_string: String = rng
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect();
        AuthTokenValue(random_string)
    }
}

mod moodify_argon2 {
    use anyhow::{anyhow, Result};
    use argon2::{
        password_hash::{
            rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        },
        Argon2,
    };

    pub fn generate_b64_salt() -> String {
        SaltString::generate(&mut OsRng).to_string()
    }

    pub fn hash<T: AsRef<str>>(plain: &[u8], b64_salt: T) -> Result<String> {
        let salt = SaltString::from_b64(b64_salt.as_ref()).map_err(|err| anyhow!("{}", err))?;
        Ok(Argon2::default()
            .hash_password(plain, &salt)
            .map_err(|err| anyhow!("{}", err))?
            .to_string())
    }

    pub fn verify<T: AsRef<str>>(plain_pw: &[u8], target_hash: T) -> Result<bool> {
        let password_hash =
            PasswordHash::new(target_hash.as_ref()).map_err(|err| anyhow!("{}", err))?;
        Ok(Argon2::default()
            .verify_password(plain_pw, &password_hash)
            .is_ok())
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum MoodifyHasher {
    Argon2,
}

impl FromStr for MoodifyHasher {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "argon2" => Ok(MoodifyHasher::Argon2),
            _ => bail!("Unknown hasher {}", s),
        }
    }
}

impl fmt::Display for MoodifyHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoodifyHasher::Argon2 => f.write_str("argon2"),
        }
    }
}

impl MoodifyHasher {
    pub fn generate_b64_salt(&self) -> String {
        match self {
            MoodifyHasher::Argon2 => moodify_argon2::generate_b64_salt(),
        }
    }

    pub fn hash<T: AsRef<str>>(&self, plain: &[u8], b64_salt: T) -> Result<String> {
        match self {
            MoodifyHasher::Argon2 => moodify_argon2::hash(plain, b64_salt),
        }
    }

    /// Argon2 hashes embed their salt, the stored salt is not needed to verify.
    pub fn verify<T: AsRef<str>>(&self, plain_pw: &str, target_hash: T) -> Result<bool> {
        match self {
            MoodifyHasher::Argon2 => moodify_argon2::verify(plain_pw.as_bytes(), target_hash),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct UsernamePasswordCredentials {
    pub user_id: usize,
    pub salt: String,
    pub hash: String,
    pub hasher: MoodifyHasher,

    pub created: SystemTime,
    pub last_used: Option<SystemTime>,
}

impl UsernamePasswordCredentials {
    pub fn create(user_id: usize, password: &str) -> Result<Self> {
        let hasher = MoodifyHasher::Argon2;
        let salt = hasher.generate_b64_salt();
        let hash = hasher.hash(password.as_bytes(), &salt)?;
        Ok(Self {
            user_id,
            salt,
            hash,
            hasher,
            created: SystemTime::now(),
            last_used: None,
        })
    }

    pub fn matches(&self, password: &str) -> Result<bool> {
        self.hasher.verify(password, &self.hash)
    }
}
