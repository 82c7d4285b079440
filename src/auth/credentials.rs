use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::config::AdminConfig;

/// Identity embedded in a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub username: String,
    pub name: String,
}

/// Source of truth for admin logins.
pub trait CredentialStore: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> Option<Subject>;
}

/// The one configured admin account.
pub struct StaticCredentialStore {
    username: String,
    password: String,
    display_name: String,
}

impl StaticCredentialStore {
    pub fn new(cfg: &AdminConfig) -> Self {
        Self {
            username: cfg.username.clone(),
            password: cfg.password.clone(),
            display_name: cfg.display_name.clone(),
        }
    }

    fn password_matches(&self, plain: &str) -> bool {
        if !self.password.starts_with("$argon2") {
            return plain == self.password;
        }
        match verify_password(plain, &self.password) {
            Ok(ok) => ok,
            Err(e) => {
                error!(error = %e, "configured admin password hash is unreadable");
                false
            }
        }
    }
}

impl CredentialStore for StaticCredentialStore {
    fn verify(&self, username: &str, password: &str) -> Option<Subject> {
        // Evaluate both so a wrong username costs the same as a wrong password.
        let user_ok = username == self.username;
        let pass_ok = self.password_matches(password);
        (user_ok && pass_ok).then(|| Subject {
            username: self.username.clone(),
            name: self.display_name.clone(),
        })
    }
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
