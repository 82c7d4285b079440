use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{info, warn};

use super::{
    claims::{Claims, Role},
    credentials::{CredentialStore, Subject},
    errors::AuthError,
    jwt::{JwtKeys, TOKEN_TTL},
};

/// A freshly minted credential.
#[derive(Debug, Clone)]
pub struct IssuedCredential {
    pub token: String,
    pub subject: Subject,
    pub expires_at: OffsetDateTime,
}

/// Checks a login against the credential store and signs a 24h token.
#[derive(Clone)]
pub struct TokenIssuer {
    keys: JwtKeys,
    store: Arc<dyn CredentialStore>,
}

impl TokenIssuer {
    pub fn new(keys: JwtKeys, store: Arc<dyn CredentialStore>) -> Self {
        Self { keys, store }
    }

    pub fn issue(&self, username: &str, password: &str) -> Result<IssuedCredential, AuthError> {
        self.issue_at(username, password, OffsetDateTime::now_utc())
    }

    pub fn issue_at(
        &self,
        username: &str,
        password: &str,
        now: OffsetDateTime,
    ) -> Result<IssuedCredential, AuthError> {
        let Some(subject) = self.store.verify(username, password) else {
            warn!(username = %username, "admin login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let expires_at = now + TOKEN_TTL;
        let claims = Claims {
            sub: subject.username.clone(),
            role: Role::Admin,
            name: subject.name.clone(),
            iat: now.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
            iss: self.keys.issuer().to_string(),
            aud: self.keys.audience().to_string(),
        };
        let token = self.keys.sign(&claims)?;
        info!(username = %subject.username, "admin credential issued");

        Ok(IssuedCredential {
            token,
            subject,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::credentials::StaticCredentialStore,
        config::{AdminConfig, JwtConfig},
    };
    use time::Duration;

    fn keys(secret: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            issuer: "test-iss".into(),
            audience: "test-aud".into(),
        })
    }

    fn issuer() -> TokenIssuer {
        let store = StaticCredentialStore::new(&AdminConfig {
            username: "owner".into(),
            password: "hunter2".into(),
            display_name: "Shop Owner".into(),
        });
        TokenIssuer::new(keys("test-secret"), Arc::new(store))
    }

    #[test]
    fn issued_token_carries_admin_claims() {
        let now = OffsetDateTime::now_utc();
        let issued = issuer().issue_at("owner", "hunter2", now).expect("login");
        assert_eq!(issued.expires_at, now + Duration::hours(24));

        let claims = keys("test-secret").verify(&issued.token).expect("verify");
        assert_eq!(claims.sub, "owner");
        assert_eq!(claims.name, "Shop Owner");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[test]
    fn accepted_throughout_lifetime_then_rejected() {
        let issued_at = OffsetDateTime::now_utc();
        let issued = issuer().issue_at("owner", "hunter2", issued_at).unwrap();
        let k = keys("test-secret");
        for hours in [0, 1, 12, 23] {
            assert!(k
                .verify_at(&issued.token, issued_at + Duration::hours(hours))
                .is_ok());
        }
        assert!(k
            .verify_at(&issued.token, issued_at + Duration::hours(24))
            .is_err());
    }

    #[test]
    fn wrong_credentials_issue_nothing() {
        let i = issuer();
        assert!(matches!(
            i.issue("owner", "nope"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            i.issue("intruder", "hunter2"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
