use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::{claims::Claims, errors::AuthError};
use crate::config::JwtConfig;

/// Fixed lifetime of an admin credential.
pub const TOKEN_TTL: Duration = Duration::hours(24);

/// HS256 signing and verification keys with the expected issuer/audience.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        let token = encode(&Header::new(Algorithm::HS256), claims, &self.encoding)?;
        debug!(sub = %claims.sub, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, OffsetDateTime::now_utc())
    }

    /// Checks signature, issuer and audience, then expiry against `now`.
    /// A token is dead from the second its `exp` is reached.
    pub fn verify_at(&self, token: &str, now: OffsetDateTime) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "jwt rejected");
            AuthError::InvalidOrExpiredToken
        })?;

        if now.unix_timestamp() >= data.claims.exp {
            debug!(sub = %data.claims.sub, "jwt expired");
            return Err(AuthError::InvalidOrExpiredToken);
        }
        debug!(sub = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}
