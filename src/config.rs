use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

/// The single back-office identity.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    /// Plain text, or an argon2 PHC string (`$argon2id$...`).
    pub password: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
    pub production: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;

        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        anyhow::ensure!(!secret.is_empty(), "JWT_SECRET must not be empty");
        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "storefront".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "storefront-admin".into()),
        };

        let admin = AdminConfig {
            username: std::env::var("ADMIN_USERNAME").context("ADMIN_USERNAME is not set")?,
            password: std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD is not set")?,
            display_name: std::env::var("ADMIN_DISPLAY_NAME")
                .unwrap_or_else(|_| "Administrator".into()),
        };

        let production = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            jwt,
            admin,
            production,
        })
    }
}
