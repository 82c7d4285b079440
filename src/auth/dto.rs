use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::claims::Role;

/// Request body for admin login. Missing fields decode as empty strings.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: PublicUser,
}

/// Public part of the admin identity.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub username: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

/// The decoded credential of the current request.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub username: String,
    pub name: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub issued_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}
