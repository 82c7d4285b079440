use axum_extra::extract::cookie::{Cookie, SameSite};

use super::jwt::TOKEN_TTL;

pub const COOKIE_NAME: &str = "admin-token";

/// HttpOnly, SameSite=Lax cookie living exactly as long as the token.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(TOKEN_TTL)
        .build()
}

/// Matches the session cookie's path so the removal hits the same cookie.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, "")).path("/").build()
}
