//! Cookie-based gate in front of the admin area.
//!
//! Every request under [`PROTECTED_PREFIX`] must carry a valid
//! `admin-token` cookie. Missing credentials redirect to [`LOGIN_PATH`];
//! invalid ones additionally clear the cookie. The login surface itself
//! bounces already-authenticated visitors to [`DASHBOARD_PATH`].

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::{debug, warn};

use super::{claims::Claims, cookie, jwt::JwtKeys};
use crate::error::ApiError;

pub const PROTECTED_PREFIX: &str = "/admin";
pub const LOGIN_PATH: &str = "/admin/login";
pub const DASHBOARD_PATH: &str = "/admin/dashboard";

#[derive(Clone)]
pub struct RequestGate {
    keys: JwtKeys,
}

impl RequestGate {
    pub fn new(keys: JwtKeys) -> Self {
        Self { keys }
    }

    fn inspect(&self, jar: &CookieJar) -> Credential {
        match jar.get(cookie::COOKIE_NAME) {
            None => Credential::Missing,
            Some(c) => match self.keys.verify(c.value()) {
                Ok(claims) => Credential::Valid(claims),
                Err(_) => Credential::Invalid,
            },
        }
    }
}

enum Credential {
    Missing,
    Invalid,
    Valid(Claims),
}

pub fn is_protected(path: &str) -> bool {
    path == PROTECTED_PREFIX
        || path
            .strip_prefix(PROTECTED_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Middleware entry point; install with `middleware::from_fn_with_state`.
pub async fn enforce(
    State(gate): State<RequestGate>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();

    if path == LOGIN_PATH {
        if let Credential::Valid(claims) = gate.inspect(&jar) {
            debug!(sub = %claims.sub, "already signed in, skipping login");
            return Redirect::temporary(DASHBOARD_PATH).into_response();
        }
        return next.run(req).await;
    }

    if !is_protected(&path) {
        return next.run(req).await;
    }

    match gate.inspect(&jar) {
        Credential::Missing => {
            debug!(%path, "no admin credential");
            Redirect::temporary(LOGIN_PATH).into_response()
        }
        Credential::Invalid => {
            warn!(%path, "rejected admin credential");
            (jar.remove(cookie::removal_cookie()), Redirect::temporary(LOGIN_PATH)).into_response()
        }
        Credential::Valid(claims) => {
            req.extensions_mut().insert(Session(claims));
            next.run(req).await
        }
    }
}

/// The verified credential of the current request.
#[derive(Debug, Clone)]
pub struct Session(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".into()))
    }
}
