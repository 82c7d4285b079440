use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::{
    auth::{
        claims::{Claims, Role},
        cookie::{removal_cookie, session_cookie},
        dto::{LoginRequest, LoginResponse, LogoutResponse, PublicUser, SessionResponse},
        gate::Session,
    },
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}

pub fn session_routes() -> Router<AppState> {
    Router::new().route("/admin/api/me", get(me))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let issued = state.issuer.issue(&payload.username, &payload.password)?;
    let jar = jar.add(session_cookie(issued.token, state.config.production));

    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            message: "Login successful".into(),
            user: PublicUser {
                username: issued.subject.username,
                name: issued.subject.name,
                role: Role::Admin,
            },
        }),
    ))
}

#[instrument(skip_all)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    info!("admin logged out");
    (
        jar.remove(removal_cookie()),
        Json(LogoutResponse {
            success: true,
            message: "Logged out".into(),
        }),
    )
}

#[instrument(skip_all)]
pub async fn me(Session(claims): Session) -> ApiResult<Json<SessionResponse>> {
    Ok(Json(session_response(&claims)?))
}

pub fn session_response(claims: &Claims) -> ApiResult<SessionResponse> {
    let ts = |secs: i64| {
        OffsetDateTime::from_unix_timestamp(secs)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("bad timestamp in claims: {e}")))
    };
    Ok(SessionResponse {
        username: claims.sub.clone(),
        name: claims.name.clone(),
        role: claims.role,
        issued_at: ts(claims.iat)?,
        expires_at: ts(claims.exp)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::build_app, auth::cookie::COOKIE_NAME};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    async fn post_login(body: &str) -> Response {
        build_app(AppState::fake())
            .oneshot(
                Request::post("/api/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn set_cookie(res: &Response) -> Option<String> {
        res.headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    #[tokio::test]
    async fn login_sets_cookie_and_returns_user() {
        let res = post_login(r#"{"username":"owner","password":"hunter2"}"#).await;
        assert_eq!(res.status(), StatusCode::OK);

        let cookie = set_cookie(&res).expect("cookie set");
        assert!(cookie.starts_with(&format!("{COOKIE_NAME}=")));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(!cookie.contains("Secure"));

        let body = json(res).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["user"]["username"], "owner");
        assert_eq!(body["user"]["name"], "Test Admin");
        assert_eq!(body["user"]["role"], "admin");
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized_without_cookie() {
        let res = post_login(r#"{"username":"owner","password":"nope"}"#).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookie(&res).is_none());
        let body = json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid credentials");
    }

    #[tokio::test]
    async fn missing_or_blank_fields_are_invalid_credentials() {
        for body in [
            r#"{"username":"owner"}"#,
            r#"{"username":"owner","password":""}"#,
            r#"{"username":"","password":"hunter2"}"#,
            r#"{}"#,
        ] {
            let res = post_login(body).await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{body}");
            assert!(set_cookie(&res).is_none());
            let err = json(res).await;
            assert_eq!(err["success"], false);
            assert_eq!(err["error"], "Invalid credentials");
        }
    }

    #[tokio::test]
    async fn issued_cookie_opens_admin_area_and_logout_clears_it() {
        let res = post_login(r#"{"username":"owner","password":"hunter2"}"#).await;
        let cookie = set_cookie(&res).unwrap();
        let pair = cookie.split(';').next().unwrap().to_string();

        let res = build_app(AppState::fake())
            .oneshot(
                Request::get("/admin/api/me")
                    .header(header::COOKIE, &pair)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = json(res).await;
        assert_eq!(body["username"], "owner");
        assert_eq!(body["role"], "admin");

        let res = build_app(AppState::fake())
            .oneshot(
                Request::post("/api/auth/logout")
                    .header(header::COOKIE, &pair)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let cleared = set_cookie(&res).unwrap();
        assert!(cleared.starts_with(&format!("{COOKIE_NAME}=;")));
        assert!(cleared.contains("Max-Age=0"));
    }
}
