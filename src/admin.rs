use axum::{
    extract::State,
    response::{Html, Redirect},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::instrument;

use crate::{
    auth::{
        dto::SessionResponse,
        gate::{Session, DASHBOARD_PATH, LOGIN_PATH, PROTECTED_PREFIX},
        handlers::session_response,
    },
    catalog::repo as catalog_repo,
    enquiries::repo_types::{Enquiry, EnquiryStatus},
    error::ApiResult,
    newsletter::repo_types::Subscription,
    state::AppState,
};

const LOGIN_PAGE: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Admin sign in</title></head>
<body>
<form id="login">
  <label>Username <input name="username" autocomplete="username" required></label>
  <label>Password <input name="password" type="password" autocomplete="current-password" required></label>
  <button type="submit">Sign in</button>
  <p id="error" hidden></p>
</form>
<script>
document.getElementById("login").addEventListener("submit", async (ev) => {
  ev.preventDefault();
  const form = new FormData(ev.target);
  const res = await fetch("/api/auth/login", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    credentials: "same-origin",
    body: JSON.stringify({ username: form.get("username"), password: form.get("password") }),
  });
  if (res.ok) { window.location.href = "/admin/dashboard"; return; }
  const body = await res.json().catch(() => ({ error: "Login failed" }));
  const err = document.getElementById("error");
  err.textContent = body.error;
  err.hidden = false;
});
</script>
</body>
</html>
"#;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(LOGIN_PATH, get(login_page))
        .route(PROTECTED_PREFIX, get(|| async { Redirect::temporary(DASHBOARD_PATH) }))
        .route(DASHBOARD_PATH, get(dashboard))
}

pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

#[derive(Debug, Serialize)]
pub struct DashboardCounts {
    pub categories: i64,
    pub sub_categories: i64,
    pub new_enquiries: i64,
    pub active_subscriptions: i64,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub session: SessionResponse,
    pub counts: DashboardCounts,
}

#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    Session(claims): Session,
) -> ApiResult<Json<Dashboard>> {
    let categories = catalog_repo::count_categories(&state.db).await?;
    let sub_categories = catalog_repo::count_sub_categories(&state.db).await?;
    let new_enquiries = Enquiry::count_with_status(&state.db, EnquiryStatus::New).await?;
    let active_subscriptions = Subscription::count_active(&state.db).await?;

    Ok(Json(Dashboard {
        session: session_response(&claims)?,
        counts: DashboardCounts {
            categories,
            sub_categories,
            new_enquiries,
            active_subscriptions,
        },
    }))
}
