use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{EmailRequest, NewsletterResponse, SubscriptionFilter},
    repo::SubscribeOutcome,
    repo_types::{Subscription, SubscriptionStatus},
};
use crate::{
    error::{ApiError, ApiResult},
    export::csv_attachment,
    pagination::Pagination,
    state::AppState,
};

const EXPORT_HEADERS: &[&str] = &["id", "email", "status", "created_at"];

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/newsletter", post(subscribe))
        .route("/api/newsletter/unsubscribe", post(unsubscribe))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/api/subscriptions", get(list))
        .route("/admin/api/subscriptions/export", get(export))
        .route("/admin/api/subscriptions/:id", delete(remove))
}

fn reply(status: StatusCode, message: &str) -> (StatusCode, Json<NewsletterResponse>) {
    (
        status,
        Json(NewsletterResponse {
            success: true,
            message: message.into(),
        }),
    )
}

#[instrument(skip(state, payload))]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(payload): Json<EmailRequest>,
) -> ApiResult<(StatusCode, Json<NewsletterResponse>)> {
    let email = payload.normalized()?;
    let outcome = Subscription::subscribe(&state.db, &email).await?;
    info!(?outcome, "newsletter subscribe");
    Ok(match outcome {
        SubscribeOutcome::Created => reply(StatusCode::CREATED, "Subscribed to the newsletter"),
        SubscribeOutcome::Reactivated => reply(StatusCode::OK, "Subscription re-activated"),
        SubscribeOutcome::AlreadySubscribed => reply(StatusCode::OK, "Already subscribed"),
    })
}

#[instrument(skip(state, payload))]
pub async fn unsubscribe(
    State(state): State<AppState>,
    Json(payload): Json<EmailRequest>,
) -> ApiResult<(StatusCode, Json<NewsletterResponse>)> {
    let email = payload.normalized()?;
    let known =
        Subscription::set_status(&state.db, &email, SubscriptionStatus::Unsubscribed).await?;
    info!(known, "newsletter unsubscribe");
    Ok(reply(StatusCode::OK, "Unsubscribed"))
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<SubscriptionFilter>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Subscription>>> {
    let status = filter.parse()?;
    let (limit, offset) = page.bounds();
    Ok(Json(
        Subscription::list(&state.db, status, limit, offset).await?,
    ))
}

#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if !Subscription::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Subscription not found".into()));
    }
    info!(%id, "subscription deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn export(State(state): State<AppState>) -> ApiResult<Response> {
    let subs = Subscription::all(&state.db).await?;
    info!(count = subs.len(), "subscriptions exported");
    csv_attachment("newsletter-subscriptions", EXPORT_HEADERS, &subs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::build_app;
    use axum::{
        body::Body,
        http::{header, Request},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn bad_email_is_rejected() {
        let res = build_app(AppState::fake())
            .oneshot(
                Request::post("/api/newsletter")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"email":"not-an-email"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Invalid email");
    }
}
