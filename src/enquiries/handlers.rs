use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{EnquiryCreated, NewEnquiryRequest, StatusFilter, StatusUpdate},
    repo_types::{Enquiry, EnquiryStatus},
};
use crate::{
    error::{ApiError, ApiResult},
    export::csv_attachment,
    pagination::Pagination,
    state::AppState,
};

const EXPORT_HEADERS: &[&str] = &[
    "id",
    "name",
    "email",
    "phone",
    "company",
    "message",
    "product_id",
    "status",
    "created_at",
];

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/api/enquiries", post(submit))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/api/enquiries", get(list))
        .route("/admin/api/enquiries/export", get(export))
        .route(
            "/admin/api/enquiries/:id",
            patch(update_status).delete(remove),
        )
}

#[instrument(skip(state, payload))]
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<NewEnquiryRequest>,
) -> ApiResult<(StatusCode, Json<EnquiryCreated>)> {
    let enquiry = payload.validate()?;
    let saved = Enquiry::create(&state.db, &enquiry).await?;
    info!(id = %saved.id, "enquiry received");
    Ok((
        StatusCode::CREATED,
        Json(EnquiryCreated {
            success: true,
            message: "Thank you, we will be in touch shortly".into(),
            id: saved.id,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<StatusFilter>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Enquiry>>> {
    let status = filter.parse()?;
    let (limit, offset) = page.bounds();
    Ok(Json(Enquiry::list(&state.db, status, limit, offset).await?))
}

#[instrument(skip(state, body))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusUpdate>,
) -> ApiResult<Json<Enquiry>> {
    let status = EnquiryStatus::parse(&body.status).ok_or_else(|| {
        ApiError::BadRequest("status must be one of new, in_progress, resolved, closed".into())
    })?;
    let enquiry = Enquiry::set_status(&state.db, id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Enquiry not found".into()))?;
    info!(%id, status = status.as_str(), "enquiry status changed");
    Ok(Json(enquiry))
}

#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if !Enquiry::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Enquiry not found".into()));
    }
    info!(%id, "enquiry deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Flat CSV shape of an enquiry.
#[derive(Serialize)]
struct ExportRow<'a> {
    id: Uuid,
    name: &'a str,
    email: &'a str,
    phone: Option<&'a str>,
    company: Option<&'a str>,
    message: &'a str,
    product_id: Option<Uuid>,
    status: &'a str,
    created_at: String,
}

#[instrument(skip(state))]
pub async fn export(State(state): State<AppState>) -> ApiResult<Response> {
    let enquiries = Enquiry::all(&state.db).await?;
    let rows = export_rows(&enquiries)?;
    info!(count = rows.len(), "enquiries exported");
    csv_attachment("enquiries", EXPORT_HEADERS, &rows)
}

fn export_rows(enquiries: &[Enquiry]) -> ApiResult<Vec<ExportRow<'_>>> {
    enquiries
        .iter()
        .map(|e| {
            Ok(ExportRow {
                id: e.id,
                name: &e.name,
                email: &e.email,
                phone: e.phone.as_deref(),
                company: e.company.as_deref(),
                message: &e.message,
                product_id: e.product_id,
                status: &e.status,
                created_at: e
                    .created_at
                    .format(&time::format_description::well_known::Rfc3339)
                    .map_err(|err| ApiError::Internal(err.into()))?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::build_app, export::to_csv};
    use axum::{body::Body, http::header, http::Request};
    use time::macros::datetime;
    use tower::ServiceExt;

    #[test]
    fn export_rows_flatten_optional_fields() {
        let e = Enquiry {
            id: Uuid::nil(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: None,
            company: Some("Engines, Ltd".into()),
            message: "Quote please".into(),
            product_id: None,
            status: "new".into(),
            created_at: datetime!(2024-03-01 10:00 UTC),
        };
        let list = vec![e];
        let rows = export_rows(&list).unwrap();
        let csv = String::from_utf8(to_csv(EXPORT_HEADERS, &rows).unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("id,name,email,phone,company,message,product_id,status,created_at")
        );
        assert_eq!(
            lines.next(),
            Some(
                "00000000-0000-0000-0000-000000000000,Ada,ada@example.com,,\"Engines, Ltd\",\
                 Quote please,,new,2024-03-01T10:00:00Z"
            )
        );
    }

    #[tokio::test]
    async fn invalid_submission_is_rejected_before_storage() {
        let res = build_app(AppState::fake())
            .oneshot(
                Request::post("/api/enquiries")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"Ada","email":"x","message":"hi"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn admin_listing_requires_session() {
        let res = build_app(AppState::fake())
            .oneshot(
                Request::get("/admin/api/enquiries/export")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    }
}
