use sqlx::PgPool;
use uuid::Uuid;

use super::{
    dto::NewEnquiry,
    repo_types::{Enquiry, EnquiryStatus},
};

const COLUMNS: &str = "id, name, email, phone, company, message, product_id, status, created_at";

impl Enquiry {
    pub async fn create(db: &PgPool, e: &NewEnquiry) -> anyhow::Result<Enquiry> {
        let row = sqlx::query_as::<_, Enquiry>(&format!(
            "INSERT INTO enquiries (name, email, phone, company, message, product_id, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {COLUMNS}"
        ))
        .bind(&e.name)
        .bind(&e.email)
        .bind(&e.phone)
        .bind(&e.company)
        .bind(&e.message)
        .bind(e.product_id)
        .bind(EnquiryStatus::New.as_str())
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Newest first.
    pub async fn list(
        db: &PgPool,
        status: Option<EnquiryStatus>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Enquiry>> {
        let rows = sqlx::query_as::<_, Enquiry>(&format!(
            "SELECT {COLUMNS} FROM enquiries \
             WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(status.map(EnquiryStatus::as_str))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn all(db: &PgPool) -> anyhow::Result<Vec<Enquiry>> {
        let rows = sqlx::query_as::<_, Enquiry>(&format!(
            "SELECT {COLUMNS} FROM enquiries ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn set_status(
        db: &PgPool,
        id: Uuid,
        status: EnquiryStatus,
    ) -> anyhow::Result<Option<Enquiry>> {
        let row = sqlx::query_as::<_, Enquiry>(&format!(
            "UPDATE enquiries SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM enquiries WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn count_with_status(db: &PgPool, status: EnquiryStatus) -> anyhow::Result<i64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM enquiries WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(db)
            .await?;
        Ok(n)
    }
}
