use anyhow::Context;
use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use time::OffsetDateTime;

use crate::error::ApiResult;

/// Renders `rows` as CSV, header row first, even when there are no rows.
pub fn to_csv<R: Serialize>(headers: &[&str], rows: &[R]) -> anyhow::Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(headers).context("write csv header")?;
    for row in rows {
        wtr.serialize(row).context("write csv row")?;
    }
    wtr.into_inner().context("flush csv")
}

/// `text/csv` download named `<stem>-<yyyy-mm-dd>.csv`.
pub fn csv_attachment<R: Serialize>(
    stem: &str,
    headers: &[&str],
    rows: &[R],
) -> ApiResult<Response> {
    let body = to_csv(headers, rows)?;
    let today = OffsetDateTime::now_utc().date();
    let disposition = format!("attachment; filename=\"{stem}-{today}.csv\"");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
