use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Handling state of a contact enquiry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EnquiryStatus {
    New,
    InProgress,
    Resolved,
    Closed,
}

impl EnquiryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Some(Self::New),
            "in_progress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: String,
    pub product_id: Option<Uuid>,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_matches_as_str() {
        for s in [
            EnquiryStatus::New,
            EnquiryStatus::InProgress,
            EnquiryStatus::Resolved,
            EnquiryStatus::Closed,
        ] {
            assert_eq!(EnquiryStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(EnquiryStatus::parse("In_Progress"), Some(EnquiryStatus::InProgress));
        assert_eq!(EnquiryStatus::parse("spam"), None);
    }
}
