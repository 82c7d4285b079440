use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::EnquiryStatus;
use crate::{
    error::ApiError,
    validation::{is_valid_email, optional, required},
};

/// Contact form body from the storefront.
#[derive(Debug, Deserialize)]
pub struct NewEnquiryRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub message: String,
    pub product_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEnquiry {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: String,
    pub product_id: Option<Uuid>,
}

impl NewEnquiryRequest {
    pub fn validate(self) -> Result<NewEnquiry, ApiError> {
        let name = required("name", &self.name)?;
        let email = self.email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(ApiError::BadRequest("Invalid email".into()));
        }
        let message = required("message", &self.message)?;
        Ok(NewEnquiry {
            name,
            email,
            phone: optional(self.phone),
            company: optional(self.company),
            message,
            product_id: self.product_id,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct EnquiryCreated {
    pub success: bool,
    pub message: String,
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

impl StatusFilter {
    pub fn parse(&self) -> Result<Option<EnquiryStatus>, ApiError> {
        match optional(self.status.clone()) {
            None => Ok(None),
            Some(s) => EnquiryStatus::parse(&s)
                .map(Some)
                .ok_or_else(|| ApiError::BadRequest(format!("unknown status '{s}'"))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> NewEnquiryRequest {
        NewEnquiryRequest {
            name: " Ada ".into(),
            email: " Ada@Example.com ".into(),
            phone: Some("".into()),
            company: Some("Analytical Engines".into()),
            message: "Need 40 spanners".into(),
            product_id: None,
        }
    }

    #[test]
    fn normalizes_fields() {
        let e = request().validate().unwrap();
        assert_eq!(e.name, "Ada");
        assert_eq!(e.email, "ada@example.com");
        assert_eq!(e.phone, None);
        assert_eq!(e.company.as_deref(), Some("Analytical Engines"));
    }

    #[test]
    fn rejects_missing_parts() {
        let mut r = request();
        r.email = "nope".into();
        assert!(matches!(r.validate(), Err(ApiError::BadRequest(m)) if m == "Invalid email"));

        let mut r = request();
        r.message = "  ".into();
        assert!(matches!(r.validate(), Err(ApiError::BadRequest(m)) if m == "message is required"));
    }

    #[test]
    fn status_filter() {
        let f = StatusFilter { status: None };
        assert_eq!(f.parse().unwrap(), None);
        let f = StatusFilter {
            status: Some("resolved".into()),
        };
        assert_eq!(f.parse().unwrap(), Some(EnquiryStatus::Resolved));
        let f = StatusFilter {
            status: Some("bogus".into()),
        };
        assert!(f.parse().is_err());
    }
}
