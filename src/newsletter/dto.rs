use serde::{Deserialize, Serialize};

use super::repo_types::SubscriptionStatus;
use crate::{
    error::ApiError,
    validation::{is_valid_email, optional},
};

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    #[serde(default)]
    pub email: String,
}

impl EmailRequest {
    /// Trimmed, lowercased and checked.
    pub fn normalized(&self) -> Result<String, ApiError> {
        let email = self.email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(ApiError::BadRequest("Invalid email".into()));
        }
        Ok(email)
    }
}

#[derive(Debug, Serialize)]
pub struct NewsletterResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionFilter {
    pub status: Option<String>,
}

impl SubscriptionFilter {
    pub fn parse(&self) -> Result<Option<SubscriptionStatus>, ApiError> {
        match optional(self.status.clone()) {
            None => Ok(None),
            Some(s) => SubscriptionStatus::parse(&s)
                .map(Some)
                .ok_or_else(|| ApiError::BadRequest(format!("unknown status '{s}'"))),
        }
    }
}
