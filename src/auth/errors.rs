use crate::error::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// Tampered, expired or signed with another key; never told apart.
    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials | AuthError::InvalidOrExpiredToken => {
                ApiError::Unauthorized(e.to_string())
            }
            AuthError::Signing(inner) => ApiError::Internal(inner.into()),
        }
    }
}
