use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ApiError;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref NON_SLUG_RE: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Lowercases, collapses every run of non-alphanumerics to `-` and trims dashes.
pub fn slugify(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    NON_SLUG_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Trims `value` and rejects it when nothing is left.
pub fn required(field: &str, value: &str) -> Result<String, ApiError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ApiError::BadRequest(format!("{field} is required")));
    }
    Ok(v.to_string())
}

/// Blank optional strings are stored as NULL.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("buyer@example.com"));
        assert!(!is_valid_email("buyer@example"));
        assert!(!is_valid_email("buyer example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("  Power Tools & Drills "), "power-tools-drills");
        assert_eq!(slugify("M12 -- Bolts"), "m12-bolts");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("name", "  Valves ").unwrap(), "Valves");
        let err = required("name", "   ").unwrap_err();
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn optional_drops_blank() {
        assert_eq!(optional(Some("  ".into())), None);
        assert_eq!(optional(Some(" x ".into())), Some("x".into()));
        assert_eq!(optional(None), None);
    }
}
