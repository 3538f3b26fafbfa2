// handlers/mod.rs - 3-tier handler layout
//
// Public (anyone) → Protected (authenticated caller) → Elevated (staff only).
// Tiers are enforced by the extractors each handler takes, see middleware::access.
pub mod elevated;
pub mod protected;
pub mod public;

use crate::error::ApiError;

/// Parse a record id from the path. Anything that is not an integer cannot name a record.
pub(crate) fn record_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::not_found("Not found."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn non_numeric_ids_are_not_found() {
        assert_eq!(record_id("42").unwrap(), 42);
        assert_eq!(record_id("abc").unwrap_err().status_code(), StatusCode::NOT_FOUND);
        assert_eq!(record_id("1.5").unwrap_err().status_code(), StatusCode::NOT_FOUND);
    }
}
