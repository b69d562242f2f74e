//! Shared validation helpers for inbound HTTP adapters.

use serde::Deserialize;
use uuid::Uuid;

use crate::domain::Error;

/// Parse a UUID request field, reporting the failing field by name.
pub(crate) fn parse_uuid(value: &str, field: &'static str) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim())
        .map_err(|_| Error::validation_field(field, "must be a valid UUID"))
}

/// Common `?limit=` query parameter for listing endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct LimitQuery {
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn parses_uuids_with_surrounding_whitespace() {
        let parsed = parse_uuid(" 3fa85f64-5717-4562-b3fc-2c963f66afa6 ", "itemId");
        assert!(parsed.is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    #[case("3fa85f64")]
    fn rejects_malformed_uuids_with_the_field_name(#[case] raw: &str) {
        let err = parse_uuid(raw, "itemId").expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(err.validation_errors()[0].field, "itemId");
    }
}
