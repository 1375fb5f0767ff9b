use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::AppError;

/// Canonical timestamp format: whole-second RFC3339 UTC strings, everywhere.
/// Storage, wire, and evaluator all agree on this one shape, and the fixed
/// width means the strings compare lexicographically in time order (the
/// store's transition guard relies on that).
pub fn to_rfc3339(ts: OffsetDateTime) -> Result<String, AppError> {
    ts.replace_nanosecond(0)
        .map_err(|e| {
            AppError::new("TIME_FORMAT_FAILED", "Failed to truncate timestamp")
                .with_details(e.to_string())
        })?
        .format(&Rfc3339)
        .map_err(|e| {
            AppError::new("TIME_FORMAT_FAILED", "Failed to format timestamp as RFC3339")
                .with_details(e.to_string())
        })
}

pub fn parse_rfc3339(field: &str, value: &str) -> Result<OffsetDateTime, AppError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
        AppError::new(
            "TIME_PARSE_FAILED",
            format!("Failed to parse {field} as RFC3339"),
        )
        .with_details(format!("value={value}; err={e}"))
    })
}
