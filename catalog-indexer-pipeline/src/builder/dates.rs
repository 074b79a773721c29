//! Flexible date normalization for `_date` fields.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a date in any accepted shape and reformat it as ISO-8601.
///
/// Values carrying an explicit offset keep it; naive values gain a literal
/// `Z` suffix, which is what the search backend requires. Returns `None` when
/// the value is not a date.
pub(crate) fn normalize(value: &str) -> Option<String> {
    let value = value.trim();

    if let Ok(zoned) = DateTime::parse_from_rfc3339(value) {
        return Some(zoned.to_rfc3339());
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(format!("{}Z", naive.format("%Y-%m-%dT%H:%M:%S%.f")));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(format!("{}Z", date.format("%Y-%m-%dT00:00:00")));
    }

    None
}
