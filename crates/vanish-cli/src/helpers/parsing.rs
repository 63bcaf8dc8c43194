//! Parsing helpers for datetime, duration, and output format.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use vanish_core::storage::is_storable_timestamp;

use crate::errors::CliError;

/// Parse a datetime string (ISO-8601 or YYYY-MM-DD).
pub fn parse_datetime(value: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| invalid(format!("Invalid date value: {}", value)))?;
        return Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
    }

    Err(invalid(format!(
        "Invalid date/time (expected ISO-8601 or YYYY-MM-DD): {}",
        value
    )))
}

/// Parse a duration string (e.g., "7d", "24h").
pub fn parse_duration(value: &str) -> anyhow::Result<Duration> {
    if value.len() < 2 {
        return Err(invalid(format!(
            "Invalid duration: {} (expected <number><unit>)",
            value
        )));
    }

    let (num_str, unit) = value.split_at(value.len() - 1);
    let amount: i64 = num_str
        .parse()
        .map_err(|_| invalid(format!("Invalid duration number: {}", value)))?;
    if amount <= 0 {
        return Err(invalid(format!("Duration must be positive: {}", value)));
    }

    let duration = match unit {
        "d" => Duration::try_days(amount),
        "h" => Duration::try_hours(amount),
        "m" => Duration::try_minutes(amount),
        "s" => Duration::try_seconds(amount),
        _ => {
            return Err(invalid(format!(
                "Invalid duration unit: {} (use d/h/m/s)",
                unit
            )))
        }
    };
    duration.ok_or_else(|| invalid(format!("Duration out of range: {}", value)))
}

/// Resolve `--expires` / `--ttl` into an absolute expiry.
pub fn resolve_expiry(
    expires: Option<&str>,
    ttl: Option<&str>,
    now: DateTime<Utc>,
) -> anyhow::Result<Option<DateTime<Utc>>> {
    let expiry = match (expires, ttl) {
        (Some(_), Some(_)) => return Err(invalid("Use either --expires or --ttl, not both")),
        (Some(value), None) => parse_datetime(value)?,
        (None, Some(value)) => {
            let window = parse_duration(value)?;
            now.checked_add_signed(window)
                .ok_or_else(|| invalid(format!("Duration out of range: {}", value)))?
        }
        (None, None) => return Ok(None),
    };
    if !is_storable_timestamp(&expiry) {
        return Err(invalid(format!(
            "Expiry {} is outside years 1-9999",
            expiry.format("%Y-%m-%d")
        )));
    }
    Ok(Some(expiry))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Plain,
}

pub fn parse_output_format(value: Option<&str>) -> anyhow::Result<Option<OutputFormat>> {
    match value {
        None => Ok(None),
        Some("table") => Ok(Some(OutputFormat::Table)),
        Some("plain") => Ok(Some(OutputFormat::Plain)),
        Some(other) => Err(invalid(format!(
            "Unsupported format: {} (use table or plain)",
            other
        ))),
    }
}

fn invalid(message: impl Into<String>) -> anyhow::Error {
    CliError::invalid_input(message).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_datetime_formats() {
        let expected = Utc.with_ymd_and_hms(2030, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_datetime("2030-05-01").unwrap(), expected);
        assert_eq!(parse_datetime("2030-05-01T02:00:00+02:00").unwrap(), expected);
        assert!(parse_datetime("next tuesday").is_err());
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("7d").unwrap(), Duration::days(7));
        assert_eq!(parse_duration("24h").unwrap(), Duration::hours(24));
        assert_eq!(parse_duration("30m").unwrap(), Duration::minutes(30));
        assert_eq!(parse_duration("5s").unwrap(), Duration::seconds(5));
        assert!(parse_duration("0h").is_err());
        assert!(parse_duration("5w").is_err());
        assert!(parse_duration("h").is_err());
    }

    #[test]
    fn test_resolve_expiry() {
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(resolve_expiry(None, None, now).unwrap(), None);
        assert_eq!(
            resolve_expiry(None, Some("1h"), now).unwrap(),
            Some(now + Duration::hours(1))
        );
        assert_eq!(
            resolve_expiry(Some("2030-02-01"), None, now).unwrap(),
            Some(Utc.with_ymd_and_hms(2030, 2, 1, 0, 0, 0).unwrap())
        );
        assert!(resolve_expiry(Some("2030-02-01"), Some("1h"), now).is_err());
    }

    #[test]
    fn test_resolve_expiry_rejects_unstorable_years() {
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
        let err = resolve_expiry(None, Some("4000000d"), now).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::InvalidInput(_))
        ));
        assert!(resolve_expiry(Some("+12978-06-01T00:00:00Z"), None, now).is_err());
        assert!(resolve_expiry(None, Some("2900000d"), now).is_ok());
    }

    #[test]
    fn test_parse_errors_are_invalid_input() {
        let err = parse_duration("bogus").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format(None).unwrap(), None);
        assert_eq!(
            parse_output_format(Some("plain")).unwrap(),
            Some(OutputFormat::Plain)
        );
        assert!(parse_output_format(Some("xml")).is_err());
    }
}
