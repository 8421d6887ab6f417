// Helper functions for safe logging and serialization

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Masks email addresses for safe logging
/// Prevents sensitive data exposure while preserving debugging utility
///
/// # Example
/// ```
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    if email.len() > 3 {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() == 2 && !parts[0].is_empty() {
            let first = parts[0].chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, parts[1])
        } else {
            "***@***.***".to_string()
        }
    } else {
        "***@***.***".to_string()
    }
}

/// Current UTC time in SQLite's `datetime('now')` layout, so values written
/// from Rust sort and compare with column defaults.
pub fn sqlite_now() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Deserializes an optional ISO date, treating an empty string as absent
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct DateHolder {
        #[serde(default, deserialize_with = "deserialize_optional_date")]
        dob: Option<NaiveDate>,
    }

    #[test]
    fn test_sqlite_now_matches_datetime_layout() {
        let now = sqlite_now();
        assert_eq!(now.len(), 19);
        assert!(chrono::NaiveDateTime::parse_from_str(&now, "%Y-%m-%d %H:%M:%S").is_ok());
    }

    #[test]
    fn test_safe_email_log_masks_local_part() {
        assert_eq!(safe_email_log("user@example.com"), "u***@example.com");
    }

    #[test]
    fn test_safe_email_log_handles_garbage() {
        assert_eq!(safe_email_log("a@b"), "***@***.***");
        assert_eq!(safe_email_log("not-an-email"), "***@***.***");
        assert_eq!(safe_email_log("@example.com"), "***@***.***");
    }

    #[test]
    fn test_deserialize_optional_date() {
        let parsed: DateHolder = serde_json::from_str(r#"{"dob": "1998-04-12"}"#).unwrap();
        assert_eq!(parsed.dob, NaiveDate::from_ymd_opt(1998, 4, 12));

        let empty: DateHolder = serde_json::from_str(r#"{"dob": ""}"#).unwrap();
        assert_eq!(empty.dob, None);

        let null: DateHolder = serde_json::from_str(r#"{"dob": null}"#).unwrap();
        assert_eq!(null.dob, None);

        let missing: DateHolder = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.dob, None);

        assert!(serde_json::from_str::<DateHolder>(r#"{"dob": "12/04/1998"}"#).is_err());
    }
}
