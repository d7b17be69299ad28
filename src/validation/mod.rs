//! Field-level validators.
//!
//! Every validator is a pure function from a raw request value to a
//! [`FieldCheck`]. Handlers collect the checks for a payload into a
//! [`Validations`] map and reject the request when any field failed, so the
//! client sees every violation at once.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::Priority;

pub const NAME_MAX_LENGTH: usize = 100;
pub const NOTES_MAX_LENGTH: usize = 1000;
pub const URL_MAX_LENGTH: usize = 2048;
pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 50;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Outcome of validating a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldCheck {
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl FieldCheck {
    pub fn ok() -> Self {
        Self { error: false, text: None }
    }

    pub fn fail(text: impl Into<String>) -> Self {
        Self {
            error: true,
            text: Some(text.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        !self.error
    }
}

/// Per-field validation results for one request payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Validations(BTreeMap<String, FieldCheck>);

impl Validations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, check: FieldCheck) -> Self {
        self.0.insert(field.into(), check);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.0.values().all(FieldCheck::is_ok)
    }

    pub fn get(&self, field: &str) -> Option<&FieldCheck> {
        self.0.get(field)
    }

    /// `Ok` when every field passed, otherwise the full map back as the error.
    pub fn into_result(self) -> Result<(), Validations> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn text_length(value: &str, label: &str, min: usize, max: usize) -> FieldCheck {
    let len = value.trim().chars().count();
    if len < min {
        if min == 1 {
            FieldCheck::fail(format!("{} cannot be empty", label))
        } else {
            FieldCheck::fail(format!("{} must be at least {} characters", label, min))
        }
    } else if value.chars().count() > max {
        FieldCheck::fail(format!("{} must be at most {} characters", label, max))
    } else {
        FieldCheck::ok()
    }
}

/// Present and not blank.
pub fn required(value: Option<&str>, label: &str) -> FieldCheck {
    match value {
        Some(v) if !v.trim().is_empty() => FieldCheck::ok(),
        _ => FieldCheck::fail(format!("{} is required", label)),
    }
}

/// Required, non-blank name for todos and lists.
pub fn name(value: Option<&str>) -> FieldCheck {
    match value {
        None => FieldCheck::fail("Name is required"),
        Some(v) => text_length(v, "Name", 1, NAME_MAX_LENGTH),
    }
}

pub fn notes(value: Option<&str>) -> FieldCheck {
    match value {
        None => FieldCheck::ok(),
        Some(v) if v.chars().count() > NOTES_MAX_LENGTH => {
            FieldCheck::fail(format!("Notes must be at most {} characters", NOTES_MAX_LENGTH))
        }
        Some(_) => FieldCheck::ok(),
    }
}

/// Optional absolute http(s) URL.
pub fn url(value: Option<&str>) -> FieldCheck {
    let Some(v) = value else {
        return FieldCheck::ok();
    };
    if v.len() > URL_MAX_LENGTH {
        return FieldCheck::fail(format!("URL must be at most {} characters", URL_MAX_LENGTH));
    }
    match url::Url::parse(v) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => FieldCheck::ok(),
        Ok(_) => FieldCheck::fail("URL must use http or https"),
        Err(_) => FieldCheck::fail(format!("Invalid URL: {}", v)),
    }
}

/// Priority is optional on create; when present it must be a known level.
pub fn priority(value: Option<&str>) -> FieldCheck {
    match value {
        None => FieldCheck::ok(),
        Some(v) => required_priority(Some(v)),
    }
}

pub fn required_priority(value: Option<&str>) -> FieldCheck {
    match value {
        None => FieldCheck::fail("Priority is required"),
        Some(v) if Priority::parse(v).is_some() => FieldCheck::ok(),
        Some(v) => FieldCheck::fail(format!(
            "Priority must be one of {}, got '{}'",
            Priority::ALL.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(", "),
            v
        )),
    }
}

pub fn object_id(value: &str) -> FieldCheck {
    match Uuid::parse_str(value) {
        Ok(_) => FieldCheck::ok(),
        Err(_) => FieldCheck::fail(format!("'{}' is not a valid ID", value)),
    }
}

pub fn optional_object_id(value: Option<&str>) -> FieldCheck {
    value.map(object_id).unwrap_or_else(FieldCheck::ok)
}

/// Required due date, `MM-DD-YYYY` or RFC 3339.
pub fn due(value: Option<&str>) -> FieldCheck {
    match value {
        None => FieldCheck::fail("Due date is required"),
        Some(v) if parse_due(v).is_some() => FieldCheck::ok(),
        Some(v) => FieldCheck::fail(format!(
            "Due date must be MM-DD-YYYY or an RFC 3339 timestamp, got '{}'",
            v
        )),
    }
}

/// `#rgb` or `#rrggbb`.
pub fn color(value: Option<&str>) -> FieldCheck {
    let Some(v) = value else {
        return FieldCheck::ok();
    };
    let hex = v.strip_prefix('#').unwrap_or("");
    if (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        FieldCheck::ok()
    } else {
        FieldCheck::fail(format!("Color must be a hex value like #1e90ff, got '{}'", v))
    }
}

pub fn username(value: Option<&str>) -> FieldCheck {
    let Some(v) = value else {
        return FieldCheck::fail("Username is required");
    };
    if v.is_empty() {
        return FieldCheck::fail("Username cannot be empty");
    }
    let len = v.chars().count();
    if len < USERNAME_MIN_LENGTH {
        return FieldCheck::fail(format!("Username must be at least {} characters", USERNAME_MIN_LENGTH));
    }
    if len > USERNAME_MAX_LENGTH {
        return FieldCheck::fail(format!("Username must be at most {} characters", USERNAME_MAX_LENGTH));
    }
    if !v.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return FieldCheck::fail("Username can only contain letters, numbers, underscore, and hyphen");
    }
    if !v.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return FieldCheck::fail("Username must start with a letter or number");
    }
    FieldCheck::ok()
}

pub fn email(value: Option<&str>) -> FieldCheck {
    let Some(v) = value else {
        return FieldCheck::fail("Email is required");
    };
    let mut parts = v.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None)
            if !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.') =>
        {
            FieldCheck::ok()
        }
        _ => FieldCheck::fail(format!("Invalid email address: {}", v)),
    }
}

pub fn password(value: Option<&str>) -> FieldCheck {
    match value {
        None => FieldCheck::fail("Password is required"),
        Some(v) if v.chars().count() < MIN_PASSWORD_LENGTH => {
            FieldCheck::fail(format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH))
        }
        Some(v) if v.chars().count() > MAX_PASSWORD_LENGTH => {
            FieldCheck::fail(format!("Password must be at most {} characters", MAX_PASSWORD_LENGTH))
        }
        Some(_) => FieldCheck::ok(),
    }
}

/// Strict `MM-DD-YYYY`.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[2] == b'-'
        && bytes[5] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit());
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(value, "%m-%d-%Y").ok()
}

/// Midnight UTC at the start of `day`.
pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}

/// Accepts a calendar day (midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_due(value: &str) -> Option<DateTime<Utc>> {
    if let Some(day) = parse_day(value) {
        return Some(start_of_day(day));
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_rules() {
        assert!(name(Some("Buy milk")).is_ok());
        assert_eq!(name(None), FieldCheck::fail("Name is required"));
        assert!(name(Some("   ")).error);
        assert!(name(Some(&"x".repeat(NAME_MAX_LENGTH + 1))).error);
    }

    #[test]
    fn priority_membership() {
        assert!(priority(None).is_ok());
        assert!(priority(Some("HIGH")).is_ok());
        assert!(priority(Some("high")).is_ok());
        assert!(priority(Some("URGENT")).error);
        assert!(required_priority(None).error);
    }

    #[test]
    fn object_ids() {
        assert!(object_id(&Uuid::new_v4().to_string()).is_ok());
        assert!(object_id("5f1b2c").error);
        assert!(optional_object_id(None).is_ok());
    }

    #[test]
    fn urls_require_http_scheme() {
        assert!(url(Some("https://example.com/a?b=c")).is_ok());
        assert!(url(Some("ftp://example.com")).error);
        assert!(url(Some("not a url")).error);
        assert!(url(None).is_ok());
    }

    #[test]
    fn colors() {
        assert!(color(Some("#fff")).is_ok());
        assert!(color(Some("#1E90ff")).is_ok());
        assert!(color(Some("1e90ff")).error);
        assert!(color(Some("#12345")).error);
    }

    #[test]
    fn usernames_and_emails() {
        assert!(username(Some("alice_01")).is_ok());
        assert!(username(Some("ab")).error);
        assert!(username(Some("_alice")).error);
        assert!(username(Some("al ice")).error);
        assert!(email(Some("alice@example.com")).is_ok());
        assert!(email(Some("alice@localhost")).error);
        assert!(email(Some("a@b@c.com")).error);
        assert!(password(Some("short")).error);
        assert!(password(Some("long enough")).is_ok());
    }

    #[test]
    fn days_are_strict() {
        assert_eq!(parse_day("03-14-2024"), NaiveDate::from_ymd_opt(2024, 3, 14));
        assert_eq!(parse_day("3-14-2024"), None);
        assert_eq!(parse_day("2024-03-14"), None);
        assert_eq!(parse_day("13-01-2024"), None);
        assert_eq!(parse_day("02-30-2024"), None);
    }

    #[test]
    fn due_accepts_day_or_timestamp() {
        let day = parse_due("03-14-2024").unwrap();
        assert_eq!(day.to_rfc3339(), "2024-03-14T00:00:00+00:00");
        let ts = parse_due("2024-03-14T09:30:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-14T07:30:00+00:00");
        assert!(due(Some("tomorrow")).error);
        assert!(due(None).error);
    }

    #[test]
    fn aggregate_reports_every_field() {
        let v = Validations::new()
            .with("name", name(None))
            .with("priority", priority(Some("LOW")))
            .with("url", url(Some("nope")));
        assert!(!v.is_valid());
        assert!(v.get("priority").unwrap().is_ok());

        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["name"]["error"], true);
        assert_eq!(json["priority"], serde_json::json!({ "error": false }));
        assert!(v.into_result().is_err());

        assert!(Validations::new().with("name", name(Some("ok"))).into_result().is_ok());
    }
}
