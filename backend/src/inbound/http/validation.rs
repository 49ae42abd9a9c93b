//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every decoder fails closed: a value that is present but malformed becomes
//! `invalid_request` with `details { field, value, code }` rather than being
//! coerced or dropped.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidInteger,
    InvalidDate,
    InvalidTime,
    InvalidEnum,
    InvalidText,
    TooLarge,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidInteger => "invalid_integer",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidTime => "invalid_time",
            ErrorCode::InvalidEnum => "invalid_enum",
            ErrorCode::InvalidText => "invalid_text",
            ErrorCode::TooLarge => "too_large",
        }
    }
}

/// Newtype wrapper for form field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value,
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("missing required field: {name}"))
        .with_code(ErrorCode::MissingField)
}

/// A form part, text or file, larger than `limit` bytes.
pub(crate) fn too_large_error(field: FieldName, limit: usize) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("{name} exceeds {limit} bytes")).with_details(json!({
        "field": name,
        "limit": limit,
        "code": ErrorCode::TooLarge.as_str(),
    }))
}

pub(crate) fn invalid_text_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must be UTF-8 text"))
        .with_code(ErrorCode::InvalidText)
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        ValidationError::new(field, format!("{} must be a valid UUID", field.as_str()))
            .with_value(ErrorCode::InvalidUuid, value)
    })
}

/// Parse a non-negative integer. Signs, decimals and overflow all fail.
pub(crate) fn parse_non_negative(value: &str, field: FieldName) -> Result<u16, Error> {
    value.trim().parse::<u16>().map_err(|_| {
        ValidationError::new(
            field,
            format!("{} must be a non-negative integer", field.as_str()),
        )
        .with_value(ErrorCode::InvalidInteger, value)
    })
}

/// Parse `YYYY-MM-DD`, or an RFC 3339 timestamp whose date part is kept.
pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    let raw = value.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|timestamp| timestamp.date_naive()))
        .map_err(|_| {
            ValidationError::new(field, format!("{} must be a YYYY-MM-DD date", field.as_str()))
                .with_value(ErrorCode::InvalidDate, value)
        })
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub(crate) fn parse_time(value: &str, field: FieldName) -> Result<NaiveTime, Error> {
    let raw = value.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| {
            ValidationError::new(field, format!("{} must be an HH:MM time", field.as_str()))
                .with_value(ErrorCode::InvalidTime, value)
        })
}

/// Parse one of a closed set of labels; `expected` lists them for the client.
pub(crate) fn parse_choice<T: FromStr>(
    value: &str,
    field: FieldName,
    expected: &'static str,
) -> Result<T, Error> {
    value.parse::<T>().map_err(|_| {
        ValidationError::new(
            field,
            format!("{} must be one of {expected}", field.as_str()),
        )
        .with_value(ErrorCode::InvalidEnum, value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CareService, ErrorCode as DomainCode};
    use rstest::rstest;

    const AGE: FieldName = FieldName::new("age");
    const DATE: FieldName = FieldName::new("date");
    const TIME: FieldName = FieldName::new("time");

    fn detail_code(error: &Error) -> String {
        error.details().expect("details present")["code"]
            .as_str()
            .expect("code string")
            .to_owned()
    }

    #[rstest]
    #[case("0", 0)]
    #[case(" 7 ", 7)]
    fn parses_ages(#[case] raw: &str, #[case] expected: u16) {
        assert_eq!(parse_non_negative(raw, AGE).expect("valid"), expected);
    }

    #[rstest]
    #[case("-1")]
    #[case("2.5")]
    #[case("three")]
    #[case("70000")]
    fn rejects_malformed_ages(#[case] raw: &str) {
        let error = parse_non_negative(raw, AGE).expect_err("malformed");
        assert_eq!(error.code(), DomainCode::InvalidRequest);
        assert_eq!(detail_code(&error), "invalid_integer");
        assert_eq!(error.details().expect("details")["value"], raw);
    }

    #[rstest]
    #[case("2026-05-04")]
    #[case("2026-05-04T23:30:00+02:00")]
    fn parses_dates(#[case] raw: &str) {
        let expected = NaiveDate::from_ymd_opt(2026, 5, 4).expect("valid");
        assert_eq!(parse_date(raw, DATE).expect("valid"), expected);
    }

    #[rstest]
    #[case("04/05/2026")]
    #[case("2026-02-30")]
    #[case("")]
    fn rejects_malformed_dates(#[case] raw: &str) {
        let error = parse_date(raw, DATE).expect_err("malformed");
        assert_eq!(detail_code(&error), "invalid_date");
    }

    #[rstest]
    #[case("09:30", 9, 30, 0)]
    #[case("17:05:45", 17, 5, 45)]
    fn parses_times(#[case] raw: &str, #[case] h: u32, #[case] m: u32, #[case] s: u32) {
        let expected = NaiveTime::from_hms_opt(h, m, s).expect("valid");
        assert_eq!(parse_time(raw, TIME).expect("valid"), expected);
    }

    #[rstest]
    fn rejects_malformed_time() {
        let error = parse_time("25:00", TIME).expect_err("malformed");
        assert_eq!(detail_code(&error), "invalid_time");
    }

    #[rstest]
    fn choice_errors_name_the_options() {
        let error = parse_choice::<CareService>(
            "spa",
            FieldName::new("service"),
            "daycare|grooming|boarding",
        )
        .expect_err("unknown");
        assert!(error.message().contains("daycare|grooming|boarding"));
        assert_eq!(detail_code(&error), "invalid_enum");
    }

    #[rstest]
    fn missing_field_has_no_value() {
        let error = missing_field_error(FieldName::new("name"));
        let details = error.details().expect("details");
        assert_eq!(details["code"], "missing_field");
        assert!(details.get("value").is_none());
    }

    #[rstest]
    fn too_large_reports_the_limit() {
        let error = too_large_error(FieldName::new("avatar"), 1024);
        let details = error.details().expect("details");
        assert_eq!(details["code"], "too_large");
        assert_eq!(details["limit"], 1024);
    }

    #[rstest]
    fn uuid_errors_echo_the_value() {
        let error = parse_uuid("nope", FieldName::new("id")).expect_err("malformed");
        assert_eq!(detail_code(&error), "invalid_uuid");
    }
}
