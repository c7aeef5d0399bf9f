//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper returns an `invalid_request` [`Error`] whose `details` carry
//! the offending `field` and a machine-readable `code`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::json;

use crate::domain::{
    EmailValidationError, Error, PaginationError, SearchTokenError, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidDate,
    OutOfRange,
    InvalidEmail,
    InvalidUsername,
    InvalidUrl,
    InvalidSearch,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidUsername => "invalid_username",
            ErrorCode::InvalidUrl => "invalid_url",
            ErrorCode::InvalidSearch => "invalid_search",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn field_error_with_value(
    field: FieldName,
    code: ErrorCode,
    message: impl Into<String>,
    value: &str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
        "value": value,
    }))
}

/// Parse a birth date supplied as `YYYY-MM-DD`, an RFC 3339 timestamp
/// (converted to UTC), or a naive ISO 8601 timestamp.
pub(crate) fn parse_born_date(field: FieldName, raw: &str) -> Result<NaiveDateTime, Error> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN));
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(stamp.naive_utc());
    }
    trimmed
        .parse::<NaiveDateTime>()
        .map_err(|_| {
            field_error_with_value(
                field,
                ErrorCode::InvalidDate,
                format!("{} must be a date (YYYY-MM-DD) or ISO 8601 timestamp", field.as_str()),
                raw,
            )
        })
}

/// Map a pagination failure to the query parameter that caused it.
pub(crate) fn pagination_error(err: PaginationError) -> Error {
    let field = match err {
        PaginationError::NegativeSkip => FieldName::new("skip"),
        PaginationError::LimitOutOfRange { .. } => FieldName::new("limit"),
    };
    field_error(field, ErrorCode::OutOfRange, err.to_string())
}

pub(crate) fn search_token_error(err: SearchTokenError) -> Error {
    field_error(
        FieldName::new("credentials"),
        ErrorCode::InvalidSearch,
        err.to_string(),
    )
}

pub(crate) fn email_error(field: FieldName, err: EmailValidationError) -> Error {
    field_error(field, ErrorCode::InvalidEmail, err.to_string())
}

pub(crate) fn user_error(field: FieldName, err: UserValidationError) -> Error {
    let code = match err {
        UserValidationError::InvalidAvatarUrl => ErrorCode::InvalidUrl,
        _ => ErrorCode::InvalidUsername,
    };
    field_error(field, code, err.to_string())
}
