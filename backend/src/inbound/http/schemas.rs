//! OpenAPI schema wrappers for domain types.
//!
//! [`crate::domain::Error`] and [`crate::domain::ErrorCode`] stay free of
//! utoipa derives; the wrappers below describe their JSON shape and are
//! registered under the domain names so handler annotations can reference
//! `body = Error` directly.

use utoipa::ToSchema;

/// Schema for [`crate::domain::ErrorCode`], serialised in snake_case.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Validation or extractor failure (400).
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Missing, unknown, or unconfirmed bearer token (401).
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not allowed (403).
    #[schema(rename = "forbidden")]
    Forbidden,
    /// No such contact or account for the caller (404).
    #[schema(rename = "not_found")]
    NotFound,
    /// Unique constraint clash, such as a registered email (409).
    #[schema(rename = "conflict")]
    Conflict,
    /// Storage could not be reached (503).
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// Redacted server failure (500).
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Schema for [`crate::domain::Error`], the body of every non-2xx response.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "email must be a valid address")]
    message: String,
    /// Matches the `trace-id` response header.
    #[schema(rename = "traceId", example = "8f7c2d1e-4b6a-4f1e-9c3d-2a5b7e9f0c1d")]
    trace_id: Option<String>,
    /// Field-level context, e.g. `{"field":"email","code":"invalid_email"}`.
    details: Option<serde_json::Value>,
}
