//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod contacts;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api` route together with extractor configuration that
/// turns malformed bodies, queries, and paths into `invalid_request` errors.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use contacts::inbound::http;
///
/// let app = App::new().service(web::scope("/api").configure(http::configure));
/// # let _ = app;
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .configure(contacts::configure)
        .configure(users::configure);
}
