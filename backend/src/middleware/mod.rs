//! Actix middleware shared by every route.
//!
//! [`Trace`] scopes each request to a [`crate::domain::TraceId`].

pub mod trace;

pub use trace::Trace;
