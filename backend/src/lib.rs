//! Contacts backend library modules.
//!
//! The crate is laid out as a hexagon: [`domain`] holds entities, services,
//! and ports; [`inbound`] adapts HTTP requests onto the driving ports; and
//! [`outbound`] implements the driven ports against PostgreSQL or memory.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
