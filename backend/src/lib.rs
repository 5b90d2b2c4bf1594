//! Anonymous employee feedback service.
//!
//! Hexagonal layout: [`domain`] holds the entities, algorithms, and ports;
//! [`inbound`] adapts HTTP requests onto driving ports; [`outbound`]
//! implements the driven ports against PostgreSQL, the language model API,
//! and the export archive.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(test)]
mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
