//! Pawsplay backend library.
//!
//! Hexagonal layout: [`domain`] holds the mutation pipelines and their ports,
//! [`inbound`] adapts HTTP requests onto the driving ports and [`outbound`]
//! implements the driven ports over PostgreSQL and object storage.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
