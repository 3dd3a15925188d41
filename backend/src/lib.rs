//! Backend library modules.
//!
//! A small blog backend: posts and users over JSON, stored either in a
//! process-wide in-memory store or in PostgreSQL through Diesel.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
