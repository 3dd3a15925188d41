//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: process-wide in-memory store used when no database is
//!   configured and by the HTTP integration tests.
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM.
//!
//! Adapters are thin translators between domain types and storage
//! representations. They contain no business logic.

pub mod memory;
pub mod persistence;
