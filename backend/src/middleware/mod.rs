//! Request middleware.
//!
//! Purpose: define middleware components for request lifecycle concerns such
//! as tracing and bounding handler time.

pub mod timeout;
pub mod trace;

pub use timeout::RequestTimeout;
pub use trace::Trace;
