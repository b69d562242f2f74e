//! Actix middleware.

pub mod request_context;

pub use request_context::{current_path, current_trace_id, RequestTrace};
