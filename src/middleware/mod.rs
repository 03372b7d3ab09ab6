//! API middleware components.
//!
//! - [`error_responder`]: logs unhandled errors and exposes their stack in development

pub mod error_responder;

pub use error_responder::error_responder;
