//! Request middleware.

pub mod visit_logging;

pub use visit_logging::visit_logging_middleware;
