//! Request handler module
//!
//! Responsible for request routing dispatch and turning resolver results into responses.

pub mod assets;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
