//! # Utility Modules
//!
//! Supporting utilities for the Query client.
//!
//! ## Components
//! - **Session ID**: random session identifier generation with the protocol's
//!   low-nibble constraint applied

pub mod session_id;

// Re-export for convenience
pub use session_id::generate_session_id;
