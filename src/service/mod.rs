//! # Client Service
//!
//! High-level async client tying the session driver to the UDP transport.

pub mod client;

pub use client::QueryClient;
