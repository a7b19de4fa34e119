//! Transmission layer for the MeF A2A gateway: SOAP envelope construction,
//! the mutual-TLS HTTP client, acknowledgment retrieval, reject-code
//! interpretation, and the per-submission status tracker.

pub mod client;
pub mod codes;
pub mod config;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod response;
pub mod retry;
pub mod simulate;
pub mod tracker;
