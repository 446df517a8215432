//! Test utilities for the AppOps client
//!
//! This crate provides mock implementations and JSON builders for testing
//! AppOps orchestration without a live control plane.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use mocks::{MockHubClient, MockOrgSession, MockResponse};
