//! AppOps command line interface library
//!
//! Exposes configuration, sessions and command orchestrators so they can be
//! exercised without spawning the binary.

pub mod config;
pub mod error;
pub mod orchestrators;
pub mod output;
pub mod progress;
pub mod session;
pub mod terminal;
