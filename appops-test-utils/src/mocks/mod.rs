//! Mock implementations for testing

mod hub;
mod session;

pub use hub::{MockHubClient, MockResponse};
pub use session::MockOrgSession;
