mod formatters;

pub use formatters::{JsonFormatter, TextFormatter};

use anyhow::Result;
use appops_client_core::{Job, ManagedInstance};
use serde::Serialize;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }

    /// Build the formatter for this format
    pub fn formatter(self, use_color: bool) -> Box<dyn OutputFormatter> {
        match self {
            Self::Text => Box::new(TextFormatter::new(use_color)),
            Self::Json => Box::new(JsonFormatter),
        }
    }
}

/// Result of a command that launched a job
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOutcome {
    pub operation: String,
    pub job_id: String,
    /// Final job record when the command waited for completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<Job>,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format the managed instance list
    ///
    /// With `detailed` false only the count is reported in text mode.
    fn format_instances(&self, instances: &[ManagedInstance], detailed: bool) -> Result<String>;

    fn format_instance(&self, instance: &ManagedInstance) -> Result<String>;

    fn format_job(&self, outcome: &JobOutcome) -> Result<String>;

    /// Confirmation for fire-and-forget operations
    fn format_removed(&self, instance_id: &str) -> Result<String>;
}
