use super::{JobOutcome, OutputFormatter};
use anyhow::Result;
use appops_client_core::{JobStatus, ManagedInstance};
use colored::*;
use serde_json::json;

/// Text formatter for human-readable output
pub struct TextFormatter {
    use_color: bool,
}

impl TextFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn colorize(&self, text: &str, color: fn(&str) -> ColoredString) -> String {
        if self.use_color {
            color(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn instance_block(&self, instance: &ManagedInstance) -> String {
        let mut output = String::new();
        let id = self.colorize(&instance.id, |s| s.cyan());
        let marker = if instance.control_instance {
            self.colorize(" (control)", |s| s.yellow())
        } else {
            String::new()
        };

        output.push_str(&format!("Instance: {id}{marker}\n"));
        output.push_str(&format!(
            "  Org ID:     {}\n",
            instance.platform_instance_id.as_deref().unwrap_or("-")
        ));
        output.push_str(&format!(
            "  Connection: {}\n",
            instance.connection_id.as_deref().unwrap_or("-")
        ));
        output.push_str(&format!(
            "  Type:       {}\n",
            instance.instance_type.as_deref().unwrap_or("-")
        ));
        output.push_str(&format!(
            "  URL:        {}\n",
            instance.instance_url.as_deref().unwrap_or("-")
        ));
        output
    }
}

impl OutputFormatter for TextFormatter {
    fn format_instances(&self, instances: &[ManagedInstance], detailed: bool) -> Result<String> {
        let mut output = format!("{} managed instance(s)\n", instances.len());
        if detailed {
            for instance in instances {
                output.push('\n');
                output.push_str(&self.instance_block(instance));
            }
        }
        Ok(output)
    }

    fn format_instance(&self, instance: &ManagedInstance) -> Result<String> {
        Ok(self.instance_block(instance))
    }

    fn format_job(&self, outcome: &JobOutcome) -> Result<String> {
        let job_id = self.colorize(&outcome.job_id, |s| s.cyan());
        let mut output = format!("{} job submitted: {job_id}\n", outcome.operation);

        if let Some(job) = &outcome.job {
            let status = match &job.status {
                Some(JobStatus::Completed) => self.colorize("COMPLETED", |s| s.green()),
                Some(JobStatus::Pending(status)) => self.colorize(status, |s| s.yellow()),
                None => "-".to_string(),
            };
            output.push_str(&format!("Status: {status}\n"));
            if let Some(finished) = &job.finished {
                output.push_str(&format!("Finished: {finished}\n"));
            }
        }

        Ok(output)
    }

    fn format_removed(&self, instance_id: &str) -> Result<String> {
        Ok(format!(
            "Unmanage requested for instance {}\n",
            self.colorize(instance_id, |s| s.cyan())
        ))
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_instances(&self, instances: &[ManagedInstance], _detailed: bool) -> Result<String> {
        Ok(serde_json::to_string_pretty(&json!({ "instances": instances }))?)
    }

    fn format_instance(&self, instance: &ManagedInstance) -> Result<String> {
        Ok(serde_json::to_string_pretty(instance)?)
    }

    fn format_job(&self, outcome: &JobOutcome) -> Result<String> {
        Ok(serde_json::to_string_pretty(outcome)?)
    }

    fn format_removed(&self, instance_id: &str) -> Result<String> {
        Ok(serde_json::to_string_pretty(&json!({ "removed": instance_id }))?)
    }
}
