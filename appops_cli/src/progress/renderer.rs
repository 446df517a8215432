//! Progress rendering for the CLI
//!
//! Converts ProgressUpdate messages into terminal output on stderr.

use super::utils::{format_attempt, format_duration};
use appops_client_core::progress::ProgressUpdate;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Render progress updates from a channel
pub async fn render_progress(mut rx: mpsc::Receiver<ProgressUpdate>) {
    let mut renderer = ProgressRenderer::new();

    while let Some(update) = rx.recv().await {
        renderer.handle_update(update);
    }

    renderer.finish();
}

/// One spinner per job being polled
pub struct ProgressRenderer {
    job_spinners: HashMap<String, (ProgressBar, Instant)>,
}

impl ProgressRenderer {
    pub fn new() -> Self {
        Self {
            job_spinners: HashMap::new(),
        }
    }

    pub fn handle_update(&mut self, update: ProgressUpdate) {
        match update {
            ProgressUpdate::Status { message } => self.show_status(message),

            ProgressUpdate::JobSubmitted { operation, job_id } => {
                self.show_status(format!("{} job {} submitted", operation.bold(), job_id.cyan()));
            }

            ProgressUpdate::JobPolled {
                job_id,
                attempt,
                max_attempts,
                status,
            } => self.update_job(job_id, attempt, max_attempts, status),

            ProgressUpdate::JobCompleted { job_id } => self.complete_job(job_id),
        }
    }

    fn update_job(
        &mut self,
        job_id: String,
        attempt: u32,
        max_attempts: u32,
        status: Option<String>,
    ) {
        let (spinner, started) = self.job_spinners.entry(job_id.clone()).or_insert_with(|| {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
            {
                spinner.set_style(style);
            }
            spinner.enable_steady_tick(Duration::from_millis(100));
            (spinner, Instant::now())
        });

        spinner.set_message(format!(
            "{} {} [{}] poll {} | {}",
            "Job".bold(),
            job_id,
            status.as_deref().unwrap_or("PENDING").yellow(),
            format_attempt(attempt, max_attempts),
            format_duration(started.elapsed())
        ));
    }

    fn complete_job(&mut self, job_id: String) {
        let elapsed = match self.job_spinners.remove(&job_id) {
            Some((spinner, started)) => {
                spinner.finish_and_clear();
                Some(started.elapsed())
            }
            None => None,
        };

        match elapsed {
            Some(elapsed) => eprintln!(
                "{} Job {} completed in {}",
                "✓".green(),
                job_id,
                format_duration(elapsed)
            ),
            None => eprintln!("{} Job {} completed", "✓".green(), job_id),
        }
    }

    fn show_status(&self, message: String) {
        eprintln!("{} {}", "→".green(), message);
    }

    pub fn finish(self) {
        for (_, (spinner, _)) in self.job_spinners {
            spinner.finish_and_clear();
        }
    }
}

impl Default for ProgressRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_lifecycle() {
        let mut renderer = ProgressRenderer::new();

        renderer.handle_update(ProgressUpdate::JobPolled {
            job_id: "job-1".to_string(),
            attempt: 1,
            max_attempts: 60,
            status: Some("IN_PROGRESS".to_string()),
        });
        assert_eq!(renderer.job_spinners.len(), 1);

        renderer.handle_update(ProgressUpdate::JobCompleted {
            job_id: "job-1".to_string(),
        });
        assert!(renderer.job_spinners.is_empty());

        renderer.finish();
    }

    #[tokio::test]
    async fn test_render_exits_when_senders_drop() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(ProgressUpdate::status("Submitting")).await.unwrap();
        drop(tx);

        render_progress(rx).await;
    }
}
