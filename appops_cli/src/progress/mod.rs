//! Progress reporting module for the CLI
//!
//! Providers forward core progress updates to a renderer task that draws
//! job spinners and status lines on stderr.

pub mod provider;
pub mod renderer;
pub mod utils;

pub use provider::create_progress_infrastructure;
pub use renderer::render_progress;

use appops_client_core::ProgressProvider;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A running progress display
pub struct ProgressHandle {
    provider: Arc<dyn ProgressProvider>,
    renderer: Option<JoinHandle<()>>,
}

impl ProgressHandle {
    /// Start rendering when enabled, otherwise hand out a null provider
    pub fn start(enabled: bool) -> Self {
        if !enabled {
            return Self {
                provider: <dyn ProgressProvider>::null(),
                renderer: None,
            };
        }

        let (provider, rx) = create_progress_infrastructure();
        Self {
            provider,
            renderer: Some(tokio::spawn(render_progress(rx))),
        }
    }

    pub fn provider(&self) -> Arc<dyn ProgressProvider> {
        self.provider.clone()
    }

    /// Close the channel and wait for the renderer to drain
    pub async fn finish(self) {
        self.provider.complete();
        if let Some(renderer) = self.renderer {
            let _ = renderer.await;
        }
    }
}
