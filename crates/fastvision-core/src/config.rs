use std::time::Duration;

/// Tunables for a single [`crate::pipeline::process`] call.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Whether to invoke the [`crate::vision::VisionTagger`]; when `false`
    /// the heuristic classifier is applied to every block.
    pub use_vision: bool,
    /// Raw `"1,3-5,10"`-style page range; `None`/unparsable means all pages.
    pub page_range: Option<String>,
    /// Upper bound on in-flight geometry/tagger workers; actual pool size is
    /// `min(max_workers, page_count)`.
    pub max_workers: usize,
    /// Advisory per-request timeout a [`crate::vision::VisionTagger`]
    /// implementation should honor; the core does not enforce it itself.
    pub tagger_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            use_vision: true,
            page_range: None,
            max_workers: 8,
            tagger_timeout: Duration::from_secs(60),
        }
    }
}

impl PipelineConfig {
    pub fn worker_count(&self, page_count: usize) -> usize {
        self.max_workers.min(page_count).max(1)
    }
}
