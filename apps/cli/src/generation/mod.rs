// Section writing: turns a compiled signal payload into raw Markdown sections.
// The LLM-backed pipeline goes through llm_client only; the offline writer
// needs no network.

pub mod offline;
pub mod pipeline;
pub mod prompts;

use async_trait::async_trait;

use crate::analysis::SignalPayload;
use crate::errors::AppError;

pub use offline::OfflineWriter;
pub use pipeline::AgentPipelineWriter;

/// A backend that writes CV sections for a payload. Implement this to swap
/// backends without touching the caller.
///
/// Output is raw Markdown; callers still strip links and run the autofixer.
#[async_trait]
pub trait SectionWriter: Send + Sync {
    /// Short backend name for logs ("agent_pipeline" | "offline").
    fn name(&self) -> &'static str;

    async fn write_sections(&self, payload: &SignalPayload) -> Result<String, AppError>;
}
