// Signal analysis: commit windowing, themes, complexity, patterns, impact,
// ownership and contribution summaries, compiled into one payload.

pub mod analyzer;
pub mod compiler;
pub mod complexity;
pub mod impact;
pub mod ownership;
pub mod patterns;
pub mod pr_analysis;
pub mod summary;
pub mod theme;
pub mod windowing;

pub use analyzer::SignalAnalyzer;
pub use compiler::SignalPayload;
