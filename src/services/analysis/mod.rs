// Analysis Module
// Collaborator-backed AI detection and humanization:
// - prompts: prompt construction and per-language style instructions
// - reply_parser: shared decode-with-fallback for structured replies
// - analyzer: Detect / Humanize / Analyze orchestration

pub mod analyzer;
pub mod prompts;
pub mod reply_parser;

#[cfg(test)]
pub(crate) mod test_support;

pub use analyzer::{AnalysisError, Analyzer};
pub use prompts::{detection_prompt, humanization_prompt, language_instruction};
pub use reply_parser::{decode_or_fallback, Decoded};
