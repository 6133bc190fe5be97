//! Building blocks of the `aiolens` command
//!
//! Page retrieval, the LLM and detector collaborators, report renderers
//! and the output path rules live here so they can be tested without
//! spawning the binary.

pub mod fetch;
pub mod llm;
pub mod output;
pub mod render;

pub use fetch::{fetch_html, read_html};
pub use llm::{FileResponseClient, LlmSettings, NullDetector, OpenAiClient};
pub use output::{build_output_path, write_report};
pub use render::{JsonRenderer, OutputFormat, TextRenderer, render_consistency};
