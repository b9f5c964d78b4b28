//! LLM provider adapters.

mod huggingface;
mod mock;

pub use huggingface::{HuggingFaceConfig, HuggingFaceProvider};
pub use mock::{MockLlmError, MockLlmProvider};
