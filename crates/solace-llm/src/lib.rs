//! Solace LLM - text generation provider abstraction
//!
//! This crate defines the provider seam used by the conversation core to
//! produce replies:
//! - `LlmProvider` trait implemented by every backend
//! - `OpenAiProvider` over `async-openai`
//! - `MockProvider` with scripted replies and injected failures for tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod mock;
pub mod openai;
pub mod prompt;
pub mod provider;
pub mod util;

pub use error::{Error, Result};
pub use mock::{MockProvider, MockReply};
pub use openai::{OpenAiConfig, OpenAiProvider};
pub use prompt::{Completion, Prompt, Speaker, TokenUsage, Turn};
pub use provider::LlmProvider;
