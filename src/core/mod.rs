//! Core application support.
//!
//! Configuration shared by the library and the command-line interface.

mod config;

pub use config::{AiConfig, ClaudeConfig, Config, GenerationConfig, OllamaConfig, OpenAIConfig};
