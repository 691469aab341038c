//! Remote (LLM-backed) evaluator

pub mod client;
pub mod prompts;
