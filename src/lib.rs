//! Resume fit library: requirement extraction and evidence scoring

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod output;
pub mod processing;
pub mod tracker;

pub use config::Config;
pub use error::{Result, ResumeFitError};
