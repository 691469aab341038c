//! Requirement extraction and evidence scoring

pub mod aggregator;
pub mod analyzer;
pub mod evaluator;
pub mod evidence;
pub mod lexicon;
pub mod normalizer;
pub mod requirements;
pub mod tokenizer;
