//! Reading resumes and job descriptions from disk

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use manager::InputManager;
