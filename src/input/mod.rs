//! Input processing module
//! Detects document types and turns resumes and job postings into plain text

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use manager::InputManager;
