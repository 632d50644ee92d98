//! Skill matcher library
//!
//! Extracts skills from resumes and job postings and scores how well a resume
//! covers a job's requirements.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, SkillMatcherError};
