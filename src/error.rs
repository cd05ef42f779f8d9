//! Error types for fpick

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FpickError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid pattern: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Metadata error: {0}")]
    MetadataError(String),

    #[error("Failed to launch '{command}': {reason}")]
    LaunchError { command: String, reason: String },
}

pub type Result<T> = std::result::Result<T, FpickError>;
