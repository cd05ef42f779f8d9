//! Fpick - an interactive, keystroke-driven file picker
//!
//! This crate walks a directory tree, filters file names by pattern and
//! lets an operator sort each match into a selected or skipped list with
//! single keystrokes.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod launcher;
pub mod list_editor;
pub mod logging;
pub mod metadata;
pub mod session;
pub mod tui;

// Re-export primary types for convenience
pub use cli::{AppConfig, Args};
pub use config::UserConfig;
pub use domain::{copy_files, Candidate, ListKind, MediaKind, SelectionState, Walker};
pub use error::{FpickError, Result};
pub use launcher::{ExternalCommand, Launcher, ProcessLauncher};
pub use metadata::{MetadataProvider, SystemMetadata};
pub use session::{Command, Outcome, RunOutcome, Session};
