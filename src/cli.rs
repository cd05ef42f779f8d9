// CLI module for argument parsing and configuration

use crate::config::UserConfig;
use crate::domain::{compile_pattern, default_pattern};
use crate::launcher::ExternalCommand;
use clap::{ArgAction, Parser};
use std::fs;
use std::path::PathBuf;

/// Fpick - walk a directory tree and pick files with single keystrokes
///
/// Every file whose name matches the pattern is either selected outright or,
/// in interactive mode, offered for a decision. The selected files are
/// listed at the end.
#[derive(Parser, Debug, Clone)]
#[command(name = "fpick")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Search directory
    pub dir: PathBuf,

    /// Copy the selected files to DIR
    #[arg(short = 'c', long = "copy", value_name = "DIR")]
    pub copy: Option<PathBuf>,

    /// Interactive mode
    #[arg(short = 'i', long = "interactive", action = ArgAction::SetTrue)]
    pub interactive: bool,

    /// Verbosity level (repeat for more)
    #[arg(short = 'v', long = "verbosity", action = ArgAction::Count)]
    pub verbosity: u8,

    /// Log timestamp as UTC time
    #[arg(long = "log-utc", action = ArgAction::SetTrue)]
    pub log_utc: bool,

    /// Regex for file name matches, anchored at the start of the name
    #[arg(short = 'r', long = "regex", value_name = "REGEX", default_value_t = default_pattern())]
    pub regex: String,

    /// Image viewer application
    #[arg(long = "imgviewer", value_name = "CMD")]
    pub imgviewer: Option<String>,

    /// Video viewer application
    #[arg(long = "vidviewer", value_name = "CMD")]
    pub vidviewer: Option<String>,

    /// Pager used to show metadata
    #[arg(long = "pager", value_name = "CMD")]
    pub pager: Option<String>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        if !self.dir.exists() {
            return Err(format!("Directory does not exist: {}", self.dir.display()));
        }

        if !self.dir.is_dir() {
            return Err(format!("Path is not a directory: {}", self.dir.display()));
        }

        if let Err(e) = compile_pattern(&self.regex) {
            return Err(format!("Invalid regex '{}': {}", self.regex, e));
        }

        if let Some(ref copy) = self.copy {
            if copy.exists() && !copy.is_dir() {
                return Err(format!("Copy target is not a directory: {}", copy.display()));
            }
        }

        Ok(())
    }
}

/// The pager used when neither the command line nor the config file names
/// one
pub fn default_pager() -> Option<String> {
    if cfg!(unix) {
        Some("less".to_string())
    } else {
        None
    }
}

/// Settings for one run, fixed once resolved
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directory: PathBuf,
    pub copy_to: Option<PathBuf>,
    pub interactive: bool,
    pub verbosity: u8,
    pub log_utc: bool,
    pub pattern: String,
    pub image_viewer: Option<ExternalCommand>,
    pub video_viewer: Option<ExternalCommand>,
    pub pager: Option<ExternalCommand>,
}

impl AppConfig {
    /// Builds the run configuration. Command line values win over the user
    /// config file; the directory is made absolute when possible.
    pub fn resolve(args: Args, user: &UserConfig) -> Self {
        let directory = fs::canonicalize(&args.dir).unwrap_or(args.dir);
        let pick = |cli: Option<String>, file: &Option<String>| -> Option<ExternalCommand> {
            cli.or_else(|| file.clone())
                .and_then(|template| ExternalCommand::parse(&template))
        };

        AppConfig {
            directory,
            copy_to: args.copy,
            interactive: args.interactive,
            verbosity: args.verbosity,
            log_utc: args.log_utc,
            pattern: args.regex,
            image_viewer: pick(args.imgviewer, &user.imgviewer),
            video_viewer: pick(args.vidviewer, &user.vidviewer),
            pager: pick(args.pager, &user.pager.clone().or_else(default_pager)),
        }
    }
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig::resolve(args, &UserConfig::default())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            directory: PathBuf::from("."),
            copy_to: None,
            interactive: false,
            verbosity: 0,
            log_utc: false,
            pattern: default_pattern(),
            image_viewer: None,
            video_viewer: None,
            pager: default_pager().and_then(|p| ExternalCommand::parse(&p)),
        }
    }
}
