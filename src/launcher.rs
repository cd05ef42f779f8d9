//! Launching external viewers and pagers

use crate::error::{FpickError, Result};
use log::debug;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};

static CHILD_RUNNING: AtomicBool = AtomicBool::new(false);

/// Whether a viewer or pager is currently in the foreground.
///
/// The interrupt handler consults this so Ctrl-C inside a pager goes to the
/// pager only.
pub fn child_running() -> bool {
    CHILD_RUNNING.load(Ordering::SeqCst)
}

struct ChildScope;

impl ChildScope {
    fn enter() -> Self {
        CHILD_RUNNING.store(true, Ordering::SeqCst);
        ChildScope
    }
}

impl Drop for ChildScope {
    fn drop(&mut self) {
        CHILD_RUNNING.store(false, Ordering::SeqCst);
    }
}

/// A configured command line such as `feh -F`, split into program and
/// arguments on whitespace. The file path is passed as one extra argument,
/// never through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
}

impl ExternalCommand {
    /// Returns `None` for a blank template
    pub fn parse(template: &str) -> Option<Self> {
        let mut words = template.split_whitespace().map(str::to_string);
        let program = words.next()?;

        Some(Self {
            program,
            args: words.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    fn launch_error(&self, e: io::Error) -> FpickError {
        FpickError::LaunchError {
            command: self.to_string(),
            reason: e.to_string(),
        }
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

pub trait Launcher {
    /// Opens `path` in `viewer` and waits for it to exit. Viewer output is
    /// discarded.
    fn view(&self, viewer: &ExternalCommand, path: &Path) -> Result<()>;

    /// Feeds `text` to `pager` on stdin and waits for it to exit.
    fn page(&self, pager: &ExternalCommand, text: &str) -> Result<()>;
}

/// Runs commands as child processes of this one.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn view(&self, viewer: &ExternalCommand, path: &Path) -> Result<()> {
        let _scope = ChildScope::enter();

        let status = viewer
            .command()
            .arg(path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| viewer.launch_error(e))?;

        debug!("'{}' exited with {}", viewer, status);
        Ok(())
    }

    fn page(&self, pager: &ExternalCommand, text: &str) -> Result<()> {
        let _scope = ChildScope::enter();

        let mut child = pager
            .command()
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| pager.launch_error(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            // The pager may quit before reading everything
            match stdin.write_all(text.as_bytes()) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
                Err(e) => return Err(e.into()),
            }
        }

        let status = child.wait()?;
        debug!("'{}' exited with {}", pager, status);
        Ok(())
    }
}
