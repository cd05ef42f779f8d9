use super::{Candidate, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
use crate::error::Result;
use log::warn;
use regex::Regex;
use std::path::Path;
use walkdir::WalkDir;

/// Pattern matching any name ending in one of the known media extensions.
pub fn default_pattern() -> String {
    let alternatives: Vec<String> = IMAGE_EXTENSIONS
        .iter()
        .chain(VIDEO_EXTENSIONS)
        .map(|ext| regex::escape(&format!(".{}", ext)))
        .collect();
    format!(".*({})", alternatives.join("|"))
}

/// Compiles a file name pattern anchored at the start of the name only.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(&format!("^(?:{})", pattern))?)
}

/// Lazily walks a directory tree, yielding matching files one directory at a
/// time.
///
/// Siblings are ordered files first, then directories, each by file name.
/// Since the walk is depth-first, all files of a directory are yielded
/// before any of its subdirectories are entered. Every visited file advances
/// the candidate index, whether it matches or not.
pub struct Walker {
    entries: walkdir::IntoIter,
    pattern: Regex,
    visited: usize,
}

impl Walker {
    pub fn new(root: &Path, pattern: Regex) -> Self {
        let entries = WalkDir::new(root)
            .sort_by(|a, b| {
                a.file_type()
                    .is_dir()
                    .cmp(&b.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter();

        Self {
            entries,
            pattern,
            visited: 0,
        }
    }

    /// Number of files seen so far, matched or not
    pub fn visited(&self) -> usize {
        self.visited
    }
}

impl Iterator for Walker {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        for entry in self.entries.by_ref() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }
            // Links to directories are not followed and are not files either
            if entry.path_is_symlink() && entry.path().is_dir() {
                continue;
            }

            self.visited += 1;
            if self.pattern.is_match(&entry.file_name().to_string_lossy()) {
                return Some(Candidate::new(entry.into_path(), self.visited));
            }
        }
        None
    }
}
