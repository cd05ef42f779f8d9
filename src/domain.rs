//! Candidates and the two classification lists they end up in.

pub mod walker;

use crate::error::Result;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub use walker::{compile_pattern, default_pattern, Walker};

/// Extensions (case-sensitive, without the dot) treated as images.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg"];
/// Extensions (case-sensitive, without the dot) treated as videos.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaKind {
    pub fn from_extension(ext: &str) -> Self {
        if IMAGE_EXTENSIONS.contains(&ext) {
            MediaKind::Image
        } else if VIDEO_EXTENSIONS.contains(&ext) {
            MediaKind::Video
        } else {
            MediaKind::Other
        }
    }

    pub fn from_path(path: &Path) -> Self {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(extension)
    }
}

/// A discovered file awaiting (or having received) a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub name: String,
    /// 1-based position in walk order
    pub index: usize,
    pub kind: MediaKind,
}

impl Candidate {
    pub fn new(path: PathBuf, index: usize) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let kind = MediaKind::from_path(&path);

        Candidate {
            path,
            name,
            index,
            kind,
        }
    }

    /// Directory the candidate was found in
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Identifies one of the two classification lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Selected,
    Skipped,
}

impl ListKind {
    pub fn opposite(self) -> Self {
        match self {
            ListKind::Selected => ListKind::Skipped,
            ListKind::Skipped => ListKind::Selected,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ListKind::Selected => "Selected",
            ListKind::Skipped => "Skipped",
        }
    }
}

/// The `selected` and `skipped` lists of a run.
///
/// Both lists are ordered by decision time. Entries only leave a list
/// through [`SelectionState::move_entry`], which appends them to the other
/// list, so a candidate is never in both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Vec<Candidate>,
    skipped: Vec<Candidate>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, candidate: Candidate) {
        debug_assert!(self.classification(&candidate.path).is_none());
        self.selected.push(candidate);
    }

    pub fn skip(&mut self, candidate: Candidate) {
        debug_assert!(self.classification(&candidate.path).is_none());
        self.skipped.push(candidate);
    }

    pub fn selected(&self) -> &[Candidate] {
        &self.selected
    }

    pub fn skipped(&self) -> &[Candidate] {
        &self.skipped
    }

    pub fn list(&self, kind: ListKind) -> &[Candidate] {
        match kind {
            ListKind::Selected => &self.selected,
            ListKind::Skipped => &self.skipped,
        }
    }

    fn list_mut(&mut self, kind: ListKind) -> &mut Vec<Candidate> {
        match kind {
            ListKind::Selected => &mut self.selected,
            ListKind::Skipped => &mut self.skipped,
        }
    }

    /// Moves the entry at 1-based `position` of `from` to the end of the
    /// opposite list. Returns the moved entry, or `None` when `position`
    /// is out of range.
    pub fn move_entry(&mut self, from: ListKind, position: usize) -> Option<&Candidate> {
        if position == 0 || position > self.list(from).len() {
            return None;
        }

        let entry = self.list_mut(from).remove(position - 1);
        let destination = self.list_mut(from.opposite());
        destination.push(entry);
        destination.last()
    }

    /// Which list currently holds `path`, if any
    pub fn classification(&self, path: &Path) -> Option<ListKind> {
        if self.selected.iter().any(|c| c.path == path) {
            Some(ListKind::Selected)
        } else if self.skipped.iter().any(|c| c.path == path) {
            Some(ListKind::Skipped)
        } else {
            None
        }
    }

    /// Number of classified candidates across both lists
    pub fn total(&self) -> usize {
        self.selected.len() + self.skipped.len()
    }
}

/// Copies each file into `destination` under its own file name.
///
/// Existing files in `destination` are left alone and the source is skipped.
/// Returns the number of files copied.
pub fn copy_files(files: &[Candidate], destination: &Path) -> Result<usize> {
    fs::create_dir_all(destination)?;

    let mut copied = 0;
    for file in files {
        let target = destination.join(&file.name);
        if target.exists() {
            warn!(
                "Not copying '{}': '{}' already exists",
                file.path.display(),
                target.display()
            );
            continue;
        }

        fs::copy(&file.path, &target)?;
        copied += 1;
    }

    info!("Copied {} of {} files to '{}'", copied, files.len(), destination.display());
    Ok(copied)
}
