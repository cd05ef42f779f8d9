//! File metadata lookup and display formatting

use crate::domain::MediaKind;
use crate::error::{FpickError, Result};
use chrono::{DateTime, Local};
use log::debug;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

/// Width the field name is dot-padded to
const KEY_WIDTH: usize = 40;

/// Ordered field name / value pairs
pub type Metadata = Vec<(String, String)>;

pub trait MetadataProvider {
    fn metadata(&self, path: &Path) -> Result<Metadata>;
}

/// Reads metadata by running `exiftool -j -G <path>`.
#[derive(Debug, Clone)]
pub struct ExifTool {
    program: String,
}

impl Default for ExifTool {
    fn default() -> Self {
        Self::new("exiftool")
    }
}

impl ExifTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl MetadataProvider for ExifTool {
    fn metadata(&self, path: &Path) -> Result<Metadata> {
        let output = Command::new(&self.program)
            .args(["-j", "-G"])
            .arg(path)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| FpickError::MetadataError(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(FpickError::MetadataError(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        parse_exiftool_json(&output.stdout)
    }
}

/// Parses exiftool's `-j` output, keeping field order.
pub fn parse_exiftool_json(json: &[u8]) -> Result<Metadata> {
    let records: Vec<Map<String, Value>> = serde_json::from_slice(json)
        .map_err(|e| FpickError::MetadataError(format!("Invalid exiftool output: {}", e)))?;

    let record = records
        .into_iter()
        .next()
        .ok_or_else(|| FpickError::MetadataError("exiftool returned no records".to_string()))?;

    Ok(record
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}

/// Basic metadata from the filesystem alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsMetadata;

impl MetadataProvider for FsMetadata {
    fn metadata(&self, path: &Path) -> Result<Metadata> {
        let meta = fs::metadata(path)?;

        let mut entries = vec![
            (
                "File:FileName".to_string(),
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            ),
            (
                "File:Directory".to_string(),
                path.parent()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            ("File:FileSize".to_string(), format!("{} bytes", meta.len())),
        ];

        if let Ok(modified) = meta.modified() {
            let modified: DateTime<Local> = modified.into();
            entries.push((
                "File:FileModifyDate".to_string(),
                modified.format("%Y:%m:%d %H:%M:%S%:z").to_string(),
            ));
        }

        entries.push((
            "File:MediaKind".to_string(),
            format!("{:?}", MediaKind::from_path(path)),
        ));

        Ok(entries)
    }
}

/// Tries exiftool first and falls back to filesystem metadata.
#[derive(Debug, Default, Clone)]
pub struct SystemMetadata {
    exiftool: ExifTool,
}

impl MetadataProvider for SystemMetadata {
    fn metadata(&self, path: &Path) -> Result<Metadata> {
        match self.exiftool.metadata(path) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                debug!("Falling back to filesystem metadata: {}", e);
                FsMetadata.metadata(path)
            }
        }
    }
}

/// One line per field: the name dot-padded to a fixed width, then the value.
pub fn format_metadata(entries: &[(String, String)]) -> String {
    entries
        .iter()
        .map(|(key, value)| format!("{:.<width$}{}\n", key, value, width = KEY_WIDTH))
        .collect()
}
