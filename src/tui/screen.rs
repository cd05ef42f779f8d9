use crate::domain::Candidate;
use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

pub const MAIN_HELP: &str = "\
Commands:
  h - print this list of commands
  m - metadata
  v - view
  s - select
  f - select all in folder
  l - list all selected
  k - list all skipped
  r - remove a previously selected file
  z - select a previously skipped file
  w - print full path to file

Or hit 'enter' to skip

";

pub const LIST_HELP: &str = "Enter number or CTRL+c to return\n";

/// Clears the display and homes the cursor
pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    out.flush()
}

/// Overwrites the current line with `width` blanks and returns to column 0
pub fn erase_line<W: Write>(out: &mut W, width: usize) -> io::Result<()> {
    write!(out, "\r{}\r", " ".repeat(width))
}

/// Renders a numbered file list: a `Files (N):` header, then one 1-based
/// `i. path` line per entry.
pub fn format_files(files: &[Candidate]) -> String {
    let mut text = format!("Files ({}):\n", files.len());
    for (i, file) in files.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, file.path.display()));
    }
    text
}

/// Writes [`format_files`] followed by a blank line
pub fn print_files<W: Write>(out: &mut W, files: &[Candidate]) -> io::Result<()> {
    writeln!(out, "{}", format_files(files))?;
    out.flush()
}
