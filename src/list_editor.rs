//! Reviewing one list and moving entries to the other

use crate::domain::{ListKind, SelectionState};
use crate::tui::input::{KEY_CTRL_C, KEY_CTRL_L};
use crate::tui::{Console, KeySource, LineInput, LineKey, LIST_HELP, MAIN_HELP};
use log::debug;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListCommand {
    Return,
    Redraw,
}

impl ListCommand {
    fn from_key(key: LineKey) -> Option<Self> {
        match key {
            LineKey::Control(KEY_CTRL_C) => Some(ListCommand::Return),
            LineKey::Control(KEY_CTRL_L) => Some(ListCommand::Redraw),
            _ => None,
        }
    }
}

/// Parses a 1-based list position. Only plain ASCII digits are accepted.
fn parse_position(text: &str) -> Option<usize> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

pub struct ListEditor<'a, K, W> {
    console: &'a mut Console<K, W>,
}

impl<'a, K: KeySource, W: Write> ListEditor<'a, K, W> {
    pub fn new(console: &'a mut Console<K, W>) -> Self {
        Self { console }
    }

    /// Shows the `source` list and moves entries picked by number to the
    /// opposite list, until the list is empty or Ctrl-C is pressed.
    ///
    /// A number ended by Enter, Ctrl-L or Ctrl-C is acted on; Ctrl-C then
    /// leaves the editor. Out of range and non-numeric input just redraws
    /// the list.
    pub fn edit(&mut self, state: &mut SelectionState, source: ListKind) -> io::Result<()> {
        self.console.clear()?;

        loop {
            if state.list(source).is_empty() {
                return self.leave();
            }

            self.console.write_str(&format!("\n{} ", source.title()))?;
            self.console.print_files(state.list(source))?;
            self.console.write_str(LIST_HELP)?;

            // Digits typed before Ctrl-C or Ctrl-L still count as a choice
            let (text, command) =
                match self.console.read_line("Number: ", |key, _| ListCommand::from_key(key))? {
                    LineInput::Command { command, buffer } => (buffer, Some(command)),
                    LineInput::Submitted(text) => (text, None),
                };

            let moved = parse_position(&text).and_then(|position| {
                state
                    .move_entry(source, position)
                    .map(|entry| (position, entry.path.clone()))
            });

            self.console.clear()?;
            let returning = command == Some(ListCommand::Return);
            if returning {
                self.console.write_str(MAIN_HELP)?;
            }

            if let Some((position, path)) = moved {
                debug!(
                    "Moved '{}' from {} to {}",
                    path.display(),
                    source.title(),
                    source.opposite().title()
                );
                self.console
                    .write_str(&format!("  >> {}. {}\n", position, path.display()))?;
            }

            if returning {
                return Ok(());
            }
        }
    }

    fn leave(&mut self) -> io::Result<()> {
        self.console.clear()?;
        self.console.write_str(MAIN_HELP)
    }
}
