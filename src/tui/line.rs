use super::input::{KeySource, LineKey};
use std::io::{self, Write};

/// How a call to [`read_line`] ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineInput<C> {
    /// Enter was pressed; carries the edited line
    Submitted(String),
    /// The intercept recognised a keystroke as a command
    Command { command: C, buffer: String },
}

/// Reads a line of input one raw keystroke at a time.
///
/// Before every keystroke the line is redrawn as `\r`, the prompt, then the
/// buffer. Each keystroke is first offered to `intercept`; if it returns a
/// command the call ends immediately with that command and the buffer as it
/// stood. Otherwise backspace erases the last character, Enter ends the line,
/// printable characters are appended and other control characters are
/// dropped.
pub fn read_line<K, W, C, F>(
    keys: &mut K,
    out: &mut W,
    prompt: &str,
    mut intercept: F,
) -> io::Result<LineInput<C>>
where
    K: KeySource,
    W: Write,
    F: FnMut(LineKey, &str) -> Option<C>,
{
    let mut buffer = String::new();

    loop {
        write!(out, "\r{}{}", prompt, buffer)?;
        out.flush()?;

        let key = LineKey::classify(keys.read_char()?);

        if let Some(command) = intercept(key, &buffer) {
            return Ok(LineInput::Command { command, buffer });
        }

        match key {
            LineKey::Backspace => {
                if buffer.pop().is_some() {
                    write!(out, "\u{8} \u{8}")?;
                }
            }
            LineKey::Enter => {
                writeln!(out)?;
                out.flush()?;
                return Ok(LineInput::Submitted(buffer));
            }
            LineKey::Printable(c) => buffer.push(c),
            LineKey::Control(_) => {}
        }
    }
}
