use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::collections::VecDeque;
use std::io;

pub const KEY_ENTER: char = '\r';
pub const KEY_BACKSPACE: char = '\u{7f}';
pub const KEY_CTRL_C: char = '\u{3}';
pub const KEY_CTRL_L: char = '\u{c}';

/// A source of single characters, one keystroke at a time.
pub trait KeySource {
    fn read_char(&mut self) -> io::Result<char>;
}

/// Keeps the terminal in raw mode while alive.
///
/// Dropping the guard restores the mode saved by `enable_raw_mode`, so the
/// terminal is restored on every exit path out of a read.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Reads keystrokes from the controlling terminal.
///
/// Raw mode is entered for exactly one keystroke per call.
#[derive(Debug, Default)]
pub struct RawTerminal;

impl RawTerminal {
    pub fn new() -> Self {
        Self
    }
}

impl KeySource for RawTerminal {
    fn read_char(&mut self) -> io::Result<char> {
        let _guard = RawModeGuard::enter()?;

        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(ch) = key_to_char(key) {
                    return Ok(ch);
                }
            }
        }
    }
}

/// Maps a key event to the character a raw tty read would have produced.
/// Keys without a single-character encoding (arrows, function keys) map to
/// `None`.
pub fn key_to_char(key: KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Enter => Some(KEY_ENTER),
        KeyCode::Backspace => Some(KEY_BACKSPACE),
        KeyCode::Tab => Some('\t'),
        KeyCode::Esc => Some('\u{1b}'),
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if c.is_ascii_alphabetic() {
                Some(((c.to_ascii_lowercase() as u8) & 0x1f) as char)
            } else {
                None
            }
        }
        KeyCode::Char(c) => Some(c),
        _ => None,
    }
}

/// Replays a fixed sequence of keystrokes. Reading past the end fails with
/// `UnexpectedEof`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<char>,
}

impl ScriptedKeys {
    pub fn new<I: IntoIterator<Item = char>>(keys: I) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl KeySource for ScriptedKeys {
    fn read_char(&mut self) -> io::Result<char> {
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more keystrokes"))
    }
}

/// A keystroke classified for line editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKey {
    /// Printable character, appended to the line
    Printable(char),
    Backspace,
    Enter,
    /// Any other control character
    Control(char),
}

impl LineKey {
    pub fn classify(ch: char) -> Self {
        match ch {
            KEY_BACKSPACE => LineKey::Backspace,
            KEY_ENTER => LineKey::Enter,
            c if c.is_control() => LineKey::Control(c),
            c => LineKey::Printable(c),
        }
    }
}
