// Terminal primitives: raw keystrokes, line editing and screen control
pub mod input;
pub mod line;
pub mod screen;

pub use input::{KeySource, LineKey, RawModeGuard, RawTerminal, ScriptedKeys};
pub use line::{read_line, LineInput};
pub use screen::{clear_screen, erase_line, format_files, print_files, LIST_HELP, MAIN_HELP};

use std::io::{self, Write};

/// A key source paired with the output it echoes to.
pub struct Console<K, W> {
    keys: K,
    out: W,
}

impl<K: KeySource, W: Write> Console<K, W> {
    pub fn new(keys: K, out: W) -> Self {
        Self { keys, out }
    }

    pub fn read_line<C, F>(&mut self, prompt: &str, intercept: F) -> io::Result<LineInput<C>>
    where
        F: FnMut(LineKey, &str) -> Option<C>,
    {
        read_line(&mut self.keys, &mut self.out, prompt, intercept)
    }

    pub fn clear(&mut self) -> io::Result<()> {
        clear_screen(&mut self.out)
    }

    pub fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }

    pub fn print_files(&mut self, files: &[crate::domain::Candidate]) -> io::Result<()> {
        print_files(&mut self.out, files)
    }

    pub fn erase_line(&mut self, width: usize) -> io::Result<()> {
        erase_line(&mut self.out, width)
    }

    pub fn into_parts(self) -> (K, W) {
        (self.keys, self.out)
    }
}
