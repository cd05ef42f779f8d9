//! The triage run: walking candidates and the per-file command loop

use crate::cli::AppConfig;
use crate::domain::{compile_pattern, copy_files, Candidate, ListKind, MediaKind, SelectionState, Walker};
use crate::error::Result;
use crate::launcher::Launcher;
use crate::list_editor::ListEditor;
use crate::metadata::{format_metadata, MetadataProvider};
use crate::tui::input::{KEY_CTRL_C, KEY_CTRL_L};
use crate::tui::{format_files, Console, KeySource, LineInput, LineKey, MAIN_HELP};
use log::{debug, warn};
use std::io::Write;
use std::path::PathBuf;

/// A keystroke command at the per-file prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Enter: put the file in the skipped list
    Skip,
    /// Ctrl-C: end the whole run
    Exit,
    /// Ctrl-L: clear the screen and show the help
    Redraw,
    Help,
    Metadata,
    View,
    Select,
    ListSelected,
    ListSkipped,
    /// Move entries from skipped to selected
    EditSkipped,
    /// Move entries from selected to skipped
    EditSelected,
    /// Select this file and every remaining one in its directory
    SelectFolder,
    PrintPath,
}

impl Command {
    /// Maps a keystroke to a command. Anything else is ordinary line input.
    pub fn from_key(key: LineKey) -> Option<Self> {
        match key {
            LineKey::Enter => Some(Command::Skip),
            LineKey::Control(KEY_CTRL_C) => Some(Command::Exit),
            LineKey::Control(KEY_CTRL_L) => Some(Command::Redraw),
            LineKey::Printable('h') => Some(Command::Help),
            LineKey::Printable('m') => Some(Command::Metadata),
            LineKey::Printable('v') => Some(Command::View),
            LineKey::Printable('s') => Some(Command::Select),
            LineKey::Printable('l') => Some(Command::ListSelected),
            LineKey::Printable('k') => Some(Command::ListSkipped),
            LineKey::Printable('z') => Some(Command::EditSkipped),
            LineKey::Printable('r') => Some(Command::EditSelected),
            LineKey::Printable('f') => Some(Command::SelectFolder),
            LineKey::Printable('w') => Some(Command::PrintPath),
            _ => None,
        }
    }
}

/// How the prompt for one file ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Skipped,
    Selected,
    FolderSelected,
    Aborted,
}

/// Result of a whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The walk finished; the selected list is the result
    Completed(SelectionState),
    /// Ctrl-C was pressed at a prompt
    Aborted(SelectionState),
}

pub struct Session<'a, K, W> {
    console: Console<K, W>,
    config: &'a AppConfig,
    metadata: &'a dyn MetadataProvider,
    launcher: &'a dyn Launcher,
}

impl<'a, K: KeySource, W: Write> Session<'a, K, W> {
    pub fn new(
        console: Console<K, W>,
        config: &'a AppConfig,
        metadata: &'a dyn MetadataProvider,
        launcher: &'a dyn Launcher,
    ) -> Self {
        Self {
            console,
            config,
            metadata,
            launcher,
        }
    }

    pub fn into_console(self) -> Console<K, W> {
        self.console
    }

    /// Walks the configured directory and classifies every matching file.
    ///
    /// Outside interactive mode every match is selected. In interactive mode
    /// each file is prompted for, except for the rest of a directory after
    /// `f` was pressed in it.
    pub fn run(&mut self) -> Result<RunOutcome> {
        let pattern = compile_pattern(&self.config.pattern)?;
        let mut state = SelectionState::new();

        if self.config.interactive {
            self.console.write_str(MAIN_HELP)?;
        }

        let mut current_dir: Option<PathBuf> = None;
        let mut folder_selected = false;

        for candidate in Walker::new(&self.config.directory, pattern) {
            if current_dir.as_deref() != Some(candidate.directory()) {
                current_dir = Some(candidate.directory().to_path_buf());
                folder_selected = false;
            }

            if !self.config.interactive || folder_selected {
                debug!("Selected '{}'", candidate.path.display());
                state.select(candidate);
                continue;
            }

            match self.prompt(&mut state, &candidate)? {
                Outcome::Skipped => {
                    debug!("Skipped '{}'", candidate.path.display());
                    state.skip(candidate);
                }
                Outcome::Selected => {
                    debug!("Selected '{}'", candidate.path.display());
                    state.select(candidate);
                }
                Outcome::FolderSelected => {
                    debug!("Selected folder '{}'", candidate.directory().display());
                    folder_selected = true;
                    state.select(candidate);
                }
                Outcome::Aborted => {
                    self.console.write_str("\nexit\n")?;
                    return Ok(RunOutcome::Aborted(state));
                }
            }
        }

        Ok(RunOutcome::Completed(state))
    }

    /// Runs the session, then prints the selected files and copies them to
    /// the configured destination. An aborted run reports nothing.
    pub fn run_and_report(&mut self) -> Result<RunOutcome> {
        let outcome = self.run()?;

        if let RunOutcome::Completed(ref state) = outcome {
            self.console
                .write_str(&format!("{}\n", format_files(state.selected())))?;

            if let Some(ref destination) = self.config.copy_to {
                copy_files(state.selected(), destination)?;
            }
        }

        Ok(outcome)
    }

    /// Runs the command loop for one file until it is classified.
    ///
    /// Keys outside the command set are buffered after the prompt and thrown
    /// away once a command arrives; `w` wipes them from the line too.
    pub fn prompt(&mut self, state: &mut SelectionState, candidate: &Candidate) -> Result<Outcome> {
        let prompt = format!("({}) '{}': ", candidate.index, candidate.name);

        loop {
            let (command, typed) = match self.console.read_line(&prompt, |key, _| Command::from_key(key))? {
                LineInput::Command { command, buffer } => (command, buffer),
                // Enter is always intercepted as Skip
                LineInput::Submitted(_) => continue,
            };

            match command {
                Command::Skip => return Ok(Outcome::Skipped),
                Command::Exit => return Ok(Outcome::Aborted),
                Command::Select => return Ok(Outcome::Selected),
                Command::SelectFolder => return Ok(Outcome::FolderSelected),
                Command::Redraw => {
                    self.console.clear()?;
                    self.console.write_str(MAIN_HELP)?;
                }
                Command::Help => {
                    self.console.write_str(&format!("\n{}", MAIN_HELP))?;
                }
                Command::Metadata => self.show_metadata(candidate),
                Command::View => self.view(candidate),
                Command::ListSelected => {
                    self.console.write_str("\nSelected ")?;
                    self.console.print_files(state.selected())?;
                }
                Command::ListSkipped => {
                    self.console.write_str("\nSkipped ")?;
                    self.console.print_files(state.skipped())?;
                }
                Command::EditSkipped => {
                    ListEditor::new(&mut self.console).edit(state, ListKind::Skipped)?;
                }
                Command::EditSelected => {
                    ListEditor::new(&mut self.console).edit(state, ListKind::Selected)?;
                }
                Command::PrintPath => {
                    self.console
                        .erase_line(prompt.chars().count() + typed.chars().count())?;
                    self.console
                        .write_str(&format!("{}\n", candidate.path.display()))?;
                }
            }
        }
    }

    fn show_metadata(&self, candidate: &Candidate) {
        let Some(pager) = self.config.pager.as_ref() else {
            return;
        };

        let entries = match self.metadata.metadata(&candidate.path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("No metadata for '{}': {}", candidate.path.display(), e);
                return;
            }
        };

        if let Err(e) = self.launcher.page(pager, &format_metadata(&entries)) {
            warn!("{}", e);
        }
    }

    fn view(&self, candidate: &Candidate) {
        let viewer = match candidate.kind {
            MediaKind::Image => self.config.image_viewer.as_ref(),
            MediaKind::Video => self.config.video_viewer.as_ref(),
            MediaKind::Other => None,
        };

        if let Some(viewer) = viewer {
            if let Err(e) = self.launcher.view(viewer, &candidate.path) {
                warn!("{}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::ExternalCommand;
    use crate::metadata::Metadata;
    use crate::tui::input::{KEY_BACKSPACE, KEY_ENTER};
    use crate::tui::ScriptedKeys;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingLauncher {
        viewed: RefCell<Vec<(String, PathBuf)>>,
        paged: RefCell<Vec<(String, String)>>,
    }

    impl Launcher for RecordingLauncher {
        fn view(&self, viewer: &ExternalCommand, path: &Path) -> Result<()> {
            self.viewed
                .borrow_mut()
                .push((viewer.to_string(), path.to_path_buf()));
            Ok(())
        }

        fn page(&self, pager: &ExternalCommand, text: &str) -> Result<()> {
            self.paged
                .borrow_mut()
                .push((pager.to_string(), text.to_string()));
            Ok(())
        }
    }

    struct StaticMetadata;

    impl MetadataProvider for StaticMetadata {
        fn metadata(&self, path: &Path) -> Result<Metadata> {
            Ok(vec![
                (
                    "File:FileName".to_string(),
                    path.file_name().unwrap().to_string_lossy().into_owned(),
                ),
                ("EXIF:Make".to_string(), "Canon".to_string()),
            ])
        }
    }

    fn config_for(root: &Path, interactive: bool) -> AppConfig {
        AppConfig {
            directory: root.to_path_buf(),
            interactive,
            image_viewer: ExternalCommand::parse("feh -F"),
            video_viewer: ExternalCommand::parse("mpv"),
            pager: ExternalCommand::parse("less"),
            ..AppConfig::default()
        }
    }

    fn tree(files: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for file in files {
            let path = temp_dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"data").unwrap();
        }
        temp_dir
    }

    /// Runs a session over `config` replaying `keys`; returns the outcome,
    /// the terminal output and the launcher calls.
    fn run_session(config: &AppConfig, keys: &[char]) -> (RunOutcome, String, RecordingLauncher) {
        let launcher = RecordingLauncher::default();
        let console = Console::new(ScriptedKeys::new(keys.iter().copied()), Vec::new());

        let (outcome, out) = {
            let mut session = Session::new(console, config, &StaticMetadata, &launcher);
            let outcome = session.run().unwrap();
            let (_, out) = session.into_console().into_parts();
            (outcome, out)
        };

        (outcome, String::from_utf8(out).unwrap(), launcher)
    }

    fn completed(outcome: RunOutcome) -> SelectionState {
        match outcome {
            RunOutcome::Completed(state) => state,
            RunOutcome::Aborted(_) => panic!("run was aborted"),
        }
    }

    fn names(list: &[Candidate]) -> Vec<&str> {
        list.iter().map(|c| c.name.as_str()).collect()
    }

    mod command_tests {
        use super::*;

        #[test]
        fn test_command_alphabet() {
            let cases = [
                ('h', Command::Help),
                ('m', Command::Metadata),
                ('v', Command::View),
                ('s', Command::Select),
                ('l', Command::ListSelected),
                ('k', Command::ListSkipped),
                ('z', Command::EditSkipped),
                ('r', Command::EditSelected),
                ('f', Command::SelectFolder),
                ('w', Command::PrintPath),
            ];
            for (ch, command) in cases {
                assert_eq!(Command::from_key(LineKey::Printable(ch)), Some(command));
            }

            assert_eq!(Command::from_key(LineKey::Enter), Some(Command::Skip));
            assert_eq!(Command::from_key(LineKey::Control(KEY_CTRL_C)), Some(Command::Exit));
            assert_eq!(Command::from_key(LineKey::Control(KEY_CTRL_L)), Some(Command::Redraw));
        }

        #[test]
        fn test_other_keys_are_not_commands() {
            assert_eq!(Command::from_key(LineKey::Printable('x')), None);
            assert_eq!(Command::from_key(LineKey::Printable('S')), None);
            assert_eq!(Command::from_key(LineKey::Printable('1')), None);
            assert_eq!(Command::from_key(LineKey::Backspace), None);
            assert_eq!(Command::from_key(LineKey::Control('\t')), None);
        }
    }

    mod run_tests {
        use super::*;

        #[test]
        fn test_non_interactive_selects_all_matches() {
            let dir = tree(&["a.jpg", "b.txt", "c.mp4"]);
            let config = config_for(dir.path(), false);

            let (outcome, out, _) = run_session(&config, &[]);
            let state = completed(outcome);

            assert_eq!(names(state.selected()), vec!["a.jpg", "c.mp4"]);
            assert!(state.skipped().is_empty());
            assert!(out.is_empty());
        }

        #[test]
        fn test_select_twice() {
            let dir = tree(&["a.jpg", "b.jpg"]);
            let config = config_for(dir.path(), true);

            let (outcome, out, _) = run_session(&config, &['s', 's']);
            let state = completed(outcome);

            assert_eq!(names(state.selected()), vec!["a.jpg", "b.jpg"]);
            assert!(state.skipped().is_empty());
            assert!(out.starts_with(MAIN_HELP));
            assert!(out.contains("\r(1) 'a.jpg': "));
            assert!(out.contains("\r(2) 'b.jpg': "));
        }

        #[test]
        fn test_skip_then_select() {
            let dir = tree(&["a.jpg", "b.jpg"]);
            let config = config_for(dir.path(), true);

            let (outcome, _, _) = run_session(&config, &[KEY_ENTER, 's']);
            let state = completed(outcome);

            assert_eq!(names(state.skipped()), vec!["a.jpg"]);
            assert_eq!(names(state.selected()), vec!["b.jpg"]);
        }

        #[test]
        fn test_prompt_index_counts_unmatched_files() {
            let dir = tree(&["a.jpg", "b.txt", "c.jpg"]);
            let config = config_for(dir.path(), true);

            let (_, out, _) = run_session(&config, &['s', 's']);

            assert!(out.contains("(1) 'a.jpg': "));
            assert!(out.contains("(3) 'c.jpg': "));
        }

        #[test]
        fn test_folder_select_takes_rest_of_directory() {
            let dir = tree(&["a.jpg", "b.jpg", "c.mp4"]);
            let config = config_for(dir.path(), true);

            let (outcome, out, _) = run_session(&config, &['f']);
            let state = completed(outcome);

            assert_eq!(names(state.selected()), vec!["a.jpg", "b.jpg", "c.mp4"]);
            assert!(!out.contains("'b.jpg'"));
        }

        #[test]
        fn test_folder_select_resets_in_next_directory() {
            let dir = tree(&["a.jpg", "b.jpg", "sub/c.jpg", "sub/d.jpg"]);
            let config = config_for(dir.path(), true);

            let (outcome, out, _) = run_session(&config, &['f', KEY_ENTER, 's']);
            let state = completed(outcome);

            assert_eq!(names(state.selected()), vec!["a.jpg", "b.jpg", "d.jpg"]);
            assert_eq!(names(state.skipped()), vec!["c.jpg"]);
            assert!(out.contains("'c.jpg'"));
        }

        #[test]
        fn test_ctrl_c_aborts_run() {
            let dir = tree(&["a.jpg", "b.jpg", "c.jpg"]);
            let config = config_for(dir.path(), true);

            let (outcome, out, _) = run_session(&config, &['s', KEY_CTRL_C]);

            match outcome {
                RunOutcome::Aborted(state) => {
                    assert_eq!(names(state.selected()), vec!["a.jpg"]);
                    assert!(state.skipped().is_empty());
                }
                RunOutcome::Completed(_) => panic!("expected abort"),
            }
            assert!(out.ends_with("\nexit\n"));
            assert!(!out.contains("'c.jpg'"));
        }

        #[test]
        fn test_unmatched_keys_are_buffered_then_discarded() {
            let dir = tree(&["a.jpg", "b.jpg"]);
            let config = config_for(dir.path(), true);

            let (outcome, out, _) = run_session(&config, &['x', 'y', 's', 's']);
            let state = completed(outcome);

            assert_eq!(names(state.selected()), vec!["a.jpg", "b.jpg"]);
            assert!(out.contains("\r(1) 'a.jpg': xy"));
            assert!(!out.contains("\r(2) 'b.jpg': x"));
        }

        #[test]
        fn test_backspace_edits_buffer_at_prompt() {
            let dir = tree(&["a.jpg"]);
            let config = config_for(dir.path(), true);

            let (outcome, out, _) = run_session(&config, &['x', KEY_BACKSPACE, 's']);

            assert_eq!(completed(outcome).selected().len(), 1);
            assert!(out.contains("\u{8} \u{8}"));
        }

        #[test]
        fn test_empty_tree() {
            let dir = tree(&[]);
            let config = config_for(dir.path(), true);

            let (outcome, _, _) = run_session(&config, &[]);
            let state = completed(outcome);

            assert_eq!(state.total(), 0);
        }
    }

    mod prompt_command_tests {
        use super::*;

        #[test]
        fn test_help_and_redraw() {
            let dir = tree(&["a.jpg"]);
            let config = config_for(dir.path(), true);

            let (_, out, _) = run_session(&config, &['h', KEY_CTRL_L, 's']);

            assert_eq!(out.matches(MAIN_HELP).count(), 3);
            assert!(out.contains(&format!("\n{}", MAIN_HELP)));
            assert!(out.contains("\x1b[2J"));
        }

        #[test]
        fn test_list_selected_and_skipped() {
            let dir = tree(&["a.jpg", "b.jpg", "c.jpg"]);
            let config = config_for(dir.path(), true);
            let a = dir.path().join("a.jpg");
            let b = dir.path().join("b.jpg");

            let (_, out, _) = run_session(&config, &['s', KEY_ENTER, 'l', 'k', 's']);

            assert!(out.contains(&format!("\nSelected Files (1):\n1. {}\n\n", a.display())));
            assert!(out.contains(&format!("\nSkipped Files (1):\n1. {}\n\n", b.display())));
        }

        #[test]
        fn test_view_uses_viewer_for_media_kind() {
            let dir = tree(&["a.jpg", "b.mp4", "c.jpg.txt"]);
            let mut config = config_for(dir.path(), true);
            config.pattern = ".*".to_string();

            let (_, _, launcher) = run_session(&config, &['v', 's', 'v', 's', 'v', 's']);

            let viewed = launcher.viewed.borrow();
            assert_eq!(viewed.len(), 2);
            assert_eq!(viewed[0], ("feh -F".to_string(), dir.path().join("a.jpg")));
            assert_eq!(viewed[1], ("mpv".to_string(), dir.path().join("b.mp4")));
        }

        #[test]
        fn test_view_without_viewer_is_noop() {
            let dir = tree(&["a.jpg"]);
            let mut config = config_for(dir.path(), true);
            config.image_viewer = None;

            let (outcome, _, launcher) = run_session(&config, &['v', 's']);

            assert!(launcher.viewed.borrow().is_empty());
            assert_eq!(completed(outcome).selected().len(), 1);
        }

        #[test]
        fn test_metadata_goes_to_pager() {
            let dir = tree(&["a.jpg"]);
            let config = config_for(dir.path(), true);

            let (_, _, launcher) = run_session(&config, &['m', 's']);

            let paged = launcher.paged.borrow();
            assert_eq!(paged.len(), 1);
            assert_eq!(paged[0].0, "less");
            assert_eq!(
                paged[0].1,
                format!(
                    "File:FileName{}a.jpg\nEXIF:Make{}Canon\n",
                    ".".repeat(27),
                    ".".repeat(31)
                )
            );
        }

        #[test]
        fn test_metadata_without_pager_is_noop() {
            let dir = tree(&["a.jpg"]);
            let mut config = config_for(dir.path(), true);
            config.pager = None;

            let (_, _, launcher) = run_session(&config, &['m', 's']);

            assert!(launcher.paged.borrow().is_empty());
        }

        #[test]
        fn test_print_path() {
            let dir = tree(&["a.jpg"]);
            let config = config_for(dir.path(), true);
            let prompt = "(1) 'a.jpg': ";

            let (_, out, _) = run_session(&config, &['w', 's']);

            let erased = format!("\r{}\r{}\n", " ".repeat(prompt.len()), dir.path().join("a.jpg").display());
            assert!(out.contains(&erased));
        }

        #[test]
        fn test_print_path_erases_typed_text() {
            let dir = tree(&["a.jpg"]);
            let config = config_for(dir.path(), true);
            let prompt = "(1) 'a.jpg': ";

            let (_, out, _) = run_session(&config, &['x', 'y', 'w', 's']);

            let width = prompt.len() + 2;
            let erased = format!("\r{}\r{}\n", " ".repeat(width), dir.path().join("a.jpg").display());
            assert!(out.contains(&erased));
        }

        #[test]
        fn test_edit_skipped_moves_to_selected() {
            let dir = tree(&["x.jpg", "y.jpg", "z.jpg"]);
            let config = config_for(dir.path(), true);

            let keys = [KEY_ENTER, KEY_ENTER, 'z', '1', KEY_ENTER, KEY_CTRL_C, KEY_ENTER];
            let (outcome, _, _) = run_session(&config, &keys);
            let state = completed(outcome);

            assert_eq!(names(state.selected()), vec!["x.jpg"]);
            assert_eq!(names(state.skipped()), vec!["y.jpg", "z.jpg"]);
        }

        #[test]
        fn test_edit_selected_moves_to_skipped() {
            let dir = tree(&["x.jpg", "y.jpg"]);
            let config = config_for(dir.path(), true);

            let keys = ['s', 'r', '1', KEY_ENTER, 's'];
            let (outcome, _, _) = run_session(&config, &keys);
            let state = completed(outcome);

            assert_eq!(names(state.skipped()), vec!["x.jpg"]);
            assert_eq!(names(state.selected()), vec!["y.jpg"]);
        }

        #[test]
        fn test_ctrl_c_in_editor_returns_to_prompt() {
            let dir = tree(&["x.jpg", "y.jpg"]);
            let config = config_for(dir.path(), true);

            let keys = ['s', 'r', KEY_CTRL_C, 's'];
            let (outcome, out, _) = run_session(&config, &keys);
            let state = completed(outcome);

            assert_eq!(names(state.selected()), vec!["x.jpg", "y.jpg"]);
            assert!(!out.contains("exit"));
        }
    }
}
