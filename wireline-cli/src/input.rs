//! Interactive input front ends: a rustyline editor with persistent
//! history, and a plain stdin reader as fallback for dumb terminals.

use std::io::{self, Write};
use std::path::PathBuf;

use async_trait::async_trait;
use log::{debug, warn};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::task;

use wireline::InputSource;

/// Editor-backed input with line editing and persistent history.
pub struct ReadlineInput {
    editor: Option<DefaultEditor>,
    history: Option<PathBuf>,
}

impl ReadlineInput {
    /// Build the editor and load history from `history` if the file exists.
    pub fn new(history: Option<PathBuf>) -> rustyline::Result<Self> {
        let mut editor = DefaultEditor::new()?;
        if let Some(path) = &history {
            if path.exists() {
                if let Err(err) = editor.load_history(path) {
                    warn!("could not load history from {}: {err}", path.display());
                }
            } else if let Some(parent) = path.parent() {
                if let Err(err) = std::fs::create_dir_all(parent) {
                    warn!("could not create {}: {err}", parent.display());
                }
            }
        }
        Ok(Self { editor: Some(editor), history })
    }

    /// Write history back to the file chosen at construction.
    pub fn save_history(&mut self) {
        let Some(path) = self.history.as_deref() else {
            return;
        };
        match self.editor.as_mut() {
            Some(editor) => {
                if let Err(err) = editor.save_history(path) {
                    warn!("could not save history to {}: {err}", path.display());
                }
            }
            // an abandoned prompt read still owns the editor on the blocking
            // pool, together with any entries recorded before it
            None => warn!("history not saved: a prompt read is still pending"),
        }
    }
}

#[async_trait]
impl InputSource for ReadlineInput {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut editor = self
            .editor
            .take()
            .ok_or_else(|| io::Error::other("editor is gone"))?;
        let prompt = prompt.to_string();
        // readline blocks on the terminal; keep it off the async threads
        let (editor, result) = task::spawn_blocking(move || {
            let result = editor.readline(&prompt);
            (editor, result)
        })
        .await
        .map_err(io::Error::other)?;
        self.editor = Some(editor);

        match result {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
            Err(err) => Err(io::Error::other(err)),
        }
    }

    fn record_history(&mut self, line: &str) {
        if let Some(editor) = self.editor.as_mut() {
            if let Err(err) = editor.add_history_entry(line) {
                debug!("history entry rejected: {err}");
            }
        }
    }
}

/// Plain stdin reader used when the editor cannot start.
pub struct StdinInput {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinInput {
    /// Create a reader over this process's stdin.
    pub fn new() -> Self {
        Self { lines: BufReader::new(tokio::io::stdin()).lines() }
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputSource for StdinInput {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        print!("{prompt}");
        io::stdout().flush()?;
        self.lines.next_line().await
    }

    fn record_history(&mut self, _line: &str) {}
}

/// Front end chosen at startup: the editor, or bare stdin as fallback.
pub enum CliInput {
    Editor(ReadlineInput),
    Plain(StdinInput),
}

impl CliInput {
    /// Prefer the editor; fall back to plain stdin if it cannot start.
    pub fn create(history: Option<PathBuf>) -> Self {
        match ReadlineInput::new(history) {
            Ok(editor) => Self::Editor(editor),
            Err(err) => {
                warn!("line editing unavailable ({err}); reading plain stdin");
                Self::Plain(StdinInput::new())
            }
        }
    }

    pub fn save_history(&mut self) {
        if let Self::Editor(editor) = self {
            editor.save_history();
        }
    }
}

#[async_trait]
impl InputSource for CliInput {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match self {
            Self::Editor(editor) => editor.read_line(prompt).await,
            Self::Plain(stdin) => stdin.read_line(prompt).await,
        }
    }

    fn record_history(&mut self, line: &str) {
        match self {
            Self::Editor(editor) => editor.record_history(line),
            Self::Plain(stdin) => stdin.record_history(line),
        }
    }
}
