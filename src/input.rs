//! Line input for the console.
//!
//! A [`LineSource`] yields one line per call.  On a terminal the rustyline
//! editor provides editing and history; anywhere else (pipes, files, tests)
//! lines come straight from a buffered reader.

use std::io::{self, BufRead};

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::{Error, Result};

/// One read from a [`LineSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A full line, without its line terminator.
    Line(String),
    /// The user pressed Ctrl+C at the prompt.
    Interrupted,
    /// The input is closed.
    Eof,
}

/// A source of input lines.
pub trait LineSource {
    /// Whether the source draws `prompt` itself.  When false the console
    /// prints the prompt before reading.
    fn draws_prompt(&self) -> bool {
        false
    }

    /// Blocks until a line, an interrupt, or end-of-input is available.
    fn read_line(&mut self, prompt: &str) -> Result<Input>;
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn draws_prompt(&self) -> bool {
        (**self).draws_prompt()
    }

    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        (**self).read_line(prompt)
    }
}

/// Interactive source backed by rustyline.
pub struct EditorSource {
    editor: DefaultEditor,
}

impl EditorSource {
    /// Creates an editor with in-memory history.
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().map_err(readline_error)?;
        Ok(Self { editor })
    }
}

impl LineSource for EditorSource {
    fn draws_prompt(&self) -> bool {
        true
    }

    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(err) => Err(readline_error(err)),
        }
    }
}

fn readline_error(err: ReadlineError) -> Error {
    match err {
        ReadlineError::Io(err) => Error::io("failed to read input", err),
        err => Error::io("failed to read input", io::Error::other(err.to_string())),
    }
}

/// Non-interactive source reading lines from any buffered reader.
pub struct BufReadSource<R: BufRead> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: BufRead> BufReadSource<R> {
    /// Wraps `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
        }
    }
}

impl<R: BufRead> LineSource for BufReadSource<R> {
    fn read_line(&mut self, _prompt: &str) -> Result<Input> {
        self.buffer.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buffer)
            .map_err(|err| Error::io("failed to read input", err))?;
        if read == 0 {
            return Ok(Input::Eof);
        }
        let line = self.buffer.strip_suffix(b"\n").unwrap_or(&self.buffer);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        // Undecodable bytes become U+FFFD rather than failing the read.
        Ok(Input::Line(String::from_utf8_lossy(line).into_owned()))
    }
}
