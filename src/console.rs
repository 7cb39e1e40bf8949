//! The interactive read–send–print loop.
//!
//! [`Console::run`] prints a banner, then reads one line at a time, sends each
//! non-empty line to the chat and prints the outcome, until the user types
//! `exit` or `quit` or the input closes.  A failed turn is reported and the
//! loop carries on; only failures of the console's own input or output end
//! it early.

use std::io;

use tracing::{debug, info};

use crate::chat::ChatCapability;
use crate::error::{Error, ErrorKind, Result};
use crate::input::{Input, LineSource};
use crate::observability::{CONSOLE_RATE_LIMITED, CONSOLE_TURN_ERRORS, CONSOLE_TURNS};
use crate::render::Renderer;

/// The prompt shown before each read.
pub const PROMPT: &str = "You> ";

/// Returns true if `line` asks to leave the session.
///
/// The comparison ignores ASCII case and surrounding whitespace.
pub fn is_exit_directive(line: &str) -> bool {
    let line = line.trim();
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// A console session: one chat, one input, one output.
pub struct Console<C, L, R> {
    chat: C,
    input: L,
    renderer: R,
}

impl<C, L, R> Console<C, L, R>
where
    C: ChatCapability,
    L: LineSource,
    R: Renderer,
{
    /// Creates a console.  Nothing is printed until [`run`](Self::run).
    pub fn new(chat: C, input: L, renderer: R) -> Self {
        Self {
            chat,
            input,
            renderer,
        }
    }

    /// Runs the loop to completion.
    ///
    /// Returns the number of lines sent to the chat.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if reading input (other than reaching its end) or
    /// writing output fails.  Chat failures are printed, never returned.
    pub async fn run(&mut self) -> Result<u64> {
        self.renderer.print_banner(self.chat.model())?;
        info!(model = %self.chat.model(), "console started");

        let mut sent = 0;
        loop {
            if !self.input.draws_prompt() {
                self.renderer.print_prompt(PROMPT)?;
            }
            let line = match self.input.read_line(PROMPT)? {
                Input::Line(line) => line,
                Input::Interrupted => {
                    self.renderer.print_interrupted()?;
                    continue;
                }
                Input::Eof => {
                    debug!("input closed");
                    break;
                }
            };

            let line = line.trim();
            if is_exit_directive(line) {
                break;
            }
            if line.is_empty() {
                continue;
            }

            self.renderer.print_thinking()?;
            sent += 1;
            CONSOLE_TURNS.click();
            match self.chat.ask(line).await {
                Ok(reply) => self.renderer.print_reply(&reply)?,
                Err(err) => self.report(&err)?,
            }
        }

        self.renderer.print_farewell()?;
        info!(sent, "console finished");
        Ok(sent)
    }

    fn report(&mut self, err: &Error) -> io::Result<()> {
        CONSOLE_TURN_ERRORS.click();
        debug!(error = %err, category = err.category(), "turn failed");
        match err.kind() {
            ErrorKind::RateLimited => {
                CONSOLE_RATE_LIMITED.click();
                self.renderer.print_rate_limited(err)
            }
            ErrorKind::Api => self.renderer.print_api_error(err),
            ErrorKind::Transport => self.renderer.print_unexpected_error(err),
        }
    }

    /// The chat driven by this console.
    pub fn chat(&self) -> &C {
        &self.chat
    }

    /// The renderer output goes through.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Consumes the console, returning its parts.
    pub fn into_parts(self) -> (C, L, R) {
        (self.chat, self.input, self.renderer)
    }
}
