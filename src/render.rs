//! Output rendering for the console.
//!
//! This module provides a trait-based rendering abstraction so the console
//! loop never formats text itself.  The default implementation writes plain
//! text framed by divider lines, with optional ANSI styling for notices.

use std::io::{self, Stdout, Write};

use crate::error::Error;
use crate::types::Reply;

/// Name shown in the banner.
pub const PRODUCT_NAME: &str = "LLM Console";

/// Provider shown in the banner and the rate-limit notice.
pub const PROVIDER_NAME: &str = "Groq";

/// Width of a divider line.
pub const DIVIDER_WIDTH: usize = 60;

/// ANSI escape code for dim text (used for the thinking notice).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text (used for the assistant label).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code for yellow text (used for rate-limit notices).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// Returns a divider line without its newline.
pub fn divider() -> String {
    "-".repeat(DIVIDER_WIDTH)
}

/// Trait for rendering console output.
///
/// Every method reports write failures so the console can stop when its
/// output goes away.
pub trait Renderer {
    /// Print the one-time banner naming the active model.
    fn print_banner(&mut self, model: &str) -> io::Result<()>;

    /// Print the input prompt without a trailing newline.
    fn print_prompt(&mut self, prompt: &str) -> io::Result<()>;

    /// Print the notice shown while a request is in flight.
    fn print_thinking(&mut self) -> io::Result<()>;

    /// Print an assistant reply between dividers.
    fn print_reply(&mut self, reply: &Reply) -> io::Result<()>;

    /// Print the notice for a rate-limited request.
    fn print_rate_limited(&mut self, error: &Error) -> io::Result<()>;

    /// Print a structured error reported by the service.
    fn print_api_error(&mut self, error: &Error) -> io::Result<()>;

    /// Print any other failure.
    fn print_unexpected_error(&mut self, error: &Error) -> io::Result<()>;

    /// Called when the user interrupts the prompt.
    fn print_interrupted(&mut self) -> io::Result<()>;

    /// Print the closing message.
    fn print_farewell(&mut self) -> io::Result<()>;
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer<W: Write = Stdout> {
    out: W,
    use_color: bool,
}

impl PlainTextRenderer<Stdout> {
    /// Creates a new PlainTextRenderer on stdout with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writer(io::stdout(), use_color)
    }
}

impl<W: Write> PlainTextRenderer<W> {
    /// Creates a renderer on an arbitrary writer.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self { out, use_color }
    }

    /// Returns a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consumes the renderer, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn divider(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", divider())
    }

    fn styled_line(&mut self, style: &str, text: &str) -> io::Result<()> {
        if self.use_color {
            writeln!(self.out, "{style}{text}{ANSI_RESET}")
        } else {
            writeln!(self.out, "{text}")
        }
    }
}

impl<W: Write> Renderer for PlainTextRenderer<W> {
    fn print_banner(&mut self, model: &str) -> io::Result<()> {
        writeln!(self.out, "{PRODUCT_NAME} ({PROVIDER_NAME})")?;
        writeln!(self.out, "Model: {model}")?;
        self.divider()?;
        writeln!(self.out, "Type your message, or 'exit' / 'quit' to leave.")?;
        self.divider()?;
        self.out.flush()
    }

    fn print_prompt(&mut self, prompt: &str) -> io::Result<()> {
        write!(self.out, "{prompt}")?;
        self.out.flush()
    }

    fn print_thinking(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        self.styled_line(ANSI_DIM, "Thinking...")?;
        writeln!(self.out)?;
        self.out.flush()
    }

    fn print_reply(&mut self, reply: &Reply) -> io::Result<()> {
        self.divider()?;
        self.styled_line(ANSI_BOLD, "Assistant:")?;
        writeln!(self.out, "{}", reply.content)?;
        self.divider()?;
        self.out.flush()
    }

    fn print_rate_limited(&mut self, error: &Error) -> io::Result<()> {
        self.divider()?;
        self.styled_line(ANSI_BOLD, "Assistant:")?;
        self.styled_line(
            ANSI_YELLOW,
            &format!(
                "Hit {PROVIDER_NAME} rate limit or quota. Check your {PROVIDER_NAME} dashboard."
            ),
        )?;
        writeln!(self.out)?;
        writeln!(self.out, "({error})")?;
        self.divider()?;
        self.out.flush()
    }

    fn print_api_error(&mut self, error: &Error) -> io::Result<()> {
        self.divider()?;
        self.styled_line(
            ANSI_RED,
            &format!("API error: {} – {}", error.category(), error.message()),
        )?;
        self.divider()?;
        self.out.flush()
    }

    fn print_unexpected_error(&mut self, error: &Error) -> io::Result<()> {
        self.divider()?;
        self.styled_line(ANSI_RED, &format!("Unexpected error: {error}"))?;
        self.divider()?;
        self.out.flush()
    }

    fn print_interrupted(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        self.out.flush()
    }

    fn print_farewell(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Goodbye!")?;
        self.out.flush()
    }
}
