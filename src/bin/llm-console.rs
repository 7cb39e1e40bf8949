//! Interactive console chat with an OpenAI-compatible LLM endpoint.
//!
//! # Usage
//!
//! ```bash
//! export GROQ_API_KEY='your-key-here'
//! llm-console
//!
//! # Use a different model
//! LLM_MODEL=llama-3.1-8b-instant llm-console
//!
//! # Scripted input
//! printf 'Hello\nexit\n' | llm-console
//! ```
//!
//! Type `exit` or `quit` (any case), or close the input, to leave.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use llm_console::config::API_KEY_VAR;
use llm_console::logging::{DEFAULT_LOG_LEVEL, init_logging};
use llm_console::{
    BufReadSource, Chat, ChatConfig, Client, Console, EditorSource, LineSource, PlainTextRenderer,
};

/// Main entry point for the llm-console application.
#[tokio::main]
async fn main() -> ExitCode {
    init_logging(DEFAULT_LOG_LEVEL);

    let mut config = match ChatConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::debug!(error = %err, "configuration rejected");
            eprintln!("ERROR: Please set {API_KEY_VAR} in your environment.");
            eprintln!("Example: export {API_KEY_VAR}='your-key-here'");
            return ExitCode::FAILURE;
        }
    };
    if !io::stdout().is_terminal() {
        config = config.without_color();
    }

    let client = match Client::new(&config) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("ERROR: {err}");
            return ExitCode::FAILURE;
        }
    };
    let chat = Chat::from_config(client, &config);

    let input: Box<dyn LineSource> = if io::stdin().is_terminal() {
        match EditorSource::new() {
            Ok(editor) => Box::new(editor),
            Err(err) => {
                eprintln!("ERROR: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        Box::new(BufReadSource::new(io::stdin().lock()))
    };
    let renderer = PlainTextRenderer::with_color(config.use_color);

    let mut console = Console::new(chat, input, renderer);
    match console.run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}
