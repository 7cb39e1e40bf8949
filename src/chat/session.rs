//! The chat capability.
//!
//! This module provides the [`ChatCapability`] trait the console loop drives,
//! and [`Chat`], which implements it on top of a [`Completions`] transport.

use async_trait::async_trait;
use tracing::debug;

use crate::chat::Conversation;
use crate::client::Completions;
use crate::config::ChatConfig;
use crate::error::Result;
use crate::types::{ChatCompletionParams, Message, Reply, Usage};

/// Operations the console needs from a chat.
///
/// Model selection and transport live behind this trait; the console only
/// ever sees the model name for its banner.
#[async_trait]
pub trait ChatCapability: Send {
    /// The model identifier replies are requested from.
    fn model(&self) -> &str;

    /// Installs system instructions, replacing or extending existing ones.
    fn set_instructions(&mut self, text: &str, replace: bool);

    /// Sends `text` as a user turn and waits for the reply.
    ///
    /// # Errors
    ///
    /// Returns an error classified by [`Error::kind`](crate::Error::kind) if
    /// the request fails.  The conversation is left unchanged in that case.
    async fn ask(&mut self, text: &str) -> Result<Reply>;
}

/// A conversation bound to a model and a transport.
pub struct Chat<T: Completions> {
    transport: T,
    model: String,
    conversation: Conversation,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    usage_totals: Usage,
    turns: u64,
}

impl<T: Completions> Chat<T> {
    /// Creates a chat with no instructions.
    pub fn new(transport: T, model: impl Into<String>) -> Self {
        Self {
            transport,
            model: model.into(),
            conversation: Conversation::new(),
            temperature: None,
            max_tokens: None,
            usage_totals: Usage::default(),
            turns: 0,
        }
    }

    /// Creates a chat using the model, instructions and sampling settings of
    /// `config`.
    pub fn from_config(transport: T, config: &ChatConfig) -> Self {
        let mut chat = Self::new(transport, config.model.clone());
        if let Some(instructions) = &config.instructions {
            chat.conversation.set_instructions(instructions.clone(), true);
        }
        chat.temperature = config.temperature;
        chat.max_tokens = config.max_tokens;
        chat
    }

    /// Builder form of [`ChatCapability::set_instructions`].
    pub fn with_instructions(mut self, text: &str, replace: bool) -> Self {
        self.conversation.set_instructions(text, replace);
        self
    }

    /// The conversation so far.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Token usage summed over every successful turn.
    pub fn usage(&self) -> Usage {
        self.usage_totals
    }

    /// Number of successful turns.
    pub fn turns(&self) -> u64 {
        self.turns
    }

    fn record_usage(&mut self, usage: Option<Usage>) {
        let Some(usage) = usage else {
            return;
        };
        self.usage_totals.prompt_tokens = self
            .usage_totals
            .prompt_tokens
            .saturating_add(usage.prompt_tokens);
        self.usage_totals.completion_tokens = self
            .usage_totals
            .completion_tokens
            .saturating_add(usage.completion_tokens);
        self.usage_totals.total_tokens = self
            .usage_totals
            .total_tokens
            .saturating_add(usage.total_tokens);
    }
}

#[async_trait]
impl<T: Completions> ChatCapability for Chat<T> {
    fn model(&self) -> &str {
        &self.model
    }

    fn set_instructions(&mut self, text: &str, replace: bool) {
        self.conversation.set_instructions(text, replace);
    }

    async fn ask(&mut self, text: &str) -> Result<Reply> {
        let user = Message::user(text);
        let params =
            ChatCompletionParams::new(self.model.clone(), self.conversation.request_messages(&user))
                .with_temperature(self.temperature)
                .with_max_tokens(self.max_tokens);

        let reply = self
            .transport
            .complete(&params)
            .await?
            .into_reply(&self.model)?;

        self.conversation
            .push_turn(user, Message::assistant(reply.content.clone()));
        self.record_usage(reply.usage);
        self.turns += 1;
        debug!(
            model = %reply.model,
            turns = self.turns,
            total_tokens = self.usage_totals.total_tokens,
            "turn complete"
        );
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::error::{Error, ErrorKind};
    use crate::types::{ChatCompletion, Choice, ResponseMessage, Role};

    /// Returns canned responses in order and records every request.
    struct Scripted {
        responses: Mutex<VecDeque<Result<ChatCompletion>>>,
        requests: Mutex<Vec<ChatCompletionParams>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<ChatCompletion>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<ChatCompletionParams> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Completions for Scripted {
        async fn complete(&self, params: &ChatCompletionParams) -> Result<ChatCompletion> {
            self.requests.lock().unwrap().push(params.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left")
        }
    }

    fn completion(text: &str, usage: Option<Usage>) -> Result<ChatCompletion> {
        Ok(ChatCompletion {
            id: Some("chatcmpl-test".to_string()),
            model: Some("test-model".to_string()),
            choices: vec![Choice {
                index: 0,
                message: ResponseMessage {
                    role: Some(Role::Assistant),
                    content: Some(text.to_string()),
                },
                finish_reason: Some("stop".to_string()),
            }],
            usage,
        })
    }

    #[tokio::test]
    async fn ask_sends_instructions_then_history() {
        let transport = Scripted::new(vec![
            completion("Hi there!", None),
            completion("Still here.", None),
        ]);
        let mut chat = Chat::new(transport, "test-model").with_instructions("Be concise.", true);

        let reply = chat.ask("Hello").await.unwrap();
        assert_eq!(reply.content, "Hi there!");
        chat.ask("Are you there?").await.unwrap();

        let requests = chat.transport().requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].model, "test-model");
        assert_eq!(
            requests[0].messages,
            vec![Message::system("Be concise."), Message::user("Hello")]
        );
        assert_eq!(
            requests[1].messages,
            vec![
                Message::system("Be concise."),
                Message::user("Hello"),
                Message::assistant("Hi there!"),
                Message::user("Are you there?"),
            ]
        );
        assert_eq!(chat.conversation().len(), 4);
        assert_eq!(chat.turns(), 2);
    }

    #[tokio::test]
    async fn failed_turn_leaves_log_untouched() {
        let transport = Scripted::new(vec![
            completion("Hi there!", None),
            Err(Error::rate_limit("quota exhausted", Some(2))),
            completion("Back again.", None),
        ]);
        let mut chat = Chat::new(transport, "test-model");

        chat.ask("Hello").await.unwrap();
        let err = chat.ask("Lost").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert_eq!(chat.conversation().len(), 2);

        chat.ask("Again").await.unwrap();
        let requests = chat.transport().requests();
        assert_eq!(
            requests[2].messages,
            vec![
                Message::user("Hello"),
                Message::assistant("Hi there!"),
                Message::user("Again"),
            ]
        );
        assert_eq!(chat.turns(), 2);
    }

    #[tokio::test]
    async fn set_instructions_replaces() {
        let transport = Scripted::new(vec![completion("ok", None)]);
        let mut chat = Chat::new(transport, "test-model").with_instructions("first", true);
        chat.set_instructions("second", true);
        chat.ask("Hello").await.unwrap();
        assert_eq!(
            chat.transport().requests()[0].messages[0],
            Message::system("second")
        );
        assert_eq!(chat.conversation().instructions().len(), 1);
    }

    #[tokio::test]
    async fn usage_accumulates() {
        let transport = Scripted::new(vec![
            completion("a", Some(Usage::new(10, 2))),
            completion("b", None),
            completion("c", Some(Usage::new(20, 3))),
        ]);
        let mut chat = Chat::new(transport, "test-model");
        for input in ["one", "two", "three"] {
            chat.ask(input).await.unwrap();
        }
        assert_eq!(chat.usage(), Usage::new(30, 5));
    }

    #[tokio::test]
    async fn from_config_applies_settings() {
        let config = ChatConfig::new("key")
            .with_model("llama-3.1-8b-instant")
            .with_instructions(Some("Answer briefly.".to_string()))
            .with_temperature(Some(0.3))
            .with_max_tokens(Some(128));
        let transport = Scripted::new(vec![completion("ok", None)]);
        let mut chat = Chat::from_config(transport, &config);
        assert_eq!(chat.model(), "llama-3.1-8b-instant");

        chat.ask("Hello").await.unwrap();
        let request = &chat.transport().requests()[0];
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.max_tokens, Some(128));
        assert_eq!(request.messages[0], Message::system("Answer briefly."));
    }

    #[tokio::test]
    async fn empty_choices_is_an_api_error() {
        let transport = Scripted::new(vec![Ok(ChatCompletion {
            id: None,
            model: None,
            choices: Vec::new(),
            usage: None,
        })]);
        let mut chat = Chat::new(transport, "test-model");
        let err = chat.ask("Hello").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert!(chat.conversation().is_empty());
    }
}
