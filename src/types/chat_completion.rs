use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Reply, Role, Usage};

/// Response body of `POST chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    /// Unique identifier for the completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The model that served the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Candidate answers.  Only the first is used.
    #[serde(default)]
    pub choices: Vec<Choice>,

    /// Token accounting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// One candidate answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Position of this choice in the response.
    #[serde(default)]
    pub index: u32,

    /// The generated message.
    pub message: ResponseMessage,

    /// Why generation stopped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// The message inside a [`Choice`].
///
/// `content` may be null, e.g. when the model stops for a tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    /// Author of the message, normally `assistant`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Text content.
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletion {
    /// Converts the first choice into a [`Reply`].
    ///
    /// `requested_model` is used when the response does not name a model.
    ///
    /// # Errors
    ///
    /// Returns an API error if the response carries no choices.
    pub fn into_reply(self, requested_model: &str) -> Result<Reply> {
        let model = self.model.unwrap_or_else(|| requested_model.to_string());
        let Some(choice) = self.choices.into_iter().next() else {
            return Err(Error::api(
                200,
                Some("empty_response".to_string()),
                format!("no choices returned by {model}"),
                self.id,
            ));
        };
        let mut reply = Reply::new(choice.message.content.unwrap_or_default()).with_model(model);
        if let Some(finish_reason) = choice.finish_reason {
            reply = reply.with_finish_reason(finish_reason);
        }
        if let Some(usage) = self.usage {
            reply = reply.with_usage(usage);
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn completion_to_reply() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1730000000,
            "model": "llama-3.3-70b-versatile",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hi there!"},
                "logprobs": null,
                "finish_reason": "stop"
            }],
            "usage": {
                "queue_time": 0.01,
                "prompt_tokens": 20,
                "prompt_time": 0.002,
                "completion_tokens": 4,
                "completion_time": 0.003,
                "total_tokens": 24,
                "total_time": 0.005
            },
            "x_groq": {"id": "req_01"}
        }))
        .unwrap();

        let reply = completion.into_reply("ignored").unwrap();
        assert_eq!(reply.content, "Hi there!");
        assert_eq!(reply.model, "llama-3.3-70b-versatile");
        assert_eq!(reply.finish_reason.as_deref(), Some("stop"));
        assert_eq!(
            reply.usage,
            Some(Usage {
                prompt_tokens: 20,
                completion_tokens: 4,
                total_tokens: 24,
            })
        );
    }

    #[test]
    fn null_content_is_empty_reply() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "choices": [{
                "message": {"role": "assistant", "content": null},
                "finish_reason": "tool_calls"
            }]
        }))
        .unwrap();

        let reply = completion.into_reply("fallback-model").unwrap();
        assert_eq!(reply.content, "");
        assert_eq!(reply.model, "fallback-model");
    }

    #[test]
    fn no_choices_is_api_error() {
        let completion: ChatCompletion =
            serde_json::from_value(json!({"id": "x", "choices": []})).unwrap();
        let err = completion.into_reply("m").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.category(), "empty_response");
    }
}
