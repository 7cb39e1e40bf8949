use serde::{Deserialize, Serialize};

/// Token accounting reported by an OpenAI-compatible endpoint.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    /// Tokens consumed by the request messages.
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Tokens produced in the reply.
    #[serde(default)]
    pub completion_tokens: u32,

    /// Sum of prompt and completion tokens.
    #[serde(default)]
    pub total_tokens: u32,
}

impl Usage {
    /// Create a new `Usage` with the given prompt and completion tokens.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn usage_new_totals() {
        let usage = Usage::new(50, 100);
        assert_eq!(usage.total_tokens, 150);
    }

    #[test]
    fn usage_partial_deserialization() {
        // Some compatible endpoints omit fields.
        let usage: Usage = serde_json::from_value(json!({
            "prompt_tokens": 12
        }))
        .unwrap();
        assert_eq!(usage.prompt_tokens, 12);
        assert_eq!(usage.completion_tokens, 0);
        assert_eq!(usage.total_tokens, 0);
    }
}
