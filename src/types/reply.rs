use crate::types::Usage;

/// The assistant's answer to a single `ask`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// The reply text.
    pub content: String,

    /// The model that produced the reply.
    pub model: String,

    /// Why generation stopped, as reported by the endpoint.
    pub finish_reason: Option<String>,

    /// Token accounting, when the endpoint reports it.
    pub usage: Option<Usage>,
}

impl Reply {
    /// Create a reply carrying only text.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: String::new(),
            finish_reason: None,
            usage: None,
        }
    }

    /// Set the answering model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the finish reason.
    pub fn with_finish_reason(mut self, finish_reason: impl Into<String>) -> Self {
        self.finish_reason = Some(finish_reason.into());
        self
    }

    /// Set the usage.
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }
}
