//! Chat request and response types shared by every backend.

use serde::{Deserialize, Serialize};

/// Who is speaking in a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Persona and memory instructions.
    System,
    /// The player.
    User,
    /// The NPC.
    Assistant,
}

/// One message of a chat exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Speaker.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// A system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// A user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// A request for one NPC reply.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// System prompt first, then at most one user turn.
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Temperature (0.0 = deterministic, 1.0 = creative).
    pub temperature: f32,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl ChatRequest {
    /// A request carrying only a system prompt.
    #[must_use]
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system)],
            max_tokens: 200,
            temperature: 0.7,
            timeout_ms: 10_000,
        }
    }

    /// Append the player's line as the user turn.
    #[must_use]
    pub fn with_user(mut self, message: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::user(message));
        self
    }

    /// Set the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// The system prompt, if any.
    #[must_use]
    pub fn system(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == ChatRole::System)
            .map(|m| m.content.as_str())
    }

    /// The player's message, if any.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
    }
}

/// A reply from a chat backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// The generated text.
    pub text: String,
    /// How many tokens were generated.
    pub tokens_generated: u32,
    /// Latency in milliseconds.
    pub latency_ms: u64,
    /// Which model answered.
    pub model: String,
}

impl ChatResponse {
    /// A response with only text, for backends without usage data.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tokens_generated: 0,
            latency_ms: 0,
            model: String::new(),
        }
    }
}
