//! Memory-aware NPC conversation.
//!
//! Every reply is grounded in what the NPC remembers about the player and is
//! itself remembered afterwards. Failures never reach the caller: a broken
//! backend, an empty reply or an unreadable store all yield the fixed
//! fallback line, which is stored like any other reply.

use std::collections::BTreeMap;

use hearth_core::config::LlmConfig;
use hearth_core::persistence::SharedMemoryStore;
use hearth_core::types::Emotion;
use tracing::{debug, warn};

use crate::client::ChatBackend;
use crate::error::LlmError;
use crate::prompt::conversation_system_prompt;
use crate::types::ChatRequest;

/// Reply used whenever a real one cannot be produced.
pub const FALLBACK_REPLY: &str = "Sorry, I can't answer right now.";

/// Default number of stored lines replayed into each prompt.
pub const DEFAULT_MEMORY_LIMIT: usize = 100;

/// Produces NPC replies from a chat backend and a shared memory store.
#[derive(Debug)]
pub struct ConversationManager<B> {
    backend: B,
    store: SharedMemoryStore,
    memory_limit: usize,
    fallback: String,
    timeout_ms: u64,
}

impl<B: ChatBackend> ConversationManager<B> {
    /// Create a manager with the default memory limit and fallback line.
    #[must_use]
    pub fn new(backend: B, store: SharedMemoryStore) -> Self {
        Self {
            backend,
            store,
            memory_limit: DEFAULT_MEMORY_LIMIT,
            fallback: FALLBACK_REPLY.to_string(),
            timeout_ms: 10_000,
        }
    }

    /// Create a manager tuned by the `[llm]` config section.
    #[must_use]
    pub fn from_config(backend: B, store: SharedMemoryStore, config: &LlmConfig) -> Self {
        Self {
            backend,
            store,
            memory_limit: config.memory_limit,
            fallback: config.fallback_reply.clone(),
            timeout_ms: config.request_timeout_ms,
        }
    }

    /// How many stored lines go into each prompt.
    #[must_use]
    pub fn with_memory_limit(mut self, memory_limit: usize) -> Self {
        self.memory_limit = memory_limit;
        self
    }

    /// The fallback line.
    #[must_use]
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// The shared store this manager reads and writes.
    #[must_use]
    pub fn store(&self) -> &SharedMemoryStore {
        &self.store
    }

    /// Reply as `npc` to `player`, optionally answering `message`.
    ///
    /// Never fails. See the module docs for the fallback contract.
    pub async fn get_dialogue(&self, npc: &str, player: &str, message: Option<&str>) -> String {
        self.respond(npc, player, message, None).await
    }

    /// Like [`Self::get_dialogue`], telling the model how the NPC feels.
    pub async fn get_dialogue_with_emotions(
        &self,
        npc: &str,
        player: &str,
        message: Option<&str>,
        emotions: &BTreeMap<Emotion, f32>,
    ) -> String {
        self.respond(npc, player, message, Some(emotions)).await
    }

    async fn respond(
        &self,
        npc: &str,
        player: &str,
        message: Option<&str>,
        emotions: Option<&BTreeMap<Emotion, f32>>,
    ) -> String {
        let message = message.filter(|m| !m.is_empty());

        let reply = match self.recent_memories(npc, player) {
            Ok(memories) => {
                let system = conversation_system_prompt(npc, &memories, emotions);
                let mut request = ChatRequest::new(system).with_timeout(self.timeout_ms);
                if let Some(msg) = message {
                    request = request.with_user(msg);
                }
                self.ask(&request).await
            }
            Err(e) => Err(LlmError::Unavailable(format!("memory store: {e}"))),
        };

        let reply = reply.unwrap_or_else(|e| {
            warn!(npc, player, error = %e, "conversation failed, using fallback reply");
            self.fallback.clone()
        });

        if let Some(msg) = message {
            self.remember(npc, player, &format!("Player: {msg}"));
        }
        self.remember(npc, player, &format!("{npc}: {reply}"));
        reply
    }

    async fn ask(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let response = self.backend.complete(request).await?;
        let text = response.text.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyReply);
        }
        debug!(model = %response.model, latency_ms = response.latency_ms, "npc reply generated");
        Ok(text.to_string())
    }

    fn recent_memories(&self, npc: &str, player: &str) -> hearth_core::error::Result<Vec<String>> {
        self.store.lock().load_recent(npc, player, self.memory_limit)
    }

    fn remember(&self, npc: &str, player: &str, line: &str) {
        if let Err(e) = self.store.lock().save(npc, player, line) {
            warn!(npc, player, error = %e, "failed to store conversation line");
        }
    }
}
