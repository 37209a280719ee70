//! # hearth-llm — Conversation Layer for Hearth NPCs
//!
//! Turns a player's line into an NPC reply grounded in what that NPC
//! remembers:
//!   - **Chat backends** — Ollama, any OpenAI-compatible API, or none
//!   - **Prompts** — persona, memory replay, optional emotion snapshot
//!   - **Conversation manager** — load memories, ask, fall back, remember
//!   - **Offline trees** — canned greetings and options, no network
//!
//! Nothing in this crate ever surfaces a chat failure to the simulation; the
//! NPC apologises instead.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod conversation;
pub mod error;
pub mod offline;
pub mod prompt;
pub mod types;

pub use client::{ChatBackend, LlmClient, LlmProvider};
pub use conversation::{ConversationManager, FALLBACK_REPLY};
pub use error::LlmError;
pub use offline::DialogueTrees;
pub use types::{ChatMessage, ChatRequest, ChatResponse, ChatRole};
