//! # Hearth Core Library
//!
//! Game-agnostic social and emotional simulation for a village of NPCs.
//!
//! Three engines share one roster of actors:
//!
//! - **Social network** — bounded attributes ("how others see me") and the
//!   social moves that read and shift them
//! - **Emotion engine** — joy, anger and fear per actor, driven by social
//!   moves and environment text
//! - **Event manager** — a timer that fires random environment events,
//!   feeding emotions, notifications and NPC memories
//!
//! Everything here is synchronous and single-threaded. Randomness is
//! injected so whole sessions replay from a seed.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod emotion;
pub mod error;
pub mod events;
pub mod persistence;
pub mod social;
pub mod types;

pub use config::HearthConfig;
pub use emotion::{EmotionEngine, EmotionState, EventRule};
pub use error::HearthError;
pub use events::{EventManager, MemorySink, Notifier};
pub use persistence::{MemoryStore, SharedMemoryStore, StoreSink};
pub use social::{MoveCatalog, SocialMove, SocialNetwork};
pub use types::*;
