//! # hearth-game — Game-Loop Orchestration for Hearth
//!
//! This crate wires the game-agnostic `hearth-core` engines and the
//! `hearth-llm` conversation layer into a single play session, the way a
//! frame loop drives them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              game loop                  │
//! │  ┌───────────────────────────────────┐  │
//! │  │        GameSession                │  │
//! │  │  ┌─────────────┐ ┌─────────────┐  │  │
//! │  │  │ tick/interact│ │    talk     │  │  │
//! │  │  └──────┬──────┘ └──────┬──────┘  │  │
//! │  │         ▼               ▼         │  │
//! │  │    ┌─────────────────────────┐    │  │
//! │  │    │      hearth-core        │    │  │
//! │  │    └─────────────────────────┘    │  │
//! │  │    ┌─────────────────────────┐    │  │
//! │  │    │      hearth-llm         │    │  │
//! │  │    └─────────────────────────┘    │  │
//! │  └───────────────────────────────────┘  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `session` — `GameSession`: tick, interact, talk and read accessors
//! - `feed` — bounded notification feed that doubles as the event notifier

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod feed;
pub mod session;

pub use feed::NotificationFeed;
pub use session::GameSession;
