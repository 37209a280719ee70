//! Social network — attributes, moves and move selection between actors.
//!
//! The network owns an [`AttributeStore`] and a [`MoveCatalog`] and a fixed
//! roster of actors (every NPC plus the player). Nothing is added or removed
//! after construction.
//!
//! Move selection draws from an injected RNG so sessions can be replayed
//! from a seed:
//!
//! ```
//! use hearth_core::social::SocialNetwork;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut net = SocialNetwork::with_rng(["Carlos", "Lina"], StdRng::seed_from_u64(7));
//! net.adjust("friendship", "Lina", 0.5);
//! let chosen = net.decide_move("Carlos", "Lina");
//! net.execute_move(chosen.as_ref(), "Carlos", "Lina");
//! ```

pub mod attribute;
pub mod moves;

pub use attribute::{Attribute, AttributeStore};
pub use moves::{AttributeShift, Condition, Effect, MoveCatalog, Precondition, SocialMove, Subject};

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::Result;
use crate::types::{DEFAULT_ATTRIBUTES, DEFAULT_PLAYER};

/// Attributes, moves and the actor roster for one play session.
#[derive(Debug, Clone)]
pub struct SocialNetwork<R = StdRng> {
    attributes: AttributeStore,
    moves: MoveCatalog,
    actors: BTreeSet<String>,
    rng: R,
}

impl SocialNetwork<StdRng> {
    /// Built-in attributes and moves for `npcs` plus the default player,
    /// with an entropy-seeded RNG.
    #[must_use]
    pub fn new<I, S>(npcs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_rng(npcs, StdRng::from_entropy())
    }
}

impl<R: Rng> SocialNetwork<R> {
    /// Built-in attributes and moves for `npcs` plus the default player.
    #[must_use]
    pub fn with_rng<I, S>(npcs: I, rng: R) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut actors: BTreeSet<String> = npcs.into_iter().map(Into::into).collect();
        actors.insert(DEFAULT_PLAYER.to_string());
        Self {
            attributes: AttributeStore::with_attributes(DEFAULT_ATTRIBUTES, 0.0),
            moves: MoveCatalog::builtin(),
            actors,
            rng,
        }
    }

    /// Assemble a network from explicit parts. `actors` is the full roster,
    /// player included.
    ///
    /// # Errors
    /// Returns [`crate::HearthError::UnknownAttribute`] if a move references
    /// an attribute that `attributes` does not register.
    pub fn from_parts<I, S>(
        actors: I,
        attributes: AttributeStore,
        moves: MoveCatalog,
        rng: R,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        moves.validate(&attributes)?;
        Ok(Self {
            attributes,
            moves,
            actors: actors.into_iter().map(Into::into).collect(),
            rng,
        })
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Current value of `attribute` for `actor`; the default if unseen.
    #[must_use]
    pub fn get(&self, attribute: &str, actor: &str) -> f32 {
        self.attributes.get(attribute, actor)
    }

    /// Shift `attribute` for `actor` by `delta`, clamped to `[-1, 1]`.
    pub fn adjust(&mut self, attribute: &str, actor: &str, delta: f32) {
        self.attributes.adjust(attribute, actor, delta);
    }

    /// Overwrite a starting value, clamped to `[-1, 1]`.
    pub fn set(&mut self, attribute: &str, actor: &str, value: f32) {
        self.attributes.set(attribute, actor, value);
    }

    /// Read-only view of the attribute store.
    #[must_use]
    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    // ------------------------------------------------------------------
    // Actors and moves
    // ------------------------------------------------------------------

    /// Whether `actor` belongs to the roster.
    #[must_use]
    pub fn contains_actor(&self, actor: &str) -> bool {
        self.actors.contains(actor)
    }

    /// The roster, sorted.
    pub fn actors(&self) -> impl Iterator<Item = &str> {
        self.actors.iter().map(String::as_str)
    }

    /// The move catalog.
    #[must_use]
    pub fn moves(&self) -> &MoveCatalog {
        &self.moves
    }

    /// Every move whose precondition holds, in catalog order.
    ///
    /// Empty when either actor is not on the roster.
    #[must_use]
    pub fn get_valid_moves(&self, source: &str, target: &str) -> Vec<&SocialMove> {
        if !self.contains_actor(source) || !self.contains_actor(target) {
            return Vec::new();
        }
        self.moves
            .iter()
            .filter(|m| m.is_applicable(&self.attributes, source, target))
            .collect()
    }

    /// Pick one valid move uniformly at random, or `None` if none apply.
    pub fn decide_move(&mut self, source: &str, target: &str) -> Option<SocialMove> {
        if !self.contains_actor(source) || !self.contains_actor(target) {
            return None;
        }
        let attributes = &self.attributes;
        let valid: Vec<&SocialMove> = self
            .moves
            .iter()
            .filter(|m| m.is_applicable(attributes, source, target))
            .collect();
        let chosen = valid.choose(&mut self.rng).map(|m| (*m).clone());
        debug!(
            source,
            target,
            candidates = valid.len(),
            chosen = chosen.as_ref().map(SocialMove::name),
            "social move decided"
        );
        chosen
    }

    /// Apply a move's effects. A `None` move is a no-op.
    pub fn execute_move(&mut self, mov: Option<&SocialMove>, source: &str, target: &str) {
        let Some(mov) = mov else {
            return;
        };
        mov.perform(&mut self.attributes, source, target);
        debug!(source, target, mov = mov.name(), "social move executed");
    }

    /// Decide and execute in one step. Returns the move that was played.
    pub fn interact(&mut self, source: &str, target: &str) -> Option<SocialMove> {
        let chosen = self.decide_move(source, target);
        self.execute_move(chosen.as_ref(), source, target);
        chosen
    }
}
