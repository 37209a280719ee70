//! Social moves — named, conditionally applicable actions between actors.
//!
//! A move pairs a precondition with a list of attribute shifts. Both halves
//! are plain data (tagged enums / structs) so catalogs can be declared in
//! TOML, and both sit behind small capability traits so the network never
//! needs to know which concrete rule it is running.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::attribute::AttributeStore;
use crate::error::{HearthError, Result};
use crate::types::{FEAR, FRIENDSHIP, RESPECT};

/// Built-in move: lend a hand to a friend.
pub const HELP: &str = "help";
/// Built-in move: insult someone already disliked.
pub const INSULT: &str = "insult";
/// Built-in move: spread rumours about someone else.
pub const GOSSIP: &str = "gossip";
/// Built-in move: compliment anyone.
pub const PRAISE: &str = "praise";

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Decides whether a move may be played from `source` towards `target`.
pub trait Precondition {
    /// Evaluate against the current attribute state. Must not mutate.
    fn evaluate(&self, state: &AttributeStore, source: &str, target: &str) -> bool;
}

/// Mutates attribute state when a move is played.
pub trait Effect {
    /// Apply the mutation. Values are clamped by the store.
    fn apply(&self, state: &mut AttributeStore, source: &str, target: &str);
}

// ---------------------------------------------------------------------------
// Concrete rules
// ---------------------------------------------------------------------------

/// Which side of the interaction a rule reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    /// The actor performing the move.
    Source,
    /// The actor the move is aimed at.
    #[default]
    Target,
}

impl Subject {
    fn pick<'a>(self, source: &'a str, target: &'a str) -> &'a str {
        match self {
            Self::Source => source,
            Self::Target => target,
        }
    }
}

/// Data-driven precondition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// Always playable.
    Always,
    /// Playable only between two different actors.
    DistinctActors,
    /// Playable when the attribute is strictly greater than `threshold`.
    AttributeAbove {
        /// Attribute to read.
        attribute: String,
        /// Exclusive lower bound.
        threshold: f32,
        /// Whose value to read.
        #[serde(default)]
        subject: Subject,
    },
    /// Playable when the attribute is strictly less than `threshold`.
    AttributeBelow {
        /// Attribute to read.
        attribute: String,
        /// Exclusive upper bound.
        threshold: f32,
        /// Whose value to read.
        #[serde(default)]
        subject: Subject,
    },
}

impl Condition {
    /// Attribute this condition reads, if any.
    #[must_use]
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Self::Always | Self::DistinctActors => None,
            Self::AttributeAbove { attribute, .. } | Self::AttributeBelow { attribute, .. } => {
                Some(attribute.as_str())
            }
        }
    }

    fn above(attribute: &str, threshold: f32) -> Self {
        Self::AttributeAbove {
            attribute: attribute.to_string(),
            threshold,
            subject: Subject::Target,
        }
    }

    fn below(attribute: &str, threshold: f32) -> Self {
        Self::AttributeBelow {
            attribute: attribute.to_string(),
            threshold,
            subject: Subject::Target,
        }
    }
}

impl Precondition for Condition {
    fn evaluate(&self, state: &AttributeStore, source: &str, target: &str) -> bool {
        match self {
            Self::Always => true,
            Self::DistinctActors => source != target,
            Self::AttributeAbove {
                attribute,
                threshold,
                subject,
            } => state.get(attribute, subject.pick(source, target)) > *threshold,
            Self::AttributeBelow {
                attribute,
                threshold,
                subject,
            } => state.get(attribute, subject.pick(source, target)) < *threshold,
        }
    }
}

/// A single attribute delta applied when a move is played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeShift {
    /// Attribute to change.
    pub attribute: String,
    /// Signed change, applied before clamping.
    pub delta: f32,
    /// Whose value changes.
    #[serde(default)]
    pub subject: Subject,
}

impl AttributeShift {
    /// Shift the target's `attribute` by `delta`.
    #[must_use]
    pub fn on_target(attribute: impl Into<String>, delta: f32) -> Self {
        Self {
            attribute: attribute.into(),
            delta,
            subject: Subject::Target,
        }
    }
}

impl Effect for AttributeShift {
    fn apply(&self, state: &mut AttributeStore, source: &str, target: &str) {
        state.adjust(&self.attribute, self.subject.pick(source, target), self.delta);
    }
}

impl Effect for [AttributeShift] {
    fn apply(&self, state: &mut AttributeStore, source: &str, target: &str) {
        for shift in self {
            shift.apply(state, source, target);
        }
    }
}

// ---------------------------------------------------------------------------
// SocialMove
// ---------------------------------------------------------------------------

/// A named social move: precondition plus effects. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialMove {
    name: String,
    condition: Condition,
    effects: Vec<AttributeShift>,
}

impl SocialMove {
    /// Create a move.
    #[must_use]
    pub fn new(name: impl Into<String>, condition: Condition, effects: Vec<AttributeShift>) -> Self {
        Self {
            name: name.into(),
            condition,
            effects,
        }
    }

    /// Move name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The precondition.
    #[must_use]
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// The attribute shifts, in application order.
    #[must_use]
    pub fn effects(&self) -> &[AttributeShift] {
        &self.effects
    }

    /// Whether the move may be played right now.
    #[must_use]
    pub fn is_applicable(&self, state: &AttributeStore, source: &str, target: &str) -> bool {
        self.condition.evaluate(state, source, target)
    }

    /// Play the move against `state`.
    pub fn perform(&self, state: &mut AttributeStore, source: &str, target: &str) {
        self.effects.as_slice().apply(state, source, target);
    }

    /// Every attribute name the move reads or writes.
    pub fn referenced_attributes(&self) -> impl Iterator<Item = &str> {
        self.condition
            .attribute()
            .into_iter()
            .chain(self.effects.iter().map(|e| e.attribute.as_str()))
    }
}

// ---------------------------------------------------------------------------
// MoveCatalog
// ---------------------------------------------------------------------------

/// Ordered, fixed set of social moves. Registration order is evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveCatalog {
    moves: Vec<SocialMove>,
}

impl MoveCatalog {
    /// Build a catalog from `moves`, rejecting duplicate names.
    ///
    /// # Errors
    /// Returns [`HearthError::DuplicateMove`] if two moves share a name.
    pub fn new(moves: Vec<SocialMove>) -> Result<Self> {
        let mut seen = HashSet::new();
        for mov in &moves {
            if !seen.insert(mov.name.to_lowercase()) {
                return Err(HearthError::DuplicateMove(mov.name.clone()));
            }
        }
        Ok(Self { moves })
    }

    /// The four built-in moves: help, insult, gossip, praise.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            moves: vec![
                SocialMove::new(
                    HELP,
                    Condition::above(FRIENDSHIP, 0.2),
                    vec![
                        AttributeShift::on_target(FRIENDSHIP, 0.3),
                        AttributeShift::on_target(RESPECT, 0.2),
                    ],
                ),
                SocialMove::new(
                    INSULT,
                    Condition::below(FRIENDSHIP, 0.0),
                    vec![
                        AttributeShift::on_target(RESPECT, -0.4),
                        AttributeShift::on_target(FEAR, 0.3),
                    ],
                ),
                SocialMove::new(
                    GOSSIP,
                    Condition::DistinctActors,
                    vec![AttributeShift::on_target(RESPECT, -0.1)],
                ),
                SocialMove::new(
                    PRAISE,
                    Condition::Always,
                    vec![
                        AttributeShift::on_target(RESPECT, 0.3),
                        AttributeShift::on_target(FRIENDSHIP, 0.1),
                    ],
                ),
            ],
        }
    }

    /// Check that every referenced attribute is registered in `state`.
    ///
    /// # Errors
    /// Returns [`HearthError::UnknownAttribute`] for the first dangling reference.
    pub fn validate(&self, state: &AttributeStore) -> Result<()> {
        for mov in &self.moves {
            if let Some(missing) = mov.referenced_attributes().find(|a| !state.contains(a)) {
                return Err(HearthError::UnknownAttribute {
                    mov: mov.name.clone(),
                    attribute: missing.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Look up a move by name (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SocialMove> {
        self.moves.iter().find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Moves in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, SocialMove> {
        self.moves.iter()
    }

    /// Number of moves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl Default for MoveCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a MoveCatalog {
    type Item = &'a SocialMove;
    type IntoIter = std::slice::Iter<'a, SocialMove>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}
