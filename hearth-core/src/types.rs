//! Core type definitions shared by the social, emotion and event engines.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Actor identifier used by the player when no name has been chosen.
pub const DEFAULT_PLAYER: &str = "Player";

/// Built-in social attribute: how much others like an actor.
pub const FRIENDSHIP: &str = "friendship";
/// Built-in social attribute: how highly others regard an actor.
pub const RESPECT: &str = "respect";
/// Built-in social attribute: how intimidated an actor is.
pub const FEAR: &str = "fear";

/// The three attributes every social network registers by default.
pub const DEFAULT_ATTRIBUTES: [&str; 3] = [FRIENDSHIP, RESPECT, FEAR];

// ---------------------------------------------------------------------------
// Primary emotions
// ---------------------------------------------------------------------------

/// One of the primary emotions tracked for every actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    /// Happiness, delight.
    Joy,
    /// Irritation, hostility.
    Anger,
    /// Unease, dread.
    Fear,
}

impl Emotion {
    /// All primary emotions, in display order.
    pub const ALL: [Emotion; 3] = [Emotion::Joy, Emotion::Anger, Emotion::Fear];

    /// Lowercase key used in configs and snapshots.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Joy => "joy",
            Self::Anger => "anger",
            Self::Fear => "fear",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "joy" => Ok(Self::Joy),
            "anger" => Ok(Self::Anger),
            "fear" => Ok(Self::Fear),
            other => Err(format!("unknown emotion: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Environment events
// ---------------------------------------------------------------------------

/// A global occurrence the event manager can trigger (e.g. a storm).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentEvent {
    /// Short event name, matched against the emotion rules.
    pub name: String,
    /// Longer human-readable description.
    pub description: String,
}

impl EnvironmentEvent {
    /// Create a new environment event.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// The notification line announced to the game and written to memory.
    #[must_use]
    pub fn notification(&self) -> String {
        format!("[EVENT] {} -> {}", self.name, self.description)
    }
}

impl fmt::Display for EnvironmentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.description)
    }
}
