//! Offline dialogue trees for when no chat backend is available.
//!
//! Each NPC has a greeting and a numbered list of player options, each with
//! a canned response. Loadable from TOML:
//!
//! ```toml
//! [Carlos]
//! greeting = "Fresh bread today!"
//! options = [
//!     { text = "What's new?", response = "The mill is running again." },
//! ]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Shown when an NPC has nothing to say.
pub const SILENCE: &str = "…";
/// Greeting used when a tree omits one.
pub const DEFAULT_GREETING: &str = "Hello.";
/// The only option offered by an NPC without a tree.
pub const GOODBYE: &str = "Goodbye.";

/// One selectable line and the NPC's answer to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueOption {
    /// What the player says.
    pub text: String,
    /// What the NPC answers.
    #[serde(default)]
    pub response: Option<String>,
}

/// A single NPC's dialogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTree {
    /// Opening line.
    #[serde(default)]
    pub greeting: Option<String>,
    /// Player choices, in display order.
    #[serde(default)]
    pub options: Vec<DialogueOption>,
}

/// Dialogue trees keyed by NPC name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogueTrees {
    trees: BTreeMap<String, DialogueTree>,
}

impl DialogueTrees {
    /// No trees at all; every NPC is silent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse trees from TOML.
    ///
    /// # Errors
    /// Returns [`LlmError::ConfigError`] if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self, LlmError> {
        toml::from_str(toml_str).map_err(|e| LlmError::ConfigError(e.to_string()))
    }

    /// Load trees from a TOML file.
    ///
    /// # Errors
    /// Returns [`LlmError::ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, LlmError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LlmError::ConfigError(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Greeting and option texts for `npc`.
    #[must_use]
    pub fn start_conversation(&self, npc: &str) -> (String, Vec<String>) {
        let Some(tree) = self.trees.get(npc) else {
            return (SILENCE.to_string(), vec![GOODBYE.to_string()]);
        };
        let greeting = tree.greeting.as_deref().unwrap_or(DEFAULT_GREETING).to_string();
        let options = tree.options.iter().map(|o| o.text.clone()).collect();
        (greeting, options)
    }

    /// Response to option `index`, or silence if there is none.
    #[must_use]
    pub fn reply(&self, npc: &str, index: usize) -> String {
        self.trees
            .get(npc)
            .and_then(|tree| tree.options.get(index))
            .and_then(|option| option.response.as_deref())
            .unwrap_or(SILENCE)
            .to_string()
    }
}
