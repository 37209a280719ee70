//! Configuration for a Hearth play session.
//!
//! Maps directly to `hearth.toml`. Every section is optional; a missing
//! section takes its defaults, which reproduce the shipped demo village.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::emotion::EventRule;
use crate::error::{HearthError, Result};
use crate::types::{DEFAULT_ATTRIBUTES, DEFAULT_PLAYER, EnvironmentEvent, FRIENDSHIP, RESPECT};

/// Top-level Hearth configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HearthConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Social attribute registration.
    #[serde(default)]
    pub social: SocialConfig,
    /// Additional emotion rules.
    #[serde(default)]
    pub emotion: EmotionConfig,
    /// Environment event timing and catalog.
    #[serde(default)]
    pub events: EventsConfig,
    /// SQLite memory store.
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Conversation backend.
    #[serde(default)]
    pub llm: LlmConfig,
    /// NPC roster.
    #[serde(default = "default_npcs")]
    pub npcs: Vec<NpcConfig>,
}

impl Default for HearthConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            social: SocialConfig::default(),
            emotion: EmotionConfig::default(),
            events: EventsConfig::default(),
            persistence: PersistenceConfig::default(),
            llm: LlmConfig::default(),
            npcs: default_npcs(),
        }
    }
}

impl HearthConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `HearthError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| HearthError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Reject values no session could run with.
    ///
    /// # Errors
    /// Returns `HearthError::Config` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let interval = self.events.interval_seconds;
        if interval.is_nan() || interval <= 0.0 {
            return Err(HearthError::Config(format!(
                "events.interval_seconds must be positive, got {interval}"
            )));
        }
        if self.events.catalog.is_empty() {
            return Err(HearthError::EmptyEventCatalog);
        }
        if self.general.player_name.trim().is_empty() {
            return Err(HearthError::Config("general.player_name is empty".into()));
        }
        let mut seen = std::collections::BTreeSet::new();
        for npc in &self.npcs {
            if npc.name == self.general.player_name {
                return Err(HearthError::Config(format!(
                    "NPC '{}' shares the player's name",
                    npc.name
                )));
            }
            if !seen.insert(npc.name.as_str()) {
                return Err(HearthError::Config(format!("duplicate NPC '{}'", npc.name)));
            }
        }
        Ok(())
    }

    /// Names of every configured NPC, in roster order.
    pub fn npc_names(&self) -> impl Iterator<Item = &str> {
        self.npcs.iter().map(|n| n.name.as_str())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Name the player is addressed by and stored under.
    #[serde(default = "default_player_name")]
    pub player_name: String,
    /// Seed for every RNG in the session. Entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            player_name: default_player_name(),
            seed: None,
        }
    }
}

/// Which social attributes exist and where they start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialConfig {
    /// Value read for actors never adjusted.
    #[serde(default)]
    pub default_value: f32,
    /// Registered attribute names. Must cover every attribute the moves use.
    #[serde(default = "default_attributes")]
    pub attributes: Vec<String>,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            default_value: 0.0,
            attributes: default_attributes(),
        }
    }
}

/// Emotion rule extensions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionConfig {
    /// Rules checked after the built-in table.
    #[serde(default)]
    pub extra_event_rules: Vec<EventRule>,
}

/// Environment event timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Seconds between events.
    #[serde(default = "default_interval")]
    pub interval_seconds: f32,
    /// Recent events kept for display.
    #[serde(default = "default_history_size")]
    pub history_size: usize,
    /// Events to pick from.
    #[serde(default = "default_catalog")]
    pub catalog: Vec<EnvironmentEvent>,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval(),
            history_size: default_history_size(),
            catalog: default_catalog(),
        }
    }
}

/// SQLite memory store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Database file, relative to the working directory.
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Use WAL mode for concurrent reads.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

/// Conversation backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider: "none", "ollama", or "openai".
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Endpoint base URL. Provider-specific default when empty.
    #[serde(default)]
    pub base_url: String,
    /// Chat model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Retries after the first failed attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Stored memories included in each prompt.
    #[serde(default = "default_memory_limit")]
    pub memory_limit: usize,
    /// Reply used whenever the backend fails.
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: String::new(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            request_timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            memory_limit: default_memory_limit(),
            fallback_reply: default_fallback_reply(),
        }
    }
}

/// One NPC in the roster, with optional starting attitudes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcConfig {
    /// Display name, unique across the roster.
    pub name: String,
    /// Starting friendship.
    #[serde(default)]
    pub friendship: Option<f32>,
    /// Starting respect.
    #[serde(default)]
    pub respect: Option<f32>,
}

impl NpcConfig {
    /// An NPC with no starting overrides.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            friendship: None,
            respect: None,
        }
    }

    /// Starting overrides as `(attribute, value)` pairs.
    #[must_use]
    pub fn starting_values(&self) -> BTreeMap<&'static str, f32> {
        let mut values = BTreeMap::new();
        if let Some(v) = self.friendship {
            values.insert(FRIENDSHIP, v);
        }
        if let Some(v) = self.respect {
            values.insert(RESPECT, v);
        }
        values
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_player_name() -> String { DEFAULT_PLAYER.to_string() }
fn default_attributes() -> Vec<String> { DEFAULT_ATTRIBUTES.iter().map(ToString::to_string).collect() }
fn default_interval() -> f32 { 15.0 }
fn default_history_size() -> usize { 5 }
fn default_database_path() -> String { "npc_memory.db".to_string() }
fn default_provider() -> String { "none".to_string() }
fn default_model() -> String { "gpt-3.5-turbo".to_string() }
fn default_api_key_env() -> String { "OPENAI_API_KEY".to_string() }
fn default_timeout_ms() -> u64 { 10_000 }
fn default_max_retries() -> u32 { 2 }
fn default_memory_limit() -> usize { 100 }
fn default_fallback_reply() -> String { "Sorry, I can't answer right now.".to_string() }

fn default_catalog() -> Vec<EnvironmentEvent> {
    vec![
        EnvironmentEvent::new("storm", "Dark clouds roll over the village."),
        EnvironmentEvent::new("rain", "A steady rain drums on the rooftops."),
        EnvironmentEvent::new("fog", "A thick fog settles between the houses."),
        EnvironmentEvent::new("festival", "Lanterns go up for the harvest festival."),
        EnvironmentEvent::new("market day", "Traders fill the square with stalls."),
    ]
}

fn default_npcs() -> Vec<NpcConfig> {
    ["Carlos", "Lina", "Eldar"].into_iter().map(NpcConfig::named).collect()
}
