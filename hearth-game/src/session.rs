//! One play session: the three engines wired to a store, a feed and a
//! conversation backend.
//!
//! The session owns everything the game loop touches each frame:
//!
//! ```text
//!   tick(dt) ──▶ EventManager ──▶ EmotionEngine (every NPC)
//!                     │──▶ NotificationFeed (once)
//!                     └──▶ StoreSink (once per NPC)
//!
//!   interact(a, b) ──▶ SocialNetwork ──▶ EmotionEngine (target)
//!
//!   talk(npc, msg) ──▶ ConversationManager ──▶ ChatBackend + MemoryStore
//! ```

use std::collections::BTreeMap;

use hearth_core::config::HearthConfig;
use hearth_core::emotion::EmotionEngine;
use hearth_core::error::Result;
use hearth_core::events::EventManager;
use hearth_core::persistence::{SharedMemoryStore, StoreSink};
use hearth_core::social::{AttributeStore, MoveCatalog, SocialNetwork};
use hearth_core::types::{Emotion, EnvironmentEvent};
use hearth_llm::{ChatBackend, ConversationManager, DialogueTrees, LlmClient};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::feed::NotificationFeed;

/// Engines and collaborators for one player in one village.
#[derive(Debug)]
pub struct GameSession<B = LlmClient> {
    player: String,
    npcs: Vec<String>,
    social: SocialNetwork<StdRng>,
    emotions: EmotionEngine,
    events: EventManager<StdRng>,
    conversations: ConversationManager<B>,
    dialogue: DialogueTrees,
    feed: NotificationFeed,
}

impl<B: ChatBackend> GameSession<B> {
    /// Build a session from config.
    ///
    /// When `general.seed` is set every random choice in the session is
    /// derived from it.
    ///
    /// # Errors
    /// Returns a configuration error if the roster, attributes or event
    /// catalog cannot form a valid session.
    pub fn new(config: &HearthConfig, store: SharedMemoryStore, backend: B) -> Result<Self> {
        config.validate()?;
        let mut seeder = match config.general.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let player = config.general.player_name.clone();
        let npcs: Vec<String> = config.npc_names().map(String::from).collect();

        let attributes =
            AttributeStore::with_attributes(&config.social.attributes, config.social.default_value);
        let mut social = SocialNetwork::from_parts(
            npcs.iter().chain(std::iter::once(&player)),
            attributes,
            MoveCatalog::builtin(),
            StdRng::seed_from_u64(seeder.r#gen()),
        )?;
        for npc in &config.npcs {
            for (attribute, value) in npc.starting_values() {
                social.set(attribute, &npc.name, value);
            }
        }

        let emotions = EmotionEngine::with_extra_rules(&npcs, config.emotion.extra_event_rules.clone());

        let feed = NotificationFeed::default();
        let events = EventManager::from_config(
            &config.events,
            StoreSink::new(store.clone(), player.clone()),
            feed.clone(),
            StdRng::seed_from_u64(seeder.r#gen()),
        )?;

        let conversations = ConversationManager::from_config(backend, store, &config.llm);

        info!(
            player = %player,
            npcs = npcs.len(),
            seeded = config.general.seed.is_some(),
            "session started"
        );

        Ok(Self {
            player,
            npcs,
            social,
            emotions,
            events,
            conversations,
            dialogue: DialogueTrees::new(),
            feed,
        })
    }

    /// Attach offline dialogue trees.
    #[must_use]
    pub fn with_dialogue_trees(mut self, dialogue: DialogueTrees) -> Self {
        self.dialogue = dialogue;
        self
    }

    // ------------------------------------------------------------------
    // Per-frame operations
    // ------------------------------------------------------------------

    /// Advance the event clock by `dt` seconds. Returns `true` if an event fired.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.events.update(dt, &mut self.emotions)
    }

    /// Let `source` pick and play a social move on `target`.
    ///
    /// The target reacts emotionally. Returns the move name, or `None` if
    /// nothing was applicable.
    pub fn interact(&mut self, source: &str, target: &str) -> Option<String> {
        let mov = self.social.decide_move(source, target)?;
        self.social.execute_move(Some(&mov), source, target);
        self.emotions.handle_social_move(target, mov.name());
        debug!(source, target, mov = mov.name(), "interaction");
        Some(mov.name().to_string())
    }

    /// The player says `message` (or just approaches) to `npc`.
    ///
    /// The NPC's current mood is passed to the backend. Never fails.
    pub async fn talk(&self, npc: &str, message: Option<&str>) -> String {
        let emotions = self.emotions.get_emotions(npc);
        self.conversations
            .get_dialogue_with_emotions(npc, &self.player, message, &emotions)
            .await
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    /// Emotion snapshot for `actor`; empty if the actor is not tracked.
    #[must_use]
    pub fn emotions(&self, actor: &str) -> BTreeMap<Emotion, f32> {
        self.emotions.get_emotions(actor)
    }

    /// Strongest emotion `actor` feels, if any.
    #[must_use]
    pub fn dominant_emotion(&self, actor: &str) -> Option<Emotion> {
        self.emotions.state(actor).and_then(|s| s.dominant())
    }

    /// Current value of `attribute` for `actor`.
    #[must_use]
    pub fn attribute(&self, attribute: &str, actor: &str) -> f32 {
        self.social.get(attribute, actor)
    }

    /// Recent environment events, oldest first.
    pub fn recent_events(&self) -> impl ExactSizeIterator<Item = &EnvironmentEvent> {
        self.events.recent_events()
    }

    /// Lines currently in the notification feed.
    #[must_use]
    pub fn notifications(&self) -> Vec<String> {
        self.feed.snapshot()
    }

    /// The player's name.
    #[must_use]
    pub fn player(&self) -> &str {
        &self.player
    }

    /// NPC names in roster order.
    #[must_use]
    pub fn npcs(&self) -> &[String] {
        &self.npcs
    }

    /// The social network.
    #[must_use]
    pub fn social(&self) -> &SocialNetwork<StdRng> {
        &self.social
    }

    /// Offline greeting and options for `npc`.
    #[must_use]
    pub fn offline_greeting(&self, npc: &str) -> (String, Vec<String>) {
        self.dialogue.start_conversation(npc)
    }

    /// Offline response to option `index` for `npc`.
    #[must_use]
    pub fn offline_reply(&self, npc: &str, index: usize) -> String {
        self.dialogue.reply(npc, index)
    }
}
