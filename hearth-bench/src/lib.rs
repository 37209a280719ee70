//! Shared fixtures for the Hearth benchmarks.

use hearth_core::emotion::EmotionEngine;
use hearth_core::events::EventManager;
use hearth_core::social::SocialNetwork;
use hearth_core::types::{EnvironmentEvent, FRIENDSHIP};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// `npc_0` .. `npc_{n-1}`.
#[must_use]
pub fn npc_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("npc_{i}")).collect()
}

/// A seeded network of `n` NPCs with friendships spread across the range,
/// so every move's precondition is hit by some pair.
#[must_use]
pub fn village(n: usize) -> SocialNetwork {
    let names = npc_names(n);
    let mut net = SocialNetwork::with_rng(&names, StdRng::seed_from_u64(7));
    for (i, name) in names.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let spread = (i as f32 / n.max(1) as f32) * 2.0 - 1.0;
        net.set(FRIENDSHIP, name, spread);
    }
    net
}

/// An event manager over the five demo events that discards its output.
#[must_use]
pub fn silent_events(interval: f32) -> EventManager {
    let catalog = vec![
        EnvironmentEvent::new("storm", "dark clouds"),
        EnvironmentEvent::new("rain", "drizzle"),
        EnvironmentEvent::new("fog", "grey morning"),
        EnvironmentEvent::new("festival", "town fair"),
        EnvironmentEvent::new("market day", "stalls everywhere"),
    ];
    EventManager::with_rng(catalog, |_: &str, _: &str| {}, |_: &str| {}, StdRng::seed_from_u64(3))
        .expect("non-empty catalog")
        .with_interval(interval)
}

/// Emotion engine tracking `npc_names(n)`.
#[must_use]
pub fn moods(n: usize) -> EmotionEngine {
    EmotionEngine::new(npc_names(n))
}
