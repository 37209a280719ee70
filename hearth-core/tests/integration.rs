//! Integration tests: the three engines working together the way a game
//! loop drives them, plus the SQLite memory sink.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;

use hearth_core::config::HearthConfig;
use hearth_core::emotion::EmotionEngine;
use hearth_core::events::EventManager;
use hearth_core::persistence::{MemoryStore, StoreSink};
use hearth_core::social::SocialNetwork;
use hearth_core::social::moves::{HELP, INSULT};
use hearth_core::types::{Emotion, EnvironmentEvent, FEAR, FRIENDSHIP, RESPECT};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

// ---------------------------------------------------------------------------
// Social scenarios
// ---------------------------------------------------------------------------

#[test]
fn help_becomes_valid_once_friendship_passes_threshold() {
    let mut net = SocialNetwork::with_rng(["A", "B"], StdRng::seed_from_u64(1));
    assert!(approx(net.get(FRIENDSHIP, "B"), 0.0));
    let names = |net: &SocialNetwork| {
        net.get_valid_moves("A", "B")
            .iter()
            .map(|m| m.name().to_string())
            .collect::<Vec<_>>()
    };
    assert!(!names(&net).iter().any(|n| n == HELP));
    net.adjust(FRIENDSHIP, "B", 0.3);
    assert!(names(&net).iter().any(|n| n == HELP));
}

#[test]
fn insult_on_a_disliked_target() {
    let mut net = SocialNetwork::with_rng(["A", "B"], StdRng::seed_from_u64(1));
    net.adjust(FRIENDSHIP, "B", -0.5);
    let insult = net
        .get_valid_moves("A", "B")
        .into_iter()
        .find(|m| m.name() == INSULT)
        .cloned()
        .expect("insult valid below zero friendship");
    net.execute_move(Some(&insult), "A", "B");
    assert!(approx(net.get(RESPECT, "B"), -0.4));
    assert!(approx(net.get(FEAR, "B"), 0.3));

    // Repeating saturates at the bounds instead of overflowing.
    for _ in 0..5 {
        net.execute_move(Some(&insult), "A", "B");
    }
    assert!(approx(net.get(RESPECT, "B"), -1.0));
    assert!(approx(net.get(FEAR, "B"), 1.0));
}

// ---------------------------------------------------------------------------
// Emotion scenarios
// ---------------------------------------------------------------------------

#[test]
fn repeated_storms_clamp_fear() {
    let mut emotions = EmotionEngine::new(["Carlos"]);
    let expected = [0.3, 0.6, 0.9, 1.0, 1.0];
    for want in expected {
        emotions.handle_event("Carlos", "A storm is coming");
        assert!(approx(emotions.get("Carlos", Emotion::Fear), want));
    }
}

#[test]
fn social_move_drives_target_emotions() {
    let mut net = SocialNetwork::with_rng(["Carlos", "Lina"], StdRng::seed_from_u64(8));
    let mut emotions = EmotionEngine::new(net.actors());
    for _ in 0..10 {
        if let Some(mov) = net.interact("Carlos", "Lina") {
            emotions.handle_social_move("Lina", mov.name());
        }
    }
    let snapshot = emotions.get_emotions("Lina");
    assert_eq!(snapshot.len(), 3);
    assert!(snapshot.values().all(|v| (0.0..=1.0).contains(v)));
    assert!(snapshot.values().any(|v| *v > 0.0));
}

// ---------------------------------------------------------------------------
// Event scenarios
// ---------------------------------------------------------------------------

#[test]
fn festival_every_ten_seconds() {
    let saved = Arc::new(Mutex::new(Vec::<(String, String)>::new()));
    let notes = Arc::new(Mutex::new(Vec::<String>::new()));
    let (s, n) = (Arc::clone(&saved), Arc::clone(&notes));
    let mut events = EventManager::with_rng(
        vec![EnvironmentEvent::new("festival", "town fair")],
        move |a: &str, t: &str| s.lock().push((a.into(), t.into())),
        move |m: &str| n.lock().push(m.into()),
        StdRng::seed_from_u64(0),
    )
    .expect("catalog")
    .with_interval(10.0)
    .with_history_size(2);
    let mut emotions = EmotionEngine::new(["Carlos"]);

    for _ in 0..3 {
        assert!(events.update(10.0, &mut emotions));
    }

    assert_eq!(events.recent_events().len(), 2);
    assert_eq!(notes.lock().len(), 3);
    assert_eq!(saved.lock().len(), 3);
    assert!(notes.lock().iter().all(|m| m == "[EVENT] festival -> town fair"));
}

#[test]
fn small_steps_below_interval_stay_silent() {
    let fired = Arc::new(Mutex::new(0_u32));
    let f = Arc::clone(&fired);
    let mut events = EventManager::with_rng(
        vec![EnvironmentEvent::new("fog", "grey")],
        |_: &str, _: &str| {},
        move |_: &str| *f.lock() += 1,
        StdRng::seed_from_u64(0),
    )
    .expect("catalog")
    .with_interval(10.0);
    let mut emotions = EmotionEngine::new(["Carlos"]);
    for dt in [0.5, 2.0, 3.25, 4.0] {
        assert!(!events.update(dt, &mut emotions));
    }
    assert_eq!(*fired.lock(), 0);
    assert!(approx(emotions.get("Carlos", Emotion::Fear), 0.0));
}

// ---------------------------------------------------------------------------
// Config + store end-to-end
// ---------------------------------------------------------------------------

#[test]
fn configured_events_reach_the_memory_store() {
    let config = HearthConfig::from_toml(
        r#"
        [general]
        player_name = "Ayla"

        [events]
        interval_seconds = 1.0
        catalog = [{ name = "rain", description = "cold drizzle" }]
        "#,
    )
    .expect("config");

    let dir = tempfile::tempdir().expect("tempdir");
    let store = MemoryStore::open(dir.path().join("mem.db"), &config.persistence)
        .expect("open")
        .into_shared();
    let sink = StoreSink::new(Arc::clone(&store), config.general.player_name.clone());
    let mut events =
        EventManager::from_config(&config.events, sink, |_: &str| {}, StdRng::seed_from_u64(4))
            .expect("catalog");
    let mut emotions = EmotionEngine::new(config.npc_names());

    events.update(1.5, &mut emotions);

    let guard = store.lock();
    for npc in config.npc_names() {
        assert_eq!(
            guard.load(npc, "Ayla").expect("load"),
            ["[EVENT] rain -> cold drizzle"]
        );
        assert!(approx(emotions.get(npc, Emotion::Fear), 0.3));
    }
}
