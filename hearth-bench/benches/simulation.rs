//! Hearth Benchmark Suite
//!
//! Frame-budget targets for a village-sized simulation:
//!   valid_moves_single_pair .......... < 2μs
//!   decide_and_execute_single ........ < 5μs
//!   emotion_event_broadcast_50 ....... < 20μs
//!   event_tick_50_npcs ............... < 50μs
//!   full_frame_20_npcs ............... < 100μs

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use hearth_bench::{moods, npc_names, silent_events, village};
use hearth_core::config::HearthConfig;
use hearth_core::persistence::MemoryStore;
use hearth_game::GameSession;
use hearth_llm::LlmClient;

/// Benchmark: precondition evaluation for one pair.
fn bench_valid_moves(c: &mut Criterion) {
    let net = village(20);
    c.bench_function("valid_moves_single_pair", |b| {
        b.iter(|| black_box(net.get_valid_moves(black_box("npc_3"), black_box("npc_17")).len()));
    });
}

/// Benchmark: random selection plus effect application.
fn bench_decide_execute(c: &mut Criterion) {
    let mut net = village(20);
    c.bench_function("decide_and_execute_single", |b| {
        b.iter(|| black_box(net.interact(black_box("npc_3"), black_box("npc_17"))));
    });
}

/// Benchmark: one environment line through the rule table for 50 NPCs.
fn bench_emotion_broadcast(c: &mut Criterion) {
    let mut engine = moods(50);
    c.bench_function("emotion_event_broadcast_50", |b| {
        b.iter(|| engine.broadcast_event(black_box("A storm is coming")));
    });
}

/// Benchmark: an event firing every frame across 50 NPCs.
fn bench_event_tick(c: &mut Criterion) {
    let mut events = silent_events(0.1);
    let mut engine = moods(50);
    c.bench_function("event_tick_50_npcs", |b| {
        b.iter(|| black_box(events.update(black_box(0.1), &mut engine)));
    });
}

/// Benchmark: a whole session frame with 20 NPCs interacting pairwise.
fn bench_full_frame(c: &mut Criterion) {
    let mut config = HearthConfig::default();
    config.general.seed = Some(1);
    config.npcs = npc_names(20)
        .into_iter()
        .map(hearth_core::config::NpcConfig::named)
        .collect();
    let store = MemoryStore::open_in_memory().expect("store").into_shared();
    let mut session = GameSession::new(&config, store, LlmClient::none()).expect("session");
    let names = npc_names(20);

    c.bench_function("full_frame_20_npcs", |b| {
        b.iter(|| {
            session.tick(black_box(1.0 / 60.0));
            for pair in names.chunks_exact(2) {
                black_box(session.interact(&pair[0], &pair[1]));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_valid_moves,
    bench_decide_execute,
    bench_emotion_broadcast,
    bench_event_tick,
    bench_full_frame,
);
criterion_main!(benches);
