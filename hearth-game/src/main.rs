//! `hearth-sim` — run a Hearth village headless and print how everyone ends up.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use hearth_core::config::HearthConfig;
use hearth_core::persistence::MemoryStore;
use hearth_core::types::{Emotion, FEAR, FRIENDSHIP, RESPECT};
use hearth_game::GameSession;
use hearth_llm::{DialogueTrees, LlmClient};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing_subscriber::EnvFilter;

/// Command line arguments for the simulation.
#[derive(Parser, Debug)]
#[command(name = "hearth-sim")]
#[command(about = "Run a Hearth village without a screen")]
struct Args {
    /// Path to hearth.toml. Built-in village when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Seconds per frame.
    #[arg(long, default_value_t = 0.5)]
    dt: f32,

    /// Random seed for reproducibility. Overrides the config.
    #[arg(long)]
    seed: Option<u64>,

    /// Keep memories in RAM instead of the configured database file.
    #[arg(long)]
    in_memory: bool,

    /// Offline dialogue trees (TOML) to greet with at the end.
    #[arg(long)]
    dialogue: Option<PathBuf>,

    /// Say this to every NPC after the run and print the replies.
    #[arg(long)]
    say: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => HearthConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => HearthConfig::default(),
    };
    if args.seed.is_some() {
        config.general.seed = args.seed;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
        )
        .init();

    let store = if args.in_memory {
        MemoryStore::open_in_memory()?
    } else {
        MemoryStore::from_config(&config.persistence)
            .with_context(|| format!("opening {}", config.persistence.database_path))?
    }
    .into_shared();

    let backend = LlmClient::from_config(&config.llm)?;
    let mut session = GameSession::new(&config, store, backend)?;
    if let Some(path) = &args.dialogue {
        session = session.with_dialogue_trees(DialogueTrees::from_file(path)?);
    }

    let mut rng = match config.general.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    };
    let npcs: Vec<String> = session.npcs().to_vec();

    println!("Hearth village: {} NPCs, {} frames of {}s", npcs.len(), args.ticks, args.dt);
    println!();

    for frame in 0..args.ticks {
        if session.tick(args.dt) {
            if let Some(line) = session.notifications().last() {
                println!("[frame {frame:>5}] {line}");
            }
        }
        let pair: Vec<&String> = npcs.choose_multiple(&mut rng, 2).collect();
        if let [source, target] = pair.as_slice() {
            if let Some(mov) = session.interact(source, target) {
                tracing::debug!(frame, source = %source, target = %target, mov = %mov, "frame interaction");
            }
        }
    }

    println!();
    println!(
        "{:<10} {:>10} {:>8} {:>6} | {:>5} {:>6} {:>5}  mood",
        "npc", FRIENDSHIP, RESPECT, FEAR, "joy", "anger", "fear"
    );
    for npc in &npcs {
        let emotions = session.emotions(npc);
        let mood = session
            .dominant_emotion(npc)
            .map_or("calm", Emotion::as_str);
        println!(
            "{:<10} {:>10.2} {:>8.2} {:>6.2} | {:>5.2} {:>6.2} {:>5.2}  {mood}",
            npc,
            session.attribute(FRIENDSHIP, npc),
            session.attribute(RESPECT, npc),
            session.attribute(FEAR, npc),
            emotions.get(&Emotion::Joy).copied().unwrap_or_default(),
            emotions.get(&Emotion::Anger).copied().unwrap_or_default(),
            emotions.get(&Emotion::Fear).copied().unwrap_or_default(),
        );
    }

    let recent: Vec<&str> = session.recent_events().map(|e| e.name.as_str()).collect();
    println!();
    println!("recent events: {}", if recent.is_empty() { "none".to_string() } else { recent.join(", ") });

    if args.dialogue.is_some() {
        println!();
        for npc in &npcs {
            let (greeting, options) = session.offline_greeting(npc);
            println!("{npc}: {greeting}  [{}]", options.join(" | "));
        }
    }

    if let Some(message) = &args.say {
        println!();
        for npc in &npcs {
            let reply = session.talk(npc, Some(message)).await;
            println!("{} -> {npc}: {message}", session.player());
            println!("{npc}: {reply}");
        }
    }

    Ok(())
}
