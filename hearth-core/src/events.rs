//! Timed environment events — storms, fog, festivals.
//!
//! The [`EventManager`] accumulates elapsed time. Once the timer reaches the
//! configured interval it fires exactly one randomly chosen event:
//!
//! 1. every actor tracked by the [`EmotionEngine`] reacts to the event name;
//! 2. the notifier receives `"[EVENT] {name} -> {description}"` once;
//! 3. the memory sink receives that same line once per tracked actor;
//! 4. the event is pushed onto a bounded FIFO history.
//!
//! The timer then resets to zero. Time beyond the interval is dropped, not
//! carried into the next cycle, so one long frame never fires twice.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::config::EventsConfig;
use crate::emotion::EmotionEngine;
use crate::error::{HearthError, Result};
use crate::types::EnvironmentEvent;

/// Default seconds between two environment events.
pub const DEFAULT_INTERVAL: f32 = 15.0;
/// Default number of recent events remembered.
pub const DEFAULT_HISTORY_SIZE: usize = 5;

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Fire-and-forget persistence of a memory line for one actor.
pub trait MemorySink: Send {
    /// Record `text` for `actor`. Failures are the sink's own business.
    fn save(&mut self, actor: &str, text: &str);
}

impl<F> MemorySink for F
where
    F: FnMut(&str, &str) + Send,
{
    fn save(&mut self, actor: &str, text: &str) {
        self(actor, text);
    }
}

/// Receives one notification line per triggered event.
pub trait Notifier: Send {
    /// Announce `message` to the game.
    fn notify(&mut self, message: &str);
}

impl<F> Notifier for F
where
    F: FnMut(&str) + Send,
{
    fn notify(&mut self, message: &str) {
        self(message);
    }
}

// ---------------------------------------------------------------------------
// EventManager
// ---------------------------------------------------------------------------

/// Timer-driven scheduler of random environment events.
pub struct EventManager<R = StdRng> {
    catalog: Vec<EnvironmentEvent>,
    interval: f32,
    timer: f32,
    history: VecDeque<EnvironmentEvent>,
    history_size: usize,
    memory: Box<dyn MemorySink>,
    notifier: Box<dyn Notifier>,
    rng: R,
}

impl<R> std::fmt::Debug for EventManager<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("catalog", &self.catalog.len())
            .field("interval", &self.interval)
            .field("timer", &self.timer)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

impl EventManager<StdRng> {
    /// Create a manager with default timing and an entropy-seeded RNG.
    ///
    /// # Errors
    /// Returns [`HearthError::EmptyEventCatalog`] if `catalog` is empty.
    pub fn new(
        catalog: Vec<EnvironmentEvent>,
        memory: impl MemorySink + 'static,
        notifier: impl Notifier + 'static,
    ) -> Result<Self> {
        Self::with_rng(catalog, memory, notifier, StdRng::from_entropy())
    }
}

impl<R: Rng> EventManager<R> {
    /// Create a manager with default timing and the given RNG.
    ///
    /// # Errors
    /// Returns [`HearthError::EmptyEventCatalog`] if `catalog` is empty.
    pub fn with_rng(
        catalog: Vec<EnvironmentEvent>,
        memory: impl MemorySink + 'static,
        notifier: impl Notifier + 'static,
        rng: R,
    ) -> Result<Self> {
        if catalog.is_empty() {
            return Err(HearthError::EmptyEventCatalog);
        }
        Ok(Self {
            catalog,
            interval: DEFAULT_INTERVAL,
            timer: 0.0,
            history: VecDeque::with_capacity(DEFAULT_HISTORY_SIZE + 1),
            history_size: DEFAULT_HISTORY_SIZE,
            memory: Box::new(memory),
            notifier: Box::new(notifier),
            rng,
        })
    }

    /// Create a manager from the `[events]` config section.
    ///
    /// # Errors
    /// Returns [`HearthError::EmptyEventCatalog`] if the configured catalog is empty.
    pub fn from_config(
        config: &EventsConfig,
        memory: impl MemorySink + 'static,
        notifier: impl Notifier + 'static,
        rng: R,
    ) -> Result<Self> {
        Ok(Self::with_rng(config.catalog.clone(), memory, notifier, rng)?
            .with_interval(config.interval_seconds)
            .with_history_size(config.history_size))
    }

    /// Set the trigger interval in seconds.
    ///
    /// The interval must be positive. NaN, zero or negative values are
    /// ignored and the current interval is kept.
    #[must_use]
    pub fn with_interval(mut self, interval: f32) -> Self {
        if interval.is_nan() || interval <= 0.0 {
            warn!(interval, kept = self.interval, "ignoring invalid event interval");
            return self;
        }
        self.interval = interval;
        self
    }

    /// Set the number of recent events kept. Shrinking evicts oldest first.
    #[must_use]
    pub fn with_history_size(mut self, history_size: usize) -> Self {
        self.history_size = history_size;
        while self.history.len() > history_size {
            self.history.pop_front();
        }
        self
    }

    /// Advance the timer by `delta_time` seconds (must be non-negative).
    ///
    /// Returns `true` if an event fired during this call.
    pub fn update(&mut self, delta_time: f32, emotions: &mut EmotionEngine) -> bool {
        debug_assert!(delta_time >= 0.0, "delta_time must be non-negative");
        self.timer += delta_time;
        if self.timer < self.interval {
            return false;
        }
        self.trigger(emotions);
        true
    }

    /// Fire one random event immediately and reset the timer.
    pub fn trigger(&mut self, emotions: &mut EmotionEngine) -> EnvironmentEvent {
        // The constructor guarantees a non-empty catalog.
        let index = self.rng.gen_range(0..self.catalog.len());
        let event = self.catalog[index].clone();

        emotions.broadcast_event(&event.name);

        let message = event.notification();
        self.notifier.notify(&message);
        for actor in emotions.actors() {
            self.memory.save(actor, &message);
        }
        info!(event = %event.name, actors = emotions.actors().count(), "environment event");

        self.history.push_back(event.clone());
        while self.history.len() > self.history_size {
            self.history.pop_front();
        }

        self.timer = 0.0;
        event
    }

    /// Recent events, oldest first.
    pub fn recent_events(&self) -> impl ExactSizeIterator<Item = &EnvironmentEvent> {
        self.history.iter()
    }

    /// Seconds accumulated since the last event.
    #[must_use]
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Seconds between events.
    #[must_use]
    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Maximum number of remembered events.
    #[must_use]
    pub fn history_size(&self) -> usize {
        self.history_size
    }

    /// The configured catalog.
    #[must_use]
    pub fn catalog(&self) -> &[EnvironmentEvent] {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Emotion;
    use parking_lot::Mutex;
    use rand::rngs::mock::StepRng;
    use std::sync::Arc;

    type Log<T> = Arc<Mutex<Vec<T>>>;

    struct Harness {
        saved: Log<(String, String)>,
        notified: Log<String>,
    }

    fn manager(
        catalog: Vec<EnvironmentEvent>,
        interval: f32,
        history_size: usize,
    ) -> (EventManager<StdRng>, Harness) {
        let saved: Log<(String, String)> = Arc::default();
        let notified: Log<String> = Arc::default();
        let s = Arc::clone(&saved);
        let n = Arc::clone(&notified);
        let mgr = EventManager::with_rng(
            catalog,
            move |actor: &str, text: &str| s.lock().push((actor.to_string(), text.to_string())),
            move |msg: &str| n.lock().push(msg.to_string()),
            StdRng::seed_from_u64(3),
        )
        .expect("non-empty catalog")
        .with_interval(interval)
        .with_history_size(history_size);
        (mgr, Harness { saved, notified })
    }

    fn fair() -> Vec<EnvironmentEvent> {
        vec![EnvironmentEvent::new("festival", "town fair")]
    }

    #[test]
    fn three_triggers_keep_two_most_recent() {
        let (mut mgr, h) = manager(fair(), 10.0, 2);
        let mut emotions = EmotionEngine::new(["Carlos"]);
        for _ in 0..3 {
            assert!(mgr.update(10.0, &mut emotions));
        }
        assert_eq!(mgr.recent_events().len(), 2);
        let notified = h.notified.lock();
        assert_eq!(notified.len(), 3);
        assert!(notified.iter().all(|m| m == "[EVENT] festival -> town fair"));
        let saved = h.saved.lock();
        assert_eq!(saved.len(), 3);
        assert!(saved.iter().all(|(a, m)| a == "Carlos" && m == &notified[0]));
        // Three festivals: 0.4 * 3 clamps at 1.0.
        assert!((emotions.get("Carlos", Emotion::Joy) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn history_evicts_oldest_first() {
        let catalog = vec![
            EnvironmentEvent::new("storm", "dark clouds"),
            EnvironmentEvent::new("fog", "grey morning"),
            EnvironmentEvent::new("festival", "town fair"),
        ];
        let (mut mgr, _h) = manager(catalog, 1.0, 2);
        let mut emotions = EmotionEngine::new(["Lina"]);
        let fired: Vec<_> = (0..5).map(|_| mgr.trigger(&mut emotions)).collect();
        let kept: Vec<_> = mgr.recent_events().cloned().collect();
        assert_eq!(kept, fired[3..]);
    }

    #[test]
    fn shrinking_history_keeps_newest() {
        let catalog = vec![
            EnvironmentEvent::new("storm", "dark clouds"),
            EnvironmentEvent::new("fog", "grey morning"),
        ];
        let (mut mgr, _h) = manager(catalog, 1.0, 5);
        let mut emotions = EmotionEngine::new(["Lina"]);
        let fired: Vec<_> = (0..4).map(|_| mgr.trigger(&mut emotions)).collect();

        let mgr = mgr.with_history_size(1);
        let kept: Vec<_> = mgr.recent_events().cloned().collect();
        assert_eq!(kept, fired[3..]);
    }

    #[test]
    fn invalid_interval_is_ignored() {
        for bad in [f32::NAN, 0.0, -3.0] {
            let (mgr, _h) = manager(fair(), bad, 5);
            assert!((mgr.interval() - DEFAULT_INTERVAL).abs() < f32::EPSILON);

            let mut mgr = mgr;
            let mut emotions = EmotionEngine::new(["Carlos"]);
            assert!(!mgr.update(0.001, &mut emotions), "interval {bad} fired early");
        }
    }

    #[test]
    fn below_interval_never_fires() {
        let (mut mgr, h) = manager(fair(), 10.0, 5);
        let mut emotions = EmotionEngine::new(["Carlos"]);
        for _ in 0..9 {
            assert!(!mgr.update(1.0, &mut emotions));
        }
        assert!((mgr.timer() - 9.0).abs() < 1e-5);
        assert!(h.notified.lock().is_empty());
        assert!(h.saved.lock().is_empty());
        assert_eq!(mgr.recent_events().len(), 0);
    }

    #[test]
    fn overshoot_is_discarded() {
        let (mut mgr, h) = manager(fair(), 10.0, 5);
        let mut emotions = EmotionEngine::new(["Carlos"]);
        // 25 seconds in one frame fires once, not twice, and keeps nothing.
        assert!(mgr.update(25.0, &mut emotions));
        assert!(mgr.timer().abs() < f32::EPSILON);
        assert!(!mgr.update(9.0, &mut emotions));
        assert_eq!(h.notified.lock().len(), 1);
    }

    #[test]
    fn one_record_per_tracked_actor() {
        let (mut mgr, h) = manager(fair(), 1.0, 5);
        let mut emotions = EmotionEngine::new(["Carlos", "Eldar", "Lina"]);
        mgr.update(1.0, &mut emotions);
        let saved = h.saved.lock();
        let actors: Vec<_> = saved.iter().map(|(a, _)| a.as_str()).collect();
        assert_eq!(actors, ["Carlos", "Eldar", "Lina"]);
        assert_eq!(h.notified.lock().len(), 1);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let result = EventManager::new(Vec::new(), |_: &str, _: &str| {}, |_: &str| {});
        assert!(matches!(result, Err(HearthError::EmptyEventCatalog)));
    }

    #[test]
    fn zero_history_keeps_nothing() {
        let (mut mgr, _h) = manager(fair(), 1.0, 0);
        let mut emotions = EmotionEngine::new(["Carlos"]);
        mgr.trigger(&mut emotions);
        assert_eq!(mgr.recent_events().len(), 0);
    }

    #[test]
    fn scripted_rng_selects_first_event() {
        let catalog = vec![
            EnvironmentEvent::new("rain", "a light drizzle"),
            EnvironmentEvent::new("festival", "town fair"),
        ];
        let mut mgr = EventManager::with_rng(
            catalog,
            |_: &str, _: &str| {},
            |_: &str| {},
            StepRng::new(0, 0),
        )
        .expect("catalog");
        let mut emotions = EmotionEngine::new(["Carlos"]);
        assert_eq!(mgr.trigger(&mut emotions).name, "rain");
        assert!((emotions.get("Carlos", Emotion::Fear) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn from_config_applies_timing() {
        let config = EventsConfig {
            interval_seconds: 2.5,
            history_size: 1,
            catalog: fair(),
        };
        let mgr = EventManager::from_config(
            &config,
            |_: &str, _: &str| {},
            |_: &str| {},
            StdRng::seed_from_u64(0),
        )
        .expect("catalog");
        assert!((mgr.interval() - 2.5).abs() < f32::EPSILON);
        assert_eq!(mgr.history_size(), 1);
    }
}
