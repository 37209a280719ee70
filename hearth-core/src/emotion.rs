//! Primary emotions — "How I feel right now".
//!
//! Each actor carries a joy / anger / fear vector bounded to `[0, 1]`.
//! Environment events and social moves nudge it through two rule tables:
//!
//! | Trigger                      | Effect                    |
//! |------------------------------|---------------------------|
//! | event mentions storm / rain  | fear  +0.3                |
//! | event mentions fog           | fear  +0.2                |
//! | event mentions festival      | joy   +0.4                |
//! | move `help`                  | joy   +0.3                |
//! | move `insult`                | anger +0.4, fear +0.1     |
//! | move `gossip`                | anger +0.2                |
//! | move `praise`                | joy   +0.2                |
//!
//! Event rules are first-match-wins in table order. Extra rules may be
//! appended but never reorder the built-in ones.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::social::moves::{GOSSIP, HELP, INSULT, PRAISE};
use crate::types::Emotion;

/// Lower bound of every emotion.
pub const EMOTION_MIN: f32 = 0.0;
/// Upper bound of every emotion.
pub const EMOTION_MAX: f32 = 1.0;

// ---------------------------------------------------------------------------
// EmotionState
// ---------------------------------------------------------------------------

/// One actor's primary-emotion vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionState {
    /// Joy in `[0, 1]`.
    pub joy: f32,
    /// Anger in `[0, 1]`.
    pub anger: f32,
    /// Fear in `[0, 1]`.
    pub fear: f32,
}

impl EmotionState {
    /// Read one emotion.
    #[must_use]
    pub fn get(&self, emotion: Emotion) -> f32 {
        match emotion {
            Emotion::Joy => self.joy,
            Emotion::Anger => self.anger,
            Emotion::Fear => self.fear,
        }
    }

    /// Shift one emotion by `amount`, clamped to `[0, 1]`.
    pub fn adjust(&mut self, emotion: Emotion, amount: f32) {
        let slot = match emotion {
            Emotion::Joy => &mut self.joy,
            Emotion::Anger => &mut self.anger,
            Emotion::Fear => &mut self.fear,
        };
        *slot = (*slot + amount).clamp(EMOTION_MIN, EMOTION_MAX);
    }

    /// The strongest emotion, or `None` when everything is at zero.
    #[must_use]
    pub fn dominant(&self) -> Option<Emotion> {
        Emotion::ALL
            .into_iter()
            .filter(|e| self.get(*e) > 0.0)
            .max_by(|a, b| self.get(*a).total_cmp(&self.get(*b)))
    }

    fn to_map(self) -> BTreeMap<Emotion, f32> {
        Emotion::ALL.into_iter().map(|e| (e, self.get(e))).collect()
    }
}

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

/// Environment rule: if the event text contains any keyword, shift an emotion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRule {
    /// Lowercase substrings to look for.
    pub keywords: Vec<String>,
    /// Emotion to shift.
    pub emotion: Emotion,
    /// Signed change.
    pub amount: f32,
}

impl EventRule {
    /// Create a rule. Keywords are lowercased.
    #[must_use]
    pub fn new(keywords: &[&str], emotion: Emotion, amount: f32) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            emotion,
            amount,
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.to_lowercase().as_str()))
    }
}

/// The built-in environment rules, in match order.
#[must_use]
pub fn builtin_event_rules() -> Vec<EventRule> {
    vec![
        EventRule::new(&["storm", "rain"], Emotion::Fear, 0.3),
        EventRule::new(&["fog"], Emotion::Fear, 0.2),
        EventRule::new(&["festival"], Emotion::Joy, 0.4),
    ]
}

/// Emotional reaction to being on the receiving end of a social move.
fn move_reaction(move_name: &str) -> &'static [(Emotion, f32)] {
    match move_name.to_lowercase().as_str() {
        HELP => &[(Emotion::Joy, 0.3)],
        INSULT => &[(Emotion::Anger, 0.4), (Emotion::Fear, 0.1)],
        GOSSIP => &[(Emotion::Anger, 0.2)],
        PRAISE => &[(Emotion::Joy, 0.2)],
        _ => &[],
    }
}

// ---------------------------------------------------------------------------
// EmotionEngine
// ---------------------------------------------------------------------------

/// Per-actor primary emotions for a fixed roster.
#[derive(Debug, Clone)]
pub struct EmotionEngine {
    emotions: BTreeMap<String, EmotionState>,
    event_rules: Vec<EventRule>,
}

impl EmotionEngine {
    /// Track `actors`, all starting at zero, with the built-in rules.
    #[must_use]
    pub fn new<I, S>(actors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_extra_rules(actors, Vec::new())
    }

    /// Like [`EmotionEngine::new`], with `extra` rules consulted after the
    /// built-in ones.
    #[must_use]
    pub fn with_extra_rules<I, S>(actors: I, extra: Vec<EventRule>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut event_rules = builtin_event_rules();
        event_rules.extend(extra);
        Self {
            emotions: actors
                .into_iter()
                .map(|a| (a.into(), EmotionState::default()))
                .collect(),
            event_rules,
        }
    }

    /// Tracked actors, sorted.
    pub fn actors(&self) -> impl Iterator<Item = &str> {
        self.emotions.keys().map(String::as_str)
    }

    /// Whether `actor` is tracked.
    #[must_use]
    pub fn contains_actor(&self, actor: &str) -> bool {
        self.emotions.contains_key(actor)
    }

    /// Shift one emotion. Unknown actors are ignored.
    pub fn adjust(&mut self, actor: &str, emotion: Emotion, amount: f32) {
        if let Some(state) = self.emotions.get_mut(actor) {
            state.adjust(emotion, amount);
        }
    }

    /// React to an environment event by its text.
    pub fn handle_event(&mut self, actor: &str, event_text: &str) {
        let Some(state) = self.emotions.get_mut(actor) else {
            return;
        };
        if let Some(rule) = Self::match_rule(&self.event_rules, event_text) {
            state.adjust(rule.emotion, rule.amount);
            debug!(actor, event = event_text, emotion = %rule.emotion, "event rule matched");
        }
    }

    /// Apply [`EmotionEngine::handle_event`] to every tracked actor.
    pub fn broadcast_event(&mut self, event_text: &str) {
        let Some(rule) = Self::match_rule(&self.event_rules, event_text) else {
            return;
        };
        for state in self.emotions.values_mut() {
            state.adjust(rule.emotion, rule.amount);
        }
        debug!(
            event = event_text,
            emotion = %rule.emotion,
            actors = self.emotions.len(),
            "event rule broadcast"
        );
    }

    /// React to a social move aimed at `actor`. Unknown moves are ignored.
    pub fn handle_social_move(&mut self, actor: &str, move_name: &str) {
        let Some(state) = self.emotions.get_mut(actor) else {
            return;
        };
        for &(emotion, amount) in move_reaction(move_name) {
            state.adjust(emotion, amount);
        }
    }

    /// Current level of one emotion; `0.0` for unknown actors.
    #[must_use]
    pub fn get(&self, actor: &str, emotion: Emotion) -> f32 {
        self.emotions.get(actor).map_or(0.0, |s| s.get(emotion))
    }

    /// Snapshot of an actor's full vector; empty for unknown actors.
    #[must_use]
    pub fn get_emotions(&self, actor: &str) -> BTreeMap<Emotion, f32> {
        self.emotions
            .get(actor)
            .map(|s| s.to_map())
            .unwrap_or_default()
    }

    /// Copy of an actor's state, if tracked.
    #[must_use]
    pub fn state(&self, actor: &str) -> Option<EmotionState> {
        self.emotions.get(actor).copied()
    }

    fn match_rule<'a>(rules: &'a [EventRule], event_text: &str) -> Option<&'a EventRule> {
        let lowered = event_text.to_lowercase();
        rules.iter().find(|r| r.matches(&lowered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> EmotionEngine {
        EmotionEngine::new(["Carlos", "Lina"])
    }

    #[test]
    fn storm_stacks_fear_until_clamped() {
        let mut e = engine();
        e.handle_event("Carlos", "A storm is coming");
        assert!((e.get("Carlos", Emotion::Fear) - 0.3).abs() < 1e-6);
        e.handle_event("Carlos", "A storm is coming");
        assert!((e.get("Carlos", Emotion::Fear) - 0.6).abs() < 1e-6);
        e.handle_event("Carlos", "A storm is coming");
        assert!((e.get("Carlos", Emotion::Fear) - 0.9).abs() < 1e-5);
        e.handle_event("Carlos", "A storm is coming");
        assert!((e.get("Carlos", Emotion::Fear) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn first_matching_rule_wins() {
        let mut e = engine();
        // Mentions both rain and festival: only the rain rule fires.
        e.handle_event("Lina", "Rain at the FESTIVAL");
        assert!((e.get("Lina", Emotion::Fear) - 0.3).abs() < 1e-6);
        assert!(e.get("Lina", Emotion::Joy).abs() < 1e-6);
    }

    #[test]
    fn fog_and_festival_rules() {
        let mut e = engine();
        e.handle_event("Carlos", "Thick Fog");
        e.handle_event("Lina", "harvest festival");
        assert!((e.get("Carlos", Emotion::Fear) - 0.2).abs() < 1e-6);
        assert!((e.get("Lina", Emotion::Joy) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn unmatched_event_changes_nothing() {
        let mut e = engine();
        e.handle_event("Carlos", "a merchant arrives");
        assert_eq!(e.state("Carlos"), Some(EmotionState::default()));
    }

    #[test]
    fn extra_rules_run_after_builtins() {
        let mut e = EmotionEngine::with_extra_rules(
            ["Carlos"],
            vec![EventRule::new(&["storm", "wolves"], Emotion::Anger, 0.5)],
        );
        e.handle_event("Carlos", "storm");
        assert!(e.get("Carlos", Emotion::Anger).abs() < 1e-6);
        e.handle_event("Carlos", "wolves howl");
        assert!((e.get("Carlos", Emotion::Anger) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn social_move_table() {
        let mut e = engine();
        e.handle_social_move("Carlos", "INSULT");
        assert!((e.get("Carlos", Emotion::Anger) - 0.4).abs() < 1e-6);
        assert!((e.get("Carlos", Emotion::Fear) - 0.1).abs() < 1e-6);

        e.handle_social_move("Lina", "help");
        e.handle_social_move("Lina", "praise");
        assert!((e.get("Lina", Emotion::Joy) - 0.5).abs() < 1e-6);

        e.handle_social_move("Lina", "gossip");
        assert!((e.get("Lina", Emotion::Anger) - 0.2).abs() < 1e-6);

        let before = e.state("Lina");
        e.handle_social_move("Lina", "dance");
        assert_eq!(e.state("Lina"), before);
    }

    #[test]
    fn unknown_actor_is_forgiving() {
        let mut e = engine();
        e.adjust("Ghost", Emotion::Joy, 0.5);
        e.handle_event("Ghost", "storm");
        e.handle_social_move("Ghost", "help");
        assert!(e.get("Ghost", Emotion::Joy).abs() < f32::EPSILON);
        assert!(e.get_emotions("Ghost").is_empty());
        assert!(!e.contains_actor("Ghost"));
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut e = engine();
        e.adjust("Carlos", Emotion::Joy, 0.7);
        let snap = e.get_emotions("Carlos");
        e.adjust("Carlos", Emotion::Joy, -0.7);
        assert_eq!(snap.len(), 3);
        assert!((snap[&Emotion::Joy] - 0.7).abs() < 1e-6);
    }

    #[test]
    fn broadcast_matches_per_actor_handling() {
        let mut a = engine();
        let mut b = engine();
        a.broadcast_event("storm");
        for actor in ["Carlos", "Lina"] {
            b.handle_event(actor, "storm");
        }
        for actor in ["Carlos", "Lina"] {
            assert_eq!(a.state(actor), b.state(actor));
        }
    }

    #[test]
    fn dominant_emotion() {
        let mut state = EmotionState::default();
        assert_eq!(state.dominant(), None);
        state.adjust(Emotion::Anger, 0.4);
        state.adjust(Emotion::Joy, 0.2);
        assert_eq!(state.dominant(), Some(Emotion::Anger));
    }
}
