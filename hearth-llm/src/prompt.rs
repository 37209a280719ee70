//! Prompt templates for NPC conversations.
//!
//! The system prompt names the NPC and replays its stored memories of the
//! player, one `- {memory}` line each. When the caller has an emotion
//! snapshot it is appended so the model can colour the reply.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use hearth_core::types::Emotion;

/// System prompt for a memory-aware NPC reply.
pub const CONVERSATION_SYSTEM: &str =
    "You are **{npc_name}**. Remember these lines from your memory:\n{memories}";

/// Appended when an emotion snapshot is available.
pub const EMOTION_SUFFIX: &str = "\nRight now you feel: {emotions}. Let it show in how you answer.";

/// Simple template interpolation for prompts.
///
/// Replaces `{key}` with the corresponding value.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

/// Memories as bullet lines, oldest first.
#[must_use]
pub fn memory_lines(memories: &[String]) -> String {
    memories
        .iter()
        .map(|m| format!("- {m}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `joy 0.30, anger 0.00, fear 0.60`
#[must_use]
pub fn describe_emotions(emotions: &BTreeMap<Emotion, f32>) -> String {
    let mut out = String::new();
    for (i, (emotion, value)) in emotions.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{emotion} {value:.2}");
    }
    out
}

/// Build the system prompt for `npc`.
#[must_use]
pub fn conversation_system_prompt(
    npc: &str,
    memories: &[String],
    emotions: Option<&BTreeMap<Emotion, f32>>,
) -> String {
    let lines = memory_lines(memories);
    let mut prompt = render_template(
        CONVERSATION_SYSTEM,
        &[("npc_name", npc), ("memories", &lines)],
    );
    if let Some(emotions) = emotions.filter(|e| !e.is_empty()) {
        prompt.push_str(&render_template(
            EMOTION_SUFFIX,
            &[("emotions", &describe_emotions(emotions))],
        ));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_rendering_works() {
        let rendered = render_template(
            "Hello {name}, you are a {role}.",
            &[("name", "Carlos"), ("role", "baker")],
        );
        assert_eq!(rendered, "Hello Carlos, you are a baker.");
    }

    #[test]
    fn template_handles_missing_vars() {
        let rendered = render_template("Hello {name}, {unknown}.", &[("name", "Lina")]);
        assert_eq!(rendered, "Hello Lina, {unknown}.");
    }

    #[test]
    fn system_prompt_lists_memories() {
        let memories = vec!["Player: hi".to_string(), "Eldar: well met".to_string()];
        let prompt = conversation_system_prompt("Eldar", &memories, None);
        assert_eq!(
            prompt,
            "You are **Eldar**. Remember these lines from your memory:\n- Player: hi\n- Eldar: well met"
        );
    }

    #[test]
    fn emotions_are_appended_when_present() {
        let emotions = BTreeMap::from([(Emotion::Joy, 0.3), (Emotion::Fear, 0.6)]);
        let prompt = conversation_system_prompt("Lina", &[], Some(&emotions));
        assert!(prompt.contains("joy 0.30, fear 0.60"));

        let empty = BTreeMap::new();
        let plain = conversation_system_prompt("Lina", &[], Some(&empty));
        assert!(!plain.contains("Right now"));
    }
}
