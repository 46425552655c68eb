use crate::core::state::Actor;
use crate::utils::names::find_best_match;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Neutral,
    Admiration,
    Amusement,
    Anger,
    Annoyance,
    Confusion,
    Desire,
    Disappointment,
    Disgust,
    Embarrassment,
    Excitement,
    Fear,
    Gratitude,
    Grief,
    Joy,
    Love,
    Pride,
    Sadness,
    Surprise,
}

impl Emotion {
    pub const ALL: [Emotion; 19] = [
        Emotion::Neutral,
        Emotion::Admiration,
        Emotion::Amusement,
        Emotion::Anger,
        Emotion::Annoyance,
        Emotion::Confusion,
        Emotion::Desire,
        Emotion::Disappointment,
        Emotion::Disgust,
        Emotion::Embarrassment,
        Emotion::Excitement,
        Emotion::Fear,
        Emotion::Gratitude,
        Emotion::Grief,
        Emotion::Joy,
        Emotion::Love,
        Emotion::Pride,
        Emotion::Sadness,
        Emotion::Surprise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Admiration => "admiration",
            Emotion::Amusement => "amusement",
            Emotion::Anger => "anger",
            Emotion::Annoyance => "annoyance",
            Emotion::Confusion => "confusion",
            Emotion::Desire => "desire",
            Emotion::Disappointment => "disappointment",
            Emotion::Disgust => "disgust",
            Emotion::Embarrassment => "embarrassment",
            Emotion::Excitement => "excitement",
            Emotion::Fear => "fear",
            Emotion::Gratitude => "gratitude",
            Emotion::Grief => "grief",
            Emotion::Joy => "joy",
            Emotion::Love => "love",
            Emotion::Pride => "pride",
            Emotion::Sadness => "sadness",
            Emotion::Surprise => "surprise",
        }
    }

    /// Maps a free-text emotion word onto the vocabulary: exact names first,
    /// then the synonym table.
    pub fn parse(phrase: &str) -> Option<Emotion> {
        let phrase = phrase.trim().to_lowercase();
        Emotion::ALL
            .iter()
            .copied()
            .find(|e| e.as_str() == phrase)
            .or_else(|| SYNONYMS.get(phrase.as_str()).copied())
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static SYNONYMS: LazyLock<HashMap<&'static str, Emotion>> = LazyLock::new(|| {
    use Emotion::*;
    HashMap::from([
        ("calm", Neutral),
        ("content", Neutral),
        ("indifferent", Neutral),
        ("impressed", Admiration),
        ("awed", Admiration),
        ("respectful", Admiration),
        ("amused", Amusement),
        ("smug", Amusement),
        ("playful", Amusement),
        ("teasing", Amusement),
        ("angry", Anger),
        ("furious", Anger),
        ("enraged", Anger),
        ("irritated", Annoyance),
        ("annoyed", Annoyance),
        ("frustrated", Annoyance),
        ("exasperated", Annoyance),
        ("confused", Confusion),
        ("puzzled", Confusion),
        ("curious", Confusion),
        ("uncertain", Confusion),
        ("lustful", Desire),
        ("flirty", Desire),
        ("aroused", Desire),
        ("disappointed", Disappointment),
        ("dismayed", Disappointment),
        ("disgusted", Disgust),
        ("repulsed", Disgust),
        ("embarrassed", Embarrassment),
        ("flustered", Embarrassment),
        ("ashamed", Embarrassment),
        ("shy", Embarrassment),
        ("excited", Excitement),
        ("eager", Excitement),
        ("ecstatic", Excitement),
        ("thrilled", Excitement),
        ("afraid", Fear),
        ("scared", Fear),
        ("terrified", Fear),
        ("nervous", Fear),
        ("anxious", Fear),
        ("grateful", Gratitude),
        ("thankful", Gratitude),
        ("relieved", Gratitude),
        ("grieving", Grief),
        ("mournful", Grief),
        ("heartbroken", Grief),
        ("happy", Joy),
        ("cheerful", Joy),
        ("delighted", Joy),
        ("joyful", Joy),
        ("affectionate", Love),
        ("loving", Love),
        ("tender", Love),
        ("proud", Pride),
        ("confident", Pride),
        ("triumphant", Pride),
        ("sad", Sadness),
        ("melancholy", Sadness),
        ("gloomy", Sadness),
        ("hurt", Sadness),
        ("surprised", Surprise),
        ("shocked", Surprise),
        ("astonished", Surprise),
        ("startled", Surprise),
    ])
});

static EXPRESSES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*(.+?)\s+expresses\s+(.+?)\s*$").expect("valid regex")
});

/// Interprets a tag body of the form `<name> EXPRESSES <emotion>`.
///
/// Returns the canonical name of the matched present actor and the emotion,
/// or `None` when the tag has another shape or either half does not resolve.
pub fn resolve_emotion_tag(tag: &str, present: &[&Actor]) -> Option<(String, Emotion)> {
    let caps = EXPRESSES_RE.captures(tag)?;
    let name = caps[1].trim();
    let phrase = &caps[2];

    let Some(actor) = find_best_match(name, present.iter().copied(), |a| a.name.as_str()) else {
        debug!("Emotion tag names unknown actor: {}", tag);
        return None;
    };
    let Some(emotion) = Emotion::parse(phrase) else {
        debug!("Emotion tag has unknown emotion: {}", tag);
        return None;
    };
    Some((actor.name.clone(), emotion))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(id: &str, name: &str) -> Actor {
        Actor {
            id: id.to_string(),
            name: name.to_string(),
            location: "bridge".to_string(),
            voice_id: None,
        }
    }

    #[test]
    fn test_parse_exact_and_synonym() {
        assert_eq!(Emotion::parse("JOY"), Some(Emotion::Joy));
        assert_eq!(Emotion::parse("  furious "), Some(Emotion::Anger));
        assert_eq!(Emotion::parse("smug"), Some(Emotion::Amusement));
        assert_eq!(Emotion::parse("ecstatic"), Some(Emotion::Excitement));
        assert_eq!(Emotion::parse("bewildered-ish"), None);
    }

    #[test]
    fn test_every_synonym_targets_a_distinct_word() {
        for (word, _) in SYNONYMS.iter() {
            assert!(
                Emotion::ALL.iter().all(|e| e.as_str() != *word),
                "synonym shadows a canonical name: {word}"
            );
        }
    }

    #[test]
    fn test_resolve_emotion_tag() {
        let jane = actor("a1", "Jane");
        let orrin = actor("a2", "Orrin Hale");
        let present = vec![&jane, &orrin];

        assert_eq!(
            resolve_emotion_tag("JANE EXPRESSES JOY", &present),
            Some(("Jane".to_string(), Emotion::Joy))
        );
        assert_eq!(
            resolve_emotion_tag("  orrin   expresses   furious ", &present),
            Some(("Orrin Hale".to_string(), Emotion::Anger))
        );
    }

    #[test]
    fn test_resolve_emotion_tag_ignores_unresolvable() {
        let jane = actor("a1", "Jane");
        let present = vec![&jane];

        assert!(resolve_emotion_tag("JANE NODS", &present).is_none());
        assert!(resolve_emotion_tag("KAEL EXPRESSES JOY", &present).is_none());
        assert!(resolve_emotion_tag("JANE EXPRESSES SOMETHING", &present).is_none());
        assert!(resolve_emotion_tag("JANE EXPRESSES JOY", &[]).is_none());
    }
}
