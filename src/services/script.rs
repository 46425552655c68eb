use crate::core::emotion::{resolve_emotion_tag, Emotion};
use crate::core::state::{Actor, ScriptEntry, NARRATOR};
use crate::utils::names::find_best_match;
use crate::utils::tags::{extract_tags, strip_tags};
use std::collections::HashMap;

/// A raw line starting with this ends the scene.
pub const END_SCENE_MARKER: &str = "[END SCENE]";

// Anything else at the end of a line means the model was cut off mid-sentence.
const TERMINAL_CHARS: &[char] = &[
    '.', '!', '?', '…', '"', '\'', '”', '’', ')', ']', '*', '_', '~',
];

pub type EmotionMap = HashMap<String, Emotion>;

#[derive(Debug, Clone, PartialEq)]
pub struct CombinedLine {
    pub text: String,
    pub emotions: EmotionMap,
}

#[derive(Debug, Default, PartialEq)]
pub struct CombinedScript {
    pub lines: Vec<CombinedLine>,
    pub end_scene: bool,
}

/// Rebuilds logical `SPEAKER: text` lines from raw model output.
///
/// A line containing a colon opens a new logical line; lines without one
/// continue the previous line. Tags are resolved into the emotion map and
/// removed from the visible text.
pub fn combine_lines(raw: &str, present: &[&Actor]) -> CombinedScript {
    let mut script = CombinedScript::default();
    let mut buffer = String::new();
    let mut emotions = EmotionMap::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.starts_with(END_SCENE_MARKER) {
            script.end_scene = true;
            continue;
        }
        if line.is_empty() || !line.ends_with(TERMINAL_CHARS) {
            continue;
        }

        // Tags come out of a copy; the colon check still looks at the
        // original line.
        let (tags, stripped) = extract_tags(line);
        let found: EmotionMap = tags
            .iter()
            .filter_map(|tag| resolve_emotion_tag(tag, present))
            .collect();

        if line.contains(':') {
            if !buffer.is_empty() {
                script.lines.push(CombinedLine {
                    text: std::mem::take(&mut buffer),
                    emotions: std::mem::take(&mut emotions),
                });
            }
            buffer = stripped;
            emotions = found;
        } else {
            if !buffer.is_empty() && !stripped.is_empty() {
                buffer.push('\n');
            }
            buffer.push_str(&stripped);
            emotions.extend(found);
        }
    }

    if !buffer.is_empty() {
        script.lines.push(CombinedLine { text: buffer, emotions });
    }
    script
}

/// Splits combined lines into speaker/message entries, drops empty ones and
/// rewrites speaker labels to canonical names of present actors.
pub fn build_entries(lines: Vec<CombinedLine>, present: &[&Actor]) -> Vec<ScriptEntry> {
    lines
        .into_iter()
        .filter_map(|line| {
            let (speaker, message) = match line.text.split_once(':') {
                Some((speaker, message)) => (speaker.trim(), message),
                None => (NARRATOR, line.text.as_str()),
            };
            let message = strip_tags(message);
            if message.is_empty() {
                return None;
            }

            let mut entry = ScriptEntry::new(speaker, message);
            if !line.emotions.is_empty() {
                entry.actor_emotions = Some(line.emotions);
            }
            Some(entry)
        })
        .map(|mut entry| {
            if let Some(actor) =
                find_best_match(&entry.speaker, present.iter().copied(), |a| a.name.as_str())
            {
                entry.speaker = actor.name.clone();
            }
            entry
        })
        .collect()
}

/// Renders entries back into the `SPEAKER: message` form the model writes.
pub fn render_script(entries: &[ScriptEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| format!("{}: {}", e.speaker.to_uppercase(), e.message))
        .collect()
}
