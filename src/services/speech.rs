use crate::core::state::{Actor, ScriptEntry};
use crate::services::tts::SpeechClient;
use crate::utils::names::find_best_match;
use futures_util::future::join_all;
use log::{debug, warn};

/// Joins separate quoted spans of one entry into a single transcript.
pub const DIALOGUE_SEPARATOR: &str = " ... ";

/// Spoken part of a message: the spans between quote pairs, with emphasis
/// markers removed. `None` when the message has no quotes at all.
pub fn extract_dialogue(message: &str) -> Option<String> {
    let normalized = message.replace(['“', '”'], "\"");
    if !normalized.contains('"') {
        return None;
    }

    let spoken: Vec<&str> = normalized
        .split('"')
        .skip(1)
        .step_by(2)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if spoken.is_empty() {
        return None;
    }

    let transcript = spoken.join(DIALOGUE_SEPARATOR).replace(['*', '_'], "");
    Some(transcript)
}

/// Fills `speech_url` on every entry spoken by a known actor. All requests run
/// as one batch; a failed request leaves that entry's URL empty.
pub async fn dispatch_speech(entries: &mut [ScriptEntry], actors: &[Actor], tts: &dyn SpeechClient) {
    let tasks = entries.iter().map(|entry| async move {
        let actor = find_best_match(&entry.speaker, actors, |a| a.name.as_str())?;
        let transcript = extract_dialogue(&entry.message)?;

        match tts.synthesize(&transcript, actor.voice_id.as_deref()).await {
            Ok(Some(speech)) if !speech.url.is_empty() => Some(speech.url),
            Ok(_) => {
                debug!("No speech returned for {}", actor.name);
                None
            }
            Err(e) => {
                warn!("Speech synthesis failed for {}: {}", actor.name, e);
                None
            }
        }
    });

    let urls = join_all(tasks).await;
    for (entry, url) in entries.iter_mut().zip(urls) {
        entry.speech_url = url.unwrap_or_default();
    }
}
