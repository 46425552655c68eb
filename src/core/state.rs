use crate::core::emotion::Emotion;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const NARRATOR: &str = "NARRATOR";

/// Per-target stat adjustments: target is an actor id or the station sentinel.
pub type StatChanges = HashMap<String, HashMap<String, i32>>;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScriptEntry {
    pub speaker: String,
    pub message: String,
    #[serde(default)]
    pub speech_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_emotions: Option<HashMap<String, Emotion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_scene: Option<bool>,
}

impl ScriptEntry {
    pub fn new(speaker: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            message: message.into(),
            speech_url: String::new(),
            actor_emotions: None,
            end_scene: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FactionRequest {
    pub faction_id: String,
    pub description: String,
    pub requirement: String,
    pub reward: String,
}

/// One scene. Owned by the caller; a generation cycle appends to `script`
/// and overwrites the outcome fields.
#[derive(Serialize, Deserialize, Default, Clone, Debug)]
pub struct Skit {
    pub location: String,
    #[serde(default)]
    pub script: Vec<ScriptEntry>,
    #[serde(default)]
    pub ended: bool,
    #[serde(default)]
    pub stat_changes: StatChanges,
    #[serde(default)]
    pub requests: Vec<FactionRequest>,
}

impl Skit {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Default::default()
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub voice_id: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Faction {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Read-only snapshot of the world the pipeline consults.
#[derive(Serialize, Deserialize, Default, Clone, Debug)]
pub struct World {
    pub player_name: String,
    #[serde(default)]
    pub actors: Vec<Actor>,
    #[serde(default)]
    pub factions: Vec<Faction>,
}

impl World {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read world file {:?}", path))?;
        let world: World = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse world file {:?}", path))?;
        Ok(world)
    }

    /// Actors standing at `location` right now. Recomputed on every call.
    pub fn present_actors(&self, location: &str) -> Vec<&Actor> {
        self.actors
            .iter()
            .filter(|a| a.location == location)
            .collect()
    }
}

/// What one generation cycle produced.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
pub struct SkitResult {
    pub entries: Vec<ScriptEntry>,
    pub end_scene: bool,
    pub stat_changes: StatChanges,
    pub requests: Vec<FactionRequest>,
}

impl SkitResult {
    /// The "no progress" sentinel returned once the retry budget is spent.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
