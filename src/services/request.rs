use crate::core::state::{FactionRequest, World};
use crate::utils::names::find_best_match;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

pub const REQUEST_MARKER: &str = "REQUEST";

pub trait RequestParser: Send + Sync {
    fn parse_request_tag(&self, line: &str, world: &World) -> Option<FactionRequest>;
}

static REQUEST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*\[?\s*request\s*:\s*([^|]+?)\s*\|\s*([^|]+?)\s*\|\s*(.+?)\s*->\s*(.+?)\s*\]?\s*$")
        .expect("valid regex")
});

/// Reads `[REQUEST: faction | description | requirement -> reward]`.
pub struct TagRequestParser;

impl RequestParser for TagRequestParser {
    fn parse_request_tag(&self, line: &str, world: &World) -> Option<FactionRequest> {
        let Some(caps) = REQUEST_RE.captures(line) else {
            debug!("Malformed request tag: {}", line);
            return None;
        };

        let Some(faction) = find_best_match(&caps[1], &world.factions, |f| f.name.as_str()) else {
            debug!("Request names unknown faction: {}", &caps[1]);
            return None;
        };

        Some(FactionRequest {
            faction_id: faction.id.clone(),
            description: caps[2].to_string(),
            requirement: caps[3].to_string(),
            reward: caps[4].to_string(),
        })
    }
}
