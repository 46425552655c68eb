use crate::core::state::{FactionRequest, StatChanges, World};
use crate::core::stats::{character_stat_names, normalize_stat_name, station_stat_names, STATION_TARGET};
use crate::services::request::{RequestParser, REQUEST_MARKER};
use crate::utils::names::find_best_match;
use crate::utils::tags::extract_tags;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static ADJUSTMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z][A-Za-z ]*?)\s*([+-])\s*(\d+)\s*$").expect("valid regex")
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Outcome {
    pub stat_changes: StatChanges,
    pub requests: Vec<FactionRequest>,
}

/// Parses one `stat±N` fragment into a lower-cased name and signed delta.
pub fn parse_adjustment(fragment: &str) -> Option<(String, i32)> {
    let caps = ADJUSTMENT_RE.captures(fragment)?;
    let amount: i32 = caps[3].parse().ok()?;
    let delta = if &caps[2] == "-" { -amount } else { amount };
    Some((caps[1].trim().to_lowercase(), delta))
}

/// Reads the analysis response: stat tags accumulate into per-target buckets
/// and request tags go to `parser`. Only lines opening with `[` are read, and
/// every tag on such a line counts. Unresolvable tags are skipped.
pub fn parse_outcome(
    response: &str,
    location: &str,
    world: &World,
    parser: &dyn RequestParser,
) -> Outcome {
    let mut outcome = Outcome::default();
    let character_stats = character_stat_names();
    let station_stats = station_stat_names();

    for line in response.lines().map(str::trim) {
        if !line.starts_with('[') {
            continue;
        }

        for tag in extract_tags(line).0 {
            let Some((target, adjustments)) = tag.split_once(':') else {
                continue;
            };
            let target = target.trim();

            if target.eq_ignore_ascii_case(REQUEST_MARKER) {
                if let Some(request) = parser.parse_request_tag(&format!("[{}]", tag), world) {
                    outcome.requests.push(request);
                }
                continue;
            }

            let (key, known) = if target.to_uppercase() == STATION_TARGET {
                (STATION_TARGET.to_string(), &station_stats)
            } else {
                let present = world.present_actors(location);
                match find_best_match(target, present.iter().copied(), |a| a.name.as_str()) {
                    Some(actor) => (actor.id.clone(), &character_stats),
                    None => {
                        debug!("Skipping stat tag for unknown target: {}", target);
                        continue;
                    }
                }
            };

            let bucket = outcome.stat_changes.entry(key).or_default();
            for (name, delta) in adjustments.split(',').filter_map(parse_adjustment) {
                let total = bucket.entry(normalize_stat_name(&name, known)).or_insert(0);
                *total = total.saturating_add(delta);
            }
        }
    }

    outcome.stat_changes.retain(|_, bucket| !bucket.is_empty());
    outcome
}
