use serde::{Deserialize, Serialize};

/// Target label that routes adjustments to the station bucket.
pub const STATION_TARGET: &str = "STATION";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterStat {
    Brawn,
    Wits,
    Nerve,
    Skill,
    Charm,
    Lust,
    Joy,
    Trust,
}

impl CharacterStat {
    pub const ALL: [CharacterStat; 8] = [
        CharacterStat::Brawn,
        CharacterStat::Wits,
        CharacterStat::Nerve,
        CharacterStat::Skill,
        CharacterStat::Charm,
        CharacterStat::Lust,
        CharacterStat::Joy,
        CharacterStat::Trust,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterStat::Brawn => "brawn",
            CharacterStat::Wits => "wits",
            CharacterStat::Nerve => "nerve",
            CharacterStat::Skill => "skill",
            CharacterStat::Charm => "charm",
            CharacterStat::Lust => "lust",
            CharacterStat::Joy => "joy",
            CharacterStat::Trust => "trust",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationStat {
    Systems,
    Comfort,
    Provision,
    Security,
    Harmony,
    Wealth,
}

impl StationStat {
    pub const ALL: [StationStat; 6] = [
        StationStat::Systems,
        StationStat::Comfort,
        StationStat::Provision,
        StationStat::Security,
        StationStat::Harmony,
        StationStat::Wealth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StationStat::Systems => "systems",
            StationStat::Comfort => "comfort",
            StationStat::Provision => "provision",
            StationStat::Security => "security",
            StationStat::Harmony => "harmony",
            StationStat::Wealth => "wealth",
        }
    }
}

/// Canonicalizes a stat name against `known`: exact match, then substring in
/// either direction. Unknown names come back lower-cased as given.
pub fn normalize_stat_name(raw: &str, known: &[&'static str]) -> String {
    let name = raw.trim().to_lowercase();
    if let Some(exact) = known.iter().find(|k| **k == name) {
        return exact.to_string();
    }
    if !name.is_empty() {
        if let Some(partial) = known
            .iter()
            .find(|k| k.contains(name.as_str()) || name.contains(**k))
        {
            return partial.to_string();
        }
    }
    name
}

pub fn character_stat_names() -> Vec<&'static str> {
    CharacterStat::ALL.iter().map(|s| s.as_str()).collect()
}

pub fn station_stat_names() -> Vec<&'static str> {
    StationStat::ALL.iter().map(|s| s.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_exact() {
        let names = station_stat_names();
        assert_eq!(normalize_stat_name("Security", &names), "security");
        assert_eq!(normalize_stat_name(" HARMONY ", &names), "harmony");
    }

    #[test]
    fn test_normalize_substring_both_ways() {
        let names = station_stat_names();
        assert_eq!(normalize_stat_name("Station Security", &names), "security");
        assert_eq!(normalize_stat_name("Prov", &names), "provision");

        let names = character_stat_names();
        assert_eq!(normalize_stat_name("charming", &names), "charm");
    }

    #[test]
    fn test_normalize_unknown_is_lowercased() {
        let names = character_stat_names();
        assert_eq!(normalize_stat_name("Morale Boost", &names), "morale boost");
    }
}
