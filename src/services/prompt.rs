use crate::core::emotion::Emotion;
use crate::core::state::{Skit, World};
use crate::core::stats::{character_stat_names, station_stat_names, STATION_TARGET};
use crate::services::request::REQUEST_MARKER;
use crate::services::script::{render_script, END_SCENE_MARKER};

/// Analysis responses may emit this to stop early when nothing changed.
pub const NO_CHANGES_TOKEN: &str = "[NO CHANGES]";

#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

pub trait PromptBuilder: Send + Sync {
    fn skit_prompt(&self, skit: &Skit, world: &World) -> Prompt;
    fn outcome_prompt(&self, skit: &Skit, world: &World) -> Prompt;
}

pub struct DefaultPromptBuilder;

impl PromptBuilder for DefaultPromptBuilder {
    fn skit_prompt(&self, skit: &Skit, world: &World) -> Prompt {
        let present = world
            .present_actors(&skit.location)
            .iter()
            .map(|a| a.name.to_uppercase())
            .collect::<Vec<_>>()
            .join(", ");
        let emotions = Emotion::ALL
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let user = format!(
            "Location: {}\n\
            Present: {}\n\
            Player: {}\n\
            \n\
            Continue the scene as a script. Rules:\n\
            - Every beat starts with the speaker in capitals and a colon, e.g. `JANE: \"Hello.\"`.\n\
            - Use NARRATOR for prose. Put spoken words in double quotes.\n\
            - When a character's mood shifts, add a tag like `[JANE EXPRESSES JOY]` on that line. \
            Emotions: {}.\n\
            - Do not speak or act for {}.\n\
            - When the scene reaches a natural end, write {} on its own line.",
            skit.location,
            if present.is_empty() { "nobody" } else { present.as_str() },
            world.player_name,
            emotions,
            world.player_name,
            END_SCENE_MARKER,
        );

        Prompt {
            system: "You are the narrator of an interactive space-station drama.".to_string(),
            user,
        }
    }

    fn outcome_prompt(&self, skit: &Skit, world: &World) -> Prompt {
        let present = world
            .present_actors(&skit.location)
            .iter()
            .map(|a| a.name.to_uppercase())
            .collect::<Vec<_>>()
            .join(", ");
        let factions = world
            .factions
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let user = format!(
            "Scene transcript:\n{}\n\
            \n\
            Summarize the lasting consequences of this scene using only these tags, one per line:\n\
            [NAME: stat+N, stat-N] for characters ({}). Stats: {}.\n\
            [{}: stat+N, stat-N] for the station. Stats: {}.\n\
            [{}: faction | description | requirement -> reward] for a new offer from a faction ({}).\n\
            If nothing changed, write {} and stop.",
            render_script(&skit.script).join("\n"),
            present,
            character_stat_names().join(", "),
            STATION_TARGET,
            station_stat_names().join(", "),
            REQUEST_MARKER,
            factions,
            NO_CHANGES_TOKEN,
        );

        Prompt {
            system: "You track game state. Reply with tags only.".to_string(),
            user,
        }
    }
}
