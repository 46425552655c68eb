use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use skitweaver::core::config::Config;
use skitweaver::core::state::{Skit, SkitResult, World};
use skitweaver::services::llm::create_llm;
use skitweaver::services::prompt::DefaultPromptBuilder;
use skitweaver::services::request::TagRequestParser;
use skitweaver::services::tts::create_speech_client;
use skitweaver::services::workflow::SkitWorkflow;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // 1. Load Config
    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            eprintln!("Please ensure 'config.yml' exists with valid LLM settings.");
            return Err(e);
        }
    };

    // 2. Load World
    let world = World::load(&config.world_file)?;

    // 3. Initialize services
    let llm = create_llm(&config.llm)?;
    let tts = create_speech_client(&config.speech)?;
    let workflow = SkitWorkflow::new(
        config.skit.clone(),
        llm,
        tts,
        Box::new(DefaultPromptBuilder),
        Box::new(TagRequestParser),
    )
    .with_retry(config.llm.retry_count, config.llm.retry_delay_seconds);

    // 4. Run the scene
    let mut skit = Skit::new(config.skit.location.clone());
    loop {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.set_message("Generating scene...");
        pb.enable_steady_tick(Duration::from_millis(120));

        let result = workflow.generate(&mut skit, &world).await;
        pb.finish_and_clear();

        if result.is_empty() {
            println!("Generation failed; no progress was made.");
            break;
        }
        print_entries(&result);

        if result.end_scene {
            print_outcome(&result, &world);
            break;
        }

        if !config.unattended {
            let ans = inquire::Confirm::new("Continue the scene?")
                .with_default(true)
                .prompt();
            match ans {
                Ok(true) => {}
                Ok(false) => {
                    println!("Stopping as requested.");
                    break;
                }
                Err(_) => {
                    println!("Error reading input, stopping.");
                    break;
                }
            }
        }
    }

    Ok(())
}

fn print_entries(result: &SkitResult) {
    for entry in &result.entries {
        println!("{}: {}", entry.speaker, entry.message);
        if let Some(emotions) = &entry.actor_emotions {
            let moods = emotions
                .iter()
                .map(|(name, emotion)| format!("{} is {}", name, emotion))
                .collect::<Vec<_>>()
                .join(", ");
            println!("    ({})", moods);
        }
        if !entry.speech_url.is_empty() {
            println!("    [audio] {}", entry.speech_url);
        }
    }
}

fn print_outcome(result: &SkitResult, world: &World) {
    println!("--- Scene complete ---");
    for (target, changes) in &result.stat_changes {
        let label = world
            .actors
            .iter()
            .find(|a| &a.id == target)
            .map(|a| a.name.as_str())
            .unwrap_or(target.as_str());
        let deltas = changes
            .iter()
            .map(|(stat, delta)| format!("{} {:+}", stat, delta))
            .collect::<Vec<_>>()
            .join(", ");
        println!("{}: {}", label, deltas);
    }
    for request in &result.requests {
        println!(
            "New request from {}: {} (needs {}, offers {})",
            request.faction_id, request.description, request.requirement, request.reward
        );
    }
}
