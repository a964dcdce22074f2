//! Werewolf Engine - Demo runner
//!
//! Seats a table of bots, deals the configured roles and plays one game to
//! the end, printing the final report as JSON.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use werewolf_engine::application::dto::RosterEntry;
use werewolf_engine::application::ports::inbound::GameLifecycleUseCase;
use werewolf_engine::application::services::GameLifecycleService;
use werewolf_engine::domain::value_objects::{GameSettings, PlayerId};
use werewolf_engine::infrastructure::config::AppConfig;
use werewolf_engine::infrastructure::localization::TranslationTable;
use werewolf_engine::infrastructure::messaging::BotMessenger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Werewolf Engine");
    let settings = GameSettings::from_env();
    tracing::info!("Configuration loaded");
    tracing::info!("  Players: {}", config.demo_players);
    tracing::info!("  Roles: {}", config.demo_roles);
    tracing::info!("  Locale: {}", settings.locale);

    let mut translations = TranslationTable::builtin();
    if let Some(path) = &config.translations_path {
        translations.merge_file(path)?;
        tracing::info!("  Translations: {}", path.display());
    }

    let bots = Arc::new(BotMessenger::new(
        Arc::new(translations),
        settings.locale.clone(),
        config.seed,
    ));
    let service = GameLifecycleService::new(bots.clone(), settings).with_seed(config.seed);

    let roster: Vec<RosterEntry> = (1..=config.demo_players as u64)
        .map(|n| RosterEntry::new(n, format!("bot{}", n)))
        .collect();
    let game_id = service
        .start_game(roster, PlayerId::new(1), config.role_counts()?)
        .await
        .context("Failed to start the demo game")?;

    // Play until a faction wins or Ctrl+C
    let report = tokio::select! {
        report = service.run_to_completion(game_id) => report?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received, aborting game");
            service.abort(game_id).await?;
            return Ok(());
        }
    };

    for entry in bots.transcript().await {
        tracing::debug!(recipient = ?entry.recipient, "{}", entry.text);
    }
    println!("{}", serde_json::to_string_pretty(&report)?);

    tracing::info!("Werewolf Engine shutdown complete");
    Ok(())
}
