mod config;

use anyhow::Result;
use crate::config::{AppConfig, SchemaKind};
use matchlog_models::{EventSchema, Generic, MatchEventRecord, Wyscout};
use matchlog_services::load_events;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matchlog=info,matchlog_services=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting matchlog");

    // Load configuration
    let config = AppConfig::new()?;
    let path = config.source_path()?;
    info!("✅ Configuration loaded: {:?} schema", config.event_schema);

    match config.event_schema {
        SchemaKind::Generic => show_first::<Generic>(&path),
        SchemaKind::Wyscout => show_first::<Wyscout>(&path),
    }
}

fn show_first<S: EventSchema>(path: &Path) -> Result<()> {
    let events = load_events::<S>(path)?;

    match events.first() {
        Some(event) => {
            info!(
                "⚽ First event {} at {} ({}): {} by {}",
                event.id(),
                event.match_timestamp(),
                event.match_period(),
                event.primary_type(),
                event.player_name()
            );
            println!("{event:#?}");
        }
        None => info!("📭 {} contains no events", path.display()),
    }

    Ok(())
}
