//! TripWrap story builder - command-line entry point
//!
//! Reads an upload manifest, tags images without prompting, aggregates
//! destinations, compiles the slide deck and prints it. With `--play` the
//! deck is autoplayed in real time and slide changes are logged.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tripwrap_common::config::TomlConfig;
use tripwrap_common::events::StoryEvent;
use tripwrap_common::time::offset_from_minutes;
use tripwrap_story::manifest::Manifest;
use tripwrap_story::playback::{DurationPolicy, PlaybackEngine, PlayerOptions, StoryPlayer};
use tripwrap_story::{aggregate, story};

/// Command-line arguments for tripwrap
#[derive(Parser, Debug)]
#[command(name = "tripwrap")]
#[command(about = "Build a year-in-travel story from tagged photos")]
#[command(version)]
struct Args {
    /// JSON manifest of uploaded images
    manifest: PathBuf,

    /// Configuration file (TOML)
    #[arg(short, long, env = "TRIPWRAP_CONFIG")]
    config: Option<PathBuf>,

    /// Confirm geocoder suggestions for images without a manual entry
    #[arg(short, long)]
    accept_suggestions: bool,

    /// Override the profile display name from the config
    #[arg(long)]
    profile_name: Option<String>,

    /// Print the deck as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Autoplay the deck after printing it
    #[arg(long)]
    play: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // The config picks the log level, so its resolution is logged afterwards
    let (mut config, config_source) = TomlConfig::load_with_source(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(name) = args.profile_name.clone() {
        config.story.profile_name = name;
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("tripwrap_story={0},tripwrap_common={0}", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    config_source.log();

    let manifest = Manifest::load(&args.manifest).context("Failed to load manifest")?;
    let images = manifest
        .tag(args.accept_suggestions)
        .context("Tagging failed")?;

    let destinations = aggregate(&images);
    info!(
        "{} image(s) resolved to {} destination(s)",
        images.iter().filter(|img| img.is_resolved()).count(),
        destinations.len()
    );

    let offset = offset_from_minutes(config.story.utc_offset_minutes);
    let slides = story::compile_with_offset(&destinations, offset);

    if args.json {
        let json = serde_json::to_string_pretty(&slides).context("Failed to encode deck")?;
        println!("{}", json);
    } else {
        println!("Story for {}", config.story.profile_name);
        for (i, slide) in slides.iter().enumerate() {
            println!("{:>3}  {}", i, slide.describe());
        }
    }

    if !args.play {
        return Ok(());
    }

    let engine = PlaybackEngine::new(
        slides,
        DurationPolicy::from(&config.playback),
        config.playback.settle(),
    );
    let (player, mut events) =
        StoryPlayer::spawn_subscribed(engine, PlayerOptions::from(&config));

    let log_changes = async {
        loop {
            match events.recv().await {
                Ok(StoryEvent::SlideChanged {
                    index, total, kind, ..
                }) => info!("Slide {}/{} ({})", index + 1, total, kind),
                Ok(event) => debug!("Player event: {}", event.event_type()),
                Err(RecvError::Lagged(skipped)) => debug!("Event log lagged by {}", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    };

    tokio::select! {
        snapshot = player.wait_finished() => {
            info!("Reached final slide {}", snapshot.index);
        }
        _ = log_changes => {}
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, stopping playback");
        }
    }

    player.shutdown().await;
    Ok(())
}
