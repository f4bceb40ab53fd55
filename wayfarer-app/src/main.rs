use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::info;
use wayfarer_common::observability::{LogConfig, init_logging};
use wayfarer_config::{WayfarerConfig, WayfarerConfigLoader};
use wayfarer_screen::{ScreenHandle, ScreenMsg, spawn_journey_screen};
use wayfarer_speech::{Announcer, ConsoleAnnouncer, SilentAnnouncer, VoiceSettings};

use command::{Command, HELP, parse_command};

mod command;
mod journey;
mod render;

const MAILBOX_CAPACITY: usize = 16;

#[derive(Debug, Parser)]
#[command(name = "wayfarer", version, about = "Step-by-step guidance along a walking and transit route")]
struct Cli {
    /// Configuration file (YAML). Defaults to ./wayfarer.yaml when present.
    #[arg(long, env = "WAYFARER_CONFIG")]
    config: Option<PathBuf>,

    /// Route planner response (JSON).
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Stop catalog (JSON array of line patterns).
    #[arg(long)]
    stops: Option<PathBuf>,

    /// Turn off spoken announcements.
    #[arg(long)]
    mute: bool,
}

fn load_config(cli: &Cli) -> Result<WayfarerConfig> {
    let loader = match &cli.config {
        Some(path) => WayfarerConfigLoader::new().with_file(path),
        None => WayfarerConfigLoader::new().with_optional_file("wayfarer.yaml"),
    };
    Ok(loader.load()?)
}

fn announcer_for(cfg: &WayfarerConfig, mute: bool) -> Arc<dyn Announcer> {
    if mute || !cfg.speech.enabled {
        Arc::new(SilentAnnouncer)
    } else {
        Arc::new(ConsoleAnnouncer::new(cfg.speech.words_per_minute))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(&cli)?;

    let log_path = init_logging(LogConfig {
        app_name: "wayfarer",
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.stderr,
        format: cfg.logging.format,
        default_filter: cfg.logging.filter.clone(),
    })?;
    info!(
        target: "wayfarer::app",
        log = %log_path.display(),
        map_key = cfg.map.api_key().is_some(),
        "wayfarer starting"
    );

    let prepared = journey::prepare(cli.plan.as_deref(), cli.stops.as_deref())?;
    if let Some(message) = &prepared.message {
        println!("{message}");
    }

    let voice = VoiceSettings {
        language: cfg.speech.language.clone(),
        rate: cfg.speech.rate,
    };
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let ScreenHandle {
        addr,
        updates,
        task,
    } = spawn_journey_screen(
        announcer_for(&cfg, cli.mute),
        voice,
        MAILBOX_CAPACITY,
        shutdown_rx,
    );

    let mut rendered = updates.clone();
    let renderer = tokio::spawn(async move {
        while rendered.changed().await.is_ok() {
            let snap = rendered.borrow_and_update().clone();
            print!("{}", render::render(&snap));
        }
    });

    addr.send(ScreenMsg::Load(prepared.load))
        .await
        .map_err(|_| anyhow::anyhow!("journey screen stopped before loading"))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };

        match parse_command(&line) {
            Command::Next => {
                let seen = updates.borrow().cursor();
                addr.next_step(seen).await?;
            }
            Command::Repeat => {
                if addr.send(ScreenMsg::Repeat).await.is_err() {
                    break;
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Unknown(input) => println!("Unknown command: {input} (try /help)"),
        }
    }

    // The screen may already be gone; teardown is best effort.
    let _ = addr.send(ScreenMsg::Teardown).await;
    let _ = shutdown_tx.send(());
    task.await??;
    renderer.abort();
    info!(target: "wayfarer::app", "wayfarer stopped");
    Ok(())
}
