//! Boss Rush - frame-synchronized arcade shooter simulation
//!
//! This is the headless host. It handles:
//! - Loading ship assets and configuration
//! - Feeding keyboard events (or a seeded autopilot) into the input tracker
//! - Driving the combat state machine from the frame clock
//! - Graceful shutdown on Ctrl+C / SIGTERM
//!
//! Everything runs on one thread: the frame loop, the input tracker and the
//! spawner timers interleave only at await points.

mod config;
mod frame;
mod game;
mod input;
mod render;
mod util;

use anyhow::Context;
use futures::channel::mpsc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::frame::{FrameClock, FrameSampler, ResizeSignal};
use crate::game::{CombatStateMachine, GameLoop};
use crate::input::{spawn_input_tracker, Autopilot, RawKeyEvent};
use crate::render::assets::load_ship_assets;
use crate::render::{HeadlessRenderer, JsonAssetLoader};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting Boss Rush");
    info!(
        frame_rate_hz = config.frame_rate_hz,
        width = config.viewport.width,
        height = config.viewport.height,
        "Headless surface"
    );

    let loader = JsonAssetLoader::new(".");
    let (player_asset, boss_assets) =
        load_ship_assets(&loader, &config.player_asset, &config.boss_assets)
            .await
            .context("Failed to load ship assets")?;

    // Raw key events; the sender stays alive for the whole run
    let (key_tx, key_rx) = mpsc::unbounded::<RawKeyEvent>();
    let autopilot = config
        .autopilot_seed
        .map(|seed| Autopilot::new(seed).spawn(key_tx.clone()));
    let (held_keys, tracker) = spawn_input_tracker(key_rx);

    // Raised once so the first tick lays out the fixed headless surface
    let frames = FrameSampler::new(
        FrameClock::new(config.frame_rate_hz),
        held_keys,
        ResizeSignal::new(),
    );
    let machine = CombatStateMachine::new(config.rules(), boss_assets)?;
    let renderer = HeadlessRenderer::new(config.viewport, config.snapshot_every_ticks);
    let game = GameLoop::new(frames, machine, &player_asset, renderer, config.max_ticks);

    tokio::select! {
        summary = game.run() => {
            info!(ticks = summary.ticks, bosses_defeated = summary.bosses_defeated, "Run complete");
        }
        _ = shutdown_signal() => {}
    }

    if let Some(autopilot) = autopilot {
        autopilot.abort();
    }
    drop(key_tx);
    tracker.abort();

    info!("Shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
