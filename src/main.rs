mod frontend;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use macroquad::prelude::*;
use tileworld::{load_world, EngineConfig, FrameLimiter, Game, TickOutcome};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use frontend::assets::DiskAssets;

fn window_conf() -> Conf {
    Conf {
        window_title: "tileworld".into(),
        window_width: 800,
        window_height: 600,
        ..Default::default()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// `tileworld [asset_dir] [config.json]`; maps are read from `<asset_dir>/maps`.
async fn run() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let root = PathBuf::from(args.next().unwrap_or_else(|| "assets".to_string()));
    let mut config = match args.next() {
        Some(path) => EngineConfig::load(Path::new(&path))?,
        None => EngineConfig::default(),
    };

    let maps = root.join("maps");
    let world = load_world(&maps, &config)
        .with_context(|| format!("Loading maps from {}", maps.display()))?;
    let mut assets = DiskAssets::load(&root).await?;
    config.tileset_width = assets.tileset.width() as u32;

    info!(
        maps = world.maps().len(),
        platforms = world.platforms().len(),
        zones = world.zones().len(),
        "world_ready"
    );

    let limiter = FrameLimiter::new(config.frame_budget_ms);
    let mut game = Game::new(world, config);
    loop {
        let started = Instant::now();
        let now_ms = (get_time() * 1000.0) as u64;
        let snapshot = frontend::input::poll();

        let outcome = game
            .tick(snapshot, now_ms, get_frame_time(), &mut assets)
            .context("Loading event assets")?;
        if outcome == TickOutcome::Quit {
            info!("quit");
            return Ok(());
        }

        frontend::render::draw(&mut game, &assets, now_ms);
        if let Some(rest) = limiter.leftover(started.elapsed()) {
            std::thread::sleep(rest);
        }
        next_frame().await;
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    init_tracing();
    if let Err(e) = run().await {
        error!(error = format!("{e:#}"), "fatal");
        std::process::exit(1);
    }
}
