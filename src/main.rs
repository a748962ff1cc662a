//! Asteroid Drift headless runner
//!
//! Plays one seeded run with the autopilot at a fixed 60 Hz step, routes the
//! run's events to the logging audio manager, builds a draw list every frame
//! and records the result in the profile.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use asteroid_drift::Tuning;
use asteroid_drift::audio::{AudioManager, dispatch_events};
use asteroid_drift::consts::FRAME_DT;
use asteroid_drift::persistence::{DEFAULT_PROFILE_PATH, ProfileStore};
use asteroid_drift::renderer::{DrawList, draw_world};
use asteroid_drift::sim::{GameEvent, Run, TickInput, tick};
use asteroid_drift::unix_timestamp;

#[derive(Parser, Debug)]
#[command(name = "asteroid-drift")]
#[command(about = "Run a seeded, autopiloted asteroid-drift game headlessly")]
struct Cli {
    /// Run seed (defaults to the current unix time)
    #[arg(long)]
    seed: Option<u64>,
    /// Seconds of game time to simulate before stopping
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,
    /// Profile JSON to read and update
    #[arg(long, default_value = DEFAULT_PROFILE_PATH)]
    profile: PathBuf,
    /// Tuning JSON overriding any subset of the defaults
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Leave the profile file untouched
    #[arg(long)]
    no_save: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let tuning = match &cli.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let mut store = ProfileStore::load(&cli.profile);
    let seed = cli.seed.unwrap_or_else(unix_timestamp);
    log::info!("Asteroid Drift starting: seed {seed}, {}s", cli.seconds);

    let mut run = Run::new(seed, tuning, store.settings(), store.high_score())
        .with_leaderboard(store.leaderboard().clone());
    let mut audio = AudioManager::from_settings(store.settings());
    let mut draw_list = DrawList::new();

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let max_frames = (cli.seconds.max(0.0) / FRAME_DT).ceil() as u64;
    let mut frames = 0;
    while frames < max_frames && !run.is_over() {
        tick(&mut run, &input, FRAME_DT);
        let events = run.state.drain_events();
        dispatch_events(&events, &run.state.settings, &mut audio);
        for event in &events {
            if let GameEvent::HighScoreRaised(score) = event {
                store.set_high_score(*score);
            }
        }
        draw_world(&run, &mut draw_list);
        frames += 1;
    }

    let summary = run.summary();
    log::info!(
        "Stopped after {frames} frames ({:?}), {} sound effects, last frame {} segments",
        run.phase,
        audio.effects_played(),
        draw_list.segment_count()
    );

    store.store_settings(&run.state.settings);
    if let Some(rank) = store.record_run(&summary) {
        log::info!("Leaderboard rank #{rank}");
    }
    if cli.no_save {
        log::info!("--no-save: profile not written");
    } else {
        store.save()?;
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
