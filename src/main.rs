//! window bootstrap: config file + command line → [`GamePlugin`]
use std::path::PathBuf;

use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::window::WindowMode;
use clap::Parser;

use infinite_noise::config::WorldConfig;
use infinite_noise::GamePlugin;

#[derive(Parser)]
struct CliArgs {
    /// Terrain seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Seed for surface outcrops, for fully repeatable worlds
    #[arg(long)]
    outcrop_seed: Option<u64>,
    /// World settings file
    #[arg(long, default_value = "world.ron")]
    config: PathBuf,
}

fn try_main() -> anyhow::Result<()> {
    let cli_args = CliArgs::parse();

    let mut app = App::new();
    app
        /* diagnostics ----------------------------------------------------- */
        .add_plugins((
            LogDiagnosticsPlugin::default(),
            FrameTimeDiagnosticsPlugin::default(),
        ))
        /* bevy core ------------------------------------------------------- */
        .insert_resource(ClearColor(Color::srgb(0.18, 0.65, 1.0)))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "infinite noise".into(),
                resolution: (800., 600.).into(),
                mode: WindowMode::Windowed,
                ..default()
            }),
            ..default()
        }));

    // LogPlugin is built by now, so config messages reach the log
    let mut config = WorldConfig::load(&cli_args.config)?;
    if cli_args.seed.is_some() {
        config.seed = cli_args.seed;
    }
    if cli_args.outcrop_seed.is_some() {
        config.outcrop_seed = cli_args.outcrop_seed;
    }

    /* game ---------------------------------------------------------------- */
    app.add_plugins(GamePlugin { config }).run();
    Ok(())
}

fn main() {
    if let Err(e) = try_main() {
        eprintln!("fatal error: {e:?}");
        std::process::exit(1);
    }
}
