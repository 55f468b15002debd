// This file is part of Cube Merge.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use anyhow::Result;
use bevy::prelude::*;
use clap::Parser;

use cube_merge::interaction::session::config_hot_reload::ConfigReloadSettings;
use cube_merge::{GameConfig, GamePlugin, RngSeed};

#[derive(Parser, Debug)]
#[command(author, version, about = "Physics cube merging game", long_about = None)]
struct Args {
    /// RON config layers, later files override earlier ones key by key.
    #[arg(
        long = "config",
        value_name = "PATH",
        default_values = ["assets/config/game.ron", "assets/config/game.local.ron"]
    )]
    configs: Vec<PathBuf>,
    /// Seed for the spawn level roll (random when omitted).
    #[arg(long)]
    seed: Option<u64>,
    /// Draw rapier collider wireframes.
    #[arg(long)]
    rapier_debug: bool,
}

/// What happened while loading config, reported once logging is up.
#[derive(Resource, Debug, Default)]
struct ConfigLoadReport {
    used: Vec<String>,
    errors: Vec<String>,
    warnings: Vec<String>,
}

fn report_config_load(report: Res<ConfigLoadReport>, seed: Res<RngSeed>) {
    if report.used.is_empty() {
        info!(target: "config", "No config layers found; using defaults");
    } else {
        info!(target: "config", used = ?report.used, "Config layers loaded");
    }
    for e in &report.errors {
        // A missing local override layer is normal.
        debug!(target: "config", "{e}");
    }
    for w in &report.warnings {
        warn!(target: "config", "CONFIG WARNING: {w}");
    }
    info!(target: "config", "spawn seed {}", seed.0);
}

fn main() -> Result<()> {
    #[cfg(target_arch = "wasm32")]
    {
        // Better panic messages on wasm
        console_error_panic_hook::set_once();
    }

    let args = Args::parse();
    let (mut cfg, used, errors) = GameConfig::load_layered(args.configs.iter());
    if args.rapier_debug {
        cfg.rapier_debug = true;
    }
    let warnings = cfg.validate();
    let seed = args.seed.unwrap_or_else(rand::random);

    let exit = App::new()
        .insert_resource(cfg.clone())
        .insert_resource(RngSeed(seed))
        .insert_resource(ConfigReloadSettings {
            paths: args.configs.clone(),
            ..Default::default()
        })
        .insert_resource(ConfigLoadReport {
            used,
            errors,
            warnings,
        })
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: cfg.window.title.clone(),
                resolution: (cfg.window.width, cfg.window.height).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(GamePlugin)
        .add_systems(Startup, report_config_load)
        .run();

    match exit {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => anyhow::bail!("app exited with code {code}"),
    }
}
