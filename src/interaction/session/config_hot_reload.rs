use bevy::prelude::*;
use std::{collections::HashMap, path::PathBuf, time::SystemTime};

use crate::core::config::GameConfig;

/// Files polled for changes, in layering order.
#[derive(Resource, Debug, Clone)]
pub struct ConfigReloadSettings {
    pub paths: Vec<PathBuf>,
    pub interval_secs: f32,
}

impl Default for ConfigReloadSettings {
    fn default() -> Self {
        Self {
            paths: vec![
                PathBuf::from("assets/config/game.ron"),
                PathBuf::from("assets/config/game.local.ron"),
            ],
            interval_secs: 0.5,
        }
    }
}

#[derive(Resource, Debug)]
struct ConfigReloadState {
    last_mod: HashMap<PathBuf, SystemTime>,
    timer: Timer,
}

impl FromWorld for ConfigReloadState {
    fn from_world(_world: &mut World) -> Self {
        Self {
            last_mod: HashMap::new(),
            timer: Timer::from_seconds(0.5, TimerMode::Repeating),
        }
    }
}

pub struct ConfigHotReloadPlugin;

impl Plugin for ConfigHotReloadPlugin {
    fn build(&self, app: &mut App) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            app.init_resource::<ConfigReloadSettings>()
                .init_resource::<ConfigReloadState>()
                .add_systems(Update, poll_and_reload_config);
        }
    }
}

fn poll_and_reload_config(
    time: Res<Time<Real>>,
    settings: Res<ConfigReloadSettings>,
    mut state: ResMut<ConfigReloadState>,
    mut cfg_res: ResMut<GameConfig>,
    mut windows: Query<&mut Window>,
) {
    if (state.timer.duration().as_secs_f32() - settings.interval_secs).abs() > f32::EPSILON {
        state
            .timer
            .set_duration(std::time::Duration::from_secs_f32(settings.interval_secs.max(0.05)));
    }
    if !state.timer.tick(time.delta()).finished() {
        return;
    }
    let mut dirty = false;
    for path in &settings.paths {
        let Ok(mod_time) = std::fs::metadata(path).and_then(|m| m.modified()) else {
            continue;
        };
        match state.last_mod.insert(path.clone(), mod_time) {
            // First sighting only records the timestamp; startup already loaded this file.
            None => {}
            Some(prev) if mod_time > prev => dirty = true,
            Some(_) => {}
        }
    }
    if !dirty {
        return;
    }
    let (mut new_cfg, _used, errors) = GameConfig::load_layered(settings.paths.iter());
    for e in errors {
        warn!(target: "config", "CONFIG HOT-RELOAD issue: {e}");
    }
    for w in new_cfg.validate() {
        warn!(target: "config", "{w}");
    }
    // Cubes in play may already sit above a shorter tier list's maximum level.
    let current_tiers = cfg_res.cubes.tier_colors.len();
    if new_cfg.cubes.tier_colors.len() < current_tiers {
        warn!(
            target: "config",
            "hot-reload drops cube tiers ({} -> {}); keeping the current {} until relaunch",
            current_tiers,
            new_cfg.cubes.tier_colors.len(),
            current_tiers
        );
        new_cfg.cubes.tier_colors = cfg_res.cubes.tier_colors.clone();
    }
    if *cfg_res == new_cfg {
        return;
    }
    info!(target: "config", "Config hot-reload applied");
    if let Ok(mut window) = windows.single_mut() {
        if window.width() != new_cfg.window.width || window.height() != new_cfg.window.height {
            window.resolution.set(new_cfg.window.width, new_cfg.window.height);
        }
        if window.title != new_cfg.window.title {
            window.title = new_cfg.window.title.clone();
        }
    }
    *cfg_res = new_cfg;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimeUpdateStrategy;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn edited_file_replaces_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ron");
        std::fs::write(&path, "(end_game: (defeat_dwell_secs: 3.0))").unwrap();

        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<GameConfig>();
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app.insert_resource(ConfigReloadSettings {
            paths: vec![path.clone()],
            interval_secs: 0.05,
        });
        app.add_plugins(ConfigHotReloadPlugin);
        for _ in 0..3 {
            app.update();
        }

        // Bump the mtime explicitly so the test does not depend on filesystem granularity.
        {
            let mut f = std::fs::File::create(&path).unwrap();
            writeln!(f, "(end_game: (defeat_dwell_secs: 7.5))").unwrap();
            let later = SystemTime::now() + Duration::from_secs(5);
            f.set_modified(later).unwrap();
        }
        for _ in 0..3 {
            app.update();
        }
        assert_eq!(app.world().resource::<GameConfig>().end_game.defeat_dwell_secs, 7.5);
    }

    #[test]
    fn reload_never_shrinks_tier_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ron");
        std::fs::write(&path, "(end_game: (defeat_dwell_secs: 3.0))").unwrap();

        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<GameConfig>();
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app.insert_resource(ConfigReloadSettings {
            paths: vec![path.clone()],
            interval_secs: 0.05,
        });
        app.add_plugins(ConfigHotReloadPlugin);
        for _ in 0..3 {
            app.update();
        }
        let before = GameConfig::default().cubes.max_level();

        {
            let mut f = std::fs::File::create(&path).unwrap();
            writeln!(
                f,
                "(cubes: (tier_colors: [(1.0, 0.0, 0.0), (0.0, 1.0, 0.0)]), end_game: (defeat_dwell_secs: 4.0))"
            )
            .unwrap();
            let later = SystemTime::now() + Duration::from_secs(5);
            f.set_modified(later).unwrap();
        }
        for _ in 0..3 {
            app.update();
        }
        let cfg = app.world().resource::<GameConfig>();
        assert_eq!(cfg.end_game.defeat_dwell_secs, 4.0, "other tunables still apply");
        assert_eq!(cfg.cubes.max_level(), before);
    }
}
