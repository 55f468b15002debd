use anyhow::Context;
use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 720.0,
            height: 960.0,
            title: "Cube Merge".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GravityConfig {
    pub y: f32,
}
impl Default for GravityConfig {
    fn default() -> Self {
        Self { y: -980.0 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BounceConfig {
    pub restitution: f32,
    pub friction: f32,
}
impl Default for BounceConfig {
    fn default() -> Self {
        Self {
            restitution: 0.1,
            friction: 0.6,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnRange<T> {
    pub min: T,
    pub max: T,
}
impl<T: Default> Default for SpawnRange<T> {
    fn default() -> Self {
        Self {
            min: Default::default(),
            max: Default::default(),
        }
    }
}

/// Cube geometry and visual tiers. The number of tiers defines the maximum level.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CubeConfig {
    pub size: f32,
    /// sRGB colors, one per level. Level `i` uses `tier_colors[i]`.
    pub tier_colors: Vec<(f32, f32, f32)>,
}
impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            size: 56.0,
            tier_colors: vec![
                (0.93, 0.89, 0.85), // 1
                (0.93, 0.88, 0.78), // 2
                (0.95, 0.69, 0.47), // 4
                (0.96, 0.58, 0.39), // 8
                (0.96, 0.49, 0.37), // 16
                (0.96, 0.37, 0.23), // 32
                (0.93, 0.81, 0.45), // 64
                (0.93, 0.80, 0.38), // 128
                (0.93, 0.78, 0.31), // 256
                (0.93, 0.77, 0.25), // 512
                (0.93, 0.76, 0.18), // 1024
                (0.24, 0.23, 0.20), // 2048
            ],
        }
    }
}
impl CubeConfig {
    /// Highest reachable level (`tiers - 1`, or 0 when no tiers are configured).
    pub fn max_level(&self) -> u32 {
        self.tier_colors.len().saturating_sub(1) as u32
    }
}

/// Cosmetic "pop" applied to the surviving cube of a merge.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MergeConfig {
    /// Impulse per unit of `(level + pop_level_offset)`, upward.
    pub pop_impulse: f32,
    pub pop_level_offset: f32,
}
impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            pop_impulse: 40.0,
            pop_level_offset: 3.5,
        }
    }
}
impl MergeConfig {
    pub fn pop_strength(&self, level: u32) -> f32 {
        self.pop_impulse * (level as f32 + self.pop_level_offset)
    }
}

/// Spawn / hold / throw tunables.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DropConfig {
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub spawn_interval: f32,
    pub throw_force: f32,
    pub throw_direction: (f32, f32),
    pub move_smoothing: f32,
    /// Lateral bounds for the held cube (world x).
    pub slide_range: SpawnRange<f32>,
    pub base_level: u32,
    pub minor_level: u32,
    pub minor_tier_chance: f32,
    /// Half extents of the drop zone sensor centered on the spawn point.
    pub zone_half_width: f32,
    pub zone_half_height: f32,
}
impl Default for DropConfig {
    fn default() -> Self {
        Self {
            spawn_x: 0.0,
            spawn_y: 380.0,
            spawn_interval: 0.5,
            throw_force: 400.0,
            throw_direction: (0.0, -1.0),
            move_smoothing: 15.0,
            slide_range: SpawnRange {
                min: -280.0,
                max: 280.0,
            },
            base_level: 0,
            minor_level: 1,
            minor_tier_chance: 0.25,
            zone_half_width: 310.0,
            zone_half_height: 60.0,
        }
    }
}
impl DropConfig {
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.spawn_x, self.spawn_y)
    }
    pub fn throw_vector(&self) -> Vec2 {
        Vec2::new(self.throw_direction.0, self.throw_direction.1).normalize_or_zero()
            * self.throw_force
    }
}

/// Container geometry and the overflow line watched for defeat.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
    pub wall_thickness: f32,
    /// World y of the bottom edge of the overflow zone.
    pub overflow_line_y: f32,
    pub overflow_zone_height: f32,
}
impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 900.0,
            wall_thickness: 20.0,
            overflow_line_y: 220.0,
            overflow_zone_height: 60.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EndGameConfig {
    pub defeat_dwell_secs: f32,
}
impl Default for EndGameConfig {
    fn default() -> Self {
        Self {
            defeat_dwell_secs: 3.0,
        }
    }
}

/// Optional clip paths (relative to the asset root). Missing clips are skipped silently.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AudioConfig {
    pub merge_clip: Option<String>,
    pub throw_clip: Option<String>,
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub gravity: GravityConfig,
    pub bounce: BounceConfig,
    pub cubes: CubeConfig,
    pub merge: MergeConfig,
    pub drop: DropConfig,
    pub arena: ArenaConfig,
    pub end_game: EndGameConfig,
    pub audio: AudioConfig,
    pub rapier_debug: bool,
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        ron::from_str(&data).with_context(|| format!("parse RON {}", path.display()))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(format!("{e:#}"))),
        }
    }

    /// Load several RON files, later files overriding earlier ones key by key.
    /// Returns the config, the paths actually used, and per-file errors.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let found = bm.iter_mut().find(|(ek, _)| **ek == k);
                        match found {
                            Some((_, ev)) => merge_value(ev, v),
                            None => {
                                bm.insert(k, v);
                            }
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        match merged.as_mut() {
                            Some(cur) => merge_value(cur, val),
                            None => merged = Some(val),
                        }
                        used.push(path_ref.display().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        let Some(val) = merged else {
            return (GameConfig::default(), used, errors);
        };
        match val.into_rust::<GameConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!(
                    "failed to deserialize merged config; using defaults: {e}"
                ));
                (GameConfig::default(), used, errors)
            }
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        }
        if self.gravity.y >= 0.0 {
            w.push(format!(
                "gravity.y is {} ; cubes will not fall into the container",
                self.gravity.y
            ));
        }
        if !(0.0..=1.0).contains(&self.bounce.restitution) {
            w.push(format!(
                "bounce.restitution {} outside 0..1",
                self.bounce.restitution
            ));
        }
        if self.cubes.size <= 0.0 {
            w.push("cubes.size must be > 0".into());
        }
        if self.cubes.tier_colors.is_empty() {
            w.push("cubes.tier_colors is empty; every cube falls back to a single tier".into());
        }
        if self.cubes.max_level() > 62 {
            w.push(format!(
                "cubes.tier_colors has {} tiers; scores above 2^62 overflow",
                self.cubes.tier_colors.len()
            ));
        }
        if self.merge.pop_impulse < 0.0 {
            w.push("merge.pop_impulse negative -> merged cubes get pushed down".into());
        }
        let d = &self.drop;
        if d.spawn_interval < 0.0 {
            w.push("drop.spawn_interval negative -> treated as 0".into());
        }
        if d.throw_force < 0.0 {
            w.push("drop.throw_force negative".into());
        }
        if d.throw_direction.0 == 0.0 && d.throw_direction.1 == 0.0 {
            w.push("drop.throw_direction is zero; released cubes only fall".into());
        }
        if d.move_smoothing <= 0.0 {
            w.push("drop.move_smoothing must be > 0 or the held cube never moves".into());
        }
        if d.slide_range.min > d.slide_range.max {
            w.push(format!(
                "drop.slide_range min ({}) greater than max ({})",
                d.slide_range.min, d.slide_range.max
            ));
        }
        if !(0.0..=1.0).contains(&d.minor_tier_chance) {
            w.push(format!(
                "drop.minor_tier_chance {} outside 0..1",
                d.minor_tier_chance
            ));
        }
        let max = self.cubes.max_level();
        if d.base_level > max || d.minor_level > max {
            w.push(format!(
                "drop spawn levels ({}, {}) exceed max level {max}; clamped",
                d.base_level, d.minor_level
            ));
        }
        if self.arena.overflow_line_y >= d.spawn_y {
            w.push(format!(
                "arena.overflow_line_y {} is at or above the spawn point {}",
                self.arena.overflow_line_y, d.spawn_y
            ));
        }
        if self.end_game.defeat_dwell_secs <= 0.0 {
            w.push("end_game.defeat_dwell_secs <= 0 -> any overflow ends the game at once".into());
        }
        w
    }
}
