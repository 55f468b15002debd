#[cfg(feature = "debug")]
use super::modes::{DebugState, DebugStats};
#[cfg(feature = "debug")]
use crate::core::components::{Cube, HeldCube};
#[cfg(feature = "debug")]
use crate::gameplay::drop::CubeReleased;
#[cfg(feature = "debug")]
use crate::gameplay::merge::CubeMerged;
#[cfg(feature = "debug")]
use crate::gameplay::session::RestartRequested;
#[cfg(feature = "debug")]
use bevy::prelude::*;

#[cfg(feature = "debug")]
pub fn debug_stats_collect_system(
    time: Res<Time<Real>>,
    mut state: ResMut<DebugState>,
    mut stats: ResMut<DebugStats>,
    q_cubes: Query<(&Cube, Has<HeldCube>)>,
    mut merged: EventReader<CubeMerged>,
    mut released: EventReader<CubeReleased>,
    mut restarts: EventReader<RestartRequested>,
) {
    state.frame_counter += 1;
    let dt = time.delta_secs().max(1e-6);
    let inst_fps = 1.0 / dt;
    if stats.fps == 0.0 {
        stats.fps = inst_fps;
    } else {
        stats.fps = stats.fps * 0.9 + inst_fps * 0.1;
    }
    let inst_ms = dt * 1000.0;
    if stats.frame_time_ms == 0.0 {
        stats.frame_time_ms = inst_ms;
    } else {
        stats.frame_time_ms = stats.frame_time_ms * 0.9 + inst_ms * 0.1;
    }
    if restarts.read().count() > 0 {
        stats.merges = 0;
        stats.releases = 0;
    }
    stats.merges += merged.read().count() as u64;
    stats.releases += released.read().count() as u64;
    let (mut count, mut held, mut highest) = (0usize, 0usize, 0u32);
    for (cube, is_held) in q_cubes.iter() {
        if cube.is_destroyed() {
            continue;
        }
        count += 1;
        held += is_held as usize;
        highest = highest.max(cube.level());
    }
    stats.cube_count = count;
    stats.held_count = held;
    stats.highest_level = highest;
}
