#[cfg(feature = "debug")]
use super::modes::{DebugState, DebugStats};
#[cfg(feature = "debug")]
use crate::gameplay::session::Session;
#[cfg(feature = "debug")]
use bevy::prelude::*;

#[cfg(feature = "debug")]
pub fn debug_logging_system(
    time: Res<Time<Real>>,
    mut state: ResMut<DebugState>,
    stats: Res<DebugStats>,
    session: Res<Session>,
) {
    state.time_accum += time.delta_secs();
    if state.time_accum >= state.log_interval {
        state.time_accum = 0.0;
        info!(target: "session", "SIM frame={} t={:.3}s fps={:.1} ft_ms={:.1} cubes={} held={} top_level={} merges={} throws={} score={} dwell={:.2} outcome={:?}",
            state.frame_counter,
            time.elapsed_secs(),
            stats.fps,
            stats.frame_time_ms,
            stats.cube_count,
            stats.held_count,
            stats.highest_level,
            stats.merges,
            stats.releases,
            session.score(),
            session.dwell_timer(),
            session.outcome());
    }
}
