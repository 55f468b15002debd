use bevy::prelude::*;

use crate::core::components::{Cube, CubeIdAllocator};
use crate::core::config::GameConfig;
use crate::core::system::system_order::{RestartSet, SessionSet};
use crate::gameplay::merge::MaxLevelReached;
use crate::physics::zones::{OverflowZone, ZoneOccupancy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Victory,
    Defeat,
}

/// Score and end-of-game state for the current run. The session systems are its only
/// writers apart from the merge resolver's `add_score`.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct Session {
    score: u64,
    dwell_timer: f32,
    outcome: Option<GameOutcome>,
}

impl Session {
    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Seconds settled cubes have continuously occupied the overflow zone.
    #[inline]
    pub fn dwell_timer(&self) -> f32 {
        self.dwell_timer
    }

    #[inline]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    #[inline]
    pub fn is_ended(&self) -> bool {
        self.outcome.is_some()
    }

    /// Returns false (and changes nothing) once the game has ended.
    pub fn add_score(&mut self, amount: u64) -> bool {
        if self.is_ended() {
            return false;
        }
        self.score = self.score.saturating_add(amount);
        true
    }

    /// Advance the overflow dwell timer for one tick. `settled` is the number of settled
    /// cubes inside the overflow zone. Returns true when this call latched defeat.
    pub fn track_overflow(&mut self, settled: usize, dt: f32, threshold: f32) -> bool {
        if self.is_ended() {
            return false;
        }
        if settled == 0 {
            self.dwell_timer = 0.0;
            return false;
        }
        self.dwell_timer += dt.max(0.0);
        if self.dwell_timer >= threshold {
            return self.latch(GameOutcome::Defeat);
        }
        false
    }

    /// One-shot: only the first outcome sticks. Returns true if this call latched.
    pub fn latch(&mut self, outcome: GameOutcome) -> bool {
        if self.is_ended() {
            return false;
        }
        self.outcome = Some(outcome);
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Run condition for systems that must stop once the game is over.
pub fn session_active(session: Res<Session>) -> bool {
    !session.is_ended()
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreChanged {
    pub score: u64,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameEnded {
    pub outcome: GameOutcome,
    pub final_score: u64,
}

/// Ask for a fresh run. Every plugin resets its own state when it sees this.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RestartRequested;

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Session>()
            .add_event::<ScoreChanged>()
            .add_event::<GameEnded>()
            .add_event::<RestartRequested>()
            .add_event::<MaxLevelReached>()
            .add_systems(Update, restart_session.in_set(RestartSet))
            .add_systems(
                Update,
                (latch_victory, track_overflow_dwell, announce_score)
                    .chain()
                    .in_set(SessionSet),
            );
    }
}

fn finish(
    session: &Session,
    outcome: GameOutcome,
    ended: &mut EventWriter<GameEnded>,
    time: &mut Time<Virtual>,
) {
    info!(
        target: "session",
        "game over: {:?} with score {}",
        outcome,
        session.score()
    );
    ended.write(GameEnded {
        outcome,
        final_score: session.score(),
    });
    time.pause();
}

/// The resolver latches victory on the spot; this announces it and pauses the game.
fn latch_victory(
    mut reached: EventReader<MaxLevelReached>,
    mut session: ResMut<Session>,
    mut ended: EventWriter<GameEnded>,
    mut time: ResMut<Time<Virtual>>,
) {
    // Drain even when ended so stale events never leak into the next run.
    let Some(ev) = reached.read().last().copied() else {
        return;
    };
    session.latch(GameOutcome::Victory);
    if session.outcome() == Some(GameOutcome::Victory) && !time.is_paused() {
        debug!(target: "session", "cube {:?} reached level {}", ev.id, ev.level);
        finish(&session, GameOutcome::Victory, &mut ended, &mut time);
    }
}

fn track_overflow_dwell(
    time: Res<Time>,
    cfg: Res<GameConfig>,
    zones: Query<&ZoneOccupancy, With<OverflowZone>>,
    cubes: Query<&Cube>,
    mut session: ResMut<Session>,
    mut ended: EventWriter<GameEnded>,
    mut virtual_time: ResMut<Time<Virtual>>,
    mut warned: Local<bool>,
) {
    if session.is_ended() {
        return;
    }
    let Ok(occupancy) = zones.single() else {
        if !*warned {
            warn!(target: "session", "no overflow zone; defeat detection disabled");
            *warned = true;
        }
        return;
    };
    let settled = occupancy
        .iter()
        .filter(|e| {
            cubes
                .get(*e)
                .is_ok_and(|c| c.is_mergeable() && !c.is_destroyed())
        })
        .count();
    if session.track_overflow(settled, time.delta_secs(), cfg.end_game.defeat_dwell_secs) {
        finish(&session, GameOutcome::Defeat, &mut ended, &mut virtual_time);
    }
}

fn announce_score(
    session: Res<Session>,
    mut last: Local<Option<u64>>,
    mut changed: EventWriter<ScoreChanged>,
) {
    let score = session.score();
    if *last != Some(score) {
        *last = Some(score);
        changed.write(ScoreChanged { score });
    }
}

fn restart_session(
    mut commands: Commands,
    mut restarts: EventReader<RestartRequested>,
    cubes: Query<Entity, With<Cube>>,
    mut session: ResMut<Session>,
    mut ids: ResMut<CubeIdAllocator>,
    mut time: ResMut<Time<Virtual>>,
) {
    if restarts.read().last().is_none() {
        return;
    }
    let mut removed = 0usize;
    for e in cubes.iter() {
        commands.entity(e).despawn();
        removed += 1;
    }
    session.reset();
    ids.reset();
    time.unpause();
    info!(target: "session", "restart: removed {removed} cubes");
}
