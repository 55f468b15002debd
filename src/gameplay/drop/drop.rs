use bevy::prelude::*;
use bevy_rapier2d::prelude::{ExternalImpulse, RigidBody};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::components::{Cube, CubeId, CubeIdAllocator, HeldCube, RngSeed};
use crate::core::config::{DropConfig, GameConfig};
use crate::core::system::system_order::{DropSet, RestartSet};
use crate::gameplay::cube::spawn_cube;
use crate::gameplay::session::{session_active, RestartRequested};
use crate::interaction::input::PointerInput;
use crate::physics::zones::{DropZone, ZoneOccupancy};

/// Where the spawn/throw cycle currently is. `Released` is not stored: releasing emits
/// [`CubeReleased`] and goes straight back to `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropPhase {
    #[default]
    Empty,
    Spawning,
    Held(Entity),
}

#[derive(Resource, Debug)]
pub struct DropController {
    phase: DropPhase,
    spawn_timer: f32,
    enabled: bool,
}

impl Default for DropController {
    fn default() -> Self {
        Self {
            phase: DropPhase::Empty,
            spawn_timer: 0.0,
            enabled: true,
        }
    }
}

impl DropController {
    pub fn phase(&self) -> DropPhase {
        self.phase
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn held(&self) -> Option<Entity> {
        match self.phase {
            DropPhase::Held(e) => Some(e),
            _ => None,
        }
    }

    /// Advance the spawn timer while empty. Returns true on the transition to `Spawning`.
    pub fn tick(&mut self, dt: f32, interval: f32, zone_clear: bool) -> bool {
        if !self.enabled || self.phase != DropPhase::Empty {
            return false;
        }
        self.spawn_timer += dt.max(0.0);
        if self.spawn_timer >= interval.max(0.0) && zone_clear {
            self.phase = DropPhase::Spawning;
            return true;
        }
        false
    }

    pub fn hold(&mut self, cube: Entity) {
        self.phase = DropPhase::Held(cube);
    }

    /// Leave `Held`, returning the released cube. The timer restarts from zero.
    pub fn release(&mut self) -> Option<Entity> {
        let held = self.held()?;
        self.phase = DropPhase::Empty;
        self.spawn_timer = 0.0;
        Some(held)
    }

    pub fn reset(&mut self) {
        self.phase = DropPhase::Empty;
        self.spawn_timer = 0.0;
    }
}

/// RNG behind the spawn level roll, seeded from [`RngSeed`].
#[derive(Resource)]
pub struct SpawnRng(pub StdRng);

impl FromWorld for SpawnRng {
    fn from_world(world: &mut World) -> Self {
        let seed = world.get_resource::<RngSeed>().map(|s| s.0).unwrap_or(0);
        SpawnRng(StdRng::seed_from_u64(seed))
    }
}

/// The held cube was let go and is now in play.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CubeReleased {
    pub cube: Entity,
    pub id: CubeId,
    pub level: u32,
    pub position: Vec2,
}

/// `minor_level` with probability `minor_tier_chance`, else `base_level`, never above max.
pub fn roll_spawn_level(rng: &mut impl Rng, drop: &DropConfig, max_level: u32) -> u32 {
    let level = if rng.gen::<f32>() < drop.minor_tier_chance {
        drop.minor_level
    } else {
        drop.base_level
    };
    level.min(max_level)
}

pub struct DropPlugin;

impl Plugin for DropPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DropController>()
            .init_resource::<SpawnRng>()
            .init_resource::<PointerInput>()
            .add_event::<CubeReleased>()
            .add_event::<RestartRequested>()
            .add_systems(PostStartup, verify_drop_zone)
            .add_systems(Update, reset_drop_on_restart.in_set(RestartSet))
            .add_systems(
                Update,
                (
                    advance_spawn_timer,
                    spawn_held_cube,
                    steer_held_cube,
                    release_held_cube,
                )
                    .chain()
                    .in_set(DropSet)
                    .run_if(session_active),
            );
    }
}

fn verify_drop_zone(zones: Query<(), With<DropZone>>, mut controller: ResMut<DropController>) {
    if zones.is_empty() {
        error!(target: "drop", "no drop zone in the scene; spawning disabled");
        controller.enabled = false;
    }
}

fn advance_spawn_timer(
    time: Res<Time>,
    cfg: Res<GameConfig>,
    zones: Query<&ZoneOccupancy, With<DropZone>>,
    cubes: Query<(), With<Cube>>,
    mut controller: ResMut<DropController>,
) {
    let zone_clear = zones
        .iter()
        .all(|occ| occ.iter().all(|e| !cubes.contains(e)));
    controller.tick(time.delta_secs(), cfg.drop.spawn_interval, zone_clear);
}

fn spawn_held_cube(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    mut ids: ResMut<CubeIdAllocator>,
    mut rng: ResMut<SpawnRng>,
    mut controller: ResMut<DropController>,
) {
    if controller.phase() != DropPhase::Spawning {
        return;
    }
    let level = roll_spawn_level(&mut rng.0, &cfg.drop, cfg.cubes.max_level());
    let entity = spawn_cube(
        &mut commands,
        &mut ids,
        Cube::new(level),
        cfg.drop.spawn_point(),
        RigidBody::KinematicPositionBased,
        &cfg,
    );
    commands.entity(entity).insert(HeldCube);
    controller.hold(entity);
}

fn steer_held_cube(
    time: Res<Time>,
    cfg: Res<GameConfig>,
    pointer: Res<PointerInput>,
    controller: Res<DropController>,
    mut held: Query<&mut Transform, With<HeldCube>>,
) {
    if !pointer.pressed {
        return;
    }
    let (Some(entity), Some(world)) = (controller.held(), pointer.world_position) else {
        return;
    };
    let Ok(mut tf) = held.get_mut(entity) else {
        return;
    };
    let range = &cfg.drop.slide_range;
    let target = world.x.clamp(range.min, range.max.max(range.min));
    let t = (time.delta_secs() * cfg.drop.move_smoothing).min(1.0);
    tf.translation.x += (target - tf.translation.x) * t;
}

fn release_held_cube(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    pointer: Res<PointerInput>,
    mut controller: ResMut<DropController>,
    mut held: Query<(&mut Cube, &CubeId, &Transform, Option<&mut ExternalImpulse>), With<HeldCube>>,
    mut released: EventWriter<CubeReleased>,
) {
    if !pointer.just_released {
        return;
    }
    let Some(entity) = controller.held() else {
        return;
    };
    // Spawn commands may not have been applied yet; try again next release.
    let Ok((mut cube, id, tf, impulse)) = held.get_mut(entity) else {
        return;
    };
    cube.set_mergeable(true);
    let throw = cfg.drop.throw_vector();
    if let Some(mut impulse) = impulse {
        impulse.impulse += throw;
    }
    commands
        .entity(entity)
        .remove::<HeldCube>()
        .insert(RigidBody::Dynamic);
    controller.release();
    let position = tf.translation.truncate();
    released.write(CubeReleased {
        cube: entity,
        id: *id,
        level: cube.level(),
        position,
    });
    info!(target: "drop", "released {:?} level {} at x={:.1}", id, cube.level(), position.x);
}

fn reset_drop_on_restart(
    mut restarts: EventReader<RestartRequested>,
    seed: Res<RngSeed>,
    mut controller: ResMut<DropController>,
    mut rng: ResMut<SpawnRng>,
) {
    if restarts.read().last().is_none() {
        return;
    }
    controller.reset();
    rng.0 = StdRng::seed_from_u64(seed.0);
}
