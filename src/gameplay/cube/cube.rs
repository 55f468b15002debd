use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::components::{Cube, CubeId, CubeIdAllocator};
use crate::core::config::GameConfig;
use crate::physics::rapier::arena::cube_collision_groups;

/// Unit mass so impulse tunables read as velocity changes in pixels per second.
pub const CUBE_MASS: f32 = 1.0;

/// Physics and state components for one cube. Visuals are attached by the rendering
/// layer when it sees the new `Cube`.
pub fn cube_bundle(
    id: CubeId,
    cube: Cube,
    position: Vec2,
    body: RigidBody,
    cfg: &GameConfig,
) -> impl Bundle {
    let half = cfg.cubes.size * 0.5;
    (
        Name::new(format!("Cube#{}", id.0)),
        cube,
        id,
        Transform::from_translation(position.extend(0.0)),
        GlobalTransform::default(),
        Visibility::default(),
        (
            body,
            Collider::cuboid(half, half),
            ColliderMassProperties::Mass(CUBE_MASS),
            Restitution::coefficient(cfg.bounce.restitution),
            Friction::coefficient(cfg.bounce.friction),
            ActiveEvents::COLLISION_EVENTS,
            ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
            cube_collision_groups(),
            ExternalImpulse::default(),
            Sleeping::default(),
        ),
    )
}

/// Allocate an identity and spawn a cube. Returns the new entity.
pub fn spawn_cube(
    commands: &mut Commands,
    ids: &mut CubeIdAllocator,
    cube: Cube,
    position: Vec2,
    body: RigidBody,
    cfg: &GameConfig,
) -> Entity {
    let id = ids.next_id();
    let entity = commands.spawn(cube_bundle(id, cube, position, body, cfg)).id();
    debug!(
        target: "drop",
        "spawned cube {:?} level {} at ({:.1}, {:.1})",
        id,
        cube.level(),
        position.x,
        position.y
    );
    entity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_cubes_get_increasing_ids() {
        let mut world = World::new();
        let cfg = GameConfig::default();
        let mut ids = CubeIdAllocator::default();
        let mut queue = bevy::ecs::world::CommandQueue::default();
        let (a, b) = {
            let mut commands = Commands::new(&mut queue, &world);
            let body = RigidBody::Dynamic;
            let a = spawn_cube(&mut commands, &mut ids, Cube::new(0), Vec2::ZERO, body, &cfg);
            let b = spawn_cube(&mut commands, &mut ids, Cube::settled(3), Vec2::X, body, &cfg);
            (a, b)
        };
        queue.apply(&mut world);
        let ia = *world.get::<CubeId>(a).unwrap();
        let ib = *world.get::<CubeId>(b).unwrap();
        assert!(ib > ia);
        assert_eq!(world.get::<Cube>(b).unwrap().level(), 3);
        assert!(world.get::<ExternalImpulse>(a).is_some());
    }
}
