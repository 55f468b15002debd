//! Static container colliders plus the two sensor zones the gameplay watches.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::config::GameConfig;
use crate::physics::zones::{DropZone, OverflowZone, ZoneOccupancy};

/// Collision layer shared by every cube body. Zones only report bodies in this group.
pub const CUBE_GROUP: Group = Group::GROUP_1;
pub const WALL_GROUP: Group = Group::GROUP_2;
pub const ZONE_GROUP: Group = Group::GROUP_3;

#[derive(Component, Debug)]
pub struct ArenaWall {
    pub size: Vec2,
}

pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_arena);
    }
}

pub fn cube_collision_groups() -> CollisionGroups {
    CollisionGroups::new(CUBE_GROUP, Group::ALL)
}

fn zone_bundle(center: Vec2, half: Vec2) -> impl Bundle {
    (
        Collider::cuboid(half.x, half.y),
        Sensor,
        ActiveEvents::COLLISION_EVENTS,
        ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
        CollisionGroups::new(ZONE_GROUP, CUBE_GROUP),
        ZoneOccupancy::default(),
        Transform::from_xyz(center.x, center.y, 0.0),
        GlobalTransform::default(),
    )
}

pub(crate) fn spawn_arena(mut commands: Commands, cfg: Res<GameConfig>) {
    let arena = &cfg.arena;
    let half_w = arena.width * 0.5;
    let half_h = arena.height * 0.5;
    let t = arena.wall_thickness.max(2.0);

    // floor, left, right
    let walls = [
        ("Floor", Vec2::new(0.0, -half_h), Vec2::new(arena.width + t * 2.0, t)),
        ("WallLeft", Vec2::new(-half_w - t * 0.5, 0.0), Vec2::new(t, arena.height)),
        ("WallRight", Vec2::new(half_w + t * 0.5, 0.0), Vec2::new(t, arena.height)),
    ];
    for (name, center, size) in walls {
        commands.spawn((
            Name::new(name),
            ArenaWall { size },
            RigidBody::Fixed,
            Collider::cuboid(size.x * 0.5, size.y * 0.5),
            Friction::coefficient(cfg.bounce.friction),
            CollisionGroups::new(WALL_GROUP, Group::ALL),
            Transform::from_xyz(center.x, center.y, 0.0),
            GlobalTransform::default(),
        ));
    }

    let d = &cfg.drop;
    commands.spawn((
        Name::new("DropZone"),
        DropZone,
        zone_bundle(d.spawn_point(), Vec2::new(d.zone_half_width, d.zone_half_height)),
    ));

    let band = arena.overflow_zone_height.max(1.0);
    commands.spawn((
        Name::new("OverflowZone"),
        OverflowZone,
        zone_bundle(
            Vec2::new(0.0, arena.overflow_line_y + band * 0.5),
            Vec2::new(half_w, band * 0.5),
        ),
    ));
    info!(
        target: "physics",
        "arena {}x{} spawned; overflow line at y={}",
        arena.width, arena.height, arena.overflow_line_y
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_spawns_walls_and_one_zone_of_each_kind() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<GameConfig>();
        app.add_plugins(ArenaPlugin);
        app.update();
        let world = app.world_mut();
        assert_eq!(world.query::<&ArenaWall>().iter(world).count(), 3);
        assert_eq!(
            world.query_filtered::<&ZoneOccupancy, With<DropZone>>().iter(world).count(),
            1
        );
        let overflow: Vec<&Transform> = world
            .query_filtered::<&Transform, With<OverflowZone>>()
            .iter(world)
            .collect();
        assert_eq!(overflow.len(), 1);
        assert!(overflow[0].translation.y > GameConfig::default().arena.overflow_line_y);
    }
}
