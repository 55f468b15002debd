//! Headless harness shared by the integration tests: game rules only, no window,
//! renderer or physics step. Contacts and zone events are injected directly.
#![allow(dead_code)]

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier2d::prelude::{ExternalImpulse, Sleeping};

use cube_merge::core::system::system_order::{MergeSet, SessionSet};
use cube_merge::gameplay::merge::CubeMerged;
use cube_merge::gameplay::session::GameEnded;
use cube_merge::{Cube, CubeIdAllocator, GameConfig, RngSeed, SimulationPlugin};

pub const STEP: Duration = Duration::from_millis(100);

#[derive(Resource, Default)]
pub struct Merges(pub Vec<CubeMerged>);

#[derive(Resource, Default)]
pub struct Endings(pub Vec<GameEnded>);

fn record_merges(mut ev: EventReader<CubeMerged>, mut out: ResMut<Merges>) {
    out.0.extend(ev.read().copied());
}

fn record_endings(mut ev: EventReader<GameEnded>, mut out: ResMut<Endings>) {
    out.0.extend(ev.read().copied());
}

pub fn make_app(cfg: GameConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(STEP));
    app.insert_resource(cfg);
    app.insert_resource(RngSeed(42));
    app.add_plugins(SimulationPlugin);
    app.init_resource::<Merges>().init_resource::<Endings>();
    app.add_systems(Update, record_merges.after(MergeSet));
    app.add_systems(Update, record_endings.after(SessionSet));
    app
}

/// A released cube resting in the container, asleep.
pub fn spawn_settled(app: &mut App, level: u32, x: f32) -> Entity {
    let id = app.world_mut().resource_mut::<CubeIdAllocator>().next_id();
    app.world_mut()
        .spawn((
            Cube::settled(level),
            id,
            Transform::from_xyz(x, 0.0, 0.0),
            ExternalImpulse::default(),
            Sleeping {
                sleeping: true,
                ..Default::default()
            },
        ))
        .id()
}

pub fn cube(app: &App, e: Entity) -> Option<Cube> {
    app.world().get::<Cube>(e).copied()
}

pub fn cube_count(app: &mut App) -> usize {
    let world = app.world_mut();
    world.query::<&Cube>().iter(world).count()
}
