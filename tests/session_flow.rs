//! Overflow defeat, score bookkeeping and restart.

mod common;

use bevy::prelude::*;
use bevy_rapier2d::prelude::CollisionEvent;
use bevy_rapier2d::rapier::geometry::CollisionEventFlags;

use common::*;
use cube_merge::gameplay::session::{GameOutcome, RestartRequested, Session};
use cube_merge::physics::contacts::CubeContact;
use cube_merge::physics::zones::{OverflowZone, ZoneContact, ZoneOccupancy};
use cube_merge::{Cube, CubeIdAllocator, GameConfig};

fn spawn_overflow_zone(app: &mut App) -> Entity {
    app.world_mut()
        .spawn((OverflowZone, ZoneOccupancy::default()))
        .id()
}

fn dwell(app: &App) -> f32 {
    app.world().resource::<Session>().dwell_timer()
}

#[test]
fn settled_cube_in_overflow_zone_causes_defeat() {
    let mut app = make_app(GameConfig::default());
    let zone = spawn_overflow_zone(&mut app);
    let cube = spawn_settled(&mut app, 3, 0.0);
    app.world_mut().send_event(CollisionEvent::Started(
        zone,
        cube,
        CollisionEventFlags::SENSOR,
    ));

    for _ in 0..20 {
        app.update();
    }
    assert!(dwell(&app) > 1.0);
    assert!(app.world().resource::<Session>().outcome().is_none());

    for _ in 0..20 {
        app.update();
    }
    let session = app.world().resource::<Session>();
    assert_eq!(session.outcome(), Some(GameOutcome::Defeat));
    assert!(app.world().resource::<Time<Virtual>>().is_paused());
    assert_eq!(app.world().resource::<Endings>().0.len(), 1);
}

#[test]
fn dwell_timer_resets_when_zone_empties() {
    let mut app = make_app(GameConfig::default());
    let zone = spawn_overflow_zone(&mut app);
    let cube = spawn_settled(&mut app, 0, 0.0);
    app.world_mut().send_event(ZoneContact {
        zone,
        body: cube,
        entered: true,
    });
    for _ in 0..6 {
        app.update();
    }
    assert!(dwell(&app) > 0.0);

    app.world_mut().send_event(ZoneContact {
        zone,
        body: cube,
        entered: false,
    });
    app.update();
    assert_eq!(dwell(&app), 0.0);

    // A second exit for the same body is ignored; occupancy stays at zero.
    app.world_mut().send_event(ZoneContact {
        zone,
        body: cube,
        entered: false,
    });
    app.update();
    assert!(app.world().get::<ZoneOccupancy>(zone).unwrap().is_empty());
    assert_eq!(dwell(&app), 0.0);
}

#[test]
fn held_cube_in_overflow_zone_is_not_counted() {
    let mut app = make_app(GameConfig::default());
    let zone = spawn_overflow_zone(&mut app);
    let id = app.world_mut().resource_mut::<CubeIdAllocator>().next_id();
    let held = app.world_mut().spawn((Cube::new(0), id)).id();
    app.world_mut().send_event(ZoneContact {
        zone,
        body: held,
        entered: true,
    });
    for _ in 0..40 {
        app.update();
    }
    assert_eq!(dwell(&app), 0.0);
    assert!(app.world().resource::<Session>().outcome().is_none());
}

#[test]
fn restart_returns_to_a_fresh_session() {
    let mut cfg = GameConfig::default();
    cfg.end_game.defeat_dwell_secs = 0.5;
    let mut app = make_app(cfg);
    let zone = spawn_overflow_zone(&mut app);
    let a = spawn_settled(&mut app, 1, 0.0);
    let b = spawn_settled(&mut app, 1, 1.0);
    app.world_mut().send_event(CubeContact::begin(a, b));
    app.world_mut().send_event(ZoneContact {
        zone,
        body: b,
        entered: true,
    });
    for _ in 0..10 {
        app.update();
    }
    {
        let session = app.world().resource::<Session>();
        assert_eq!(session.score(), 2);
        assert_eq!(session.outcome(), Some(GameOutcome::Defeat));
    }

    app.world_mut().send_event(RestartRequested);
    app.update();

    let session = app.world().resource::<Session>();
    assert_eq!(session.score(), 0);
    assert!(session.outcome().is_none());
    assert_eq!(session.dwell_timer(), 0.0);
    assert_eq!(cube_count(&mut app), 0);
    assert!(!app.world().resource::<Time<Virtual>>().is_paused());
    assert!(app.world().get::<ZoneOccupancy>(zone).unwrap().is_empty());
    let next = app.world_mut().resource_mut::<CubeIdAllocator>().next_id();
    assert_eq!(next.0, 1, "identities restart from scratch");
}
