//! Merge resolution driven by injected contact reports.

mod common;

use bevy::prelude::*;
use bevy_rapier2d::prelude::{CollisionEvent, ExternalImpulse, Sleeping};
use bevy_rapier2d::rapier::geometry::CollisionEventFlags;

use common::*;
use cube_merge::gameplay::session::{GameOutcome, RestartRequested, Session};
use cube_merge::physics::contacts::CubeContact;
use cube_merge::{Cube, CubeId, GameConfig};

#[test]
fn equal_cubes_merge_into_higher_identity() {
    let mut app = make_app(GameConfig::default());
    let a = spawn_settled(&mut app, 2, -10.0);
    let b = spawn_settled(&mut app, 2, 10.0);

    app.world_mut().send_event(CubeContact::begin(a, b));
    app.update();

    let survivor = cube(&app, b).expect("higher identity survives");
    assert_eq!(survivor.level(), 3);
    assert!(cube(&app, a).is_none(), "consumed cube is despawned");
    assert_eq!(app.world().resource::<Session>().score(), 4);

    let merges = &app.world().resource::<Merges>().0;
    assert_eq!(merges.len(), 1);
    assert_eq!(merges[0].initiator, b);
    assert_eq!(merges[0].consumed, a);
    assert_eq!(merges[0].level, 2);
    assert_eq!(merges[0].resulting_level, 3);
    assert_eq!(merges[0].position, Vec2::new(10.0, 0.0));
    assert!(merges[0].initiator_id > merges[0].consumed_id);

    let impulse = app.world().get::<ExternalImpulse>(b).unwrap();
    assert!(impulse.impulse.y > 0.0, "survivor gets an upward pop");
    assert!(!app.world().get::<Sleeping>(b).unwrap().sleeping);
}

#[test]
fn repeated_reports_merge_exactly_once() {
    let mut app = make_app(GameConfig::default());
    let a = spawn_settled(&mut app, 1, 0.0);
    let b = spawn_settled(&mut app, 1, 1.0);

    app.world_mut().send_event(CubeContact::begin(b, a));
    for _ in 0..3 {
        app.world_mut().send_event(CubeContact::persist(a, b));
    }
    app.update();
    app.world_mut().send_event(CubeContact::persist(a, b));
    app.update();

    assert_eq!(app.world().resource::<Merges>().0.len(), 1);
    assert_eq!(app.world().resource::<Session>().score(), 2);
    assert_eq!(cube(&app, b).unwrap().level(), 2);
}

#[test]
fn different_levels_and_held_cubes_do_not_merge() {
    let mut app = make_app(GameConfig::default());
    let a = spawn_settled(&mut app, 1, 0.0);
    let b = spawn_settled(&mut app, 2, 1.0);
    let held = {
        let id = CubeId(999);
        app.world_mut()
            .spawn((Cube::new(1), id, Transform::default()))
            .id()
    };

    app.world_mut().send_event(CubeContact::begin(a, b));
    app.world_mut().send_event(CubeContact::begin(a, held));
    app.world_mut().send_event(CubeContact::begin(a, a));
    app.update();

    assert!(app.world().resource::<Merges>().0.is_empty());
    assert_eq!(cube_count(&mut app), 3);
    assert_eq!(app.world().resource::<Session>().score(), 0);
}

#[test]
fn three_way_contact_merges_one_pair() {
    let mut app = make_app(GameConfig::default());
    let a = spawn_settled(&mut app, 1, 0.0);
    let b = spawn_settled(&mut app, 1, 1.0);
    let c = spawn_settled(&mut app, 1, 2.0);

    app.world_mut().send_event(CubeContact::begin(a, b));
    app.world_mut().send_event(CubeContact::begin(b, c));
    app.world_mut().send_event(CubeContact::begin(a, c));
    app.update();

    let merges = &app.world().resource::<Merges>().0;
    assert_eq!(merges.len(), 1);
    assert_eq!(cube(&app, b).unwrap().level(), 2);
    assert_eq!(cube(&app, c).unwrap().level(), 1);
    assert!(cube(&app, a).is_none());
}

#[test]
fn rapier_collision_events_drive_merges() {
    let mut app = make_app(GameConfig::default());
    let a = spawn_settled(&mut app, 0, 0.0);
    let b = spawn_settled(&mut app, 0, 1.0);

    app.world_mut()
        .send_event(CollisionEvent::Started(a, b, CollisionEventFlags::empty()));
    app.update();
    app.update();

    assert_eq!(app.world().resource::<Merges>().0.len(), 1);
    assert_eq!(cube(&app, b).unwrap().level(), 1);
    assert_eq!(app.world().resource::<Session>().score(), 1);
}

#[test]
fn max_level_merge_stays_at_max_and_wins_once() {
    let mut cfg = GameConfig::default();
    cfg.cubes.tier_colors.truncate(3);
    let mut app = make_app(cfg);
    let a = spawn_settled(&mut app, 2, 0.0);
    let b = spawn_settled(&mut app, 2, 1.0);
    let c = spawn_settled(&mut app, 1, 2.0);
    let d = spawn_settled(&mut app, 1, 3.0);

    app.world_mut().send_event(CubeContact::begin(a, b));
    app.update();

    assert_eq!(cube(&app, b).unwrap().level(), 2, "level never exceeds max");
    let session = app.world().resource::<Session>();
    assert_eq!(session.outcome(), Some(GameOutcome::Victory));
    assert_eq!(session.score(), 4);
    assert!(app.world().resource::<Time<Virtual>>().is_paused());

    // Nothing merges once the game is over.
    app.world_mut().send_event(CubeContact::begin(c, d));
    app.update();
    assert_eq!(app.world().resource::<Merges>().0.len(), 1);
    assert_eq!(cube(&app, d).unwrap().level(), 1);
    assert_eq!(app.world().resource::<Session>().score(), 4);

    let endings = &app.world().resource::<Endings>().0;
    assert_eq!(endings.len(), 1);
    assert_eq!(endings[0].outcome, GameOutcome::Victory);
    assert_eq!(endings[0].final_score, 4);
}

#[test]
fn contacts_after_a_winning_merge_in_the_same_tick_are_dropped() {
    let mut cfg = GameConfig::default();
    cfg.cubes.tier_colors.truncate(3);
    let mut app = make_app(cfg);
    let a = spawn_settled(&mut app, 2, 0.0);
    let b = spawn_settled(&mut app, 2, 1.0);
    let c = spawn_settled(&mut app, 1, 2.0);
    let d = spawn_settled(&mut app, 1, 3.0);

    app.world_mut().send_event(CubeContact::begin(a, b));
    app.world_mut().send_event(CubeContact::begin(c, d));
    app.update();

    assert_eq!(app.world().resource::<Merges>().0.len(), 1);
    assert_eq!(cube(&app, c).unwrap().level(), 1);
    assert_eq!(cube(&app, d).unwrap().level(), 1);
    let session = app.world().resource::<Session>();
    assert_eq!(session.outcome(), Some(GameOutcome::Victory));
    assert_eq!(session.score(), 4);
    let endings = &app.world().resource::<Endings>().0;
    assert_eq!(endings.len(), 1);
    assert_eq!(endings[0].final_score, 4);

    // The skipped pair is not replayed after a restart.
    app.world_mut().send_event(RestartRequested);
    app.update();
    assert_eq!(app.world().resource::<Merges>().0.len(), 1);
    assert_eq!(app.world().resource::<Session>().score(), 0);
}
