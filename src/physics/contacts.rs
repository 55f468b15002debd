//! Translates rapier collision events into the per-tick contact queue the merge resolver
//! consumes.
//!
//! Rapier reports a pair once when it starts touching and once when it stops. Gameplay
//! wants the engine-style "enter + stay" semantics, so every pair that is still touching
//! is re-reported as [`ContactPhase::Persist`] on each following tick until it stops.

use bevy::prelude::*;
use bevy_rapier2d::prelude::CollisionEvent;
use std::collections::BTreeSet;

use super::zones::{apply_zone_contacts, ZoneContact, ZoneOccupancy};
use crate::core::components::Cube;
use crate::core::system::system_order::{ContactIngestSet, RestartSet};
use crate::gameplay::session::RestartRequested;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    /// First tick the pair touches.
    Begin,
    /// Pair kept touching since an earlier tick.
    Persist,
}

/// Two cube bodies touching. The same pair may appear several times in one tick.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubeContact {
    pub a: Entity,
    pub b: Entity,
    pub phase: ContactPhase,
}

impl CubeContact {
    pub fn begin(a: Entity, b: Entity) -> Self {
        Self { a, b, phase: ContactPhase::Begin }
    }
    pub fn persist(a: Entity, b: Entity) -> Self {
        Self { a, b, phase: ContactPhase::Persist }
    }
}

/// Cube pairs between a rapier `Started` and `Stopped`, in stable order.
#[derive(Resource, Debug, Default)]
pub struct ActiveCubeContacts {
    pairs: BTreeSet<(Entity, Entity)>,
}

impl ActiveCubeContacts {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
    pub fn contains(&self, a: Entity, b: Entity) -> bool {
        self.pairs.contains(&ordered(a, b))
    }
}

#[inline]
fn ordered(a: Entity, b: Entity) -> (Entity, Entity) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

pub struct ContactsPlugin;

impl Plugin for ContactsPlugin {
    fn build(&self, app: &mut App) {
        // CollisionEvent is normally registered by RapierPhysicsPlugin; registering it here
        // too keeps headless setups (no rapier) working. `add_event` is idempotent.
        app.add_event::<CollisionEvent>()
            .add_event::<CubeContact>()
            .add_event::<ZoneContact>()
            .add_event::<RestartRequested>()
            .init_resource::<ActiveCubeContacts>()
            .add_systems(Update, reset_contacts_on_restart.in_set(RestartSet))
            .add_systems(
                Update,
                (translate_collision_events, apply_zone_contacts)
                    .chain()
                    .in_set(ContactIngestSet),
            );
    }
}

pub(crate) fn translate_collision_events(
    mut collisions: EventReader<CollisionEvent>,
    cubes: Query<(), With<Cube>>,
    zones: Query<(), With<ZoneOccupancy>>,
    mut active: ResMut<ActiveCubeContacts>,
    mut cube_contacts: EventWriter<CubeContact>,
    mut zone_contacts: EventWriter<ZoneContact>,
) {
    // Pairs carried over from earlier ticks (minus despawned bodies) persist first.
    active
        .pairs
        .retain(|(a, b)| cubes.contains(*a) && cubes.contains(*b));
    for &(a, b) in active.pairs.iter() {
        cube_contacts.write(CubeContact::persist(a, b));
    }

    for ev in collisions.read() {
        match *ev {
            CollisionEvent::Started(e1, e2, _flags) => {
                let (c1, c2) = (cubes.contains(e1), cubes.contains(e2));
                if c1 && c2 {
                    if active.pairs.insert(ordered(e1, e2)) {
                        cube_contacts.write(CubeContact::begin(e1, e2));
                    }
                } else if c2 && zones.contains(e1) {
                    zone_contacts.write(ZoneContact { zone: e1, body: e2, entered: true });
                } else if c1 && zones.contains(e2) {
                    zone_contacts.write(ZoneContact { zone: e2, body: e1, entered: true });
                }
            }
            CollisionEvent::Stopped(e1, e2, _flags) => {
                active.pairs.remove(&ordered(e1, e2));
                // The body may already be despawned, so only the zone side is checked.
                if zones.contains(e1) {
                    zone_contacts.write(ZoneContact { zone: e1, body: e2, entered: false });
                } else if zones.contains(e2) {
                    zone_contacts.write(ZoneContact { zone: e2, body: e1, entered: false });
                }
            }
        }
    }
}

fn reset_contacts_on_restart(
    mut restarts: EventReader<RestartRequested>,
    mut active: ResMut<ActiveCubeContacts>,
    mut zones: Query<&mut ZoneOccupancy>,
) {
    if restarts.read().last().is_none() {
        return;
    }
    active.pairs.clear();
    for mut occupancy in zones.iter_mut() {
        occupancy.clear();
    }
}
