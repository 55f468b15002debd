//! Sensor volumes watched by gameplay: the drop zone (spawn gate) and the overflow zone
//! (defeat dwell). Occupancy is a set of bodies, so it can never go negative.

use bevy::prelude::*;
use std::collections::HashSet;

/// Spawn area above the container; no new cube spawns while a cube is inside it.
#[derive(Component, Debug)]
pub struct DropZone;

/// Band at the top of the container; settled cubes lingering here cause defeat.
#[derive(Component, Debug)]
pub struct OverflowZone;

/// Bodies currently intersecting a sensor zone.
#[derive(Component, Debug, Default, Clone)]
pub struct ZoneOccupancy {
    occupants: HashSet<Entity>,
}

impl ZoneOccupancy {
    /// Returns true if the body was not already inside.
    pub fn enter(&mut self, body: Entity) -> bool {
        self.occupants.insert(body)
    }

    /// Returns false for bodies that were never recorded (the exit is ignored).
    pub fn exit(&mut self, body: Entity) -> bool {
        self.occupants.remove(&body)
    }

    pub fn contains(&self, body: Entity) -> bool {
        self.occupants.contains(&body)
    }

    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.occupants.iter().copied()
    }

    pub fn clear(&mut self) {
        self.occupants.clear();
    }

    /// Drop bodies that no longer exist (despawned without an exit report).
    pub fn retain(&mut self, mut keep: impl FnMut(Entity) -> bool) {
        self.occupants.retain(|e| keep(*e));
    }
}

/// A body entered or left a sensor zone.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneContact {
    pub zone: Entity,
    pub body: Entity,
    pub entered: bool,
}

pub(crate) fn apply_zone_contacts(
    mut events: EventReader<ZoneContact>,
    mut zones: Query<&mut ZoneOccupancy>,
) {
    for ev in events.read() {
        let Ok(mut occupancy) = zones.get_mut(ev.zone) else {
            continue;
        };
        if ev.entered {
            occupancy.enter(ev.body);
        } else if !occupancy.exit(ev.body) {
            debug!(target: "physics", "zone {:?}: exit for unknown body {:?} ignored", ev.zone, ev.body);
        }
    }
}
