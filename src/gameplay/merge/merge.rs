use bevy::prelude::*;
use bevy_rapier2d::prelude::{ExternalImpulse, Sleeping};

use crate::core::components::{Cube, CubeId, Upgrade};
use crate::core::config::GameConfig;
use crate::core::system::system_order::MergeSet;
use crate::gameplay::session::{session_active, GameOutcome, Session};
use crate::physics::contacts::CubeContact;

/// One successful merge: `initiator` survives one level up, `consumed` is removed.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CubeMerged {
    pub initiator: Entity,
    pub initiator_id: CubeId,
    pub consumed: Entity,
    pub consumed_id: CubeId,
    /// Level both cubes had before the merge.
    pub level: u32,
    pub resulting_level: u32,
    /// Initiator's world position at merge time.
    pub position: Vec2,
}

/// A merge left its survivor at the configured maximum level.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxLevelReached {
    pub cube: Entity,
    pub id: CubeId,
    pub level: u32,
}

/// What one side of a contact does with the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactVerdict {
    /// Not a merge candidate (held, consumed, or different level).
    Ignore,
    /// This side has the larger identity and performs the merge.
    Initiate,
    /// The other side merges; this side only wakes its body.
    Defer,
}

/// Decide the outcome of `this` handling a contact with `other`.
pub fn evaluate_contact(
    this: &Cube,
    this_id: CubeId,
    other: &Cube,
    other_id: CubeId,
) -> ContactVerdict {
    if this_id == other_id || !this.can_merge_with(other) {
        return ContactVerdict::Ignore;
    }
    if this_id > other_id {
        ContactVerdict::Initiate
    } else {
        ContactVerdict::Defer
    }
}

/// State changes of one merge, before side effects are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    pub pre_level: u32,
    pub resulting_level: u32,
    pub score: u64,
    pub reached_max: bool,
}

/// Consume `consumed` into `initiator`. The caller has already checked eligibility.
pub fn execute_merge(initiator: &mut Cube, consumed: &mut Cube, max_level: u32) -> MergeOutcome {
    consumed.set_destroyed();
    let pre_level = initiator.level();
    let score = initiator.value();
    let resulting_level = match initiator.upgrade(max_level) {
        Upgrade::Promoted(level) => level,
        Upgrade::AtMax | Upgrade::Ignored => initiator.level(),
    };
    MergeOutcome {
        pre_level,
        resulting_level,
        score,
        reached_max: resulting_level >= max_level,
    }
}

pub struct MergePlugin;

impl Plugin for MergePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CubeMerged>()
            .add_event::<MaxLevelReached>()
            .add_event::<CubeContact>()
            .add_systems(
                Update,
                (resolve_cube_contacts, despawn_consumed_cubes)
                    .chain()
                    .in_set(MergeSet)
                    .run_if(session_active),
            );
    }
}

type MergeQueryData = (
    &'static mut Cube,
    &'static CubeId,
    &'static Transform,
    Option<&'static mut ExternalImpulse>,
    Option<&'static mut Sleeping>,
);

pub(crate) fn resolve_cube_contacts(
    mut contacts: EventReader<CubeContact>,
    mut cubes: Query<MergeQueryData>,
    cfg: Res<GameConfig>,
    mut session: ResMut<Session>,
    mut merged: EventWriter<CubeMerged>,
    mut reached: EventWriter<MaxLevelReached>,
) {
    let max_level = cfg.cubes.max_level();
    for contact in contacts.read() {
        // Keep draining after a victory so later reports don't carry over.
        if session.is_ended() {
            continue;
        }
        // Both handlers of the pair, like two engine-side collision callbacks.
        for (this, other) in [(contact.a, contact.b), (contact.b, contact.a)] {
            let Ok([mut mine, mut theirs]) = cubes.get_many_mut([this, other]) else {
                continue;
            };
            match evaluate_contact(&mine.0, *mine.1, &theirs.0, *theirs.1) {
                ContactVerdict::Ignore => {}
                ContactVerdict::Defer => {
                    if let Some(mut sleeping) = mine.4 {
                        sleeping.sleeping = false;
                    }
                }
                ContactVerdict::Initiate => {
                    let outcome = execute_merge(&mut mine.0, &mut theirs.0, max_level);
                    let position = mine.2.translation.truncate();
                    merged.write(CubeMerged {
                        initiator: this,
                        initiator_id: *mine.1,
                        consumed: other,
                        consumed_id: *theirs.1,
                        level: outcome.pre_level,
                        resulting_level: outcome.resulting_level,
                        position,
                    });
                    if let Some(impulse) = mine.3.as_mut() {
                        impulse.impulse += Vec2::Y * cfg.merge.pop_strength(outcome.pre_level);
                    }
                    session.add_score(outcome.score);
                    if outcome.reached_max {
                        session.latch(GameOutcome::Victory);
                        reached.write(MaxLevelReached {
                            cube: this,
                            id: *mine.1,
                            level: outcome.resulting_level,
                        });
                    }
                    if let Some(mut sleeping) = mine.4 {
                        sleeping.sleeping = false;
                    }
                    info!(
                        target: "merge",
                        "{:?} + {:?} at level {} -> {}",
                        mine.1,
                        theirs.1,
                        outcome.pre_level,
                        outcome.resulting_level
                    );
                }
            }
        }
    }
}

fn despawn_consumed_cubes(mut commands: Commands, cubes: Query<(Entity, &Cube)>) {
    for (entity, cube) in cubes.iter() {
        if cube.is_destroyed() {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_identity_initiates() {
        let a = Cube::settled(2);
        let b = Cube::settled(2);
        let forward = evaluate_contact(&a, CubeId(5), &b, CubeId(3));
        let backward = evaluate_contact(&b, CubeId(3), &a, CubeId(5));
        assert_eq!(forward, ContactVerdict::Initiate);
        assert_eq!(backward, ContactVerdict::Defer);
    }

    #[test]
    fn ineligible_pairs_are_ignored() {
        let a = Cube::settled(2);
        assert_eq!(
            evaluate_contact(&a, CubeId(1), &Cube::settled(3), CubeId(2)),
            ContactVerdict::Ignore
        );
        assert_eq!(
            evaluate_contact(&a, CubeId(9), &Cube::new(2), CubeId(2)),
            ContactVerdict::Ignore,
            "held cubes never merge"
        );
        assert_eq!(
            evaluate_contact(&a, CubeId(1), &a, CubeId(1)),
            ContactVerdict::Ignore
        );
    }

    #[test]
    fn merge_promotes_and_scores_pre_level() {
        let mut i = Cube::settled(2);
        let mut o = Cube::settled(2);
        let out = execute_merge(&mut i, &mut o, 10);
        assert!(o.is_destroyed());
        assert_eq!(i.level(), 3);
        assert_eq!(out.score, 4);
        assert_eq!(out.pre_level, 2);
        assert_eq!(out.resulting_level, 3);
        assert!(!out.reached_max);
    }

    #[test]
    fn merge_at_max_stays_at_max() {
        let mut i = Cube::settled(4);
        let mut o = Cube::settled(4);
        let out = execute_merge(&mut i, &mut o, 4);
        assert_eq!(i.level(), 4);
        assert_eq!(out.resulting_level, 4);
        assert!(out.reached_max);
        assert_eq!(out.score, 16);
    }
}
