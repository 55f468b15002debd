//! Central system ordering labels to make the per-frame update sequence explicit.
//! Stages (all in `Update`):
//! 1. Restart (full state reset requested by the presentation layer)
//! 2. ContactIngest (rapier collision events -> cube contacts / zone occupancy)
//! 3. Merge (contact resolution, consumed cube removal)
//! 4. Drop (spawn timer, held cube steering, release)
//! 5. Session (victory / defeat latches, score announcements)
//! 6. Presentation (HUD, effects; reads events only)
//!
//! Rapier itself steps in `PostUpdate`, so contacts read here are from the previous step.
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct RestartSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct ContactIngestSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct MergeSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct DropSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct SessionSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PresentationSet;

/// Registers the ordering contract between the sets above.
pub fn configure_simulation_sets(app: &mut App) {
    app.configure_sets(
        Update,
        (
            RestartSet,
            ContactIngestSet,
            MergeSet,
            DropSet,
            SessionSet,
            PresentationSet,
        )
            .chain(),
    );
}
