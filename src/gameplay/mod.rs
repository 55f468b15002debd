//! Game rules: cube spawning and throwing, merge resolution, score and end conditions.

pub mod cube;
pub mod drop;
pub mod merge;
pub mod session;

use bevy::prelude::*;

use crate::core::CorePlugin;
use crate::physics::contacts::ContactsPlugin;
use drop::DropPlugin;
use merge::MergePlugin;
use session::SessionPlugin;

/// Everything needed to run the game rules without a window, renderer or physics step.
/// Contacts arrive as rapier `CollisionEvent`s (or directly as `CubeContact`s in tests).
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<CorePlugin>() {
            app.add_plugins(CorePlugin);
        }
        app.add_plugins((ContactsPlugin, MergePlugin, DropPlugin, SessionPlugin));
    }
}
