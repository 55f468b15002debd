//! Debug module: feature gated stats, periodic simulation logging and a few dev keys.
//! Built only when compiled with `--features debug`.

#[cfg(feature = "debug")]
pub mod keys; // pub for testing
#[cfg(feature = "debug")]
mod logging;
#[cfg(feature = "debug")]
mod modes;
#[cfg(feature = "debug")]
mod stats;

#[cfg(feature = "debug")]
pub use modes::*;

#[cfg(feature = "debug")]
use crate::core::system::system_order::SessionSet;
#[cfg(feature = "debug")]
use crate::interaction::input::PointerInput;
#[cfg(feature = "debug")]
use bevy::prelude::*;

#[cfg(feature = "debug")]
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct DebugPreRenderSet;

#[cfg(feature = "debug")]
pub struct DebugPlugin;
#[cfg(feature = "debug")]
impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        use keys::debug_key_input_system;
        use logging::debug_logging_system;
        use stats::debug_stats_collect_system;

        fn debug_input_gizmos(pointer: Res<PointerInput>, mut gizmos: Gizmos) {
            if !pointer.pressed {
                return;
            }
            if let Some(p) = pointer.world_position {
                gizmos.circle_2d(p, 8.0, Color::srgb(1.0, 1.0, 0.2));
            }
        }

        app.init_resource::<modes::DebugState>()
            .init_resource::<modes::DebugStats>()
            .configure_sets(Update, DebugPreRenderSet.after(SessionSet));
        app.add_systems(
            Update,
            (
                debug_key_input_system,
                debug_stats_collect_system,
                debug_logging_system,
                debug_input_gizmos,
            )
                .chain()
                .in_set(DebugPreRenderSet),
        );
    }
}

#[cfg(not(feature = "debug"))]
pub struct DebugPlugin;
#[cfg(not(feature = "debug"))]
impl bevy::prelude::Plugin for DebugPlugin {
    fn build(&self, _app: &mut bevy::prelude::App) {}
}
