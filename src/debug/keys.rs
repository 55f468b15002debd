#[cfg(feature = "debug")]
use super::modes::DebugState;
#[cfg(feature = "debug")]
use bevy::prelude::*;
#[cfg(feature = "debug")]
use bevy_rapier2d::render::DebugRenderContext;

/// F1 toggles the rapier wireframe (when the debug render plugin is loaded).
#[cfg(feature = "debug")]
pub fn debug_key_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut state: ResMut<DebugState>,
    ctx: Option<ResMut<DebugRenderContext>>,
) {
    if !keys.just_pressed(KeyCode::F1) {
        return;
    }
    state.rapier_wireframe = !state.rapier_wireframe;
    if let Some(mut c) = ctx {
        c.enabled = state.rapier_wireframe;
    }
    info!("MODE_CHANGE rapier_wireframe={} frame={}", state.rapier_wireframe, state.frame_counter);
}
