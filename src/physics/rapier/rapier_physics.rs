use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::config::GameConfig;

/// Physics scale: 50 screen pixels per rapier meter.
pub const PIXELS_PER_METER: f32 = 50.0;

pub struct PhysicsSetupPlugin; // our wrapper to configure Rapier & arena

impl Plugin for PhysicsSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(PIXELS_PER_METER),
            super::arena::ArenaPlugin,
        ))
        .add_systems(Update, configure_gravity);

        let debug_render = app
            .world()
            .get_resource::<GameConfig>()
            .map(|c| c.rapier_debug)
            .unwrap_or(false);
        if debug_render {
            app.add_plugins(RapierDebugRenderPlugin::default());
        }
    }
}

fn configure_gravity(
    mut q_cfg: Query<&mut RapierConfiguration>,
    fresh: Query<(), Added<RapierConfiguration>>,
    game_cfg: Res<GameConfig>,
) {
    // RapierConfiguration lives on the default context entity; reapply on hot reload.
    if !game_cfg.is_changed() && fresh.is_empty() {
        return;
    }
    if let Ok(mut cfg) = q_cfg.single_mut() {
        cfg.gravity = Vect::new(0.0, game_cfg.gravity.y);
        info!(target: "physics", "gravity set to {}", game_cfg.gravity.y);
    }
}
