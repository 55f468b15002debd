// This file is part of Cube Merge.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;

use crate::debug::DebugPlugin;
use crate::gameplay::SimulationPlugin;
use crate::interaction::input::InputInteractionPlugin;
use crate::interaction::session::auto_close::AutoClosePlugin;
use crate::interaction::session::config_hot_reload::ConfigHotReloadPlugin;
use crate::physics::rapier::rapier_physics::PhysicsSetupPlugin;
use crate::rendering::camera::camera::CameraPlugin;
use crate::rendering::effects::effects::EffectsPlugin;
use crate::rendering::hud::hud::HudPlugin;
use crate::rendering::materials::materials::MaterialsPlugin;

/// Full windowed game: simulation rules plus physics, input and presentation.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            SimulationPlugin,
            CameraPlugin,
            MaterialsPlugin,
            PhysicsSetupPlugin,
            InputInteractionPlugin,
            EffectsPlugin,
            HudPlugin,
            DebugPlugin,
            ConfigHotReloadPlugin,
            AutoClosePlugin,
        ));
    }
}
