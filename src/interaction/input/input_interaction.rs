use bevy::input::InputSystem;
use bevy::prelude::*;

use crate::core::system::system_order::PresentationSet;
use crate::gameplay::session::{RestartRequested, Session};

pub struct InputInteractionPlugin;

impl Plugin for InputInteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerInput>()
            .add_event::<RestartRequested>()
            .add_systems(PreUpdate, collect_pointer_input.after(InputSystem))
            .add_systems(Update, request_restart_on_key.in_set(PresentationSet));
    }
}

/// Primary pointer (left mouse button or first touch) for this frame, in world space.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct PointerInput {
    /// Last known world position; kept when the pointer leaves the window.
    pub world_position: Option<Vec2>,
    pub pressed: bool,
    pub just_released: bool,
}

fn cursor_world_pos(camera_q: &Query<(&Camera, &GlobalTransform)>, screen_pos: Vec2) -> Option<Vec2> {
    let (camera, cam_tf) = camera_q.iter().next()?;
    camera.viewport_to_world_2d(cam_tf, screen_pos).ok()
}

fn primary_pointer_world_pos(
    window: &Window,
    touches: &Touches,
    camera_q: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    if let Some(touch) = touches.iter().next().or_else(|| touches.iter_just_released().next()) {
        return cursor_world_pos(camera_q, touch.position());
    }
    let cursor = window.cursor_position()?;
    cursor_world_pos(camera_q, cursor)
}

fn collect_pointer_input(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows_q: Query<&Window>,
    camera_q: Query<(&Camera, &GlobalTransform)>,
    mut pointer: ResMut<PointerInput>,
) {
    pointer.pressed = buttons.pressed(MouseButton::Left) || touches.iter().next().is_some();
    pointer.just_released =
        buttons.just_released(MouseButton::Left) || touches.any_just_released();
    let Ok(window) = windows_q.single() else {
        return;
    };
    if let Some(pos) = primary_pointer_world_pos(window, &touches, &camera_q) {
        pointer.world_position = Some(pos);
    }
}

fn request_restart_on_key(
    keys: Res<ButtonInput<KeyCode>>,
    session: Res<Session>,
    mut restart: EventWriter<RestartRequested>,
) {
    if session.is_ended() && keys.just_pressed(KeyCode::KeyR) {
        info!(target: "session", "restart requested");
        restart.write(RestartRequested);
    }
}
