//! Presentation glue: camera, tier palette and materials, merge effects, HUD.

pub mod camera;
pub mod effects;
pub mod hud;
pub mod materials;
pub mod palette;
