use bevy::prelude::*;

use crate::core::config::CubeConfig;

pub const BACKGROUND: Color = Color::srgb(0.08, 0.08, 0.11);
pub const WALL_COLOR: Color = Color::srgba(0.12, 0.12, 0.16, 0.95);
pub const OVERFLOW_LINE_COLOR: Color = Color::srgba(1.0, 0.25, 0.25, 0.35);
/// Used when the configured tier list is empty.
pub const FALLBACK_TIER: Color = Color::srgb(0.75, 0.75, 0.75);
pub const LABEL_DARK: Color = Color::srgb(0.12, 0.10, 0.08);
pub const LABEL_LIGHT: Color = Color::srgb(0.98, 0.96, 0.92);

/// Configured tier colors; always at least one entry.
pub fn tier_colors(cubes: &CubeConfig) -> Vec<Color> {
    if cubes.tier_colors.is_empty() {
        return vec![FALLBACK_TIER];
    }
    cubes
        .tier_colors
        .iter()
        .map(|&(r, g, b)| Color::srgb(r, g, b))
        .collect()
}

/// Dark text on light tiles, light text on dark ones.
pub fn label_color_for(tile: Color) -> Color {
    let c = tile.to_srgba();
    let luma = 0.299 * c.red + 0.587 * c.green + 0.114 * c.blue;
    if luma > 0.6 {
        LABEL_DARK
    } else {
        LABEL_LIGHT
    }
}
