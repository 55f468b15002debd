pub mod arena;
pub mod rapier_physics;
