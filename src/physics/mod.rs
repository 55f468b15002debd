//! Rapier integration: world setup, arena colliders, contact translation and sensor zones.

pub mod contacts;
pub mod rapier;
pub mod zones;
