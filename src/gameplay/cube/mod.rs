pub mod cube;

pub use cube::{cube_bundle, spawn_cube};
