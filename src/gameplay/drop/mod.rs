pub mod drop;

pub use drop::{roll_spawn_level, CubeReleased, DropController, DropPhase, DropPlugin, SpawnRng};
