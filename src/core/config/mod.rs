pub mod config;

pub use config::{
    ArenaConfig, AudioConfig, BounceConfig, CubeConfig, DropConfig, EndGameConfig, GameConfig,
    GravityConfig, MergeConfig, SpawnRange, WindowConfig,
};
