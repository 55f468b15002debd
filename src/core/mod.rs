//! Foundational components, configuration and system ordering shared by every plugin.

pub mod components;
pub mod config;
pub mod system;

use bevy::prelude::*;

use components::{CubeIdAllocator, RngSeed};
use config::GameConfig;

/// Registers system set ordering and the resources every other plugin expects.
/// Existing `GameConfig` / `RngSeed` resources (inserted by `main` or a test) are kept.
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        system::system_order::configure_simulation_sets(app);
        app.init_resource::<GameConfig>()
            .init_resource::<RngSeed>()
            .init_resource::<CubeIdAllocator>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use system::system_order::{ContactIngestSet, MergeSet, SessionSet};

    #[test]
    fn plugin_adds_sets_and_resources() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(RngSeed(7));
        app.add_plugins(CorePlugin);
        fn dummy() {}
        app.add_systems(Update, dummy.in_set(ContactIngestSet));
        app.add_systems(Update, dummy.in_set(MergeSet));
        app.add_systems(Update, dummy.in_set(SessionSet));
        app.update();
        assert_eq!(app.world().resource::<RngSeed>().0, 7, "seed must not be overwritten");
        assert!(app.world().contains_resource::<GameConfig>());
        assert!(app.world().contains_resource::<CubeIdAllocator>());
    }
}
