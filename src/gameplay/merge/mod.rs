pub mod merge;

pub use merge::{
    evaluate_contact, execute_merge, ContactVerdict, CubeMerged, MaxLevelReached, MergeOutcome,
    MergePlugin,
};
