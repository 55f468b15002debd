use bevy::prelude::*;

/// Merge state of a single cube: tier level plus the mergeable / destroyed flags.
///
/// All mutators are no-ops once the cube is destroyed, and `level` only ever moves up
/// to the configured maximum.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cube {
    level: u32,
    mergeable: bool,
    destroyed: bool,
}

/// Result of [`Cube::upgrade`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upgrade {
    /// Level went up by one to the contained value.
    Promoted(u32),
    /// Already at the maximum level; nothing changed.
    AtMax,
    /// Cube is destroyed; nothing changed.
    Ignored,
}

impl Cube {
    /// A freshly spawned (held, not yet mergeable) cube.
    pub fn new(level: u32) -> Self {
        Self {
            level,
            mergeable: false,
            destroyed: false,
        }
    }

    /// A cube already released into play. Mostly useful for tests and scripted setups.
    pub fn settled(level: u32) -> Self {
        Self {
            level,
            mergeable: true,
            destroyed: false,
        }
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Displayed / scored value: `2^level`.
    #[inline]
    pub fn value(&self) -> u64 {
        1u64 << self.level.min(63)
    }

    #[inline]
    pub fn is_mergeable(&self) -> bool {
        self.mergeable
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// True when the two cubes may merge: both in play, neither consumed, same level.
    pub fn can_merge_with(&self, other: &Cube) -> bool {
        self.mergeable
            && other.mergeable
            && !self.destroyed
            && !other.destroyed
            && self.level == other.level
    }

    /// Raise the level to `new_level`, bounded by `max_level`. Lower values are ignored.
    /// Returns true if the level changed.
    pub fn set_level(&mut self, new_level: u32, max_level: u32) -> bool {
        if self.destroyed {
            return false;
        }
        let target = new_level.min(max_level);
        if target <= self.level {
            return false;
        }
        self.level = target;
        true
    }

    /// Single-step promotion used by merges.
    pub fn upgrade(&mut self, max_level: u32) -> Upgrade {
        if self.destroyed {
            return Upgrade::Ignored;
        }
        if self.level < max_level {
            self.level += 1;
            Upgrade::Promoted(self.level)
        } else {
            Upgrade::AtMax
        }
    }

    /// Mark as consumed by a merge. Idempotent.
    pub fn set_destroyed(&mut self) {
        self.destroyed = true;
    }

    pub fn set_mergeable(&mut self, mergeable: bool) {
        if !self.destroyed {
            self.mergeable = mergeable;
        }
    }
}

/// Creation-order identity used as the merge tie-break key.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CubeId(pub u64);

/// Hands out strictly increasing [`CubeId`]s. Reset only by a full restart, after every
/// cube has been despawned.
#[derive(Resource, Debug)]
pub struct CubeIdAllocator {
    next: u64,
}

impl Default for CubeIdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl CubeIdAllocator {
    pub fn next_id(&mut self) -> CubeId {
        let id = CubeId(self.next);
        self.next += 1;
        id
    }

    pub fn reset(&mut self) {
        self.next = 1;
    }
}

/// Marker for the cube currently positioned by the player (kinematic, not mergeable).
#[derive(Component, Debug)]
pub struct HeldCube;

/// Tag for the text child showing a cube's value.
#[derive(Component, Debug)]
pub struct CubeLabel;

/// Deterministic RNG seed resource (set once at startup / tests for reproducible spawning).
#[derive(Resource, Debug, Copy, Clone, Default)]
pub struct RngSeed(pub u64);
