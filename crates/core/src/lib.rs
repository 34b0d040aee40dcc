#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod crafting;
pub mod item;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crafting::{Cell, CraftResult, CraftingContext, Recipe, RecipeBook};
pub use item::{ArmorSlot, ItemStack, ItemType, ToolInfo, ToolMaterial, ToolType};

/// Simulation tick counter. One tick is one host frame.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any deterministic timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

/// Helper to derive a reproducible RNG seeded by world + stream domains.
///
/// `domain` separates independent random streams (terrain, enemy AI, drops) so adding
/// draws to one never shifts another.
pub fn scoped_rng(world_seed: u64, domain: u64, tick: SimTick) -> StdRng {
    let seed = world_seed ^ domain.rotate_left(32) ^ tick.0;
    StdRng::seed_from_u64(seed)
}
