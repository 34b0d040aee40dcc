//! Block properties - hardness, mining requirements, break times

use mdsandbox_core::{ItemType, ToolInfo, ToolMaterial, ToolType};

/// Break-time divisor for holding a tool of the wrong category.
pub const WRONG_TOOL_SPEEDUP: f32 = 1.5;

/// Break-time multiplier for a matching tool below the block's required tier.
pub const UNDER_TIER_PENALTY: f32 = 3.0;

/// Properties of a block type
#[derive(Debug, Clone, PartialEq)]
pub struct BlockProperties {
    /// Relative toughness (informational; break time is driven by `base_break_ms`)
    pub hardness: f32,

    /// The best tool type for this block
    pub best_tool: Option<ToolType>,

    /// Minimum tool tier required to harvest this block
    pub required_tier: Option<ToolMaterial>,

    /// Bare-hand break time in milliseconds
    pub base_break_ms: f32,

    /// Whether the block can be mined at all
    pub breakable: bool,

    /// Whether this block is solid (affects collision)
    pub is_solid: bool,
}

impl Default for BlockProperties {
    fn default() -> Self {
        Self {
            hardness: 1.0,
            best_tool: None,
            required_tier: None,
            base_break_ms: 1000.0,
            breakable: true,
            is_solid: true,
        }
    }
}

impl BlockProperties {
    fn tooled(
        hardness: f32,
        best_tool: Option<ToolType>,
        required_tier: Option<ToolMaterial>,
        base_break_ms: f32,
    ) -> Self {
        Self {
            hardness,
            best_tool,
            required_tier,
            base_break_ms,
            ..Self::default()
        }
    }

    /// Create properties for air and water (not solid)
    pub fn fluid() -> Self {
        Self {
            hardness: 0.0,
            is_solid: false,
            ..Self::default()
        }
    }

    /// Create properties for dirt
    pub fn dirt() -> Self {
        Self::tooled(0.5, Some(ToolType::Shovel), None, 750.0)
    }

    /// Create properties for grass
    pub fn grass() -> Self {
        Self::tooled(0.6, Some(ToolType::Shovel), None, 900.0)
    }

    /// Create properties for sand
    pub fn sand() -> Self {
        Self::tooled(0.5, Some(ToolType::Shovel), None, 750.0)
    }

    /// Create properties for stone
    pub fn stone() -> Self {
        Self::tooled(1.5, Some(ToolType::Pickaxe), Some(ToolMaterial::Wood), 2250.0)
    }

    /// Create properties for cobblestone
    pub fn cobblestone() -> Self {
        Self::tooled(2.0, Some(ToolType::Pickaxe), Some(ToolMaterial::Wood), 3000.0)
    }

    /// Create properties for logs and planks
    pub fn wood() -> Self {
        Self::tooled(2.0, Some(ToolType::Axe), None, 3000.0)
    }

    /// Create properties for the crafting table
    pub fn crafting_table() -> Self {
        Self::tooled(2.5, Some(ToolType::Axe), None, 3750.0)
    }

    /// Create properties for leaves
    pub fn leaves() -> Self {
        Self::tooled(0.2, None, None, 300.0)
    }

    /// Create properties for an ore gated at `tier`
    pub fn ore(tier: ToolMaterial) -> Self {
        Self::tooled(3.0, Some(ToolType::Pickaxe), Some(tier), 4500.0)
    }

    /// Create properties for bedrock (cannot be mined).
    pub fn bedrock() -> Self {
        Self {
            hardness: f32::INFINITY,
            breakable: false,
            ..Self::default()
        }
    }

    /// Properties for every block kind.
    pub fn for_block(block: ItemType) -> Self {
        match block {
            ItemType::Air | ItemType::Water => Self::fluid(),
            ItemType::Dirt => Self::dirt(),
            ItemType::Grass => Self::grass(),
            ItemType::Sand => Self::sand(),
            ItemType::Stone => Self::stone(),
            ItemType::Cobblestone => Self::cobblestone(),
            ItemType::Wood | ItemType::Planks => Self::wood(),
            ItemType::CraftingTable => Self::crafting_table(),
            ItemType::Leaves => Self::leaves(),
            ItemType::Coal => Self::ore(ToolMaterial::Wood),
            ItemType::IronOre => Self::ore(ToolMaterial::Stone),
            ItemType::GoldOre | ItemType::Emerald | ItemType::DiamondOre => {
                Self::ore(ToolMaterial::Iron)
            }
            ItemType::Bedrock => Self::bedrock(),
            _ => Self::default(),
        }
    }

    /// Milliseconds to break this block with `tool` (`None` = bare hands).
    ///
    /// A matching tool divides the base time by its speed, any other tool gives a flat
    /// speedup, and a matching tool below the required tier still breaks the block but
    /// three times slower.
    pub fn break_time_ms(&self, tool: Option<ToolInfo>) -> f32 {
        let Some(tool) = tool else {
            return self.base_break_ms;
        };

        let matches = Some(tool.kind) == self.best_tool;
        let mut time = if matches {
            self.base_break_ms / tool.speed
        } else {
            self.base_break_ms / WRONG_TOOL_SPEEDUP
        };

        if let Some(required) = self.required_tier {
            if matches && !tool.material.can_mine_tier(required) {
                time *= UNDER_TIER_PENALTY;
            }
        }
        time
    }

    /// Check if this block yields its drop when broken with `tool`.
    pub fn can_harvest(&self, tool: Option<ToolInfo>) -> bool {
        let Some(required) = self.required_tier else {
            return true;
        };
        match tool {
            Some(tool) => {
                Some(tool.kind) == self.best_tool && tool.material.can_mine_tier(required)
            }
            None => false,
        }
    }
}
