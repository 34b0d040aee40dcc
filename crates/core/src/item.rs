//! Item system - blocks, tools, food and the crafting oddities.
//!
//! Every block and item in the game is a variant of [`ItemType`]. The numeric id of
//! each variant is stable and is what saves carry on disk, so variants must only ever
//! be appended.

use serde::{Deserialize, Serialize};

/// Closed set of every block and item kind.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u16)]
pub enum ItemType {
    /// Empty cell. Never stored in an inventory slot.
    #[default]
    Air = 0,
    /// Dirt block.
    Dirt = 1,
    /// Grass-topped dirt; drops dirt.
    Grass = 2,
    /// Natural stone; drops cobblestone.
    Stone = 3,
    /// Log.
    Wood = 4,
    /// Tree canopy.
    Leaves = 5,
    /// Sand.
    Sand = 6,
    /// Planks.
    Planks = 7,
    /// Stick.
    Stick = 8,
    /// Crafting table (opens the 3x3 bench).
    CraftingTable = 9,
    /// Wooden pickaxe.
    WoodenPickaxe = 10,
    /// Stone pickaxe.
    StonePickaxe = 11,
    /// Wooden axe.
    WoodenAxe = 12,
    /// Stone axe.
    StoneAxe = 13,
    /// Cobblestone.
    Cobblestone = 14,
    /// Furnace.
    Furnace = 15,
    /// Chest (27-slot storage).
    Chest = 16,
    /// Torch.
    Torch = 17,
    /// Glass.
    Glass = 18,
    /// Brick.
    Brick = 19,
    /// Door.
    Door = 20,
    /// Ladder.
    Ladder = 21,
    /// Fence.
    Fence = 22,
    /// Crafting fallback for mixed or large unknown patterns.
    MysteryClump = 23,
    /// Crafting fallback for small unknown patterns.
    OddDust = 24,
    /// Rainbow block.
    RainbowBlock = 25,
    /// Smiley block.
    SmileyBlock = 26,
    /// Star block.
    StarBlock = 27,
    /// Cake.
    Cake = 28,
    /// Cookie.
    Cookie = 29,
    /// Crafted gem (not the mined diamond).
    Gem = 30,
    /// Magic wand.
    MagicWand = 31,
    /// Flower pot.
    FlowerPot = 32,
    /// Coal ore.
    Coal = 33,
    /// Iron ore.
    IronOre = 34,
    /// Gold ore.
    GoldOre = 35,
    /// Emerald ore.
    Emerald = 36,
    /// Wooden sword.
    WoodenSword = 37,
    /// Stone sword.
    StoneSword = 38,
    /// Iron sword.
    IronSword = 39,
    /// Gold sword.
    GoldSword = 40,
    /// Diamond sword.
    DiamondSword = 41,
    /// Leather helmet.
    LeatherHelmet = 42,
    /// Leather chestplate.
    LeatherChestplate = 43,
    /// Leather leggings.
    LeatherLeggings = 44,
    /// Leather boots.
    LeatherBoots = 45,
    /// Iron helmet.
    IronHelmet = 46,
    /// Iron chestplate.
    IronChestplate = 47,
    /// Iron leggings.
    IronLeggings = 48,
    /// Iron boots.
    IronBoots = 49,
    /// Bow.
    Bow = 50,
    /// Arrow.
    Arrow = 51,
    /// String.
    String = 52,
    /// Leather.
    Leather = 53,
    /// Iron ingot.
    IronIngot = 54,
    /// Gold ingot.
    GoldIngot = 55,
    /// Water pseudo-block (not solid, swimmable).
    Water = 56,
    /// TNT.
    Tnt = 57,
    /// Gunpowder.
    Gunpowder = 58,
    /// Diamond (mined).
    Diamond = 59,
    /// Iron pickaxe.
    IronPickaxe = 60,
    /// Diamond pickaxe.
    DiamondPickaxe = 61,
    /// Wheat.
    Wheat = 62,
    /// Bread.
    Bread = 63,
    /// Bed.
    Bed = 64,
    /// Diamond ore; drops [`ItemType::Diamond`].
    DiamondOre = 65,
    /// Wool.
    Wool = 66,
    /// Raw pork.
    RawPork = 67,
    /// Cooked pork.
    CookedPork = 68,
    /// Raw beef.
    RawBeef = 69,
    /// Cooked beef.
    CookedBeef = 70,
    /// Raw chicken.
    RawChicken = 71,
    /// Cooked chicken.
    CookedChicken = 72,
    /// Egg.
    Egg = 73,
    /// Wooden shovel.
    WoodenShovel = 74,
    /// Stone shovel.
    StoneShovel = 75,
    /// Iron shovel.
    IronShovel = 76,
    /// Diamond shovel.
    DiamondShovel = 77,
    /// Bottom-of-world block; cannot be mined.
    Bedrock = 78,
}

/// Tool categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolType {
    /// Pickaxe - mines stone, ores
    Pickaxe,
    /// Axe - chops wood
    Axe,
    /// Shovel - digs dirt, sand
    Shovel,
    /// Sword - combat weapon
    Sword,
}

/// Tool material tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolMaterial {
    /// Wooden tools
    Wood,
    /// Stone tools
    Stone,
    /// Iron tools
    Iron,
    /// Diamond tools
    Diamond,
    /// Gold tools (same harvest tier as wood)
    Gold,
}

impl ToolMaterial {
    /// Harvest tier of this material (1=Wood/Gold, 2=Stone, 3=Iron, 4=Diamond).
    ///
    /// Tier 0 is reserved for "no tool".
    pub fn harvest_tier(self) -> u8 {
        match self {
            ToolMaterial::Wood | ToolMaterial::Gold => 1,
            ToolMaterial::Stone => 2,
            ToolMaterial::Iron => 3,
            ToolMaterial::Diamond => 4,
        }
    }

    /// Check if this material can mine blocks requiring a certain tier
    pub fn can_mine_tier(self, required: ToolMaterial) -> bool {
        self.harvest_tier() >= required.harvest_tier()
    }
}

/// Mining and combat stats of a tool item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Functional class.
    pub kind: ToolType,
    /// Material rank.
    pub material: ToolMaterial,
    /// Break-speed divisor applied when the tool matches a block's category.
    pub speed: f32,
    /// Damage dealt when swung at an entity.
    pub damage: f32,
}

impl ToolInfo {
    const fn new(kind: ToolType, material: ToolMaterial, speed: f32, damage: f32) -> Self {
        Self {
            kind,
            material,
            speed,
            damage,
        }
    }
}

/// Armour piece slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmorSlot {
    /// Head.
    Helmet,
    /// Torso.
    Chestplate,
    /// Legs.
    Leggings,
    /// Feet.
    Boots,
}

impl ItemType {
    /// Every variant in id order (`ALL[i].id() == i`).
    pub const ALL: [ItemType; 79] = [
        ItemType::Air,
        ItemType::Dirt,
        ItemType::Grass,
        ItemType::Stone,
        ItemType::Wood,
        ItemType::Leaves,
        ItemType::Sand,
        ItemType::Planks,
        ItemType::Stick,
        ItemType::CraftingTable,
        ItemType::WoodenPickaxe,
        ItemType::StonePickaxe,
        ItemType::WoodenAxe,
        ItemType::StoneAxe,
        ItemType::Cobblestone,
        ItemType::Furnace,
        ItemType::Chest,
        ItemType::Torch,
        ItemType::Glass,
        ItemType::Brick,
        ItemType::Door,
        ItemType::Ladder,
        ItemType::Fence,
        ItemType::MysteryClump,
        ItemType::OddDust,
        ItemType::RainbowBlock,
        ItemType::SmileyBlock,
        ItemType::StarBlock,
        ItemType::Cake,
        ItemType::Cookie,
        ItemType::Gem,
        ItemType::MagicWand,
        ItemType::FlowerPot,
        ItemType::Coal,
        ItemType::IronOre,
        ItemType::GoldOre,
        ItemType::Emerald,
        ItemType::WoodenSword,
        ItemType::StoneSword,
        ItemType::IronSword,
        ItemType::GoldSword,
        ItemType::DiamondSword,
        ItemType::LeatherHelmet,
        ItemType::LeatherChestplate,
        ItemType::LeatherLeggings,
        ItemType::LeatherBoots,
        ItemType::IronHelmet,
        ItemType::IronChestplate,
        ItemType::IronLeggings,
        ItemType::IronBoots,
        ItemType::Bow,
        ItemType::Arrow,
        ItemType::String,
        ItemType::Leather,
        ItemType::IronIngot,
        ItemType::GoldIngot,
        ItemType::Water,
        ItemType::Tnt,
        ItemType::Gunpowder,
        ItemType::Diamond,
        ItemType::IronPickaxe,
        ItemType::DiamondPickaxe,
        ItemType::Wheat,
        ItemType::Bread,
        ItemType::Bed,
        ItemType::DiamondOre,
        ItemType::Wool,
        ItemType::RawPork,
        ItemType::CookedPork,
        ItemType::RawBeef,
        ItemType::CookedBeef,
        ItemType::RawChicken,
        ItemType::CookedChicken,
        ItemType::Egg,
        ItemType::WoodenShovel,
        ItemType::StoneShovel,
        ItemType::IronShovel,
        ItemType::DiamondShovel,
        ItemType::Bedrock,
    ];

    /// Stable numeric id.
    pub fn id(self) -> u16 {
        self as u16
    }

    /// Resolve a numeric id. Unknown ids yield `None`.
    pub fn from_id(id: u16) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Stable snake_case label.
    pub fn name(self) -> &'static str {
        match self {
            ItemType::Air => "air",
            ItemType::Dirt => "dirt",
            ItemType::Grass => "grass",
            ItemType::Stone => "stone",
            ItemType::Wood => "wood",
            ItemType::Leaves => "leaves",
            ItemType::Sand => "sand",
            ItemType::Planks => "planks",
            ItemType::Stick => "stick",
            ItemType::CraftingTable => "crafting_table",
            ItemType::WoodenPickaxe => "wooden_pickaxe",
            ItemType::StonePickaxe => "stone_pickaxe",
            ItemType::WoodenAxe => "wooden_axe",
            ItemType::StoneAxe => "stone_axe",
            ItemType::Cobblestone => "cobblestone",
            ItemType::Furnace => "furnace",
            ItemType::Chest => "chest",
            ItemType::Torch => "torch",
            ItemType::Glass => "glass",
            ItemType::Brick => "brick",
            ItemType::Door => "door",
            ItemType::Ladder => "ladder",
            ItemType::Fence => "fence",
            ItemType::MysteryClump => "mystery_clump",
            ItemType::OddDust => "odd_dust",
            ItemType::RainbowBlock => "rainbow_block",
            ItemType::SmileyBlock => "smiley_block",
            ItemType::StarBlock => "star_block",
            ItemType::Cake => "cake",
            ItemType::Cookie => "cookie",
            ItemType::Gem => "gem",
            ItemType::MagicWand => "magic_wand",
            ItemType::FlowerPot => "flower_pot",
            ItemType::Coal => "coal",
            ItemType::IronOre => "iron_ore",
            ItemType::GoldOre => "gold_ore",
            ItemType::Emerald => "emerald",
            ItemType::WoodenSword => "wooden_sword",
            ItemType::StoneSword => "stone_sword",
            ItemType::IronSword => "iron_sword",
            ItemType::GoldSword => "gold_sword",
            ItemType::DiamondSword => "diamond_sword",
            ItemType::LeatherHelmet => "leather_helmet",
            ItemType::LeatherChestplate => "leather_chestplate",
            ItemType::LeatherLeggings => "leather_leggings",
            ItemType::LeatherBoots => "leather_boots",
            ItemType::IronHelmet => "iron_helmet",
            ItemType::IronChestplate => "iron_chestplate",
            ItemType::IronLeggings => "iron_leggings",
            ItemType::IronBoots => "iron_boots",
            ItemType::Bow => "bow",
            ItemType::Arrow => "arrow",
            ItemType::String => "string",
            ItemType::Leather => "leather",
            ItemType::IronIngot => "iron_ingot",
            ItemType::GoldIngot => "gold_ingot",
            ItemType::Water => "water",
            ItemType::Tnt => "tnt",
            ItemType::Gunpowder => "gunpowder",
            ItemType::Diamond => "diamond",
            ItemType::IronPickaxe => "iron_pickaxe",
            ItemType::DiamondPickaxe => "diamond_pickaxe",
            ItemType::Wheat => "wheat",
            ItemType::Bread => "bread",
            ItemType::Bed => "bed",
            ItemType::DiamondOre => "diamond_ore",
            ItemType::Wool => "wool",
            ItemType::RawPork => "raw_pork",
            ItemType::CookedPork => "cooked_pork",
            ItemType::RawBeef => "raw_beef",
            ItemType::CookedBeef => "cooked_beef",
            ItemType::RawChicken => "raw_chicken",
            ItemType::CookedChicken => "cooked_chicken",
            ItemType::Egg => "egg",
            ItemType::WoodenShovel => "wooden_shovel",
            ItemType::StoneShovel => "stone_shovel",
            ItemType::IronShovel => "iron_shovel",
            ItemType::DiamondShovel => "diamond_shovel",
            ItemType::Bedrock => "bedrock",
        }
    }

    /// Item produced when this block is broken, if any.
    pub fn drop(self) -> Option<ItemType> {
        match self {
            ItemType::Air | ItemType::Water | ItemType::Bedrock => None,
            ItemType::Grass => Some(ItemType::Dirt),
            ItemType::Stone => Some(ItemType::Cobblestone),
            ItemType::DiamondOre => Some(ItemType::Diamond),
            other => Some(other),
        }
    }

    /// Health restored when eaten.
    pub fn healing(self) -> Option<u32> {
        match self {
            ItemType::RawPork | ItemType::RawBeef => Some(2),
            ItemType::CookedPork => Some(6),
            ItemType::CookedBeef => Some(8),
            ItemType::RawChicken | ItemType::Egg => Some(1),
            ItemType::CookedChicken | ItemType::Bread => Some(5),
            ItemType::Cake => Some(7),
            ItemType::Cookie => Some(2),
            _ => None,
        }
    }

    /// Tool stats, or `None` for anything that is not a tool (treated as bare hands).
    pub fn tool(self) -> Option<ToolInfo> {
        use ToolMaterial::*;
        use ToolType::*;
        let info = match self {
            ItemType::WoodenPickaxe => ToolInfo::new(Pickaxe, Wood, 2.0, 2.0),
            ItemType::StonePickaxe => ToolInfo::new(Pickaxe, Stone, 3.0, 3.0),
            ItemType::IronPickaxe => ToolInfo::new(Pickaxe, Iron, 6.0, 4.0),
            ItemType::DiamondPickaxe => ToolInfo::new(Pickaxe, Diamond, 8.0, 5.0),
            ItemType::WoodenAxe => ToolInfo::new(Axe, Wood, 2.0, 2.0),
            ItemType::StoneAxe => ToolInfo::new(Axe, Stone, 3.0, 3.0),
            ItemType::WoodenShovel => ToolInfo::new(Shovel, Wood, 2.0, 1.0),
            ItemType::StoneShovel => ToolInfo::new(Shovel, Stone, 4.0, 2.0),
            ItemType::IronShovel => ToolInfo::new(Shovel, Iron, 6.0, 3.0),
            ItemType::DiamondShovel => ToolInfo::new(Shovel, Diamond, 8.0, 4.0),
            ItemType::WoodenSword => ToolInfo::new(Sword, Wood, 1.5, 4.0),
            ItemType::StoneSword => ToolInfo::new(Sword, Stone, 1.5, 5.0),
            ItemType::IronSword => ToolInfo::new(Sword, Iron, 1.5, 6.0),
            ItemType::GoldSword => ToolInfo::new(Sword, Gold, 1.5, 4.0),
            ItemType::DiamondSword => ToolInfo::new(Sword, Diamond, 1.5, 7.0),
            _ => return None,
        };
        Some(info)
    }

    /// Damage dealt when this item is the equipped weapon. Bare hands deal 1.
    pub fn attack_power(self) -> f32 {
        match self.tool() {
            Some(info) if info.kind == ToolType::Sword => info.damage,
            _ => 1.0,
        }
    }

    /// Swords are the only items accepted in the weapon slot.
    pub fn is_weapon(self) -> bool {
        matches!(self.tool(), Some(info) if info.kind == ToolType::Sword)
    }

    /// Armour slot this piece occupies.
    pub fn armor_slot(self) -> Option<ArmorSlot> {
        match self {
            ItemType::LeatherHelmet | ItemType::IronHelmet => Some(ArmorSlot::Helmet),
            ItemType::LeatherChestplate | ItemType::IronChestplate => {
                Some(ArmorSlot::Chestplate)
            }
            ItemType::LeatherLeggings | ItemType::IronLeggings => Some(ArmorSlot::Leggings),
            ItemType::LeatherBoots | ItemType::IronBoots => Some(ArmorSlot::Boots),
            _ => None,
        }
    }

    /// Defense granted while worn. Leather is cosmetic.
    pub fn armor_defense(self) -> f32 {
        match self {
            ItemType::IronHelmet
            | ItemType::IronChestplate
            | ItemType::IronLeggings
            | ItemType::IronBoots => 1.0,
            _ => 0.0,
        }
    }

    /// Whether the item can be put into the world grid as a block.
    pub fn is_placeable(self) -> bool {
        match self {
            ItemType::Air => false,
            ItemType::Dirt
            | ItemType::Grass
            | ItemType::Stone
            | ItemType::Wood
            | ItemType::Leaves
            | ItemType::Sand
            | ItemType::Planks
            | ItemType::CraftingTable
            | ItemType::Cobblestone
            | ItemType::Furnace
            | ItemType::Chest
            | ItemType::Torch
            | ItemType::Glass
            | ItemType::Brick
            | ItemType::Door
            | ItemType::Ladder
            | ItemType::Fence
            | ItemType::MysteryClump
            | ItemType::RainbowBlock
            | ItemType::SmileyBlock
            | ItemType::StarBlock
            | ItemType::Cake
            | ItemType::FlowerPot
            | ItemType::Coal
            | ItemType::IronOre
            | ItemType::GoldOre
            | ItemType::Emerald
            | ItemType::Water
            | ItemType::Tnt
            | ItemType::Bed
            | ItemType::DiamondOre
            | ItemType::Wool
            | ItemType::Bedrock => true,
            _ => false,
        }
    }

    /// Block occupies its cell for collision purposes.
    pub fn is_solid(self) -> bool {
        !matches!(self, ItemType::Air | ItemType::Water)
    }
}

/// A stack of items in an inventory slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Type of item
    pub item_type: ItemType,
    /// Number of items in stack
    pub count: u32,
}

impl ItemStack {
    /// Create a new item stack
    pub fn new(item_type: ItemType, count: u32) -> Self {
        Self { item_type, count }
    }
}
