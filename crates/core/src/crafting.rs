//! Crafting system - shaped recipes matched against a square crafting grid.
//!
//! Recipes are matched in declaration order and the first hit wins. A grid that
//! matches nothing but still holds items never comes back empty handed: it yields
//! one of the fallback "junk" items (see [`RecipeBook::fallback`]).

use crate::ItemType;
use serde::{Deserialize, Serialize};

/// One cell of a crafting grid or recipe pattern.
pub type Cell = Option<ItemType>;

/// Where crafting happens, which bounds the grid size and the recipes on offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CraftingContext {
    /// 2x2 grid carried by the player. Only hand recipes apply.
    Hand,
    /// 3x3 grid of a placed crafting table. Hand and table recipes apply.
    Table,
}

impl CraftingContext {
    /// Side length of the grid for this context.
    pub fn grid_size(self) -> usize {
        match self {
            CraftingContext::Hand => 2,
            CraftingContext::Table => 3,
        }
    }
}

/// Item and count produced by a craft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftResult {
    /// Produced item.
    pub item: ItemType,
    /// Number of items produced.
    pub count: u32,
}

impl CraftResult {
    /// Create a new result.
    pub const fn new(item: ItemType, count: u32) -> Self {
        Self { item, count }
    }
}

/// A shaped crafting recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    /// Unique recipe identifier (e.g., "planks").
    pub id: &'static str,
    /// Square pattern, `pattern[row][col]`.
    pub pattern: Vec<Vec<Cell>>,
    /// Smallest context the recipe is offered in.
    pub context: CraftingContext,
    /// Produced items.
    pub result: CraftResult,
}

impl Recipe {
    /// Side length of the pattern.
    pub fn size(&self) -> usize {
        self.pattern.len()
    }

    /// Whether this recipe is offered in `context`.
    pub fn available_in(&self, context: CraftingContext) -> bool {
        !(context == CraftingContext::Hand && self.context == CraftingContext::Table)
    }

    /// Check the grid against this pattern.
    ///
    /// Equal sizes compare cell by cell. A smaller pattern is tried at every top-left
    /// offset of a larger grid; grid cells outside the pattern must then be empty.
    pub fn matches(&self, grid: &[Vec<Cell>]) -> bool {
        let size = self.size();
        let grid_size = grid.len();
        if size == 0 || size > grid_size {
            return false;
        }
        let span = grid_size - size;
        (0..=span).any(|oy| (0..=span).any(|ox| self.matches_at(grid, ox, oy)))
    }

    /// Check the whole grid with the pattern placed at `(offset_x, offset_y)`.
    pub fn matches_at(&self, grid: &[Vec<Cell>], offset_x: usize, offset_y: usize) -> bool {
        let size = self.size();
        grid.iter().enumerate().all(|(y, row)| {
            (0..grid.len()).all(|x| {
                let input = row.get(x).copied().flatten();
                let expected = if (offset_y..offset_y + size).contains(&y)
                    && (offset_x..offset_x + size).contains(&x)
                {
                    self.pattern[y - offset_y]
                        .get(x - offset_x)
                        .copied()
                        .flatten()
                } else {
                    None
                };
                input == expected
            })
        })
    }
}

/// Ordered, immutable recipe table.
#[derive(Debug, Clone)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    /// Build a book from an explicit recipe list (declaration order is match order).
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// All recipes in match order.
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Count total number of recipes.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// True when the book holds no recipes.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// First declared recipe offered in `context` that matches `grid`.
    pub fn find_match(&self, grid: &[Vec<Cell>], context: CraftingContext) -> Option<&Recipe> {
        self.recipes
            .iter()
            .filter(|recipe| recipe.available_in(context))
            .find(|recipe| recipe.matches(grid))
    }

    /// Resolve a grid to a craft result.
    ///
    /// Returns the first matching recipe's result, otherwise the fallback for a
    /// non-empty grid, otherwise `None`.
    pub fn find_recipe(&self, grid: &[Vec<Cell>], context: CraftingContext) -> Option<CraftResult> {
        if let Some(recipe) = self.find_match(grid, context) {
            return Some(recipe.result);
        }
        Self::fallback(grid)
    }

    /// Junk result for a grid no recipe recognised. `None` only for an empty grid.
    ///
    /// - one occupied cell: one odd dust
    /// - stone family and wood family together: one mystery clump
    /// - four or more occupied cells: two mystery clumps
    /// - otherwise: one odd dust per occupied cell
    pub fn fallback(grid: &[Vec<Cell>]) -> Option<CraftResult> {
        let items: Vec<ItemType> = grid.iter().flatten().filter_map(|cell| *cell).collect();
        let occupied = items.len() as u32;
        if occupied == 0 {
            return None;
        }

        let has_stone = items
            .iter()
            .any(|item| matches!(item, ItemType::Stone | ItemType::Cobblestone));
        let has_wood = items
            .iter()
            .any(|item| matches!(item, ItemType::Wood | ItemType::Planks));

        let result = if occupied == 1 {
            CraftResult::new(ItemType::OddDust, 1)
        } else if has_stone && has_wood {
            CraftResult::new(ItemType::MysteryClump, 1)
        } else if occupied >= 4 {
            CraftResult::new(ItemType::MysteryClump, 2)
        } else {
            CraftResult::new(ItemType::OddDust, occupied)
        };
        Some(result)
    }

    /// The game's recipe table.
    pub fn standard() -> Self {
        use CraftingContext::{Hand, Table};
        use ItemType as I;

        const E: Cell = None;
        let planks = Some(I::Planks);
        let stick = Some(I::Stick);
        let cobble = Some(I::Cobblestone);
        let stone = Some(I::Stone);
        let sand = Some(I::Sand);
        let dirt = Some(I::Dirt);
        let leaves = Some(I::Leaves);
        let leather = Some(I::Leather);
        let coal = Some(I::Coal);

        let mut recipes = Vec::new();
        let mut add = |id: &'static str,
                       context: CraftingContext,
                       rows: &[&[Cell]],
                       item: ItemType,
                       count: u32| {
            recipes.push(Recipe {
                id,
                pattern: rows.iter().map(|row| row.to_vec()).collect(),
                context,
                result: CraftResult::new(item, count),
            });
        };

        add("planks", Hand, &[&[Some(I::Wood), E], &[E, E]], I::Planks, 4);
        add("sticks", Hand, &[&[planks, E], &[planks, E]], I::Stick, 4);
        add(
            "crafting_table",
            Hand,
            &[&[planks, planks], &[planks, planks]],
            I::CraftingTable,
            1,
        );

        add(
            "wooden_pickaxe",
            Table,
            &[&[planks, planks, planks], &[E, stick, E], &[E, stick, E]],
            I::WoodenPickaxe,
            1,
        );
        add(
            "stone_pickaxe",
            Table,
            &[&[cobble, cobble, cobble], &[E, stick, E], &[E, stick, E]],
            I::StonePickaxe,
            1,
        );
        add(
            "wooden_axe",
            Table,
            &[&[planks, planks, E], &[planks, stick, E], &[E, stick, E]],
            I::WoodenAxe,
            1,
        );
        add(
            "stone_axe",
            Table,
            &[&[cobble, cobble, E], &[cobble, stick, E], &[E, stick, E]],
            I::StoneAxe,
            1,
        );
        for (id, head, item) in [
            ("wooden_shovel", planks, I::WoodenShovel),
            ("stone_shovel", cobble, I::StoneShovel),
            ("iron_shovel", Some(I::IronIngot), I::IronShovel),
            ("diamond_shovel", Some(I::Diamond), I::DiamondShovel),
        ] {
            add(id, Table, &[&[E, head, E], &[E, stick, E], &[E, stick, E]], item, 1);
        }

        add(
            "furnace",
            Table,
            &[
                &[cobble, cobble, cobble],
                &[cobble, E, cobble],
                &[cobble, cobble, cobble],
            ],
            I::Furnace,
            1,
        );
        add(
            "chest",
            Table,
            &[
                &[planks, planks, planks],
                &[planks, E, planks],
                &[planks, planks, planks],
            ],
            I::Chest,
            1,
        );
        add("torch", Hand, &[&[stick, E], &[E, E]], I::Torch, 4);
        add(
            "door",
            Table,
            &[&[planks, planks, E], &[planks, planks, E], &[planks, planks, E]],
            I::Door,
            3,
        );
        add(
            "ladder",
            Table,
            &[&[stick, E, stick], &[stick, stick, stick], &[stick, E, stick]],
            I::Ladder,
            3,
        );
        add(
            "fence",
            Table,
            &[&[planks, stick, planks], &[planks, stick, planks], &[E, E, E]],
            I::Fence,
            3,
        );
        add(
            "glass",
            Table,
            &[&[sand, sand, E], &[sand, sand, E], &[E, E, E]],
            I::Glass,
            1,
        );

        add(
            "cake",
            Table,
            &[&[dirt, leaves, E], &[Some(I::Grass), E, E], &[E, E, E]],
            I::Cake,
            1,
        );
        add(
            "cookie",
            Table,
            &[&[planks, sand, E], &[E, E, E], &[E, E, E]],
            I::Cookie,
            8,
        );
        let glass = Some(I::Glass);
        add(
            "gem",
            Table,
            &[&[glass, glass, E], &[glass, glass, E], &[E, E, E]],
            I::Gem,
            1,
        );
        add(
            "rainbow_block",
            Table,
            &[&[dirt, stone, E], &[sand, leaves, E], &[E, E, E]],
            I::RainbowBlock,
            1,
        );
        // Same shape as "sticks", which is declared first and always wins.
        add("smiley_block", Hand, &[&[planks, E], &[planks, E]], I::SmileyBlock, 1);
        add(
            "star_block",
            Table,
            &[&[E, stone, E], &[stone, E, stone], &[E, stone, E]],
            I::StarBlock,
            1,
        );
        add(
            "magic_wand",
            Table,
            &[&[E, E, Some(I::Gem)], &[E, stick, E], &[stick, E, E]],
            I::MagicWand,
            1,
        );
        add(
            "flower_pot",
            Table,
            &[&[dirt, E, dirt], &[E, dirt, E], &[E, E, E]],
            I::FlowerPot,
            1,
        );
        let clump = Some(I::MysteryClump);
        add(
            "rainbow_from_clumps",
            Table,
            &[&[clump, clump, E], &[clump, clump, E], &[E, E, E]],
            I::RainbowBlock,
            1,
        );

        let powder = Some(I::Gunpowder);
        add(
            "tnt",
            Table,
            &[
                &[powder, sand, powder],
                &[sand, powder, sand],
                &[powder, sand, powder],
            ],
            I::Tnt,
            1,
        );
        add(
            "tnt_from_coal",
            Table,
            &[&[sand, coal, sand], &[coal, coal, E], &[E, E, E]],
            I::Tnt,
            1,
        );
        let wool = Some(I::Wool);
        add(
            "bed",
            Table,
            &[&[wool, wool, wool], &[planks, planks, planks], &[E, E, E]],
            I::Bed,
            1,
        );
        add(
            "bed_from_leaves",
            Table,
            &[&[leaves, leaves, leaves], &[planks, planks, planks], &[E, E, E]],
            I::Bed,
            1,
        );

        for (id, blade, item) in [
            ("wooden_sword", planks, I::WoodenSword),
            ("stone_sword", cobble, I::StoneSword),
            ("iron_sword", Some(I::IronIngot), I::IronSword),
            ("gold_sword", Some(I::GoldIngot), I::GoldSword),
            ("diamond_sword", Some(I::Gem), I::DiamondSword),
        ] {
            add(id, Table, &[&[E, blade, E], &[E, blade, E], &[E, stick, E]], item, 1);
        }

        let string = Some(I::String);
        add(
            "bow",
            Table,
            &[&[E, stick, string], &[stick, E, string], &[E, stick, string]],
            I::Bow,
            1,
        );
        add(
            "arrow",
            Table,
            &[&[E, stick, E], &[E, stick, E], &[E, leaves, E]],
            I::Arrow,
            4,
        );

        add(
            "iron_ingot",
            Table,
            &[&[Some(I::IronOre), coal, E], &[E, E, E], &[E, E, E]],
            I::IronIngot,
            1,
        );
        add(
            "gold_ingot",
            Table,
            &[&[Some(I::GoldOre), coal, E], &[E, E, E], &[E, E, E]],
            I::GoldIngot,
            1,
        );
        add(
            "string",
            Table,
            &[&[leaves, leaves, E], &[leaves, leaves, E], &[E, E, E]],
            I::String,
            2,
        );
        add(
            "leather",
            Table,
            &[&[dirt, dirt, E], &[dirt, dirt, E], &[E, E, E]],
            I::Leather,
            1,
        );

        add(
            "leather_helmet",
            Table,
            &[&[leather, leather, leather], &[leather, E, leather], &[E, E, E]],
            I::LeatherHelmet,
            1,
        );
        add(
            "leather_chestplate",
            Table,
            &[
                &[leather, E, leather],
                &[leather, leather, leather],
                &[leather, leather, leather],
            ],
            I::LeatherChestplate,
            1,
        );
        add(
            "leather_leggings",
            Table,
            &[
                &[leather, leather, leather],
                &[leather, E, leather],
                &[leather, E, leather],
            ],
            I::LeatherLeggings,
            1,
        );
        add(
            "leather_boots",
            Table,
            &[&[E, E, E], &[leather, E, leather], &[leather, E, leather]],
            I::LeatherBoots,
            1,
        );

        Self::new(recipes)
    }
}

impl Default for RecipeBook {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[Cell]]) -> Vec<Vec<Cell>> {
        rows.iter().map(|row| row.to_vec()).collect()
    }

    const W: Cell = Some(ItemType::Wood);
    const P: Cell = Some(ItemType::Planks);
    const S: Cell = Some(ItemType::Stick);
    const E: Cell = None;

    #[test]
    fn test_hand_planks() {
        let book = RecipeBook::standard();
        let input = grid(&[&[W, E], &[E, E]]);
        assert_eq!(
            book.find_recipe(&input, CraftingContext::Hand),
            Some(CraftResult::new(ItemType::Planks, 4))
        );
    }

    #[test]
    fn test_partial_pattern_falls_back_to_dust() {
        // Planks-like shape with a lone log: no recipe, one occupied cell.
        let book = RecipeBook::standard();
        let input = grid(&[&[W, E], &[W, E]]);
        assert!(book.find_match(&input, CraftingContext::Hand).is_none());
        let input = grid(&[&[E, W], &[E, E]]);
        assert_eq!(
            book.find_recipe(&input, CraftingContext::Hand),
            Some(CraftResult::new(ItemType::OddDust, 1))
        );
    }

    #[test]
    fn test_two_log_planks_book_leaves_a_single_log_as_dust() {
        let book = RecipeBook::new(vec![Recipe {
            id: "planks",
            pattern: grid(&[&[W, E], &[W, E]]),
            context: CraftingContext::Hand,
            result: CraftResult::new(ItemType::Planks, 4),
        }]);
        let input = grid(&[&[W, E], &[E, E]]);
        assert!(book.find_match(&input, CraftingContext::Hand).is_none());
        assert_eq!(
            book.find_recipe(&input, CraftingContext::Hand),
            Some(CraftResult::new(ItemType::OddDust, 1))
        );
    }

    #[test]
    fn test_table_recipe_gated_in_hand() {
        let book = RecipeBook::standard();
        let input = grid(&[&[P, P, P], &[E, S, E], &[E, S, E]]);
        assert!(book.find_match(&input, CraftingContext::Hand).is_none());
        assert_ne!(
            book.find_recipe(&input, CraftingContext::Hand),
            Some(CraftResult::new(ItemType::WoodenPickaxe, 1))
        );
        assert_eq!(
            book.find_recipe(&input, CraftingContext::Table),
            Some(CraftResult::new(ItemType::WoodenPickaxe, 1))
        );
    }

    #[test]
    fn test_small_recipe_matches_every_offset() {
        let book = RecipeBook::standard();
        for oy in 0..2 {
            for ox in 0..2 {
                let mut input = vec![vec![E; 3]; 3];
                for dy in 0..2 {
                    for dx in 0..2 {
                        input[oy + dy][ox + dx] = P;
                    }
                }
                assert_eq!(
                    book.find_recipe(&input, CraftingContext::Table),
                    Some(CraftResult::new(ItemType::CraftingTable, 1)),
                    "offset ({ox}, {oy})"
                );
            }
        }
    }

    #[test]
    fn test_stray_cell_breaks_offset_match() {
        let book = RecipeBook::standard();
        let recipe = &book.recipes()[0];
        let input = grid(&[&[W, E, E], &[E, E, E], &[E, E, S]]);
        assert!(!recipe.matches(&input));
        let input = grid(&[&[E, E, E], &[E, E, E], &[E, E, W]]);
        assert!(!recipe.matches(&input), "wood outside the 2x2 footprint");
        let input = grid(&[&[E, E, E], &[E, W, E], &[E, E, E]]);
        assert!(recipe.matches(&input));
    }

    #[test]
    fn test_declaration_order_wins() {
        let book = RecipeBook::standard();
        let input = grid(&[&[P, E], &[P, E]]);
        let hit = book.find_match(&input, CraftingContext::Hand).unwrap();
        assert_eq!(hit.id, "sticks");
    }

    #[test]
    fn test_fallback_policy() {
        let c = Some(ItemType::Cobblestone);
        let d = Some(ItemType::Dirt);
        assert_eq!(RecipeBook::fallback(&grid(&[&[E, E], &[E, E]])), None);
        assert_eq!(
            RecipeBook::fallback(&grid(&[&[d, E], &[E, E]])),
            Some(CraftResult::new(ItemType::OddDust, 1))
        );
        assert_eq!(
            RecipeBook::fallback(&grid(&[&[c, W], &[E, E]])),
            Some(CraftResult::new(ItemType::MysteryClump, 1))
        );
        assert_eq!(
            RecipeBook::fallback(&grid(&[&[d, d], &[d, d]])),
            Some(CraftResult::new(ItemType::MysteryClump, 2))
        );
        assert_eq!(
            RecipeBook::fallback(&grid(&[&[d, d], &[d, E]])),
            Some(CraftResult::new(ItemType::OddDust, 3))
        );
    }

    #[test]
    fn test_empty_grid_has_no_result() {
        let book = RecipeBook::standard();
        assert_eq!(book.find_recipe(&vec![vec![E; 3]; 3], CraftingContext::Table), None);
    }

    #[test]
    fn test_patterns_are_square() {
        for recipe in RecipeBook::standard().recipes() {
            let size = recipe.size();
            assert!(size == 2 || size == 3, "{}", recipe.id);
            assert!(recipe.pattern.iter().all(|row| row.len() == size), "{}", recipe.id);
            if recipe.context == CraftingContext::Hand {
                assert_eq!(size, 2, "{}", recipe.id);
            }
        }
    }
}
