//! Crafting grid the player fills from their inventory.

use crate::inventory::{Inventory, ItemSink};
use mdsandbox_core::{Cell, CraftResult, CraftingContext, ItemType, RecipeBook};
use tracing::debug;

/// Open crafting grid. Cells are indexed row-major, `0..size*size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftingBench {
    context: CraftingContext,
    cells: Vec<Cell>,
}

impl CraftingBench {
    /// Open an empty grid sized for `context`.
    pub fn open(context: CraftingContext) -> Self {
        let size = context.grid_size();
        Self {
            context,
            cells: vec![None; size * size],
        }
    }

    /// Where this grid is crafting.
    pub fn context(&self) -> CraftingContext {
        self.context
    }

    /// Item in a cell.
    pub fn cell(&self, index: usize) -> Cell {
        self.cells.get(index).copied().flatten()
    }

    /// The grid as rows, ready for recipe matching.
    pub fn pattern(&self) -> Vec<Vec<Cell>> {
        self.cells
            .chunks(self.context.grid_size())
            .map(<[Cell]>::to_vec)
            .collect()
    }

    /// Click a cell.
    ///
    /// An occupied cell goes back to the inventory. An empty one takes one of the
    /// selected item. Returns whether the grid changed.
    pub fn place(&mut self, index: usize, inventory: &mut Inventory) -> bool {
        let Some(cell) = self.cells.get_mut(index) else {
            return false;
        };
        match *cell {
            Some(item) => {
                if inventory.add_item(item, 1) > 0 {
                    return false;
                }
                *cell = None;
                true
            }
            None => match inventory.use_selected() {
                Some(item) => {
                    *cell = Some(item);
                    true
                }
                None => false,
            },
        }
    }

    /// What the grid would craft right now.
    pub fn preview(&self, book: &RecipeBook) -> Option<CraftResult> {
        book.find_recipe(&self.pattern(), self.context)
    }

    /// Craft: credit the result to the inventory and consume the whole grid.
    ///
    /// Nothing happens when the grid crafts nothing or the result would not fit.
    pub fn take_result(&mut self, book: &RecipeBook, inventory: &mut Inventory) -> Option<CraftResult> {
        let result = self.preview(book)?;
        let mut staged = inventory.clone();
        if staged.add_item(result.item, result.count) > 0 {
            debug!(item = result.item.name(), count = result.count, "Craft result does not fit");
            return None;
        }
        *inventory = staged;
        self.cells.fill(None);
        debug!(item = result.item.name(), count = result.count, "Crafted");
        Some(result)
    }

    /// Close the grid, returning its items. Returns how many were lost to a full inventory.
    pub fn close(mut self, inventory: &mut Inventory) -> u32 {
        self.return_items(inventory)
    }

    /// Move every grid item back into the inventory.
    pub fn return_items(&mut self, inventory: &mut Inventory) -> u32 {
        self.cells
            .iter_mut()
            .filter_map(Option::take)
            .map(|item: ItemType| inventory.add_item(item, 1))
            .sum()
    }
}
