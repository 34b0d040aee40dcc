//! The 2D block grid.
//!
//! Cells are addressed `(x, y)` with `x` in `[0, width)` and `y` in `[0, height)`,
//! `y` growing downward. Reads outside the grid see [`ItemType::Air`] and writes
//! outside it are ignored, so collision and raycast code never bounds-check.

use mdsandbox_core::ItemType;
use mdsandbox_physics::CollisionGrid;

/// Largest grid a save may ask for.
pub const MAX_WORLD_CELLS: u64 = 4_000_000;

/// Dense block storage, column-major (`blocks[x * height + y]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridWorld {
    width: i32,
    height: i32,
    blocks: Vec<ItemType>,
}

impl GridWorld {
    /// All-air grid of the given size. Negative sizes are treated as zero.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            blocks: vec![ItemType::Air; (width as usize) * (height as usize)],
        }
    }

    /// Width in cells.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Check whether a `width` by `height` grid has cells and fits [`MAX_WORLD_CELLS`].
    pub fn size_is_loadable(width: i32, height: i32) -> bool {
        width > 0 && height > 0 && width as u64 * height as u64 <= MAX_WORLD_CELLS
    }

    /// Check whether a cell lies inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        (0..self.width).contains(&x) && (0..self.height).contains(&y)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| (x as usize) * (self.height as usize) + y as usize)
    }

    /// Block at `(x, y)`, or air outside the grid.
    pub fn get_block(&self, x: i32, y: i32) -> ItemType {
        self.index(x, y)
            .map(|idx| self.blocks[idx])
            .unwrap_or(ItemType::Air)
    }

    /// Overwrite a cell. Returns `false` (and changes nothing) outside the grid.
    pub fn set_block(&mut self, x: i32, y: i32, block: ItemType) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.blocks[idx] = block;
                true
            }
            None => false,
        }
    }

    /// Clear a cell and hand back what it drops.
    ///
    /// Returns `None` for air, for out-of-range cells, and for blocks without a drop
    /// (the cell is still cleared in that last case).
    pub fn break_block(&mut self, x: i32, y: i32) -> Option<ItemType> {
        let idx = self.index(x, y)?;
        let block = self.blocks[idx];
        if block == ItemType::Air {
            return None;
        }
        self.blocks[idx] = ItemType::Air;
        block.drop()
    }

    /// One column, top to bottom. Empty outside the grid.
    pub fn column(&self, x: i32) -> &[ItemType] {
        if !(0..self.width).contains(&x) {
            return &[];
        }
        let start = (x as usize) * (self.height as usize);
        &self.blocks[start..start + self.height as usize]
    }

    /// First solid cell from the top of column `x`.
    pub fn surface_y(&self, x: i32) -> Option<i32> {
        self.column(x)
            .iter()
            .position(|block| block.is_solid())
            .map(|y| y as i32)
    }

    /// Number of cells holding `block`.
    pub fn count(&self, block: ItemType) -> usize {
        self.blocks.iter().filter(|b| **b == block).count()
    }

    /// Columns as nested vectors (`result[x][y]`), the save layout.
    pub fn to_columns(&self) -> Vec<Vec<ItemType>> {
        (0..self.width).map(|x| self.column(x).to_vec()).collect()
    }

    /// Rebuild from nested columns. Short columns are padded with air, long ones cut.
    pub fn from_columns(width: i32, height: i32, columns: &[Vec<ItemType>]) -> Self {
        let mut world = Self::new(width, height);
        for (x, column) in columns.iter().enumerate().take(world.width as usize) {
            for (y, block) in column.iter().enumerate().take(world.height as usize) {
                world.set_block(x as i32, y as i32, *block);
            }
        }
        world
    }
}

impl CollisionGrid for GridWorld {
    fn is_solid(&self, bx: i32, by: i32) -> bool {
        self.get_block(bx, by).is_solid()
    }

    fn is_water(&self, bx: i32, by: i32) -> bool {
        self.get_block(bx, by) == ItemType::Water
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_reads_are_air() {
        let mut world = GridWorld::new(4, 4);
        world.set_block(0, 0, ItemType::Stone);
        assert_eq!(world.get_block(-1, 0), ItemType::Air);
        assert_eq!(world.get_block(4, 0), ItemType::Air);
        assert_eq!(world.get_block(0, 4), ItemType::Air);
        assert_eq!(world.get_block(0, 0), ItemType::Stone);
    }

    #[test]
    fn out_of_range_writes_are_rejected() {
        let mut world = GridWorld::new(4, 4);
        let before = world.clone();
        assert!(!world.set_block(4, 0, ItemType::Stone));
        assert!(!world.set_block(0, -1, ItemType::Stone));
        assert_eq!(world, before);
    }

    #[test]
    fn break_block_yields_drop_once() {
        let mut world = GridWorld::new(10, 10);
        world.set_block(5, 5, ItemType::Stone);
        assert_eq!(world.break_block(5, 5), Some(ItemType::Cobblestone));
        assert_eq!(world.get_block(5, 5), ItemType::Air);
        assert_eq!(world.break_block(5, 5), None);
    }

    #[test]
    fn break_water_clears_without_drop() {
        let mut world = GridWorld::new(2, 2);
        world.set_block(1, 1, ItemType::Water);
        assert_eq!(world.break_block(1, 1), None);
        assert_eq!(world.get_block(1, 1), ItemType::Air);
    }

    #[test]
    fn surface_skips_water() {
        let mut world = GridWorld::new(1, 6);
        world.set_block(0, 2, ItemType::Water);
        world.set_block(0, 4, ItemType::Sand);
        assert_eq!(world.surface_y(0), Some(4));
        assert_eq!(world.surface_y(3), None);
    }

    #[test]
    fn columns_roundtrip_pads_and_truncates() {
        let columns = vec![
            vec![ItemType::Dirt],
            vec![ItemType::Stone, ItemType::Stone, ItemType::Stone, ItemType::Stone],
        ];
        let world = GridWorld::from_columns(3, 3, &columns);
        assert_eq!(world.get_block(0, 0), ItemType::Dirt);
        assert_eq!(world.get_block(0, 1), ItemType::Air);
        assert_eq!(world.get_block(1, 2), ItemType::Stone);
        assert_eq!(world.get_block(2, 0), ItemType::Air);
        assert_eq!(world.to_columns()[1].len(), 3);
    }

    #[test]
    fn loadable_sizes_are_bounded() {
        assert!(GridWorld::size_is_loadable(300, 100));
        assert!(GridWorld::size_is_loadable(4000, 1000));
        assert!(!GridWorld::size_is_loadable(4001, 1000));
        assert!(!GridWorld::size_is_loadable(0, 100));
        assert!(!GridWorld::size_is_loadable(-3, -3));
        assert!(!GridWorld::size_is_loadable(i32::MAX, i32::MAX));
    }
}
