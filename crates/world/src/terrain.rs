//! Terrain generation for the block grid.
//!
//! Passes run in a fixed order so a seed always produces the same world:
//! columns (strata + ores), caves, sand shores, rivers, trees. Every random draw comes
//! from one seeded [`StdRng`], so generation must stay single-threaded.

use crate::grid::GridWorld;
use mdsandbox_core::{scoped_rng, ItemType, SimTick};
use noise::{NoiseFn, Perlin};
use rand::{rngs::StdRng, Rng};
use tracing::{debug, info, instrument};

/// RNG domain for terrain draws.
const TERRAIN_DOMAIN: u64 = 0x7465_7272;

/// One sinusoidal band of the surface height-map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightBand {
    /// Angular frequency per cell.
    pub frequency: f64,
    /// Amplitude in cells.
    pub amplitude: f64,
}

/// Ore placed in stone between two normalised depths (`y / height`, exclusive bounds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OreBand {
    /// Ore block.
    pub ore: ItemType,
    /// Lower depth bound.
    pub min_depth: f64,
    /// Upper depth bound.
    pub max_depth: f64,
    /// Chance per eligible stone cell.
    pub chance: f64,
}

/// Tunables for [`TerrainGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainParams {
    /// Mean surface row as a fraction of world height.
    pub surface_ratio: f64,
    /// Summed height-map bands.
    pub bands: Vec<HeightBand>,
    /// Ore bands, tried in order; the first hit wins a cell.
    pub ores: Vec<OreBand>,
    /// Rows below this fraction of height are plain stone (no ores, no caves).
    pub deep_ratio: f64,
    /// Caves stop above this fraction of height.
    pub cave_floor_ratio: f64,
    /// Minimum cells between surface and cave ceiling.
    pub cave_clearance: i32,
    /// Cave field threshold on `|sin(.1x) * cos(.1y)|`.
    pub cave_threshold: f64,
    /// Chance a cell above the threshold is carved.
    pub cave_chance: f64,
    /// Chance per column of a tree.
    pub tree_chance: f64,
    /// Sand replaces the top cells where `sin(x * shore_frequency)` exceeds this.
    pub shore_threshold: f64,
    /// Angular frequency of the shore field.
    pub shore_frequency: f64,
    /// Enable river carving.
    pub rivers: bool,
    /// Perlin ridge value above which a column becomes river.
    pub river_threshold: f64,
    /// Water depth of a river in cells.
    pub river_depth: i32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            surface_ratio: 0.4,
            bands: vec![
                HeightBand {
                    frequency: 0.02,
                    amplitude: 8.0,
                },
                HeightBand {
                    frequency: 0.1,
                    amplitude: 3.0,
                },
                HeightBand {
                    frequency: 0.3,
                    amplitude: 1.0,
                },
            ],
            ores: vec![
                OreBand {
                    ore: ItemType::Coal,
                    min_depth: 0.45,
                    max_depth: 0.65,
                    chance: 0.03,
                },
                OreBand {
                    ore: ItemType::IronOre,
                    min_depth: 0.5,
                    max_depth: 0.7,
                    chance: 0.02,
                },
                OreBand {
                    ore: ItemType::GoldOre,
                    min_depth: 0.6,
                    max_depth: 0.75,
                    chance: 0.01,
                },
                OreBand {
                    ore: ItemType::Emerald,
                    min_depth: 0.7,
                    max_depth: 1.0,
                    chance: 0.005,
                },
                OreBand {
                    ore: ItemType::DiamondOre,
                    min_depth: 0.72,
                    max_depth: 1.0,
                    chance: 0.003,
                },
            ],
            deep_ratio: 0.8,
            cave_floor_ratio: 0.7,
            cave_clearance: 10,
            cave_threshold: 0.8,
            cave_chance: 0.3,
            tree_chance: 0.05,
            shore_threshold: 0.6,
            shore_frequency: 0.05,
            rivers: true,
            river_threshold: 0.35,
            river_depth: 2,
        }
    }
}

/// Summary of a generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerrainStats {
    /// Trees planted.
    pub trees: usize,
    /// Cells carved by caves.
    pub cave_cells: usize,
    /// Columns turned into river.
    pub river_columns: usize,
}

/// Seeded terrain generator.
pub struct TerrainGenerator {
    world_seed: u64,
    params: TerrainParams,
    river_noise: Perlin,
}

impl TerrainGenerator {
    /// Create a new terrain generator from world seed with default parameters.
    pub fn new(world_seed: u64) -> Self {
        Self::with_params(world_seed, TerrainParams::default())
    }

    /// Create a generator with explicit parameters.
    pub fn with_params(world_seed: u64, params: TerrainParams) -> Self {
        Self {
            world_seed,
            params,
            river_noise: Perlin::new(world_seed as u32),
        }
    }

    /// World seed.
    pub fn seed(&self) -> u64 {
        self.world_seed
    }

    /// Surface row of column `x` for a world of `height` rows.
    pub fn surface_height(&self, x: i32, height: i32) -> i32 {
        let base = (height as f64 * self.params.surface_ratio).floor();
        let relief: f64 = self
            .params
            .bands
            .iter()
            .map(|band| (x as f64 * band.frequency).sin() * band.amplitude)
            .sum();
        (base + relief).floor() as i32
    }

    /// Generate a full world.
    pub fn generate(&self, width: i32, height: i32) -> GridWorld {
        self.generate_with_stats(width, height).0
    }

    /// Generate a full world and report what was placed.
    #[instrument(skip(self), fields(world_seed = self.world_seed))]
    pub fn generate_with_stats(&self, width: i32, height: i32) -> (GridWorld, TerrainStats) {
        debug!("Starting terrain generation");
        let mut world = GridWorld::new(width, height);
        let mut rng = scoped_rng(self.world_seed, TERRAIN_DOMAIN, SimTick::ZERO);
        let mut stats = TerrainStats::default();

        let surfaces: Vec<i32> = (0..world.width())
            .map(|x| self.surface_height(x, world.height()))
            .collect();

        for (x, &surface) in surfaces.iter().enumerate() {
            self.generate_column(&mut world, &mut rng, x as i32, surface);
        }
        for (x, &surface) in surfaces.iter().enumerate() {
            stats.cave_cells += self.carve_caves(&mut world, &mut rng, x as i32, surface);
        }
        for (x, &surface) in surfaces.iter().enumerate() {
            self.lay_shore(&mut world, x as i32, surface);
        }
        if self.params.rivers {
            for (x, &surface) in surfaces.iter().enumerate() {
                if self.carve_river(&mut world, x as i32, surface) {
                    stats.river_columns += 1;
                }
            }
        }
        for (x, &surface) in surfaces.iter().enumerate() {
            if self.plant_tree(&mut world, &mut rng, x as i32, surface) {
                stats.trees += 1;
            }
        }

        info!(
            width,
            height,
            trees = stats.trees,
            cave_cells = stats.cave_cells,
            river_columns = stats.river_columns,
            coal = world.count(ItemType::Coal),
            iron = world.count(ItemType::IronOre),
            "Generated terrain"
        );
        (world, stats)
    }

    /// Strata: grass, dirt, mixed dirt/stone, stone with ores, deep stone, bedrock.
    fn generate_column(&self, world: &mut GridWorld, rng: &mut StdRng, x: i32, surface: i32) {
        let height = world.height();
        let deep = height as f64 * self.params.deep_ratio;

        for y in 0..height {
            let block = if y == height - 1 {
                ItemType::Bedrock
            } else if y == surface {
                ItemType::Grass
            } else if y > surface && y < surface + 4 {
                ItemType::Dirt
            } else if y >= surface + 4 && y < surface + 8 {
                if rng.gen::<f64>() < 0.7 {
                    ItemType::Dirt
                } else {
                    ItemType::Stone
                }
            } else if y >= surface + 8 && (y as f64) < deep {
                self.pick_ore(rng, y as f64 / height as f64)
                    .unwrap_or(ItemType::Stone)
            } else if y > surface && (y as f64) >= deep {
                ItemType::Stone
            } else {
                continue;
            };
            world.set_block(x, y, block);
        }
    }

    fn pick_ore(&self, rng: &mut StdRng, depth: f64) -> Option<ItemType> {
        self.params
            .ores
            .iter()
            .find(|band| {
                depth > band.min_depth && depth < band.max_depth && rng.gen::<f64>() < band.chance
            })
            .map(|band| band.ore)
    }

    fn carve_caves(&self, world: &mut GridWorld, rng: &mut StdRng, x: i32, surface: i32) -> usize {
        let floor = world.height() as f64 * self.params.cave_floor_ratio;
        let mut carved = 0;
        let mut y = surface + self.params.cave_clearance + 1;
        while (y as f64) < floor {
            let field = (x as f64 * 0.1).sin() * (y as f64 * 0.1).cos();
            if field.abs() > self.params.cave_threshold && rng.gen::<f64>() < self.params.cave_chance
            {
                world.set_block(x, y, ItemType::Air);
                carved += 1;
            }
            y += 1;
        }
        carved
    }

    fn lay_shore(&self, world: &mut GridWorld, x: i32, surface: i32) {
        if (x as f64 * self.params.shore_frequency).sin() <= self.params.shore_threshold {
            return;
        }
        for y in surface..surface + 3 {
            if matches!(world.get_block(x, y), ItemType::Grass | ItemType::Dirt) {
                world.set_block(x, y, ItemType::Sand);
            }
        }
    }

    /// Flood the top of the column with water over a sand bed.
    fn carve_river(&self, world: &mut GridWorld, x: i32, surface: i32) -> bool {
        let ridge = self.river_noise.get([x as f64 * 0.03, 0.5]);
        if ridge <= self.params.river_threshold {
            return false;
        }
        let depth = self.params.river_depth.max(1);
        for y in surface..surface + depth {
            world.set_block(x, y, ItemType::Water);
        }
        if world.get_block(x, surface + depth).is_solid() {
            world.set_block(x, surface + depth, ItemType::Sand);
        }
        true
    }

    /// Trunk of 5-8 logs above grass with a canopy that only fills air.
    fn plant_tree(&self, world: &mut GridWorld, rng: &mut StdRng, x: i32, surface: i32) -> bool {
        if !(rng.gen::<f64>() < self.params.tree_chance && x > 5 && x < world.width() - 5) {
            return false;
        }
        if world.get_block(x, surface) != ItemType::Grass {
            return false;
        }

        let trunk = rng.gen_range(5..=8);
        let base = surface - 1;
        for i in 0..trunk {
            world.set_block(x, base - i, ItemType::Wood);
        }

        for dx in -3..=3i32 {
            for dy in 0..=3 {
                let leaf_x = x + dx;
                let leaf_y = base - trunk - dy;
                if (dx.abs() <= 2 || dy <= 2)
                    && world.in_bounds(leaf_x, leaf_y)
                    && world.get_block(leaf_x, leaf_y) == ItemType::Air
                {
                    world.set_block(leaf_x, leaf_y, ItemType::Leaves);
                }
            }
        }
        true
    }
}
