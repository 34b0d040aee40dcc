//! Whole-game state and the fixed per-tick update order.
//!
//! [`GameState::tick`] drives every subsystem in a deterministic order and reports what
//! happened as [`TickEvent`]s. Random streams are derived per tick from the world seed,
//! so a seed plus an input script always replays to the same state.

use crate::bench::CraftingBench;
use crate::combat::{AttackReport, Kill};
use crate::grid::{GridWorld, MAX_WORLD_CELLS};
use crate::inventory::{Chest, ChestStore, Inventory, ItemSink, INVENTORY_SIZE};
use crate::managers::{
    AnimalManager, AnimalManagerConfig, EnemyManager, EnemyManagerConfig, PopulationReport,
};
use crate::mining::MiningStateMachine;
use crate::persist::{
    blocks_from_save, stacks_from_save, stacks_to_save, ArmorSave, ChestSave, DayNightSave,
    InventorySave, PlayerSave, SaveData, SaveError, WorldSave,
};
use crate::player::{ArmorSet, Player};
use crate::terrain::TerrainGenerator;
use crate::time::{DayNightClock, DayPhase, DEFAULT_DAY_DURATION_MS};
use glam::Vec2;
use mdsandbox_core::{
    scoped_rng, CraftResult, CraftingContext, ItemStack, ItemType, RecipeBook, SimTick,
};
use mdsandbox_physics::{Aabb, BLOCK_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Maximum interaction distance, in blocks, from the player's centre to a cell centre.
pub const REACH_BLOCKS: f32 = 5.0;

const ENEMY_DOMAIN: u64 = 0x454e_454d;
const ANIMAL_DOMAIN: u64 = 0x414e_494d;
const COMBAT_DOMAIN: u64 = 0x4849_5453;

/// Settings for a new game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// World width in cells.
    pub width: i32,
    /// World height in cells.
    pub height: i32,
    /// Seed for terrain and every random stream.
    pub seed: u64,
    /// Length of a full day.
    pub day_duration_ms: f64,
    /// Time of day at start, as a fraction of the day.
    pub start_time: f64,
    /// Hostile population settings.
    pub enemies: EnemyManagerConfig,
    /// Passive population settings.
    pub animals: AnimalManagerConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 100,
            seed: 0,
            day_duration_ms: DEFAULT_DAY_DURATION_MS,
            start_time: 0.0,
            enemies: EnemyManagerConfig::default(),
            animals: AnimalManagerConfig::default(),
        }
    }
}

/// Player intent for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickInput {
    /// Horizontal direction: negative left, positive right, zero none.
    pub move_x: f32,
    /// Jump, or swim while in water.
    pub jump: bool,
    /// Swing at everything in range.
    pub attack: bool,
    /// Cell to interact with.
    pub interact: Option<(i32, i32)>,
    /// Stop mining.
    pub release: bool,
    /// Hotbar slot to select.
    pub select: Option<usize>,
    /// Eat the selected item.
    pub eat: bool,
    /// Equip the selected weapon or armour piece.
    pub equip: bool,
}

/// Result of [`GameState::interact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractOutcome {
    /// The cell is further than [`REACH_BLOCKS`] away.
    OutOfReach,
    /// A block from the selected slot was placed.
    Placed(ItemType),
    /// Nothing placeable is selected, or the block would overlap the player.
    Blocked,
    /// The crafting table grid is open.
    OpenedBench,
    /// The chest at the cell is open.
    OpenedChest,
    /// Mining of this block started or continues.
    Mining(ItemType),
    /// The cell cannot be interacted with.
    Nothing,
}

/// Something observable that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TickEvent {
    /// A mined block was cleared.
    BlockBroken {
        x: i32,
        y: i32,
        block: ItemType,
        drop: Option<ItemType>,
    },
    /// A block was placed from the inventory.
    BlockPlaced { x: i32, y: i32, block: ItemType },
    /// Mining of a new target began.
    MiningStarted {
        x: i32,
        y: i32,
        block: ItemType,
        total_ms: f32,
    },
    /// Mining was released before completion.
    MiningCancelled,
    /// The clock crossed into a new phase.
    PhaseChanged { from: DayPhase, to: DayPhase },
    /// A hostile appeared.
    EnemySpawned { kind: &'static str, x: f32, y: f32 },
    /// An animal appeared.
    AnimalSpawned { kind: &'static str, x: f32, y: f32 },
    /// Animals left the simulation range.
    AnimalsDespawned { count: usize },
    /// A creature died and its loot was rolled.
    EntityKilled {
        kind: &'static str,
        x: f32,
        y: f32,
        drops: Vec<ItemStack>,
    },
    /// The player swung.
    Attacked { hit: usize, damaged: usize },
    /// The player lost health.
    PlayerDamaged { amount: f32, health: f32 },
    /// The player returned to the spawn point.
    PlayerRespawned { fell_out: bool },
    /// The crafting table grid opened.
    BenchOpened,
    /// A chest opened.
    ChestOpened { x: i32, y: i32 },
    /// The player ate.
    Ate { item: ItemType, health: f32 },
    /// The player equipped an item.
    Equipped { item: ItemType },
}

impl TickEvent {
    /// Stable snake_case label, the same as the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            TickEvent::BlockBroken { .. } => "block_broken",
            TickEvent::BlockPlaced { .. } => "block_placed",
            TickEvent::MiningStarted { .. } => "mining_started",
            TickEvent::MiningCancelled => "mining_cancelled",
            TickEvent::PhaseChanged { .. } => "phase_changed",
            TickEvent::EnemySpawned { .. } => "enemy_spawned",
            TickEvent::AnimalSpawned { .. } => "animal_spawned",
            TickEvent::AnimalsDespawned { .. } => "animals_despawned",
            TickEvent::EntityKilled { .. } => "entity_killed",
            TickEvent::Attacked { .. } => "attacked",
            TickEvent::PlayerDamaged { .. } => "player_damaged",
            TickEvent::PlayerRespawned { .. } => "player_respawned",
            TickEvent::BenchOpened => "bench_opened",
            TickEvent::ChestOpened { .. } => "chest_opened",
            TickEvent::Ate { .. } => "ate",
            TickEvent::Equipped { .. } => "equipped",
        }
    }
}

/// Everything a tick produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    /// The tick that ran.
    pub tick: SimTick,
    /// Events in the order they happened.
    pub events: Vec<TickEvent>,
}

/// The complete simulation.
#[derive(Debug, Clone)]
pub struct GameState {
    seed: u64,
    tick: SimTick,
    /// Block grid.
    pub world: GridWorld,
    /// The player.
    pub player: Player,
    /// Player inventory.
    pub inventory: Inventory,
    /// Placed chests.
    pub chests: ChestStore,
    /// Time of day.
    pub clock: DayNightClock,
    /// Hostile population.
    pub enemies: EnemyManager,
    /// Passive population.
    pub animals: AnimalManager,
    /// Mining progress.
    pub mining: MiningStateMachine,
    recipes: RecipeBook,
    bench: Option<CraftingBench>,
    open_chest: Option<(i32, i32)>,
}

impl GameState {
    /// Generate terrain and place the player at the spawn point.
    #[instrument(skip(config), fields(seed = config.seed, width = config.width, height = config.height))]
    pub fn new(config: GameConfig) -> Self {
        let world = TerrainGenerator::new(config.seed).generate(config.width, config.height);
        Self::from_world(config, world)
    }

    /// Start on an existing grid. The grid size wins over the config's.
    pub fn from_world(config: GameConfig, world: GridWorld) -> Self {
        let mut clock = DayNightClock::new(config.day_duration_ms);
        clock.set_time(config.start_time);
        let player = Player::new(Player::spawn_point(world.width()));
        Self {
            seed: config.seed,
            tick: SimTick::ZERO,
            world,
            player,
            inventory: Inventory::new(),
            chests: ChestStore::new(),
            clock,
            enemies: EnemyManager::new(config.enemies),
            animals: AnimalManager::new(config.animals),
            mining: MiningStateMachine::new(),
            recipes: RecipeBook::standard(),
            bench: None,
            open_chest: None,
        }
    }

    /// World seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Next tick to run.
    pub fn current_tick(&self) -> SimTick {
        self.tick
    }

    /// Recipes in use.
    pub fn recipes(&self) -> &RecipeBook {
        &self.recipes
    }

    /// Open crafting grid, if any.
    pub fn bench(&self) -> Option<&CraftingBench> {
        self.bench.as_ref()
    }

    /// Cell of the open chest, if any.
    pub fn open_chest(&self) -> Option<(i32, i32)> {
        self.open_chest
    }

    /// Advance the simulation by one host frame of `dt_ms`.
    pub fn tick(&mut self, input: &TickInput, dt_ms: f32) -> TickReport {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        let tick = self.tick;
        let mut events = Vec::new();

        self.apply_input(input, tick, &mut events);

        let before = self.clock.phase();
        self.clock.advance(f64::from(dt_ms));
        let after = self.clock.phase();
        if before != after {
            debug!(from = before.name(), to = after.name(), "Day phase changed");
            events.push(TickEvent::PhaseChanged {
                from: before,
                to: after,
            });
        }

        if self.player.update(&self.world, dt_ms).fell_out {
            events.push(TickEvent::PlayerRespawned { fell_out: true });
        }

        let mut rng = scoped_rng(self.seed, ENEMY_DOMAIN, tick);
        let report = self.enemies.update(
            &self.world,
            &self.player.body,
            Some(&self.clock),
            dt_ms,
            &mut rng,
            &mut self.inventory,
        );
        push_population(&mut events, report, true);

        let contact = self.enemies.contact_damage(&self.player.body);
        if contact > 0.0 {
            let amount = self.player.take_damage(contact);
            if amount > 0.0 {
                events.push(TickEvent::PlayerDamaged {
                    amount,
                    health: self.player.health(),
                });
            }
            if self.player.is_dead() {
                self.player.respawn(self.world.width());
                events.push(TickEvent::PlayerRespawned { fell_out: false });
            }
        }

        let mut rng = scoped_rng(self.seed, ANIMAL_DOMAIN, tick);
        let report = self.animals.update(
            &self.world,
            &self.player.body,
            dt_ms,
            &mut rng,
            &mut self.inventory,
        );
        push_population(&mut events, report, false);

        self.finish_mining(dt_ms, &mut events);

        self.tick = tick.advance(1);
        TickReport { tick, events }
    }

    fn apply_input(&mut self, input: &TickInput, tick: SimTick, events: &mut Vec<TickEvent>) {
        if let Some(slot) = input.select {
            self.inventory.select(slot);
        }
        self.player.walk(input.move_x);
        if input.jump {
            self.player.jump();
        }
        if input.attack {
            if let Some(report) = self.attack(tick) {
                events.push(TickEvent::Attacked {
                    hit: report.hit,
                    damaged: report.damaged,
                });
                events.extend(report.kills.into_iter().map(kill_event));
            }
        }
        if input.release && self.release() {
            events.push(TickEvent::MiningCancelled);
        }
        if let Some((x, y)) = input.interact {
            let was_mining = self.mining.target();
            match self.interact(x, y) {
                InteractOutcome::Placed(block) => {
                    events.push(TickEvent::BlockPlaced { x, y, block })
                }
                InteractOutcome::OpenedBench => events.push(TickEvent::BenchOpened),
                InteractOutcome::OpenedChest => events.push(TickEvent::ChestOpened { x, y }),
                InteractOutcome::Mining(block) if was_mining != self.mining.target() => {
                    events.push(TickEvent::MiningStarted {
                        x,
                        y,
                        block,
                        total_ms: self.mining.total_required_ms(),
                    })
                }
                _ => {}
            }
        }
        if input.eat {
            if let Some(item) = self.eat_selected() {
                events.push(TickEvent::Ate {
                    item,
                    health: self.player.health(),
                });
            }
        }
        if input.equip {
            if let Some(item) = self.equip_selected() {
                events.push(TickEvent::Equipped { item });
            }
        }
    }

    fn attack(&mut self, tick: SimTick) -> Option<AttackReport> {
        let (center, damage, radius) = self.player.try_attack()?;
        let mut rng = scoped_rng(self.seed, COMBAT_DOMAIN, tick);
        let mut report =
            self.enemies
                .attack(center, damage, radius, &mut rng, &mut self.inventory);
        let animals = self
            .animals
            .attack(center, damage, radius, &mut rng, &mut self.inventory);
        report.hit += animals.hit;
        report.damaged += animals.damaged;
        report.kills.extend(animals.kills);
        Some(report)
    }

    fn finish_mining(&mut self, dt_ms: f32, events: &mut Vec<TickEvent>) {
        let Some(target) = self.mining.tick(dt_ms) else {
            return;
        };
        let (x, y) = (target.x, target.y);
        if self.world.get_block(x, y) != target.block {
            debug!(x, y, "Mined cell changed before completion");
            return;
        }

        let tool = self.inventory.selected_item().and_then(ItemType::tool);
        let drop = if MiningStateMachine::can_harvest(target.block, tool) {
            let drop = self.world.break_block(x, y);
            if let Some(item) = drop {
                let lost = self.inventory.add_item(item, 1);
                if lost > 0 {
                    debug!(item = item.name(), "Inventory full, drop lost");
                }
            }
            drop
        } else {
            self.world.set_block(x, y, ItemType::Air);
            None
        };

        if target.block == ItemType::Chest {
            let lost = self.chests.remove_into(x, y, &mut self.inventory);
            if lost > 0 {
                debug!(x, y, lost, "Chest contents lost to a full inventory");
            }
            if self.open_chest == Some((x, y)) {
                self.open_chest = None;
            }
        }

        events.push(TickEvent::BlockBroken {
            x,
            y,
            block: target.block,
            drop,
        });
    }

    /// Use the selected item on a cell: place, open, or start mining.
    ///
    /// Crafting tables and chests open on an empty hand or a non-tool item and are
    /// mined when a tool is selected.
    pub fn interact(&mut self, x: i32, y: i32) -> InteractOutcome {
        let cell_center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        let player_center = self.player.body.center() / BLOCK_SIZE;
        if player_center.distance(cell_center) > REACH_BLOCKS {
            return InteractOutcome::OutOfReach;
        }

        let tool = self.inventory.selected_item().and_then(ItemType::tool);
        match self.world.get_block(x, y) {
            ItemType::Air => self.place(x, y),
            ItemType::CraftingTable if tool.is_none() => {
                self.open_bench(CraftingContext::Table);
                InteractOutcome::OpenedBench
            }
            ItemType::Chest if tool.is_none() => {
                self.chests.place(x, y);
                self.open_chest = Some((x, y));
                InteractOutcome::OpenedChest
            }
            ItemType::Bedrock => InteractOutcome::Nothing,
            block => {
                self.mining.start(x, y, block, tool);
                InteractOutcome::Mining(block)
            }
        }
    }

    fn place(&mut self, x: i32, y: i32) -> InteractOutcome {
        if !self.world.in_bounds(x, y) {
            return InteractOutcome::Nothing;
        }
        let Some(block) = self
            .inventory
            .selected_item()
            .filter(|item| item.is_placeable())
        else {
            return InteractOutcome::Blocked;
        };
        let cell = Aabb::from_pos_size(
            Vec2::new(x as f32, y as f32) * BLOCK_SIZE,
            Vec2::splat(BLOCK_SIZE),
        );
        if cell.intersects(&self.player.body.aabb()) {
            return InteractOutcome::Blocked;
        }
        if self.inventory.use_selected().is_none() {
            return InteractOutcome::Blocked;
        }
        self.world.set_block(x, y, block);
        if block == ItemType::Chest {
            self.chests.place(x, y);
        }
        debug!(x, y, block = block.name(), "Block placed");
        InteractOutcome::Placed(block)
    }

    /// Stop mining. Returns whether anything was in progress.
    pub fn release(&mut self) -> bool {
        self.mining.cancel()
    }

    /// Eat the selected item if it heals. Returns what was eaten.
    pub fn eat_selected(&mut self) -> Option<ItemType> {
        let item = self
            .inventory
            .selected_item()
            .filter(|item| item.healing().is_some())?;
        self.inventory.use_selected()?;
        self.player.eat(item);
        Some(item)
    }

    /// Equip the selected sword or armour piece. Whatever it replaces goes back into
    /// the inventory. Returns what was equipped.
    pub fn equip_selected(&mut self) -> Option<ItemType> {
        let item = self.inventory.selected_item()?;
        let previous = if item.is_weapon() {
            self.player.equip_weapon(item).ok()?
        } else if item.armor_slot().is_some() {
            self.player.equip_armor(item).ok()?
        } else {
            return None;
        };
        self.inventory.use_selected();
        if let Some(previous) = previous {
            self.inventory.add_item(previous, 1);
        }
        Some(item)
    }

    /// Open a crafting grid, closing any grid already open.
    pub fn open_bench(&mut self, context: CraftingContext) {
        self.close_bench();
        self.bench = Some(CraftingBench::open(context));
    }

    /// Click a cell of the open grid. Returns whether the grid changed.
    pub fn bench_place(&mut self, index: usize) -> bool {
        match self.bench.as_mut() {
            Some(bench) => bench.place(index, &mut self.inventory),
            None => false,
        }
    }

    /// Craft from the open grid.
    pub fn bench_take(&mut self) -> Option<CraftResult> {
        let bench = self.bench.as_mut()?;
        bench.take_result(&self.recipes, &mut self.inventory)
    }

    /// Close the open grid. Returns how many grid items were lost to a full inventory.
    pub fn close_bench(&mut self) -> u32 {
        self.bench
            .take()
            .map_or(0, |bench| bench.close(&mut self.inventory))
    }

    /// Move an inventory slot into the open chest. Returns how many items moved.
    pub fn chest_deposit(&mut self, slot: usize) -> u32 {
        match self.open_chest {
            Some((x, y)) => self.chests.deposit(x, y, &mut self.inventory, slot),
            None => 0,
        }
    }

    /// Move a slot of the open chest into the inventory. Returns how many items moved.
    pub fn chest_withdraw(&mut self, slot: usize) -> u32 {
        match self.open_chest {
            Some((x, y)) => self.chests.withdraw(x, y, &mut self.inventory, slot),
            None => 0,
        }
    }

    /// Close the open chest.
    pub fn close_chest(&mut self) {
        self.open_chest = None;
    }

    /// Capture the current game as a save.
    pub fn snapshot_save(&self) -> SaveData {
        let armor = self.player.armor();
        let mut save = SaveData::stamped();
        save.world = Some(WorldSave {
            width: self.world.width(),
            height: self.world.height(),
            blocks: self
                .world
                .to_columns()
                .iter()
                .map(|column| column.iter().map(|block| block.id()).collect())
                .collect(),
        });
        save.player = Some(PlayerSave {
            x: Some(self.player.body.pos.x),
            y: Some(self.player.body.pos.y),
            health: Some(self.player.health()),
            max_health: Some(self.player.max_health()),
            equipped_weapon: self.player.equipped_weapon().map(ItemType::id),
            equipped_armor: ArmorSave {
                helmet: armor.helmet.map(ItemType::id),
                chestplate: armor.chestplate.map(ItemType::id),
                leggings: armor.leggings.map(ItemType::id),
                boots: armor.boots.map(ItemType::id),
            },
        });
        save.inventory = Some(InventorySave {
            slots: stacks_to_save(self.inventory.slots().as_slice()),
            selected: self.inventory.selected(),
        });
        save.chests = Some(
            self.chests
                .iter()
                .map(|((x, y), chest)| ChestSave {
                    x,
                    y,
                    slots: stacks_to_save(chest.slots().as_slice()),
                })
                .collect(),
        );
        save.day_night = Some(DayNightSave {
            current_time: self.clock.time_fraction(),
            day_duration_ms: self.clock.day_duration_ms(),
        });
        save
    }

    /// Merge a save into the live game, section by section and field by field.
    ///
    /// Absent sections and fields keep their live values. Out-of-range values are
    /// clamped with a warning.
    pub fn apply_save(&mut self, save: &SaveData) {
        if let Some(world) = &save.world {
            self.apply_world(world);
        }
        if let Some(player) = &save.player {
            self.apply_player(player);
        }
        if let Some(inventory) = &save.inventory {
            if inventory.selected >= INVENTORY_SIZE {
                warn!(selected = inventory.selected, "Saved slot selection out of range");
            }
            self.inventory =
                Inventory::from_saved(&stacks_from_save(&inventory.slots), inventory.selected);
        }
        if let Some(chests) = &save.chests {
            self.chests = ChestStore::new();
            for saved in chests {
                self.chests.insert(
                    saved.x,
                    saved.y,
                    Chest::from_saved(&stacks_from_save(&saved.slots)),
                );
            }
            self.open_chest = None;
        }
        if let Some(day_night) = &save.day_night {
            if !(0.0..1.0).contains(&day_night.current_time) {
                warn!(time = day_night.current_time, "Saved time of day out of range");
            }
            let paused = self.clock.paused;
            self.clock = DayNightClock::new(day_night.day_duration_ms);
            self.clock.set_time(day_night.current_time);
            self.clock.paused = paused;
        }
        info!(
            version = save.version,
            timestamp = %save.timestamp,
            chests = self.chests.len(),
            "Save applied"
        );
    }

    fn apply_world(&mut self, saved: &WorldSave) {
        if !GridWorld::size_is_loadable(saved.width, saved.height) {
            warn!(
                width = saved.width,
                height = saved.height,
                max_cells = MAX_WORLD_CELLS,
                "Saved world size out of range; keeping live world"
            );
            return;
        }
        if saved.blocks.len() != saved.width as usize
            || saved
                .blocks
                .iter()
                .any(|column| column.len() != saved.height as usize)
        {
            warn!(
                width = saved.width,
                height = saved.height,
                columns = saved.blocks.len(),
                "Saved world columns do not match its size; resizing"
            );
        }
        let columns = blocks_from_save(&saved.blocks);
        self.world = GridWorld::from_columns(saved.width, saved.height, &columns);
        self.mining.cancel();
    }

    fn apply_player(&mut self, saved: &PlayerSave) {
        if let Some(x) = saved.x.filter(|x| x.is_finite()) {
            self.player.body.pos.x = x;
        }
        if let Some(y) = saved.y.filter(|y| y.is_finite()) {
            self.player.body.pos.y = y;
        }
        let max_health = saved.max_health.unwrap_or(self.player.max_health());
        let health = saved.health.unwrap_or(self.player.health());
        self.player.set_health(health, max_health);
        if Some(self.player.health()) != saved.health && saved.health.is_some() {
            warn!(saved = ?saved.health, health = self.player.health(), "Saved health clamped");
        }

        let item = |id: Option<u16>| id.and_then(ItemType::from_id);
        let weapon = item(saved.equipped_weapon).filter(|item| item.is_weapon());
        let armor = ArmorSet {
            helmet: item(saved.equipped_armor.helmet),
            chestplate: item(saved.equipped_armor.chestplate),
            leggings: item(saved.equipped_armor.leggings),
            boots: item(saved.equipped_armor.boots),
        }
        .sanitized();
        self.player.restore_equipment(weapon, armor);
    }

    /// Read a save file and merge it.
    pub fn load_from(&mut self, path: &Path) -> Result<(), SaveError> {
        let save = SaveData::load(path)?;
        self.apply_save(&save);
        Ok(())
    }

    /// Write the current game to a save file.
    pub fn save_to(&self, path: &Path) -> Result<(), SaveError> {
        self.snapshot_save().save(path)
    }
}

fn kill_event(kill: Kill) -> TickEvent {
    TickEvent::EntityKilled {
        kind: kill.label,
        x: kill.position.x,
        y: kill.position.y,
        drops: kill.drops,
    }
}

fn push_population(events: &mut Vec<TickEvent>, report: PopulationReport, hostile: bool) {
    for spawn in report.spawned {
        let (kind, x, y) = (spawn.label, spawn.position.x, spawn.position.y);
        events.push(if hostile {
            TickEvent::EnemySpawned { kind, x, y }
        } else {
            TickEvent::AnimalSpawned { kind, x, y }
        });
    }
    if report.despawned > 0 {
        events.push(TickEvent::AnimalsDespawned {
            count: report.despawned,
        });
    }
    events.extend(report.kills.into_iter().map(kill_event));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mob::{Enemy, EnemyKind};

    const SURFACE: i32 = 40;

    fn quiet_config() -> GameConfig {
        GameConfig {
            width: 40,
            height: 60,
            seed: 11,
            animals: AnimalManagerConfig {
                max_animals: 0,
                ..AnimalManagerConfig::default()
            },
            ..GameConfig::default()
        }
    }

    /// Stone from row 40 down with the player standing on it at column 20.
    fn flat_game() -> GameState {
        let mut world = GridWorld::new(40, 60);
        for x in 0..40 {
            for y in SURFACE..60 {
                world.set_block(x, y, ItemType::Stone);
            }
        }
        let mut game = GameState::from_world(quiet_config(), world);
        let height = Player::size().y;
        game.player.body.pos = Vec2::new(20.0 * BLOCK_SIZE, SURFACE as f32 * BLOCK_SIZE - height);
        game
    }

    fn mine(game: &mut GameState, x: i32, y: i32) -> TickReport {
        assert!(matches!(game.interact(x, y), InteractOutcome::Mining(_)));
        let total = game.mining.total_required_ms();
        game.tick(&TickInput::default(), total)
    }

    #[test]
    fn bare_hands_clear_stone_without_a_drop() {
        let mut game = flat_game();
        let report = mine(&mut game, 21, SURFACE);
        assert!(report.events.contains(&TickEvent::BlockBroken {
            x: 21,
            y: SURFACE,
            block: ItemType::Stone,
            drop: None,
        }));
        assert_eq!(game.world.get_block(21, SURFACE), ItemType::Air);
        assert_eq!(game.inventory.count(ItemType::Cobblestone), 0);
    }

    #[test]
    fn pickaxe_yields_cobblestone() {
        let mut game = flat_game();
        game.inventory.add_item(ItemType::WoodenPickaxe, 1);
        game.interact(21, SURFACE);
        assert_eq!(game.mining.total_required_ms(), 1125.0);
        game.tick(&TickInput::default(), 1125.0);
        assert_eq!(game.world.get_block(21, SURFACE), ItemType::Air);
        assert_eq!(game.inventory.count(ItemType::Cobblestone), 1);
    }

    #[test]
    fn reach_is_limited() {
        let mut game = flat_game();
        assert_eq!(game.interact(35, SURFACE), InteractOutcome::OutOfReach);
        assert_eq!(game.interact(20, 59), InteractOutcome::OutOfReach);
        assert!(!game.mining.is_mining());
    }

    #[test]
    fn bedrock_is_ignored() {
        let mut game = flat_game();
        game.world.set_block(21, SURFACE, ItemType::Bedrock);
        assert_eq!(game.interact(21, SURFACE), InteractOutcome::Nothing);
        assert!(!game.mining.is_mining());
    }

    #[test]
    fn placing_consumes_one_and_respects_the_player_body() {
        let mut game = flat_game();
        game.inventory.add_item(ItemType::Dirt, 3);

        assert_eq!(game.interact(20, SURFACE - 1), InteractOutcome::Blocked);
        assert_eq!(game.inventory.count(ItemType::Dirt), 3);

        assert_eq!(
            game.interact(23, SURFACE - 1),
            InteractOutcome::Placed(ItemType::Dirt)
        );
        assert_eq!(game.world.get_block(23, SURFACE - 1), ItemType::Dirt);
        assert_eq!(game.inventory.count(ItemType::Dirt), 2);
    }

    #[test]
    fn non_placeable_items_are_not_placed() {
        let mut game = flat_game();
        game.inventory.add_item(ItemType::Stick, 1);
        assert_eq!(game.interact(23, SURFACE - 1), InteractOutcome::Blocked);
        assert_eq!(game.world.get_block(23, SURFACE - 1), ItemType::Air);
    }

    #[test]
    fn broken_chest_spills_into_inventory() {
        let mut game = flat_game();
        game.inventory.add_item(ItemType::Chest, 1);
        game.inventory.add_item(ItemType::Dirt, 5);
        assert_eq!(
            game.interact(23, SURFACE - 1),
            InteractOutcome::Placed(ItemType::Chest)
        );
        assert!(game.chests.get(23, SURFACE - 1).is_some());

        assert_eq!(game.interact(23, SURFACE - 1), InteractOutcome::OpenedChest);
        assert_eq!(game.chest_deposit(1), 5);
        assert_eq!(game.inventory.count(ItemType::Dirt), 0);

        game.inventory.add_item(ItemType::WoodenAxe, 1);
        assert_eq!(game.inventory.selected_item(), Some(ItemType::WoodenAxe));

        let report = mine(&mut game, 23, SURFACE - 1);
        assert!(report
            .events
            .iter()
            .any(|event| matches!(event, TickEvent::BlockBroken { block: ItemType::Chest, .. })));
        assert!(game.chests.is_empty());
        assert_eq!(game.open_chest(), None);
        assert_eq!(game.inventory.count(ItemType::Dirt), 5);
        assert_eq!(game.inventory.count(ItemType::Chest), 1);
    }

    #[test]
    fn crafting_table_opens_the_big_grid() {
        let mut game = flat_game();
        game.world.set_block(22, SURFACE - 1, ItemType::CraftingTable);
        assert_eq!(game.interact(22, SURFACE - 1), InteractOutcome::OpenedBench);
        assert_eq!(
            game.bench().map(CraftingBench::context),
            Some(CraftingContext::Table)
        );
    }

    #[test]
    fn hand_crafting_planks_through_the_game() {
        let mut game = flat_game();
        game.inventory.add_item(ItemType::Wood, 2);
        game.open_bench(CraftingContext::Hand);
        assert!(game.bench_place(0));
        let result = game.bench_take().unwrap();
        assert_eq!(result.item, ItemType::Planks);
        assert_eq!(game.inventory.count(ItemType::Planks), 4);
        assert_eq!(game.inventory.count(ItemType::Wood), 1);
        assert_eq!(game.close_bench(), 0);
    }

    #[test]
    fn release_cancels_mining() {
        let mut game = flat_game();
        game.interact(21, SURFACE);
        let report = game.tick(
            &TickInput {
                release: true,
                ..TickInput::default()
            },
            16.0,
        );
        assert!(report.events.contains(&TickEvent::MiningCancelled));
        assert!(!game.mining.is_mining());
    }

    #[test]
    fn enemy_contact_damages_and_death_respawns() {
        let mut game = flat_game();
        let pos = game.player.body.pos;
        game.enemies
            .insert(Enemy::new(EnemyKind::Zombie, pos, 1.0));

        let report = game.tick(&TickInput::default(), 16.0);
        assert!(report.events.contains(&TickEvent::PlayerDamaged {
            amount: 3.0,
            health: 17.0,
        }));

        let mut game = flat_game();
        game.player.set_health(2.0, 20.0);
        game.enemies
            .insert(Enemy::new(EnemyKind::Zombie, pos, 1.0));
        let report = game.tick(&TickInput::default(), 16.0);
        assert!(report
            .events
            .contains(&TickEvent::PlayerRespawned { fell_out: false }));
        assert_eq!(game.player.health(), 20.0);
        assert_eq!(game.player.body.pos, Player::spawn_point(40));
    }

    #[test]
    fn phase_change_is_reported_once() {
        let mut game = flat_game();
        game.clock.set_time(0.0999);
        let report = game.tick(&TickInput::default(), 600.0);
        assert!(report.events.contains(&TickEvent::PhaseChanged {
            from: DayPhase::Dawn,
            to: DayPhase::Morning,
        }));
        let report = game.tick(&TickInput::default(), 16.0);
        assert!(!report
            .events
            .iter()
            .any(|event| matches!(event, TickEvent::PhaseChanged { .. })));
    }

    #[test]
    fn ticks_are_numbered() {
        let mut game = flat_game();
        assert_eq!(game.tick(&TickInput::default(), 16.0).tick, SimTick(0));
        assert_eq!(game.tick(&TickInput::default(), 16.0).tick, SimTick(1));
        assert_eq!(game.current_tick(), SimTick(2));
    }

    #[test]
    fn eating_and_equipping_use_the_selected_slot() {
        let mut game = flat_game();
        game.player.set_health(10.0, 20.0);
        game.inventory.add_item(ItemType::CookedBeef, 1);
        assert_eq!(game.eat_selected(), Some(ItemType::CookedBeef));
        assert!(game.player.health() > 10.0);
        assert_eq!(game.inventory.count(ItemType::CookedBeef), 0);

        game.inventory.add_item(ItemType::IronSword, 1);
        game.inventory.add_item(ItemType::WoodenSword, 1);
        assert_eq!(game.equip_selected(), Some(ItemType::IronSword));
        game.inventory.select(1);
        assert_eq!(game.equip_selected(), Some(ItemType::WoodenSword));
        assert_eq!(game.player.equipped_weapon(), Some(ItemType::WoodenSword));
        assert_eq!(game.inventory.count(ItemType::IronSword), 1);

        game.inventory.add_item(ItemType::Dirt, 1);
        game.inventory.select(1);
        assert_eq!(game.equip_selected(), None);
    }

    #[test]
    fn save_round_trip_restores_state() {
        let mut game = flat_game();
        game.world.set_block(3, 3, ItemType::GoldOre);
        game.inventory.add_item(ItemType::Torch, 12);
        game.chests.place(5, 5).add_item(ItemType::Coal, 9);
        game.clock.set_time(0.6);
        game.player.set_health(13.0, 20.0);
        game.player.equip_armor(ItemType::IronHelmet).unwrap();

        let json = game.snapshot_save().to_json().unwrap();
        let save = SaveData::from_json(&json).unwrap();

        let mut restored = GameState::from_world(quiet_config(), GridWorld::new(1, 1));
        restored.apply_save(&save);
        assert_eq!(restored.world, game.world);
        assert_eq!(restored.inventory.count(ItemType::Torch), 12);
        assert_eq!(
            restored.chests.get(5, 5).map(|chest| chest.slots().count(ItemType::Coal)),
            Some(9)
        );
        assert!((restored.clock.time_fraction() - 0.6).abs() < 1e-9);
        assert_eq!(restored.player.health(), 13.0);
        assert_eq!(restored.player.body.pos, game.player.body.pos);
        assert_eq!(restored.player.defense(), 1.0);
    }

    #[test]
    fn partial_save_keeps_live_sections() {
        let mut game = flat_game();
        game.inventory.add_item(ItemType::Torch, 4);
        let save =
            SaveData::from_json(r#"{"player": {"health": 99}, "day_night": {"current_time": 1.5}}"#)
                .unwrap();
        game.apply_save(&save);
        assert_eq!(game.player.health(), 20.0);
        assert!(game.clock.time_fraction() < 1.0);
        assert_eq!(game.inventory.count(ItemType::Torch), 4);
        assert_eq!(game.world.width(), 40);
    }

    #[test]
    fn oversized_saved_world_keeps_live_world() {
        let mut game = flat_game();
        let before = game.world.clone();
        let save = SaveData::from_json(
            r#"{"world": {"width": 2000000000, "height": 2000000000, "blocks": []}}"#,
        )
        .unwrap();
        game.apply_save(&save);
        assert_eq!(game.world, before);

        let save =
            SaveData::from_json(r#"{"world": {"width": 5, "height": 3, "blocks": [[1, 1, 1]]}}"#)
                .unwrap();
        game.apply_save(&save);
        assert_eq!(game.world.width(), 5);
        assert_eq!(game.world.get_block(0, 2), ItemType::Dirt);
    }
}
