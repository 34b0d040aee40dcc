//! Enemy and animal populations: spawning, per-tick updates and removal.

use crate::combat::{AttackReport, CombatResolver, Kill};
use crate::grid::GridWorld;
use crate::inventory::ItemSink;
use crate::mob::{Animal, AnimalKind, Enemy, EnemyKind, SUNLIGHT_DAMAGE_PER_MS};
use crate::time::DayNightClock;
use glam::Vec2;
use mdsandbox_physics::{Body, CollisionGrid, BLOCK_SIZE};
use rand::{rngs::StdRng, Rng};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use tracing::debug;

/// Something that appeared this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    /// Kind label.
    pub label: &'static str,
    /// Top-left corner of the new body.
    pub position: Vec2,
}

/// Changes a manager made during one update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulationReport {
    /// New arrivals.
    pub spawned: Vec<Spawn>,
    /// Deaths (with drops credited).
    pub kills: Vec<Kill>,
    /// Silently removed for wandering off.
    pub despawned: usize,
}

/// Tunables for [`EnemyManager`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyManagerConfig {
    /// Night time between spawns.
    pub spawn_interval_ms: f32,
    /// Population cap.
    pub max_enemies: usize,
    /// Horizontal spawn distance from the player, in blocks.
    pub spawn_distance_blocks: f32,
    /// Spawn row, in blocks.
    pub spawn_height_blocks: f32,
}

impl Default for EnemyManagerConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 20_000.0,
            max_enemies: 5,
            spawn_distance_blocks: 20.0,
            spawn_height_blocks: 20.0,
        }
    }
}

/// Hostile population. Spawns only at night and only with a clock attached.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyManager {
    config: EnemyManagerConfig,
    enemies: Vec<Enemy>,
    spawn_timer_ms: f32,
}

impl EnemyManager {
    /// Empty population.
    pub fn new(config: EnemyManagerConfig) -> Self {
        Self {
            config,
            enemies: Vec::new(),
            spawn_timer_ms: config.spawn_interval_ms,
        }
    }

    /// Settings in use.
    pub fn config(&self) -> &EnemyManagerConfig {
        &self.config
    }

    /// Live enemies.
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Number of live enemies.
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    /// Check whether no enemy is alive.
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Time until the next night spawn attempt.
    pub fn spawn_timer_ms(&self) -> f32 {
        self.spawn_timer_ms
    }

    /// Add an enemy directly. Ignores the population cap.
    pub fn insert(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    /// One tick: spawn timer, enemy AI, sunlight damage, removal of the dead.
    ///
    /// Without a clock nothing spawns and the sun never burns.
    pub fn update(
        &mut self,
        world: &GridWorld,
        player: &Body,
        clock: Option<&DayNightClock>,
        dt_ms: f32,
        rng: &mut StdRng,
        sink: &mut dyn ItemSink,
    ) -> PopulationReport {
        let mut report = PopulationReport::default();

        match clock {
            Some(clock) if clock.is_night() => {
                self.spawn_timer_ms -= dt_ms;
                if self.spawn_timer_ms <= 0.0 && self.enemies.len() < self.config.max_enemies {
                    report.spawned.push(self.spawn(world, player, rng));
                    self.spawn_timer_ms = self.config.spawn_interval_ms;
                }
            }
            Some(_) => self.spawn_timer_ms = self.config.spawn_interval_ms,
            None => {}
        }

        let sunny = clock.is_some_and(DayNightClock::is_day);
        for enemy in &mut self.enemies {
            enemy.update(world, player.pos, dt_ms, rng);
            if sunny && enemy.kind.sunlight_vulnerable() {
                enemy.health = (enemy.health - dt_ms * SUNLIGHT_DAMAGE_PER_MS).max(0.0);
            }
        }

        report.kills = CombatResolver::collect_dead(&mut self.enemies, rng, sink);
        report
    }

    fn spawn(&mut self, world: &GridWorld, player: &Body, rng: &mut StdRng) -> Spawn {
        let angle = rng.gen::<f32>() * TAU;
        let max_x = ((world.width() - 1) as f32 * BLOCK_SIZE).max(BLOCK_SIZE);
        let x = (player.pos.x + angle.cos() * self.config.spawn_distance_blocks * BLOCK_SIZE)
            .clamp(BLOCK_SIZE, max_x);
        let y = self.config.spawn_height_blocks * BLOCK_SIZE;

        let kind = match rng.gen_range(0..4) {
            0 | 1 => EnemyKind::Zombie,
            2 => EnemyKind::Skeleton,
            _ => EnemyKind::Spider,
        };
        let facing = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let position = Vec2::new(x, y);
        self.enemies.push(Enemy::new(kind, position, facing));
        debug!(kind = kind.name(), x, y, "Enemy spawned");
        Spawn {
            label: kind.name(),
            position,
        }
    }

    /// Sum of contact damage from every touching enemy that is off cooldown.
    pub fn contact_damage(&mut self, player: &Body) -> f32 {
        self.enemies
            .iter_mut()
            .filter_map(|enemy| enemy.try_contact(player))
            .sum()
    }

    /// Player swing against every enemy in range.
    pub fn attack(
        &mut self,
        center: Vec2,
        damage: f32,
        radius: f32,
        rng: &mut StdRng,
        sink: &mut dyn ItemSink,
    ) -> AttackReport {
        CombatResolver::attack_area(&mut self.enemies, center, damage, radius, rng, sink)
    }
}

/// Tunables for [`AnimalManager`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimalManagerConfig {
    /// Population cap.
    pub max_animals: usize,
    /// Animals farther than this (horizontally) from the player vanish.
    pub despawn_distance: f32,
}

impl Default for AnimalManagerConfig {
    fn default() -> Self {
        Self {
            max_animals: 15,
            despawn_distance: 2000.0,
        }
    }
}

/// Passive population. Spawns around the clock near the player.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimalManager {
    config: AnimalManagerConfig,
    animals: Vec<Animal>,
    spawn_timer_ms: f32,
}

impl AnimalManager {
    /// Empty population; the first spawn happens on the first update.
    pub fn new(config: AnimalManagerConfig) -> Self {
        Self {
            config,
            animals: Vec::new(),
            spawn_timer_ms: 0.0,
        }
    }

    /// Live animals.
    pub fn animals(&self) -> &[Animal] {
        &self.animals
    }

    /// Number of live animals.
    pub fn len(&self) -> usize {
        self.animals.len()
    }

    /// Check whether no animal is alive.
    pub fn is_empty(&self) -> bool {
        self.animals.is_empty()
    }

    /// Add an animal directly. Ignores the population cap.
    pub fn insert(&mut self, animal: Animal) {
        self.animals.push(animal);
    }

    /// One tick: spawn timer, animal AI, despawning, removal of the dead.
    pub fn update(
        &mut self,
        world: &GridWorld,
        player: &Body,
        dt_ms: f32,
        rng: &mut StdRng,
        sink: &mut dyn ItemSink,
    ) -> PopulationReport {
        let mut report = PopulationReport::default();

        self.spawn_timer_ms -= dt_ms;
        if self.spawn_timer_ms <= 0.0 && self.animals.len() < self.config.max_animals {
            report.spawned.push(self.spawn(world, player, rng));
            self.spawn_timer_ms = 10_000.0 + rng.gen::<f32>() * 20_000.0;
        }

        for animal in &mut self.animals {
            animal.update(world, dt_ms, rng);
        }

        let before = self.animals.len();
        let limit = self.config.despawn_distance;
        let floor = world.height() as f32 * BLOCK_SIZE;
        self.animals.retain(|animal| {
            (animal.body.pos.x - player.pos.x).abs() <= limit && animal.body.pos.y <= floor
        });
        report.despawned = before - self.animals.len();

        report.kills = CombatResolver::collect_dead(&mut self.animals, rng, sink);
        report
    }

    fn spawn(&mut self, world: &GridWorld, player: &Body, rng: &mut StdRng) -> Spawn {
        let distance = 300.0 + rng.gen::<f32>() * 500.0;
        let x = if rng.gen_bool(0.5) {
            player.pos.x - distance
        } else {
            player.pos.x + distance
        };
        let candidate_y = player.pos.y - 100.0;
        let column = (x / BLOCK_SIZE).floor() as i32;
        let y = ((candidate_y / BLOCK_SIZE).floor() as i32..world.height())
            .find(|&row| world.is_solid(column, row))
            .map_or(candidate_y, |row| (row - 1) as f32 * BLOCK_SIZE);

        let kind = match rng.gen_range(0..3) {
            0 => AnimalKind::Pig,
            1 => AnimalKind::Cow,
            _ => AnimalKind::Chicken,
        };
        let position = Vec2::new(x, y);
        self.animals.push(Animal::new(kind, position));
        debug!(kind = kind.name(), x, y, "Animal spawned");
        Spawn {
            label: kind.name(),
            position,
        }
    }

    /// Player swing against every animal in range.
    pub fn attack(
        &mut self,
        center: Vec2,
        damage: f32,
        radius: f32,
        rng: &mut StdRng,
        sink: &mut dyn ItemSink,
    ) -> AttackReport {
        CombatResolver::attack_area(&mut self.animals, center, damage, radius, rng, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Inventory;
    use mdsandbox_core::{scoped_rng, ItemType, SimTick};

    fn flat_world() -> GridWorld {
        let mut world = GridWorld::new(100, 40);
        for x in 0..100 {
            for y in 30..40 {
                world.set_block(x, y, ItemType::Stone);
            }
        }
        world
    }

    fn player_at(x: f32, y: f32) -> Body {
        Body::new(Vec2::new(x, y), Vec2::new(25.6, 57.6))
    }

    #[test]
    fn no_clock_means_no_enemy_spawns() {
        let world = flat_world();
        let player = player_at(1600.0, 900.0);
        let mut rng = scoped_rng(1, 1, SimTick::ZERO);
        let mut inv = Inventory::new();
        let mut enemies = EnemyManager::new(EnemyManagerConfig::default());
        for _ in 0..100 {
            enemies.update(&world, &player, None, 1000.0, &mut rng, &mut inv);
        }
        assert!(enemies.is_empty());
    }

    #[test]
    fn enemies_spawn_at_night_on_interval() {
        let world = flat_world();
        let player = player_at(1600.0, 900.0);
        let mut clock = DayNightClock::default();
        clock.midnight();
        clock.paused = true;
        let mut rng = scoped_rng(1, 1, SimTick::ZERO);
        let mut inv = Inventory::new();
        let mut enemies = EnemyManager::new(EnemyManagerConfig::default());

        let report = enemies.update(&world, &player, Some(&clock), 19_000.0, &mut rng, &mut inv);
        assert!(report.spawned.is_empty());
        let report = enemies.update(&world, &player, Some(&clock), 1_000.0, &mut rng, &mut inv);
        assert_eq!(report.spawned.len(), 1);
        let spawn = report.spawned[0];
        assert!(spawn.position.x >= BLOCK_SIZE && spawn.position.x <= 99.0 * BLOCK_SIZE);
        assert_eq!(spawn.position.y, 20.0 * BLOCK_SIZE);
        assert_eq!(enemies.spawn_timer_ms(), 20_000.0);
    }

    #[test]
    fn population_cap_holds() {
        let world = flat_world();
        let player = player_at(1600.0, 900.0);
        let mut clock = DayNightClock::default();
        clock.midnight();
        clock.paused = true;
        let mut rng = scoped_rng(2, 1, SimTick::ZERO);
        let mut inv = Inventory::new();
        let config = EnemyManagerConfig {
            spawn_interval_ms: 10.0,
            max_enemies: 3,
            ..EnemyManagerConfig::default()
        };
        let mut enemies = EnemyManager::new(config);
        for _ in 0..50 {
            enemies.update(&world, &player, Some(&clock), 16.0, &mut rng, &mut inv);
        }
        assert_eq!(enemies.len(), 3);
    }

    #[test]
    fn daylight_resets_spawn_timer_and_burns_zombies() {
        let world = flat_world();
        let player = player_at(1600.0, 900.0);
        let mut clock = DayNightClock::default();
        clock.noon();
        clock.paused = true;
        let mut rng = scoped_rng(3, 1, SimTick::ZERO);
        let mut inv = Inventory::new();
        let mut enemies = EnemyManager::new(EnemyManagerConfig::default());
        enemies.insert(Enemy::new(EnemyKind::Zombie, Vec2::new(200.0, 902.4), 1.0));
        enemies.insert(Enemy::new(EnemyKind::Spider, Vec2::new(400.0, 934.4), 1.0));

        enemies.update(&world, &player, Some(&clock), 100.0, &mut rng, &mut inv);
        assert_eq!(enemies.spawn_timer_ms(), 20_000.0);
        assert!((enemies.enemies()[0].health - 19.5).abs() < 1e-4);
        assert_eq!(enemies.enemies()[1].health, 16.0);

        // 20 hp at 0.5 hp per 100 ms of sun.
        for _ in 0..41 {
            enemies.update(&world, &player, Some(&clock), 100.0, &mut rng, &mut inv);
        }
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies.enemies()[0].kind, EnemyKind::Spider);
    }

    #[test]
    fn sunlight_finishes_a_weak_zombie_once() {
        let world = flat_world();
        let player = player_at(1600.0, 900.0);
        let mut clock = DayNightClock::default();
        clock.noon();
        clock.paused = true;
        let mut rng = scoped_rng(3, 2, SimTick::ZERO);
        let mut inv = Inventory::new();
        let mut enemies = EnemyManager::new(EnemyManagerConfig::default());
        let mut zombie = Enemy::new(EnemyKind::Zombie, Vec2::new(200.0, 902.4), 1.0);
        zombie.health = 0.2;
        enemies.insert(zombie);

        let report = enemies.update(&world, &player, Some(&clock), 1000.0, &mut rng, &mut inv);
        assert_eq!(report.kills.len(), 1);
        assert!(enemies.is_empty());
        let report = enemies.update(&world, &player, Some(&clock), 1000.0, &mut rng, &mut inv);
        assert!(report.kills.is_empty());
    }

    #[test]
    fn animals_spawn_on_ground_and_despawn_when_far() {
        let world = flat_world();
        let player = player_at(1600.0, 900.0);
        let mut rng = scoped_rng(4, 1, SimTick::ZERO);
        let mut inv = Inventory::new();
        let mut animals = AnimalManager::new(AnimalManagerConfig::default());

        let report = animals.update(&world, &player, 16.0, &mut rng, &mut inv);
        assert_eq!(report.spawned.len(), 1);
        assert_eq!(report.spawned[0].position.y, 29.0 * BLOCK_SIZE);
        let dx = (report.spawned[0].position.x - 1600.0).abs();
        assert!((300.0..=800.0).contains(&dx));

        let far = player_at(10_000.0, 900.0);
        let report = animals.update(&world, &far, 16.0, &mut rng, &mut inv);
        assert_eq!(report.despawned, 1);
        assert!(animals.is_empty());
    }

    #[test]
    fn contact_damage_sums_touching_enemies() {
        let mut enemies = EnemyManager::new(EnemyManagerConfig::default());
        enemies.insert(Enemy::new(EnemyKind::Zombie, Vec2::new(100.0, 100.0), 1.0));
        enemies.insert(Enemy::new(EnemyKind::Spider, Vec2::new(110.0, 110.0), 1.0));
        enemies.insert(Enemy::new(EnemyKind::Skeleton, Vec2::new(900.0, 100.0), 1.0));
        let player = player_at(105.0, 100.0);
        assert_eq!(enemies.contact_damage(&player), 5.0);
        assert_eq!(enemies.contact_damage(&player), 0.0);
    }
}
