//! Hostile enemies and passive animals.
//!
//! Both ride a physics [`Body`] and are driven by small per-kind AIs. Randomness comes
//! from the caller's RNG so a seeded game replays identically.

use crate::combat::Combatant;
use crate::grid::GridWorld;
use glam::Vec2;
use mdsandbox_core::{ItemStack, ItemType};
use mdsandbox_physics::{Body, BodyParams, CollisionGrid, BLOCK_SIZE};
use rand::{rngs::StdRng, Rng};
use serde::{Deserialize, Serialize};

/// Enemy invulnerability window after a hit.
pub const ENEMY_INVULNERABLE_MS: f32 = 500.0;
/// Minimum time between two contact hits from one enemy.
pub const ENEMY_CONTACT_COOLDOWN_MS: f32 = 1000.0;
/// Horizontal knockback applied to a struck enemy.
pub const ENEMY_KNOCKBACK: f32 = 10.0;
/// Horizontal flee speed of a struck animal.
pub const ANIMAL_KNOCKBACK: f32 = 3.0;
/// Health lost per millisecond of daylight by sun-sensitive enemies.
pub const SUNLIGHT_DAMAGE_PER_MS: f32 = 0.005;

const CHASE_RANGE: f32 = BLOCK_SIZE * 10.0;
const RANDOM_JUMP_CHANCE: f64 = 0.02;
const WANDER_FLIP_CHANCE: f64 = 0.02;
const KNOCKBACK_DECAY: f32 = 0.8;
const KNOCKBACK_EPSILON: f32 = 0.1;

/// One possible drop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropEntry {
    /// Dropped item.
    pub item: ItemType,
    /// Items per successful roll.
    pub count: u32,
    /// Probability in `[0, 1]`.
    pub chance: f64,
}

/// Independent Bernoulli draws, one per entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    entries: Vec<DropEntry>,
}

impl DropTable {
    /// Table from entries.
    pub fn new(entries: Vec<DropEntry>) -> Self {
        Self { entries }
    }

    /// Entries in roll order.
    pub fn entries(&self) -> &[DropEntry] {
        &self.entries
    }

    /// Roll every entry once. Always draws one number per entry.
    pub fn roll(&self, rng: &mut StdRng) -> Vec<ItemStack> {
        self.entries
            .iter()
            .filter(|entry| rng.gen::<f64>() < entry.chance)
            .map(|entry| ItemStack::new(entry.item, entry.count))
            .collect()
    }
}

fn entry(item: ItemType, count: u32, chance: f64) -> DropEntry {
    DropEntry {
        item,
        count,
        chance,
    }
}

/// Hostile mob kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Slow, hits hard, burns in daylight.
    Zombie,
    /// Faster, burns in daylight.
    Skeleton,
    /// Fastest, low and wide, daylight-proof.
    Spider,
}

/// Per-kind enemy constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    /// Starting health.
    pub max_health: f32,
    /// Walking speed in units per tick.
    pub speed: f32,
    /// Contact damage.
    pub damage: f32,
    /// Jump velocity.
    pub jump_power: f32,
    /// Body size.
    pub size: Vec2,
}

impl EnemyKind {
    /// Constants for this kind.
    pub fn stats(self) -> EnemyStats {
        let humanoid = Vec2::new(BLOCK_SIZE * 0.8, BLOCK_SIZE * 1.8);
        match self {
            EnemyKind::Zombie => EnemyStats {
                max_health: 20.0,
                speed: 1.0,
                damage: 3.0,
                jump_power: -8.0,
                size: humanoid,
            },
            EnemyKind::Skeleton => EnemyStats {
                max_health: 15.0,
                speed: 1.5,
                damage: 2.0,
                jump_power: -10.0,
                size: humanoid,
            },
            EnemyKind::Spider => EnemyStats {
                max_health: 16.0,
                speed: 2.0,
                damage: 2.0,
                jump_power: -6.0,
                size: Vec2::new(BLOCK_SIZE, BLOCK_SIZE * 0.8),
            },
        }
    }

    /// Takes damage while the sun is up.
    pub fn sunlight_vulnerable(self) -> bool {
        matches!(self, EnemyKind::Zombie | EnemyKind::Skeleton)
    }

    /// Loot rolled on death.
    pub fn drops(self) -> DropTable {
        DropTable::new(match self {
            EnemyKind::Zombie => vec![
                entry(ItemType::IronOre, 1, 0.05),
                entry(ItemType::Leather, 1, 0.5),
            ],
            EnemyKind::Skeleton => vec![
                entry(ItemType::Stick, 1, 0.5),
                entry(ItemType::Arrow, 1, 0.3),
            ],
            EnemyKind::Spider => vec![entry(ItemType::String, 1, 0.5)],
        })
    }

    /// Stable label.
    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Zombie => "zombie",
            EnemyKind::Skeleton => "skeleton",
            EnemyKind::Spider => "spider",
        }
    }
}

/// A hostile mob.
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    /// Kind.
    pub kind: EnemyKind,
    /// Physics body.
    pub body: Body,
    /// Fractional health; sunlight chips it every tick.
    pub health: f32,
    knockback: f32,
    invulnerable_ms: f32,
    contact_cooldown_ms: f32,
}

impl Enemy {
    /// Fresh enemy at `pos` facing `facing` (`1.0` right, `-1.0` left).
    pub fn new(kind: EnemyKind, pos: Vec2, facing: f32) -> Self {
        let stats = kind.stats();
        let mut body = Body::new(pos, stats.size);
        body.facing = if facing < 0.0 { -1.0 } else { 1.0 };
        Self {
            kind,
            body,
            health: stats.max_health,
            knockback: 0.0,
            invulnerable_ms: 0.0,
            contact_cooldown_ms: 0.0,
        }
    }

    /// Still inside the post-hit window.
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ms > 0.0
    }

    /// Remaining knockback velocity.
    pub fn knockback(&self) -> f32 {
        self.knockback
    }

    /// One tick: gravity, AI steering, knockback, movement, timers.
    ///
    /// `target` is the top-left corner of the player body.
    pub fn update(&mut self, world: &GridWorld, target: Vec2, dt_ms: f32, rng: &mut StdRng) {
        let stats = self.kind.stats();
        self.body.apply_gravity(&BodyParams::ENEMY);

        let delta = target - self.body.pos;
        if delta.length() < CHASE_RANGE {
            if delta.x > BLOCK_SIZE {
                self.body.facing = 1.0;
                self.body.vel.x = stats.speed;
            } else if delta.x < -BLOCK_SIZE {
                self.body.facing = -1.0;
                self.body.vel.x = -stats.speed;
            } else {
                self.body.vel.x = 0.0;
            }

            if self.body.grounded && rng.gen_bool(RANDOM_JUMP_CHANCE) {
                self.body.vel.y = stats.jump_power;
            }

            let ahead_x = ((self.body.pos.x + self.body.facing * BLOCK_SIZE) / BLOCK_SIZE).floor();
            let ahead_y = (self.body.pos.y / BLOCK_SIZE).floor();
            if self.body.grounded && world.is_solid(ahead_x as i32, ahead_y as i32) {
                self.body.vel.y = stats.jump_power;
            }
        } else {
            if rng.gen_bool(WANDER_FLIP_CHANCE) {
                self.body.facing = -self.body.facing;
            }
            self.body.vel.x = self.body.facing * stats.speed * 0.5;
        }

        if self.knockback != 0.0 {
            self.body.vel.x = self.knockback;
            self.knockback *= KNOCKBACK_DECAY;
            if self.knockback.abs() < KNOCKBACK_EPSILON {
                self.knockback = 0.0;
            }
        }

        self.body.integrate(world, &BodyParams::ENEMY);

        self.invulnerable_ms = (self.invulnerable_ms - dt_ms).max(0.0);
        self.contact_cooldown_ms = (self.contact_cooldown_ms - dt_ms).max(0.0);

        if self.body.pos.y > world.height() as f32 * BLOCK_SIZE {
            self.health = 0.0;
        }
    }

    /// Contact damage against `player` if touching and off cooldown.
    pub fn try_contact(&mut self, player: &Body) -> Option<f32> {
        if self.contact_cooldown_ms > 0.0 || !self.body.overlaps(player) {
            return None;
        }
        self.contact_cooldown_ms = ENEMY_CONTACT_COOLDOWN_MS;
        Some(self.kind.stats().damage)
    }
}

impl Combatant for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn health(&self) -> f32 {
        self.health
    }

    fn take_hit(&mut self, damage: f32, direction: f32) -> bool {
        if self.is_invulnerable() {
            return false;
        }
        self.health = (self.health - damage).max(0.0);
        self.knockback = direction * ENEMY_KNOCKBACK;
        self.invulnerable_ms = ENEMY_INVULNERABLE_MS;
        true
    }

    fn drop_table(&self) -> DropTable {
        self.kind.drops()
    }

    fn label(&self) -> &'static str {
        self.kind.name()
    }
}

/// Passive animal kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimalKind {
    /// Pig.
    Pig,
    /// Cow.
    Cow,
    /// Chicken; jumps whenever it picks the jump action.
    Chicken,
}

impl AnimalKind {
    /// Square body side in world units.
    pub fn side(self) -> f32 {
        match self {
            AnimalKind::Pig => 24.0,
            AnimalKind::Cow => 32.0,
            AnimalKind::Chicken => 16.0,
        }
    }

    /// Starting health.
    pub fn max_health(self) -> f32 {
        match self {
            AnimalKind::Pig => 10.0,
            AnimalKind::Cow => 15.0,
            AnimalKind::Chicken => 5.0,
        }
    }

    /// Loot; every entry always drops.
    pub fn drops(self) -> DropTable {
        DropTable::new(match self {
            AnimalKind::Pig => vec![entry(ItemType::RawPork, 2, 1.0)],
            AnimalKind::Cow => vec![entry(ItemType::RawBeef, 2, 1.0), entry(ItemType::Leather, 1, 1.0)],
            AnimalKind::Chicken => vec![
                entry(ItemType::RawChicken, 1, 1.0),
                entry(ItemType::Egg, 1, 1.0),
            ],
        })
    }

    /// Stable label.
    pub fn name(self) -> &'static str {
        match self {
            AnimalKind::Pig => "pig",
            AnimalKind::Cow => "cow",
            AnimalKind::Chicken => "chicken",
        }
    }
}

/// A passive animal.
#[derive(Debug, Clone, PartialEq)]
pub struct Animal {
    /// Kind.
    pub kind: AnimalKind,
    /// Physics body.
    pub body: Body,
    /// Health.
    pub health: f32,
    move_timer_ms: f32,
}

impl Animal {
    /// Fresh animal at `pos`, deciding its first move on the next update.
    pub fn new(kind: AnimalKind, pos: Vec2) -> Self {
        let side = kind.side();
        Self {
            kind,
            body: Body::new(pos, Vec2::splat(side)),
            health: kind.max_health(),
            move_timer_ms: 0.0,
        }
    }

    /// One tick: gravity, a new random action when the move timer runs out, movement.
    pub fn update(&mut self, world: &GridWorld, dt_ms: f32, rng: &mut StdRng) {
        self.body.apply_gravity(&BodyParams::ANIMAL);

        self.move_timer_ms -= dt_ms;
        if self.move_timer_ms <= 0.0 {
            let action: f64 = rng.gen();
            if action < 0.3 {
                self.body.vel.x = 0.0;
            } else if action < 0.6 {
                self.body.facing = -1.0;
                self.body.vel.x = -1.0;
            } else if action < 0.9 {
                self.body.facing = 1.0;
                self.body.vel.x = 1.0;
            } else if self.kind == AnimalKind::Chicken || rng.gen_bool(0.3) {
                self.body.vel.y = -8.0;
            }
            self.move_timer_ms = 1000.0 + rng.gen::<f32>() * 2000.0;
        }

        self.body.integrate(world, &BodyParams::ANIMAL);
    }
}

impl Combatant for Animal {
    fn body(&self) -> &Body {
        &self.body
    }

    fn health(&self) -> f32 {
        self.health
    }

    /// Animals flee along their facing regardless of where the hit came from.
    fn take_hit(&mut self, damage: f32, direction: f32) -> bool {
        self.health = (self.health - damage).max(0.0);
        self.body.facing = direction;
        self.body.vel.x = direction * ANIMAL_KNOCKBACK;
        self.body.vel.y = -5.0;
        true
    }

    fn drop_table(&self) -> DropTable {
        self.kind.drops()
    }

    fn label(&self) -> &'static str {
        self.kind.name()
    }
}
