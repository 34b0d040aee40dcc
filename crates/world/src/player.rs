//! The player body, health and equipment.

use crate::grid::GridWorld;
use glam::Vec2;
use mdsandbox_core::{ArmorSlot, ItemType};
use mdsandbox_physics::{Body, BodyParams, BLOCK_SIZE, JUMP_FORCE, MOVE_SPEED};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Starting and maximum health.
pub const PLAYER_MAX_HEALTH: f32 = 20.0;
/// Invulnerability window after taking damage.
pub const PLAYER_INVULNERABLE_MS: f32 = 1000.0;
/// Minimum time between attacks.
pub const PLAYER_ATTACK_COOLDOWN_MS: f32 = 500.0;
/// Attack reach from the body centre, in world units.
pub const PLAYER_ATTACK_RADIUS: f32 = BLOCK_SIZE * 2.0;
/// Spawn height, in blocks.
pub const PLAYER_SPAWN_Y_BLOCKS: f32 = 30.0;

/// Worn armour, one piece per slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmorSet {
    /// Head piece.
    pub helmet: Option<ItemType>,
    /// Torso piece.
    pub chestplate: Option<ItemType>,
    /// Leg piece.
    pub leggings: Option<ItemType>,
    /// Foot piece.
    pub boots: Option<ItemType>,
}

impl ArmorSet {
    fn slot_mut(&mut self, slot: ArmorSlot) -> &mut Option<ItemType> {
        match slot {
            ArmorSlot::Helmet => &mut self.helmet,
            ArmorSlot::Chestplate => &mut self.chestplate,
            ArmorSlot::Leggings => &mut self.leggings,
            ArmorSlot::Boots => &mut self.boots,
        }
    }

    /// Worn pieces.
    pub fn pieces(&self) -> impl Iterator<Item = ItemType> + '_ {
        [self.helmet, self.chestplate, self.leggings, self.boots]
            .into_iter()
            .flatten()
    }

    /// Summed defense of every worn piece.
    pub fn defense(&self) -> f32 {
        self.pieces().map(ItemType::armor_defense).sum()
    }

    /// Drop anything that is not armour for its slot.
    pub fn sanitized(self) -> Self {
        let keep = |piece: Option<ItemType>, slot: ArmorSlot| {
            piece.filter(|item| item.armor_slot() == Some(slot))
        };
        Self {
            helmet: keep(self.helmet, ArmorSlot::Helmet),
            chestplate: keep(self.chestplate, ArmorSlot::Chestplate),
            leggings: keep(self.leggings, ArmorSlot::Leggings),
            boots: keep(self.boots, ArmorSlot::Boots),
        }
    }
}

/// What happened to the player during [`Player::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerUpdate {
    /// Fell out of the world and was put back at spawn.
    pub fell_out: bool,
}

/// The controllable character.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Physics body.
    pub body: Body,
    health: f32,
    max_health: f32,
    equipped_weapon: Option<ItemType>,
    armor: ArmorSet,
    invulnerable_ms: f32,
    attack_cooldown_ms: f32,
}

impl Player {
    /// Player body size.
    pub fn size() -> Vec2 {
        Vec2::new(BLOCK_SIZE * 0.8, BLOCK_SIZE * 1.8)
    }

    /// Spawn point for a world of `world_width` cells.
    pub fn spawn_point(world_width: i32) -> Vec2 {
        Vec2::new(
            world_width as f32 * BLOCK_SIZE / 2.0,
            PLAYER_SPAWN_Y_BLOCKS * BLOCK_SIZE,
        )
    }

    /// Full-health player at `pos`.
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, Self::size()),
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            equipped_weapon: None,
            armor: ArmorSet::default(),
            invulnerable_ms: 0.0,
            attack_cooldown_ms: 0.0,
        }
    }

    /// Current health.
    pub fn health(&self) -> f32 {
        self.health
    }

    /// Health cap.
    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Set health and cap, clamping health into `[0, max]`.
    pub fn set_health(&mut self, health: f32, max_health: f32) {
        self.max_health = if max_health.is_finite() && max_health > 0.0 {
            max_health
        } else {
            PLAYER_MAX_HEALTH
        };
        self.health = if health.is_nan() {
            self.max_health
        } else {
            health.clamp(0.0, self.max_health)
        };
    }

    /// Health has run out.
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Still inside the post-hit invulnerability window.
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ms > 0.0
    }

    /// Equipped sword.
    pub fn equipped_weapon(&self) -> Option<ItemType> {
        self.equipped_weapon
    }

    /// Worn armour.
    pub fn armor(&self) -> &ArmorSet {
        &self.armor
    }

    /// Damage reduction from armour.
    pub fn defense(&self) -> f32 {
        self.armor.defense()
    }

    /// Damage of one swing.
    pub fn attack_power(&self) -> f32 {
        self.equipped_weapon.map_or(1.0, ItemType::attack_power)
    }

    /// Wield a sword. Returns the previous weapon, or `Err(item)` for a non-weapon.
    pub fn equip_weapon(&mut self, item: ItemType) -> Result<Option<ItemType>, ItemType> {
        if !item.is_weapon() {
            return Err(item);
        }
        Ok(self.equipped_weapon.replace(item))
    }

    /// Put on an armour piece. Returns the piece it replaced, or `Err(item)` for non-armour.
    pub fn equip_armor(&mut self, item: ItemType) -> Result<Option<ItemType>, ItemType> {
        let slot = item.armor_slot().ok_or(item)?;
        Ok(self.armor.slot_mut(slot).replace(item))
    }

    /// Restore equipment from saved state, dropping invalid entries.
    pub fn restore_equipment(&mut self, weapon: Option<ItemType>, armor: ArmorSet) {
        self.equipped_weapon = weapon.filter(|item| item.is_weapon());
        self.armor = armor.sanitized();
    }

    /// Walk: `direction` < 0 left, > 0 right, 0 lets friction stop the body.
    pub fn walk(&mut self, direction: f32) {
        if direction != 0.0 {
            let direction = direction.signum();
            self.body.vel.x = direction * MOVE_SPEED;
            self.body.facing = direction;
        }
    }

    /// Swim while submerged, otherwise jump when standing.
    pub fn jump(&mut self) -> bool {
        if self.body.in_water {
            self.body.swim(&BodyParams::PLAYER)
        } else {
            self.body.jump(JUMP_FORCE)
        }
    }

    /// Heal by `amount`, capped at max health.
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Eat a food item. Returns `false` for anything without a healing value.
    pub fn eat(&mut self, item: ItemType) -> bool {
        match item.healing() {
            Some(amount) => {
                self.heal(amount as f32);
                true
            }
            None => false,
        }
    }

    /// Take a hit. Armour reduces it to a minimum of 1. Returns damage dealt
    /// (0 while invulnerable).
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        if self.is_invulnerable() || amount <= 0.0 {
            return 0.0;
        }
        let dealt = (amount - self.defense()).max(1.0);
        self.health = (self.health - dealt).max(0.0);
        self.invulnerable_ms = PLAYER_INVULNERABLE_MS;
        debug!(dealt, health = self.health, "Player damaged");
        dealt
    }

    /// Start an attack if the cooldown allows. Returns `(centre, damage, radius)`.
    pub fn try_attack(&mut self) -> Option<(Vec2, f32, f32)> {
        if self.attack_cooldown_ms > 0.0 {
            return None;
        }
        self.attack_cooldown_ms = PLAYER_ATTACK_COOLDOWN_MS;
        Some((self.body.center(), self.attack_power(), PLAYER_ATTACK_RADIUS))
    }

    /// Back to spawn with full health and no timers.
    pub fn respawn(&mut self, world_width: i32) {
        self.body = Body::new(Self::spawn_point(world_width), Self::size());
        self.health = self.max_health;
        self.invulnerable_ms = 0.0;
        self.attack_cooldown_ms = 0.0;
        debug!(x = self.body.pos.x, y = self.body.pos.y, "Player respawned");
    }

    /// Physics step, timers and the fall-out check.
    pub fn update(&mut self, world: &GridWorld, dt_ms: f32) -> PlayerUpdate {
        self.body.step(world, &BodyParams::PLAYER);
        self.invulnerable_ms = (self.invulnerable_ms - dt_ms).max(0.0);
        self.attack_cooldown_ms = (self.attack_cooldown_ms - dt_ms).max(0.0);

        let floor = world.height() as f32 * BLOCK_SIZE;
        if self.body.pos.y > floor {
            self.respawn(world.width());
            return PlayerUpdate { fell_out: true };
        }
        PlayerUpdate::default()
    }
}
