#![warn(missing_docs)]
//! Physics primitives (AABB, grid collision, body integration).
//!
//! World units are pixels of the original 32px block grid with `y` growing downward.
//! Velocities are in units per tick; one tick is one host frame.

use glam::Vec2;
use std::ops::Range;

/// World units per grid cell.
pub const BLOCK_SIZE: f32 = 32.0;
/// Downward acceleration per tick before type scaling.
pub const GRAVITY: f32 = 0.5;
/// Vertical velocity applied by a grounded jump.
pub const JUMP_FORCE: f32 = -12.0;
/// Horizontal walking speed of the player.
pub const MOVE_SPEED: f32 = 4.0;

/// Axis-aligned bounding box used for collisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner (x, y).
    pub min: Vec2,
    /// Maximum corner (x, y).
    pub max: Vec2,
}

impl Aabb {
    /// Create a new AABB ensuring min <= max per axis.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y);
        Self { min, max }
    }

    /// Box with its top-left corner at `pos`.
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos, pos + size)
    }

    /// Centre point.
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap test; touching edges do not count.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Grid cells whose half-open ranges intersect `[min, max)` on each axis.
    pub fn covered_cells(&self) -> (Range<i32>, Range<i32>) {
        let x0 = (self.min.x / BLOCK_SIZE).floor() as i32;
        let x1 = (self.max.x / BLOCK_SIZE).ceil() as i32;
        let y0 = (self.min.y / BLOCK_SIZE).floor() as i32;
        let y1 = (self.max.y / BLOCK_SIZE).ceil() as i32;
        (x0..x1.max(x0 + 1), y0..y1.max(y0 + 1))
    }
}

/// Read-only view of a block grid for collision queries.
pub trait CollisionGrid {
    /// Cell blocks movement (anything except air and water). Out-of-range cells are air.
    fn is_solid(&self, bx: i32, by: i32) -> bool;

    /// Cell holds water.
    fn is_water(&self, bx: i32, by: i32) -> bool;

    /// True if any cell covered by `aabb` is solid.
    fn collides(&self, aabb: &Aabb) -> bool {
        let (xs, ys) = aabb.covered_cells();
        xs.into_iter()
            .any(|bx| ys.clone().any(|by| self.is_solid(bx, by)))
    }

    /// True if any cell covered by `aabb` is water.
    fn touches_water(&self, aabb: &Aabb) -> bool {
        let (xs, ys) = aabb.covered_cells();
        xs.into_iter()
            .any(|bx| ys.clone().any(|by| self.is_water(bx, by)))
    }
}

/// What a body does when a horizontal move is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallResponse {
    /// Zero horizontal velocity.
    Stop,
    /// Zero horizontal velocity and flip facing.
    Turn,
    /// Invert horizontal velocity and flip facing.
    Bounce,
}

/// Per-type integration constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyParams {
    /// Multiplier on [`GRAVITY`].
    pub gravity_scale: f32,
    /// Maximum downward speed.
    pub terminal_velocity: f32,
    /// Horizontal damping per tick in air (1.0 = none).
    pub friction: f32,
    /// Extra gravity multiplier while submerged.
    pub water_gravity_scale: f32,
    /// Damping per tick on both axes while submerged.
    pub water_friction: f32,
    /// Upward velocity added by a swim stroke.
    pub swim_impulse: f32,
    /// Blocked horizontal move handling.
    pub wall: WallResponse,
}

impl BodyParams {
    /// The player: full gravity, damped walking, stops at walls.
    pub const PLAYER: Self = Self {
        gravity_scale: 1.0,
        terminal_velocity: 15.0,
        friction: 0.8,
        water_gravity_scale: 0.3,
        water_friction: 0.6,
        swim_impulse: -4.0,
        wall: WallResponse::Stop,
    };

    /// Hostile mobs: full gravity, AI drives vx every tick so no damping.
    pub const ENEMY: Self = Self {
        gravity_scale: 1.0,
        terminal_velocity: 15.0,
        friction: 1.0,
        water_gravity_scale: 0.3,
        water_friction: 0.6,
        swim_impulse: -4.0,
        wall: WallResponse::Turn,
    };

    /// Passive animals: damped gravity and a bounce off walls.
    pub const ANIMAL: Self = Self {
        gravity_scale: 0.8,
        terminal_velocity: 10.0,
        friction: 0.9,
        water_gravity_scale: 0.3,
        water_friction: 0.6,
        swim_impulse: -4.0,
        wall: WallResponse::Bounce,
    };
}

/// A moving box integrated against a [`CollisionGrid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Top-left corner.
    pub pos: Vec2,
    /// Velocity in units per tick.
    pub vel: Vec2,
    /// Width and height.
    pub size: Vec2,
    /// Landed on something during the last vertical resolve.
    pub grounded: bool,
    /// Overlapped water at the start of the last integration.
    pub in_water: bool,
    /// Facing, `1.0` right or `-1.0` left.
    pub facing: f32,
}

impl Body {
    /// Create a body at rest.
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            grounded: false,
            in_water: false,
            facing: 1.0,
        }
    }

    /// Current bounding box.
    pub fn aabb(&self) -> Aabb {
        self.aabb_at(self.pos)
    }

    /// Bounding box if the body stood at `pos`.
    pub fn aabb_at(&self, pos: Vec2) -> Aabb {
        Aabb::from_pos_size(pos, self.size)
    }

    /// Centre of the bounding box.
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Boxes strictly overlap.
    pub fn overlaps(&self, other: &Body) -> bool {
        self.aabb().intersects(&other.aabb())
    }

    /// Full tick: gravity, then [`Body::integrate`].
    pub fn step<G: CollisionGrid + ?Sized>(&mut self, grid: &G, params: &BodyParams) {
        self.apply_gravity(params);
        self.integrate(grid, params);
    }

    /// Add gravity (reduced in water) and clamp to terminal velocity.
    pub fn apply_gravity(&mut self, params: &BodyParams) {
        let mut accel = GRAVITY * params.gravity_scale;
        if self.in_water {
            accel *= params.water_gravity_scale;
        }
        self.vel.y = (self.vel.y + accel).min(params.terminal_velocity);
    }

    /// Resolve X, then Y, then apply damping.
    pub fn integrate<G: CollisionGrid + ?Sized>(&mut self, grid: &G, params: &BodyParams) {
        self.in_water = grid.touches_water(&self.aabb());

        let next_x = Vec2::new(self.pos.x + self.vel.x, self.pos.y);
        if grid.collides(&self.aabb_at(next_x)) {
            match params.wall {
                WallResponse::Stop => self.vel.x = 0.0,
                WallResponse::Turn => {
                    self.vel.x = 0.0;
                    self.facing = -self.facing;
                }
                WallResponse::Bounce => {
                    self.vel.x = -self.vel.x;
                    self.facing = -self.facing;
                }
            }
        } else {
            self.pos = next_x;
        }

        let next_y = Vec2::new(self.pos.x, self.pos.y + self.vel.y);
        if grid.collides(&self.aabb_at(next_y)) {
            if self.vel.y > 0.0 {
                self.grounded = true;
            }
            self.vel.y = 0.0;
        } else {
            self.pos = next_y;
            self.grounded = false;
        }

        if self.in_water {
            self.vel *= params.water_friction;
        } else {
            self.vel.x *= params.friction;
        }
    }

    /// Jump if standing on something. Returns whether the jump happened.
    pub fn jump(&mut self, force: f32) -> bool {
        if self.grounded {
            self.vel.y = force;
            self.grounded = false;
            true
        } else {
            false
        }
    }

    /// Swim stroke; only effective while submerged.
    pub fn swim(&mut self, params: &BodyParams) -> bool {
        if self.in_water {
            self.vel.y = params.swim_impulse;
            true
        } else {
            false
        }
    }
}
