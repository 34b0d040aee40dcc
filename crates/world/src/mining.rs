//! Block breaking over time.
//!
//! One target at a time. Holding on the same cell keeps progress; any other cell
//! starts from zero. Completion hands the target back once and returns to idle; the
//! caller clears the cell and decides whether the drop is kept via
//! [`MiningStateMachine::can_harvest`].

use crate::block_properties::BlockProperties;
use mdsandbox_core::{ItemType, ToolInfo};
use tracing::debug;

/// Number of crack overlay stages.
pub const CRACK_STAGES: u8 = 10;

/// The block being broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningTarget {
    /// Cell column.
    pub x: i32,
    /// Cell row.
    pub y: i32,
    /// Block kind when mining started.
    pub block: ItemType,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveMining {
    target: MiningTarget,
    elapsed_ms: f32,
    total_ms: f32,
}

impl ActiveMining {
    fn progress(&self) -> f32 {
        if self.total_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.total_ms).min(1.0)
        }
    }
}

/// Idle or mining one target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MiningStateMachine {
    active: Option<ActiveMining>,
}

impl MiningStateMachine {
    /// Idle machine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time to break `block` with `tool`, in milliseconds.
    pub fn break_time_ms(block: ItemType, tool: Option<ToolInfo>) -> f32 {
        BlockProperties::for_block(block).break_time_ms(tool)
    }

    /// Whether breaking `block` with `tool` yields its drop.
    pub fn can_harvest(block: ItemType, tool: Option<ToolInfo>) -> bool {
        BlockProperties::for_block(block).can_harvest(tool)
    }

    /// Begin (or keep) mining `(x, y)`.
    ///
    /// Restarting on the current target is a no-op so held input keeps its progress.
    /// Any other target replaces the current one and starts from zero.
    pub fn start(&mut self, x: i32, y: i32, block: ItemType, tool: Option<ToolInfo>) {
        if let Some(active) = &self.active {
            if active.target.x == x && active.target.y == y {
                return;
            }
        }
        let total_ms = Self::break_time_ms(block, tool);
        debug!(x, y, block = block.name(), total_ms, "Mining started");
        self.active = Some(ActiveMining {
            target: MiningTarget { x, y, block },
            elapsed_ms: 0.0,
            total_ms,
        });
    }

    /// Accumulate `delta_ms`. Returns the target once it is fully broken.
    pub fn tick(&mut self, delta_ms: f32) -> Option<MiningTarget> {
        let active = self.active.as_mut()?;
        active.elapsed_ms += delta_ms.max(0.0);
        if active.progress() < 1.0 {
            return None;
        }
        let target = active.target;
        self.active = None;
        debug!(x = target.x, y = target.y, block = target.block.name(), "Mining completed");
        Some(target)
    }

    /// Drop the current target and its progress. Returns whether anything was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Whether a target is active.
    pub fn is_mining(&self) -> bool {
        self.active.is_some()
    }

    /// Current target.
    pub fn target(&self) -> Option<MiningTarget> {
        self.active.map(|active| active.target)
    }

    /// Progress in `[0, 1]`; zero while idle.
    pub fn progress(&self) -> f32 {
        self.active.map_or(0.0, |active| active.progress())
    }

    /// Milliseconds the current target needs in total; zero while idle.
    pub fn total_required_ms(&self) -> f32 {
        self.active.map_or(0.0, |active| active.total_ms)
    }

    /// Crack overlay stage, `0..CRACK_STAGES`.
    pub fn crack_stage(&self) -> u8 {
        let stage = (self.progress() * CRACK_STAGES as f32).floor() as u8;
        stage.min(CRACK_STAGES - 1)
    }
}
