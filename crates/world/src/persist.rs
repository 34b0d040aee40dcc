//! JSON save files.
//!
//! A save carries the block grid, the player, inventory and chests, and the clock.
//! Loading is lenient: every section and field is optional and unknown item ids read
//! as empty, so only unparseable JSON or I/O problems are errors.

use crate::time::DEFAULT_DAY_DURATION_MS;
use chrono::Utc;
use mdsandbox_core::{ItemStack, ItemType};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

/// Errors emitted while reading or writing saves.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Wrap IO errors when reading or writing save files.
    #[error("failed to access save file: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse save data: {0}")]
    Parse(#[from] serde_json::Error),
}

fn default_version() -> u32 {
    SAVE_VERSION
}

/// One saved inventory or chest slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSave {
    /// Item id.
    pub item: u16,
    /// Stack size.
    pub count: u32,
}

/// Saved block grid, `blocks[x][y]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSave {
    /// Width in cells.
    pub width: i32,
    /// Height in cells.
    pub height: i32,
    /// Block ids, column-major.
    pub blocks: Vec<Vec<u16>>,
}

/// Saved armour, as item ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmorSave {
    /// Head piece.
    pub helmet: Option<u16>,
    /// Torso piece.
    pub chestplate: Option<u16>,
    /// Leg piece.
    pub leggings: Option<u16>,
    /// Foot piece.
    pub boots: Option<u16>,
}

/// Saved player. Absent fields keep the live value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSave {
    /// Body x.
    pub x: Option<f32>,
    /// Body y.
    pub y: Option<f32>,
    /// Health.
    pub health: Option<f32>,
    /// Health cap.
    pub max_health: Option<f32>,
    /// Equipped sword id.
    pub equipped_weapon: Option<u16>,
    /// Worn armour.
    pub equipped_armor: ArmorSave,
}

/// Saved player inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventorySave {
    /// Slots in order.
    pub slots: Vec<Option<SlotSave>>,
    /// Selected slot.
    pub selected: usize,
}

/// Saved chest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChestSave {
    /// Cell column.
    pub x: i32,
    /// Cell row.
    pub y: i32,
    /// Slots in order.
    pub slots: Vec<Option<SlotSave>>,
}

/// Saved clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayNightSave {
    /// Time of day fraction.
    pub current_time: f64,
    /// Day length.
    pub day_duration_ms: f64,
}

impl Default for DayNightSave {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            day_duration_ms: DEFAULT_DAY_DURATION_MS,
        }
    }
}

/// A whole save file. Missing sections leave the live game untouched on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    /// Format version.
    #[serde(default = "default_version")]
    pub version: u32,
    /// RFC 3339 creation time.
    #[serde(default)]
    pub timestamp: String,
    /// Block grid.
    #[serde(default)]
    pub world: Option<WorldSave>,
    /// Player.
    #[serde(default)]
    pub player: Option<PlayerSave>,
    /// Inventory.
    #[serde(default)]
    pub inventory: Option<InventorySave>,
    /// Chests.
    #[serde(default)]
    pub chests: Option<Vec<ChestSave>>,
    /// Clock.
    #[serde(default)]
    pub day_night: Option<DayNightSave>,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            timestamp: String::new(),
            world: None,
            player: None,
            inventory: None,
            chests: None,
            day_night: None,
        }
    }
}

impl SaveData {
    /// Empty save stamped with the current time.
    pub fn stamped() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            ..Self::default()
        }
    }

    /// Parse a save from JSON.
    pub fn from_json(input: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a save file.
    pub fn load(path: &Path) -> Result<Self, SaveError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Write a save file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), SaveError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Saved slots as live stacks. Unknown ids and empty stacks become empty slots.
pub fn stacks_from_save(slots: &[Option<SlotSave>]) -> Vec<Option<ItemStack>> {
    slots
        .iter()
        .map(|slot| {
            slot.and_then(|saved| {
                let item = ItemType::from_id(saved.item)?;
                (item != ItemType::Air && saved.count > 0).then(|| ItemStack::new(item, saved.count))
            })
        })
        .collect()
}

/// Live stacks as saved slots.
pub fn stacks_to_save(slots: &[Option<ItemStack>]) -> Vec<Option<SlotSave>> {
    slots
        .iter()
        .map(|slot| {
            slot.map(|stack| SlotSave {
                item: stack.item_type.id(),
                count: stack.count,
            })
        })
        .collect()
}

/// Block ids as blocks; unknown ids read as air.
pub fn blocks_from_save(columns: &[Vec<u16>]) -> Vec<Vec<ItemType>> {
    columns
        .iter()
        .map(|column| {
            column
                .iter()
                .map(|id| ItemType::from_id(*id).unwrap_or(ItemType::Air))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_parses_with_defaults() {
        let save = SaveData::from_json("{}").unwrap();
        assert_eq!(save.version, SAVE_VERSION);
        assert!(save.world.is_none());
        assert!(save.day_night.is_none());
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let save = SaveData::from_json(r#"{"day_night": {"current_time": 0.5}, "player": {"health": 7}}"#)
            .unwrap();
        let clock = save.day_night.unwrap();
        assert_eq!(clock.current_time, 0.5);
        assert_eq!(clock.day_duration_ms, DEFAULT_DAY_DURATION_MS);
        let player = save.player.unwrap();
        assert_eq!(player.health, Some(7.0));
        assert_eq!(player.x, None);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(
            SaveData::from_json("not json"),
            Err(SaveError::Parse(_))
        ));
    }

    #[test]
    fn unknown_ids_are_dropped() {
        let slots = vec![
            Some(SlotSave { item: 3, count: 5 }),
            Some(SlotSave { item: 999, count: 5 }),
            Some(SlotSave { item: 0, count: 5 }),
            None,
        ];
        let stacks = stacks_from_save(&slots);
        assert_eq!(stacks[0], Some(ItemStack::new(ItemType::Stone, 5)));
        assert_eq!(stacks[1], None);
        assert_eq!(stacks[2], None);

        let blocks = blocks_from_save(&[vec![1, 500, 78]]);
        assert_eq!(
            blocks[0],
            vec![ItemType::Dirt, ItemType::Air, ItemType::Bedrock]
        );
    }

    #[test]
    fn stamped_save_has_rfc3339_timestamp() {
        let save = SaveData::stamped();
        assert!(chrono::DateTime::parse_from_rfc3339(&save.timestamp).is_ok());
    }
}
