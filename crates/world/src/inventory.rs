//! Inventory system for the player and chests.
//!
//! Both containers share the same slot rules: stacks of one item type up to
//! [`MAX_STACK`], merged into existing stacks first and then into empty slots.

use mdsandbox_core::{ItemStack, ItemType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Maximum stack size for every item.
pub const MAX_STACK: u32 = 64;

/// Number of slots in player inventory.
pub const INVENTORY_SIZE: usize = 16;

/// Number of slots in a single chest inventory (3 rows × 9 columns).
pub const CHEST_SLOT_COUNT: usize = 27;

/// Anything that can receive items (drops, crafting output).
pub trait ItemSink {
    /// Store `count` of `item`. Returns how many did not fit.
    fn add_item(&mut self, item: ItemType, count: u32) -> u32;
}

/// Fixed number of stack slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slots {
    slots: Vec<Option<ItemStack>>,
}

impl Slots {
    /// `size` empty slots.
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
        }
    }

    /// Rebuild from saved slots, resized to `size`. Empty or air stacks become empty
    /// slots and counts are capped at [`MAX_STACK`].
    pub fn from_saved(size: usize, saved: &[Option<ItemStack>]) -> Self {
        let mut slots = Self::new(size);
        for (slot, stack) in slots.slots.iter_mut().zip(saved) {
            *slot = (*stack)
                .filter(|stack| stack.count > 0 && stack.item_type != ItemType::Air)
                .map(|stack| ItemStack::new(stack.item_type, stack.count.min(MAX_STACK)));
        }
        slots
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check whether there are no slots at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots in order.
    pub fn as_slice(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    /// Stack in `slot`.
    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Overwrite a slot. Returns `false` for out-of-range slots.
    pub fn set(&mut self, slot: usize, stack: Option<ItemStack>) -> bool {
        match self.slots.get_mut(slot) {
            Some(existing) => {
                *existing = stack.filter(|s| s.count > 0);
                true
            }
            None => false,
        }
    }

    /// Empty a slot and return what it held.
    pub fn take(&mut self, slot: usize) -> Option<ItemStack> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Merge into existing stacks, then fill empty slots. Returns the leftover count.
    pub fn add(&mut self, item: ItemType, count: u32) -> u32 {
        if item == ItemType::Air {
            return count;
        }
        let mut remaining = count;

        for stack in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if stack.item_type == item && stack.count < MAX_STACK {
                let added = remaining.min(MAX_STACK - stack.count);
                stack.count += added;
                remaining -= added;
            }
        }

        for slot in &mut self.slots {
            if remaining == 0 {
                break;
            }
            if slot.is_none() {
                let added = remaining.min(MAX_STACK);
                *slot = Some(ItemStack::new(item, added));
                remaining -= added;
            }
        }

        remaining
    }

    /// Remove up to `count` from `slot`. Returns the number removed.
    pub fn remove_at(&mut self, slot: usize, count: u32) -> u32 {
        let Some(entry) = self.slots.get_mut(slot) else {
            return 0;
        };
        let Some(stack) = entry else {
            return 0;
        };
        let removed = count.min(stack.count);
        stack.count -= removed;
        if stack.count == 0 {
            *entry = None;
        }
        removed
    }

    /// Total of `item` across all slots.
    pub fn count(&self, item: ItemType) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|stack| stack.item_type == item)
            .map(|stack| stack.count)
            .sum()
    }

    /// Total items of any type.
    pub fn total(&self) -> u32 {
        self.slots.iter().flatten().map(|stack| stack.count).sum()
    }

    /// Get the number of empty slots.
    pub fn empty_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    /// Take every stack out, leaving all slots empty.
    pub fn drain(&mut self) -> Vec<ItemStack> {
        self.slots.iter_mut().filter_map(Option::take).collect()
    }
}

/// The player's hotbar inventory with a selected slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    slots: Slots,
    selected: usize,
}

impl Inventory {
    /// Create a new empty inventory.
    pub fn new() -> Self {
        Self {
            slots: Slots::new(INVENTORY_SIZE),
            selected: 0,
        }
    }

    /// Rebuild from saved data, clamping the selection into range.
    pub fn from_saved(saved: &[Option<ItemStack>], selected: usize) -> Self {
        Self {
            slots: Slots::from_saved(INVENTORY_SIZE, saved),
            selected: selected.min(INVENTORY_SIZE - 1),
        }
    }

    /// Slot storage.
    pub fn slots(&self) -> &Slots {
        &self.slots
    }

    /// Stack in `slot`.
    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot)
    }

    /// Overwrite a slot.
    pub fn set(&mut self, slot: usize, stack: Option<ItemStack>) -> bool {
        self.slots.set(slot, stack)
    }

    /// Remove up to `count` from `slot`. Returns the number removed.
    pub fn remove_at(&mut self, slot: usize, count: u32) -> u32 {
        self.slots.remove_at(slot, count)
    }

    /// Selected slot index.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Select a slot. Out-of-range indices are ignored.
    pub fn select(&mut self, slot: usize) -> bool {
        if slot < INVENTORY_SIZE {
            self.selected = slot;
            true
        } else {
            false
        }
    }

    /// Item in the selected slot.
    pub fn selected_item(&self) -> Option<ItemType> {
        self.slots.get(self.selected).map(|stack| stack.item_type)
    }

    /// Consume one of the selected item and return its type.
    pub fn use_selected(&mut self) -> Option<ItemType> {
        let item = self.selected_item()?;
        (self.slots.remove_at(self.selected, 1) == 1).then_some(item)
    }

    /// Total of `item` held.
    pub fn count(&self, item: ItemType) -> u32 {
        self.slots.count(item)
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemSink for Inventory {
    fn add_item(&mut self, item: ItemType, count: u32) -> u32 {
        let leftover = self.slots.add(item, count);
        if leftover > 0 {
            debug!(item = item.name(), leftover, "Inventory full");
        }
        leftover
    }
}

/// A placed chest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chest {
    slots: Slots,
}

impl Chest {
    /// Empty chest.
    pub fn new() -> Self {
        Self {
            slots: Slots::new(CHEST_SLOT_COUNT),
        }
    }

    /// Rebuild from saved slots.
    pub fn from_saved(saved: &[Option<ItemStack>]) -> Self {
        Self {
            slots: Slots::from_saved(CHEST_SLOT_COUNT, saved),
        }
    }

    /// Slot storage.
    pub fn slots(&self) -> &Slots {
        &self.slots
    }

    /// Mutable slot storage.
    pub fn slots_mut(&mut self) -> &mut Slots {
        &mut self.slots
    }
}

impl Default for Chest {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemSink for Chest {
    fn add_item(&mut self, item: ItemType, count: u32) -> u32 {
        self.slots.add(item, count)
    }
}

/// Chests keyed by their block cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChestStore {
    chests: BTreeMap<(i32, i32), Chest>,
}

impl ChestStore {
    /// No chests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty chest at a cell, keeping an existing one.
    pub fn place(&mut self, x: i32, y: i32) -> &mut Chest {
        self.chests.entry((x, y)).or_default()
    }

    /// Insert a chest, replacing whatever was at that cell.
    pub fn insert(&mut self, x: i32, y: i32, chest: Chest) {
        self.chests.insert((x, y), chest);
    }

    /// Chest at a cell.
    pub fn get(&self, x: i32, y: i32) -> Option<&Chest> {
        self.chests.get(&(x, y))
    }

    /// Mutable chest at a cell.
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Chest> {
        self.chests.get_mut(&(x, y))
    }

    /// Unregister a chest and spill its contents into `sink`.
    ///
    /// Returns the number of items that did not fit and were lost.
    pub fn remove_into(&mut self, x: i32, y: i32, sink: &mut dyn ItemSink) -> u32 {
        let Some(mut chest) = self.chests.remove(&(x, y)) else {
            return 0;
        };
        let lost: u32 = chest
            .slots
            .drain()
            .into_iter()
            .map(|stack| sink.add_item(stack.item_type, stack.count))
            .sum();
        debug!(x, y, lost, "Chest removed");
        lost
    }

    /// Move the whole stack in inventory `slot` into the chest at `(x, y)`.
    ///
    /// What does not fit stays in the inventory. Returns the number moved.
    pub fn deposit(&mut self, x: i32, y: i32, inventory: &mut Inventory, slot: usize) -> u32 {
        let Some(chest) = self.chests.get_mut(&(x, y)) else {
            return 0;
        };
        let Some(stack) = inventory.get(slot).copied() else {
            return 0;
        };
        let moved = stack.count - chest.add_item(stack.item_type, stack.count);
        inventory.remove_at(slot, moved);
        moved
    }

    /// Move the whole stack in chest `slot` into `inventory`.
    ///
    /// What does not fit stays in the chest. Returns the number moved.
    pub fn withdraw(&mut self, x: i32, y: i32, inventory: &mut Inventory, slot: usize) -> u32 {
        let Some(chest) = self.chests.get_mut(&(x, y)) else {
            return 0;
        };
        let Some(stack) = chest.slots.get(slot).copied() else {
            return 0;
        };
        let moved = stack.count - inventory.add_item(stack.item_type, stack.count);
        chest.slots.remove_at(slot, moved);
        moved
    }

    /// Chests in cell order.
    pub fn iter(&self) -> impl Iterator<Item = ((i32, i32), &Chest)> {
        self.chests.iter().map(|(cell, chest)| (*cell, chest))
    }

    /// Number of chests.
    pub fn len(&self) -> usize {
        self.chests.len()
    }

    /// Check whether no chest is registered.
    pub fn is_empty(&self) -> bool {
        self.chests.is_empty()
    }
}
