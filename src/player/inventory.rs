//! Slot-limited inventory and equipment handling
//!
//! Ten slots; bulky items take two.

use tracing::debug;

use super::Player;
use crate::combat::Loot;
use crate::items::Item;

impl Player {
    pub fn slots_used(&self) -> u32 {
        self.inventory.iter().map(Item::slot_size).sum()
    }

    pub fn available_slots(&self) -> u32 {
        self.inventory_max_slots.saturating_sub(self.slots_used())
    }

    pub fn can_add(&self, item: &Item) -> bool {
        item.slot_size() <= self.available_slots()
    }

    /// Add an item if it fits; hands it back otherwise
    pub fn add_item(&mut self, item: Item) -> Result<(), Item> {
        if !self.can_add(&item) {
            return Err(item);
        }
        self.inventory.push(item);
        self.touch();
        Ok(())
    }

    /// Remove the first item with this name (case-insensitive)
    pub fn remove_item(&mut self, name: &str) -> Option<Item> {
        let index = self.inventory.iter().position(|item| item.is_named(name))?;
        self.touch();
        Some(self.inventory.remove(index))
    }

    pub fn find_item(&self, name: &str) -> Option<&Item> {
        self.inventory.iter().find(|item| item.is_named(name))
    }

    /// Wear or wield an item, moving whatever held the slot into the inventory.
    ///
    /// Items without a slot are handed back.
    pub fn equip(&mut self, item: Item) -> Result<(), Item> {
        let Some(slot) = item.slot else {
            return Err(item);
        };
        debug!(player = %self.name, item = %item.name, "equip");
        if let Some(previous) = self.equipment.replace(slot, item) {
            self.inventory.push(previous);
        }
        self.touch();
        Ok(())
    }

    /// Move combat loot into the purse and pack.
    ///
    /// Coins always fit. Items that do not fit are returned.
    pub fn receive_loot(&mut self, loot: impl IntoIterator<Item = Loot>) -> Vec<Item> {
        let mut left_behind = Vec::new();
        for entry in loot {
            match entry {
                Loot::Currency(coins) => self.add_currency(coins.silver, coins.gold),
                Loot::Item(item) => {
                    if let Err(item) = self.add_item(*item) {
                        left_behind.push(item);
                    }
                }
            }
        }
        left_behind
    }
}
