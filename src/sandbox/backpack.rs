use serde::Serialize;

use crate::data::ItemTemplate;
use crate::world::Inventory;

// ============================================================================
// Backpack
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackpackSlot {
    pub item_id: String,
    pub quantity: u32,
    pub max_stack: u32,
}

/// Fixed-size slot inventory with a separate gold purse.
#[derive(Debug, Clone, Default)]
pub struct Backpack {
    pub slots: Vec<Option<BackpackSlot>>,
    gold: i64,
}

impl Backpack {
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
            gold: 0,
        }
    }

    /// How many more of `item` would fit, counting partial stacks first
    pub fn room_for(&self, item: &ItemTemplate) -> u64 {
        let max_stack = item.max_stack.max(1);
        self.slots
            .iter()
            .map(|slot| match slot {
                Some(s) if s.item_id == item.id => u64::from(max_stack.saturating_sub(s.quantity)),
                Some(_) => 0,
                None => u64::from(max_stack),
            })
            .sum()
    }

    pub fn used_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Occupied slots with their index
    pub fn contents(&self) -> impl Iterator<Item = (usize, &BackpackSlot)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| s.as_ref().map(|s| (i, s)))
    }
}

impl Inventory for Backpack {
    fn add_item(&mut self, item: &ItemTemplate, mut quantity: u32) -> bool {
        if quantity == 0 {
            return true;
        }
        if self.room_for(item) < u64::from(quantity) {
            return false;
        }

        let max_stack = item.max_stack.max(1);

        // Top up existing stacks first
        for slot in self.slots.iter_mut().flatten() {
            if quantity == 0 {
                break;
            }
            if slot.item_id == item.id {
                let add = quantity.min(max_stack.saturating_sub(slot.quantity));
                slot.quantity += add;
                quantity -= add;
            }
        }

        // Then spill into empty slots
        for slot in &mut self.slots {
            if quantity == 0 {
                break;
            }
            if slot.is_none() {
                let add = quantity.min(max_stack);
                *slot = Some(BackpackSlot {
                    item_id: item.id.clone(),
                    quantity: add,
                    max_stack,
                });
                quantity -= add;
            }
        }

        true
    }

    fn remove_item(&mut self, item_id: &str, mut quantity: u32) -> bool {
        if self.item_count(item_id) < quantity {
            return false;
        }

        // Drain from the back so the front stacks stay full
        for slot in self.slots.iter_mut().rev() {
            if quantity == 0 {
                break;
            }
            if let Some(s) = slot {
                if s.item_id == item_id {
                    let take = quantity.min(s.quantity);
                    s.quantity -= take;
                    quantity -= take;
                    if s.quantity == 0 {
                        *slot = None;
                    }
                }
            }
        }
        true
    }

    fn item_count(&self, item_id: &str) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|s| s.item_id == item_id)
            .map(|s| s.quantity)
            .sum()
    }

    fn gold(&self) -> i64 {
        self.gold
    }

    fn set_gold(&mut self, gold: i64) {
        self.gold = gold;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stacking_and_spill() {
        let berries = ItemTemplate::simple("berries", "Berries", 10);
        let mut backpack = Backpack::new(3);

        assert!(backpack.add_item(&berries, 7));
        assert!(backpack.add_item(&berries, 7));
        assert_eq!(backpack.item_count("berries"), 14);
        assert_eq!(backpack.used_slots(), 2);
        assert_eq!(backpack.slots[0].as_ref().unwrap().quantity, 10);
    }

    #[test]
    fn test_add_is_all_or_nothing() {
        let sword = ItemTemplate::simple("iron_sword", "Iron Sword", 1);
        let mut backpack = Backpack::new(2);

        assert!(!backpack.add_item(&sword, 3));
        assert_eq!(backpack.item_count("iron_sword"), 0);
        assert!(backpack.add_item(&sword, 2));
        assert!(!backpack.add_item(&sword, 1));
    }

    #[test]
    fn test_remove() {
        let wood = ItemTemplate::simple("ancient_wood", "Ancient Wood", 5);
        let mut backpack = Backpack::new(4);
        backpack.add_item(&wood, 8);

        assert!(!backpack.remove_item("ancient_wood", 9));
        assert_eq!(backpack.item_count("ancient_wood"), 8);
        assert!(backpack.remove_item("ancient_wood", 4));
        assert_eq!(backpack.item_count("ancient_wood"), 4);
        assert_eq!(backpack.used_slots(), 1);
    }

    #[test]
    fn test_gold_purse() {
        let mut backpack = Backpack::new(0);
        backpack.add_gold(75);
        backpack.add_gold(-25);
        assert_eq!(backpack.gold(), 50);
    }
}
