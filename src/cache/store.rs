//! Snapshot cache for the menu read paths.
//!
//! Two independently-locked slots: the full menu collection and the distinct
//! category list. Writes delete a slot rather than refreshing it; the next
//! read repopulates from storage.

use std::sync::RwLock;

use crate::domain::menu::MenuItemRecord;

use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

/// Process-wide snapshot cache shared by all request handlers.
///
/// Each slot is get/set/invalidate-atomic on its own; there is no expiry and
/// no cross-slot transaction.
pub struct MenuCache {
    menu_items: RwLock<Option<Vec<MenuItemRecord>>>,
    categories: RwLock<Option<Vec<String>>>,
}

impl MenuCache {
    pub fn new() -> Self {
        Self {
            menu_items: RwLock::new(None),
            categories: RwLock::new(None),
        }
    }

    pub fn get_menu_items(&self) -> Option<Vec<MenuItemRecord>> {
        rw_read(&self.menu_items, SOURCE, "get_menu_items").clone()
    }

    pub fn set_menu_items(&self, value: Vec<MenuItemRecord>) {
        *rw_write(&self.menu_items, SOURCE, "set_menu_items") = Some(value);
    }

    pub fn invalidate_menu_items(&self) {
        *rw_write(&self.menu_items, SOURCE, "invalidate_menu_items") = None;
    }

    pub fn get_categories(&self) -> Option<Vec<String>> {
        rw_read(&self.categories, SOURCE, "get_categories").clone()
    }

    pub fn set_categories(&self, value: Vec<String>) {
        *rw_write(&self.categories, SOURCE, "set_categories") = Some(value);
    }

    pub fn invalidate_categories(&self) {
        *rw_write(&self.categories, SOURCE, "invalidate_categories") = None;
    }

    /// Clear both slots.
    pub fn clear(&self) {
        self.invalidate_menu_items();
        self.invalidate_categories();
    }
}

impl Default for MenuCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use time::OffsetDateTime;
    use uuid::Uuid;

    use crate::domain::menu::{MenuOption, ModifierGroup};

    use super::*;

    fn sample_item(name: &str) -> MenuItemRecord {
        MenuItemRecord {
            id: Uuid::new_v4(),
            item_name: name.to_string(),
            description: None,
            category: "Entrees".to_string(),
            options: vec![MenuOption {
                price: 9.99,
                title: "Regular".to_string(),
            }],
            modifiers: ModifierGroup::default(),
            tags: Vec::new(),
            image_key: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn menu_items_slot_roundtrip() {
        let cache = MenuCache::new();
        assert!(cache.get_menu_items().is_none());

        cache.set_menu_items(vec![sample_item("Saag Paneer")]);

        let cached = cache.get_menu_items().expect("cached collection");
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].item_name, "Saag Paneer");

        cache.invalidate_menu_items();
        assert!(cache.get_menu_items().is_none());
    }

    #[test]
    fn categories_slot_roundtrip() {
        let cache = MenuCache::new();
        assert!(cache.get_categories().is_none());

        cache.set_categories(vec!["Appetizers".to_string(), "Entrees".to_string()]);
        assert_eq!(
            cache.get_categories().expect("cached categories"),
            vec!["Appetizers".to_string(), "Entrees".to_string()]
        );

        cache.invalidate_categories();
        assert!(cache.get_categories().is_none());
    }

    #[test]
    fn slots_are_independent() {
        let cache = MenuCache::new();
        cache.set_menu_items(vec![sample_item("Chai")]);
        cache.set_categories(vec!["Drinks".to_string()]);

        cache.invalidate_menu_items();

        assert!(cache.get_menu_items().is_none());
        assert!(cache.get_categories().is_some());
    }

    #[test]
    fn clear_empties_both_slots() {
        let cache = MenuCache::new();
        cache.set_menu_items(vec![sample_item("Chai")]);
        cache.set_categories(vec!["Drinks".to_string()]);

        cache.clear();

        assert!(cache.get_menu_items().is_none());
        assert!(cache.get_categories().is_none());
    }

    #[test]
    fn recovers_from_poisoned_lock() {
        let cache = MenuCache::new();

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = cache
                .menu_items
                .write()
                .expect("menu_items lock should be acquired");
            panic!("poison menu_items lock");
        }));

        cache.set_menu_items(vec![sample_item("Dal Makhani")]);
        assert!(cache.get_menu_items().is_some());
    }
}
