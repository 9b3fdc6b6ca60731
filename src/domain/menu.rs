//! Canonical menu-item records and the pricing invariant.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// The smallest price a purchasable option may carry, in the menu currency.
pub const MINIMUM_PRICE: f64 = 0.01;

/// A purchasable price/title variant of a menu item (e.g. a size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuOption {
    pub price: f64,
    pub title: String,
}

/// A single optional add-on with its own price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierValue {
    pub title: String,
    pub price: f64,
}

/// Add-ons grouped under a single-select or multi-select policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifierGroup {
    pub multi_select: bool,
    pub values: Vec<ModifierValue>,
}

/// A display tag attached to a menu item; title and color travel together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuTag {
    pub title: String,
    pub color: String,
}

/// Persisted menu item mirrored from storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItemRecord {
    pub id: Uuid,
    pub item_name: String,
    pub description: Option<String>,
    pub category: String,
    pub options: Vec<MenuOption>,
    pub modifiers: ModifierGroup,
    pub tags: Vec<MenuTag>,
    pub image_key: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A normalized submission that storage has not yet assigned an id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMenuItem {
    pub item_name: String,
    pub description: Option<String>,
    pub category: String,
    pub options: Vec<MenuOption>,
    pub modifiers: ModifierGroup,
    pub tags: Vec<MenuTag>,
    pub image_key: Option<String>,
}

/// True when every option price is at least [`MINIMUM_PRICE`].
///
/// A NaN price (the normalizer lets unparseable option prices flow through)
/// compares false against the minimum and is rejected here.
pub fn has_valid_prices(options: &[MenuOption]) -> bool {
    options.iter().all(|option| option.price >= MINIMUM_PRICE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(price: f64) -> MenuOption {
        MenuOption {
            price,
            title: "Regular".to_string(),
        }
    }

    #[test]
    fn accepts_prices_at_or_above_minimum() {
        assert!(has_valid_prices(&[option(0.01), option(4.50), option(12.0)]));
    }

    #[test]
    fn rejects_prices_below_minimum() {
        assert!(!has_valid_prices(&[option(4.50), option(0.0)]));
        assert!(!has_valid_prices(&[option(-1.0)]));
    }

    #[test]
    fn rejects_nan_prices() {
        assert!(!has_valid_prices(&[option(f64::NAN)]));
        assert!(!has_valid_prices(&[option(3.0), option(f64::NAN)]));
    }

    #[test]
    fn empty_options_are_vacuously_valid() {
        assert!(has_valid_prices(&[]));
    }
}
