//! Menu submission normalization.
//!
//! Turns a raw, shape-ambiguous submission into a [`NewMenuItem`] draft.
//! Conventional form encoding collapses single-entry arrays into scalars, so
//! every array-valued leaf arrives as [`OneOrMany`] and is lifted to a
//! sequence before processing.

use serde::Deserialize;
use thiserror::Error;

use crate::domain::menu::{MenuOption, MenuTag, ModifierGroup, ModifierValue, NewMenuItem};

/// A field that arrives as a scalar when one entry was submitted and as a
/// sequence otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Raw submission body delivered by the routing layer.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMenuSubmission {
    pub menu: RawMenuFields,
    #[serde(rename = "newCategory", default)]
    pub new_category: Option<String>,
    pub pricing: RawPricing,
    #[serde(default)]
    pub modifiers: Option<RawModifiers>,
    #[serde(default)]
    pub tags: Option<RawTags>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMenuFields {
    #[serde(rename = "itemName")]
    pub item_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    #[serde(rename = "imageKey", default)]
    pub image_key: Option<String>,
}

/// Parallel price/title arrays (or a single scalar pair) for the purchasable
/// options.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPricing {
    pub price: OneOrMany<String>,
    pub title: OneOrMany<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawModifiers {
    /// Checkbox convention: multi-select is on only when this is exactly
    /// `"on"`.
    #[serde(rename = "multiSelect", default)]
    pub multi_select: Option<String>,
    #[serde(default)]
    pub values: Option<RawModifierValues>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawModifierValues {
    pub title: OneOrMany<String>,
    pub price: OneOrMany<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTags {
    pub title: OneOrMany<String>,
    pub color: OneOrMany<String>,
}

/// A submission that violates the expected shape. Raised before any storage
/// access, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("a category name must be provided when creating a new category")]
    MissingNewCategory,
    #[error("title of the tag must be provided")]
    TagTitleMissing,
    #[error("color for the tag must be selected")]
    TagColorMissing,
    #[error("title of the modifier must be provided")]
    ModifierTitleMissing,
    #[error("price for the modifier must be provided")]
    ModifierPriceMissing,
    #[error("valid price must be provided for the modifier")]
    ModifierPriceInvalid,
}

/// Normalize a raw submission into a canonical draft.
///
/// Option prices are allowed to come out as NaN here; the pricing invariant
/// is enforced by the service before any write. Modifier prices are checked
/// inline and fail the whole submission when unusable.
pub fn parse_menu_form(submission: RawMenuSubmission) -> Result<NewMenuItem, FormError> {
    let RawMenuSubmission {
        menu,
        new_category,
        pricing,
        modifiers,
        tags,
    } = submission;

    // "new" is a sentinel: the real name rides in the newCategory field.
    let category = if menu.category.eq_ignore_ascii_case("new") {
        match new_category.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(FormError::MissingNewCategory),
        }
    } else {
        menu.category
    };

    let options = parse_raw_options(pricing);
    let modifiers = parse_raw_modifiers(modifiers)?;
    let tags = match tags {
        Some(raw) => parse_raw_tags(raw)?,
        None => Vec::new(),
    };

    Ok(NewMenuItem {
        item_name: menu.item_name,
        description: menu.description,
        category,
        options,
        modifiers,
        tags,
        image_key: menu.image_key,
    })
}

fn parse_price(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_raw_options(pricing: RawPricing) -> Vec<MenuOption> {
    match pricing.price {
        // Multiple options were submitted: zip price/title pairwise, with
        // the title sequence as the iteration bound. A price index with no
        // submitted value parses to NaN and is caught by validation.
        OneOrMany::Many(prices) => pricing
            .title
            .into_vec()
            .into_iter()
            .enumerate()
            .map(|(index, title)| MenuOption {
                price: prices
                    .get(index)
                    .map(|price| parse_price(price))
                    .unwrap_or(f64::NAN),
                title,
            })
            .collect(),
        OneOrMany::One(price) => {
            let title = pricing.title.into_vec().into_iter().next().unwrap_or_default();
            vec![MenuOption {
                price: parse_price(&price),
                title,
            }]
        }
    }
}

fn parse_raw_tags(raw: RawTags) -> Result<Vec<MenuTag>, FormError> {
    let titles = raw.title.into_vec();
    let colors = raw.color.into_vec();

    let mut parsed = Vec::with_capacity(titles.len());
    for (index, title) in titles.iter().enumerate() {
        let title = title.trim();
        let color = colors.get(index).map(|color| color.trim()).unwrap_or("");

        // A fully blank row is an unused form slot; a half-filled row is a
        // submission error.
        if title.is_empty() && color.is_empty() {
            continue;
        }
        if title.is_empty() {
            return Err(FormError::TagTitleMissing);
        }
        if color.is_empty() {
            return Err(FormError::TagColorMissing);
        }

        parsed.push(MenuTag {
            title: title.to_string(),
            color: color.to_string(),
        });
    }

    Ok(parsed)
}

fn parse_raw_modifiers(raw: Option<RawModifiers>) -> Result<ModifierGroup, FormError> {
    let Some(raw) = raw else {
        return Ok(ModifierGroup::default());
    };

    let mut group = ModifierGroup {
        multi_select: raw.multi_select.as_deref() == Some("on"),
        values: Vec::new(),
    };

    let Some(values) = raw.values else {
        return Ok(group);
    };

    let titles = values.title.into_vec();
    let prices = values.price.into_vec();

    for (index, price) in prices.iter().enumerate() {
        let price = price.trim();
        let title = titles.get(index).map(|title| title.trim()).unwrap_or("");

        if title.is_empty() && price.is_empty() {
            continue;
        }
        if title.is_empty() {
            return Err(FormError::ModifierTitleMissing);
        }
        if price.is_empty() {
            return Err(FormError::ModifierPriceMissing);
        }

        // Unlike options, an add-on price must be usable right here; zero
        // counts as unusable.
        let parsed = parse_price(price);
        if parsed.is_nan() || parsed == 0.0 {
            return Err(FormError::ModifierPriceInvalid);
        }

        group.values.push(ModifierValue {
            title: title.to_string(),
            price: parsed,
        });
    }

    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_submission() -> RawMenuSubmission {
        RawMenuSubmission {
            menu: RawMenuFields {
                item_name: "Samosa Chaat".to_string(),
                description: Some("Crispy samosas under chickpea curry".to_string()),
                category: "Appetizers".to_string(),
                image_key: None,
            },
            new_category: None,
            pricing: RawPricing {
                price: OneOrMany::One("6.50".to_string()),
                title: OneOrMany::One("Regular".to_string()),
            },
            modifiers: None,
            tags: None,
        }
    }

    #[test]
    fn scalar_pricing_becomes_single_option() {
        let item = parse_menu_form(base_submission()).expect("parses");

        assert_eq!(item.options.len(), 1);
        assert_eq!(item.options[0].price, 6.5);
        assert_eq!(item.options[0].title, "Regular");
    }

    #[test]
    fn sequence_pricing_zips_pairwise() {
        let mut submission = base_submission();
        submission.pricing = RawPricing {
            price: OneOrMany::Many(vec!["6.50".to_string(), "9.00".to_string()]),
            title: OneOrMany::Many(vec!["Small".to_string(), "Large".to_string()]),
        };

        let item = parse_menu_form(submission).expect("parses");

        assert_eq!(item.options.len(), 2);
        assert_eq!(item.options[0].price, 6.5);
        assert_eq!(item.options[0].title, "Small");
        assert_eq!(item.options[1].price, 9.0);
        assert_eq!(item.options[1].title, "Large");
    }

    #[test]
    fn titles_bound_the_option_count() {
        let mut submission = base_submission();
        submission.pricing = RawPricing {
            price: OneOrMany::Many(vec!["6.50".to_string()]),
            title: OneOrMany::Many(vec!["Small".to_string(), "Large".to_string()]),
        };

        let item = parse_menu_form(submission).expect("parses");

        assert_eq!(item.options.len(), 2);
        assert_eq!(item.options[0].price, 6.5);
        assert!(item.options[1].price.is_nan());
    }

    #[test]
    fn unparseable_option_price_flows_through_as_nan() {
        let mut submission = base_submission();
        submission.pricing.price = OneOrMany::One("market".to_string());

        let item = parse_menu_form(submission).expect("parses");

        assert!(item.options[0].price.is_nan());
    }

    #[test]
    fn new_category_sentinel_is_replaced_case_insensitively() {
        for spelling in ["new", "NEW", "New"] {
            let mut submission = base_submission();
            submission.menu.category = spelling.to_string();
            submission.new_category = Some("Desserts".to_string());

            let item = parse_menu_form(submission).expect("parses");
            assert_eq!(item.category, "Desserts");
        }
    }

    #[test]
    fn new_category_sentinel_without_substitute_fails() {
        let mut submission = base_submission();
        submission.menu.category = "new".to_string();

        assert_eq!(
            parse_menu_form(submission),
            Err(FormError::MissingNewCategory)
        );

        let mut submission = base_submission();
        submission.menu.category = "new".to_string();
        submission.new_category = Some("   ".to_string());

        assert_eq!(
            parse_menu_form(submission),
            Err(FormError::MissingNewCategory)
        );
    }

    #[test]
    fn ordinary_category_passes_through() {
        let item = parse_menu_form(base_submission()).expect("parses");
        assert_eq!(item.category, "Appetizers");
    }

    #[test]
    fn blank_tag_rows_are_dropped() {
        let mut submission = base_submission();
        submission.tags = Some(RawTags {
            title: OneOrMany::Many(vec!["Spicy".to_string(), "".to_string()]),
            color: OneOrMany::Many(vec!["red".to_string(), " ".to_string()]),
        });

        let item = parse_menu_form(submission).expect("parses");

        assert_eq!(
            item.tags,
            vec![MenuTag {
                title: "Spicy".to_string(),
                color: "red".to_string(),
            }]
        );
    }

    #[test]
    fn half_filled_tag_row_fails_naming_the_missing_side() {
        let mut submission = base_submission();
        submission.tags = Some(RawTags {
            title: OneOrMany::One("Spicy".to_string()),
            color: OneOrMany::One("".to_string()),
        });
        assert_eq!(parse_menu_form(submission), Err(FormError::TagColorMissing));

        let mut submission = base_submission();
        submission.tags = Some(RawTags {
            title: OneOrMany::One("  ".to_string()),
            color: OneOrMany::One("red".to_string()),
        });
        assert_eq!(parse_menu_form(submission), Err(FormError::TagTitleMissing));
    }

    #[test]
    fn scalar_tags_are_lifted_to_sequences() {
        let mut submission = base_submission();
        submission.tags = Some(RawTags {
            title: OneOrMany::One(" Vegan ".to_string()),
            color: OneOrMany::One("green".to_string()),
        });

        let item = parse_menu_form(submission).expect("parses");

        assert_eq!(item.tags.len(), 1);
        assert_eq!(item.tags[0].title, "Vegan");
        assert_eq!(item.tags[0].color, "green");
    }

    #[test]
    fn absent_modifiers_default_to_empty_single_select() {
        let item = parse_menu_form(base_submission()).expect("parses");

        assert!(!item.modifiers.multi_select);
        assert!(item.modifiers.values.is_empty());
    }

    #[test]
    fn multi_select_requires_the_checkbox_value() {
        let mut submission = base_submission();
        submission.modifiers = Some(RawModifiers {
            multi_select: Some("on".to_string()),
            values: None,
        });
        assert!(parse_menu_form(submission).expect("parses").modifiers.multi_select);

        let mut submission = base_submission();
        submission.modifiers = Some(RawModifiers {
            multi_select: Some("true".to_string()),
            values: None,
        });
        assert!(!parse_menu_form(submission).expect("parses").modifiers.multi_select);
    }

    #[test]
    fn scalar_modifier_values_are_lifted() {
        let mut submission = base_submission();
        submission.modifiers = Some(RawModifiers {
            multi_select: None,
            values: Some(RawModifierValues {
                title: OneOrMany::One("Extra cheese".to_string()),
                price: OneOrMany::One("1.50".to_string()),
            }),
        });

        let item = parse_menu_form(submission).expect("parses");

        assert_eq!(
            item.modifiers.values,
            vec![ModifierValue {
                title: "Extra cheese".to_string(),
                price: 1.5,
            }]
        );
    }

    #[test]
    fn modifier_rows_follow_the_tag_blank_policy() {
        let mut submission = base_submission();
        submission.modifiers = Some(RawModifiers {
            multi_select: None,
            values: Some(RawModifierValues {
                title: OneOrMany::Many(vec!["".to_string(), "Extra rice".to_string()]),
                price: OneOrMany::Many(vec!["".to_string(), "2.00".to_string()]),
            }),
        });

        let item = parse_menu_form(submission).expect("parses");
        assert_eq!(item.modifiers.values.len(), 1);

        let mut submission = base_submission();
        submission.modifiers = Some(RawModifiers {
            multi_select: None,
            values: Some(RawModifierValues {
                title: OneOrMany::One("Extra rice".to_string()),
                price: OneOrMany::One("".to_string()),
            }),
        });
        assert_eq!(
            parse_menu_form(submission),
            Err(FormError::ModifierPriceMissing)
        );

        let mut submission = base_submission();
        submission.modifiers = Some(RawModifiers {
            multi_select: None,
            values: Some(RawModifierValues {
                title: OneOrMany::One("".to_string()),
                price: OneOrMany::One("2.00".to_string()),
            }),
        });
        assert_eq!(
            parse_menu_form(submission),
            Err(FormError::ModifierTitleMissing)
        );
    }

    #[test]
    fn unusable_modifier_price_is_a_hard_failure() {
        for bad_price in ["free", "0"] {
            let mut submission = base_submission();
            submission.modifiers = Some(RawModifiers {
                multi_select: None,
                values: Some(RawModifierValues {
                    title: OneOrMany::One("Extra cheese".to_string()),
                    price: OneOrMany::One(bad_price.to_string()),
                }),
            });
            assert_eq!(
                parse_menu_form(submission),
                Err(FormError::ModifierPriceInvalid)
            );
        }
    }

    #[test]
    fn one_or_many_deserializes_both_shapes() {
        let scalar: OneOrMany<String> =
            serde_json::from_str("\"4.50\"").expect("scalar deserializes");
        assert_eq!(scalar.into_vec(), vec!["4.50".to_string()]);

        let sequence: OneOrMany<String> =
            serde_json::from_str("[\"4.50\", \"6.00\"]").expect("sequence deserializes");
        assert_eq!(
            sequence.into_vec(),
            vec!["4.50".to_string(), "6.00".to_string()]
        );
    }

    #[test]
    fn full_submission_deserializes_from_json() {
        let body = serde_json::json!({
            "menu": {
                "itemName": "Mango Lassi",
                "category": "NEW",
            },
            "newCategory": "Drinks",
            "pricing": {
                "price": ["4.00", "5.50"],
                "title": ["Small", "Large"],
            },
            "modifiers": {
                "multiSelect": "on",
                "values": {
                    "title": "Saffron",
                    "price": "0.75",
                },
            },
            "tags": {
                "title": "Cold",
                "color": "blue",
            },
        });

        let submission: RawMenuSubmission =
            serde_json::from_value(body).expect("body deserializes");
        let item = parse_menu_form(submission).expect("parses");

        assert_eq!(item.item_name, "Mango Lassi");
        assert_eq!(item.category, "Drinks");
        assert_eq!(item.options.len(), 2);
        assert!(item.modifiers.multi_select);
        assert_eq!(item.modifiers.values.len(), 1);
        assert_eq!(item.tags.len(), 1);
    }
}
