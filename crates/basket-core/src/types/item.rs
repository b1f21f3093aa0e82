//! Item / Unit value types and the list lookup used by reference resolution.
//!
//! Wire names are camelCase because the shopping list HTTP API speaks the
//! same JSON as the original list backend.

use serde::{Deserialize, Serialize};

/// A unit measurement describing a physical quantity (i.e. 2 kg).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// What unit this is (kg, gram, pound, ...). Bare amounts ("5 bananas") have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
    /// The numerical value this unit represents. Stored units are always > 0.
    pub value: f64,
}

impl Unit {
    pub fn new(unit_name: Option<String>, value: f64) -> Self {
        Self { unit_name, value }
    }
}

/// An entry of one conversation's shopping list.
///
/// Invariant: within one list, `position_in_shopping_list` values are unique
/// and form the contiguous range `1..=len`. The store owns that guarantee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique id within a shopping list. Absent until the store persisted the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// How this item is called (i.e. 'Banana', 'Apple', ...).
    pub item_name: String,
    /// True once the owner of the list checked this item off.
    #[serde(default)]
    pub marked: bool,
    /// Position of the item in the shopping list, starting at 1.
    pub position_in_shopping_list: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

/// What a dialog collects before an item exists in the store.
/// The store assigns id and position on add.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub item_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

/// Field updates for an existing item. Positions are never patched; they
/// are owned by the store's renumbering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

impl ItemPatch {
    /// A patch that only flips the marked flag.
    pub fn marked(marked: bool) -> Self {
        Self {
            marked: Some(marked),
            ..Self::default()
        }
    }
}

/// Everything intent parsing knows about the item a user referred to.
/// Used only for lookup, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_in_shopping_list: Option<u32>,
}

impl ItemQuery {
    pub fn by_name(item_name: impl Into<String>) -> Self {
        Self {
            item_name: Some(item_name.into()),
            ..Self::default()
        }
    }

    pub fn by_position(position: u32) -> Self {
        Self {
            position_in_shopping_list: Some(position),
            ..Self::default()
        }
    }

    /// True when nothing at all is known about the referenced item.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.item_name.is_none() && self.position_in_shopping_list.is_none()
    }
}

/// Narrow a list down to the items matching a partial reference.
///
/// Precedence is strict: id wins over position wins over name. An empty
/// query returns the full list (the degenerate "give me all" lookup).
/// Name matching is exact and case-sensitive; fuzzy matching is the
/// recognizer's job, not the resolver's.
pub fn find_item_in_list<'a>(items: &'a [Item], query: &ItemQuery) -> Vec<&'a Item> {
    if let Some(id) = &query.id {
        items.iter().filter(|item| item.id.as_deref() == Some(id.as_str())).collect()
    } else if let Some(position) = query.position_in_shopping_list {
        items
            .iter()
            .filter(|item| item.position_in_shopping_list == position)
            .collect()
    } else if let Some(name) = &query.item_name {
        items.iter().filter(|item| &item.item_name == name).collect()
    } else {
        items.iter().collect()
    }
}

/// Render a unit value without a trailing ".0" for whole numbers.
pub fn format_unit_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Human readable chat representation of an item: "2 kg bananas",
/// "5 apples" or just "milk".
pub fn item_display_text(item: &Item) -> String {
    match &item.unit {
        Some(unit) => match &unit.unit_name {
            Some(name) => format!(
                "{} {} {}",
                format_unit_value(unit.value),
                name,
                item.item_name
            ),
            None => format!("{} {}", format_unit_value(unit.value), item.item_name),
        },
        None => item.item_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str, position: u32) -> Item {
        Item {
            id: Some(id.to_string()),
            item_name: name.to_string(),
            marked: false,
            position_in_shopping_list: position,
            unit: None,
        }
    }

    #[test]
    fn test_find_prefers_id_over_ambiguous_name() {
        let items = vec![item("a", "milk", 1), item("b", "milk", 2)];
        let query = ItemQuery {
            id: Some("a".to_string()),
            item_name: Some("milk".to_string()),
            ..ItemQuery::default()
        };

        let found = find_item_in_list(&items, &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_deref(), Some("a"));
    }

    #[test]
    fn test_find_prefers_position_over_name() {
        let items = vec![item("a", "milk", 1), item("b", "milk", 2)];
        let query = ItemQuery {
            item_name: Some("milk".to_string()),
            position_in_shopping_list: Some(2),
            ..ItemQuery::default()
        };

        let found = find_item_in_list(&items, &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_deref(), Some("b"));
    }

    #[test]
    fn test_find_by_name_is_case_sensitive_and_can_be_ambiguous() {
        let items = vec![item("a", "milk", 1), item("b", "milk", 2)];

        assert_eq!(find_item_in_list(&items, &ItemQuery::by_name("milk")).len(), 2);
        assert!(find_item_in_list(&items, &ItemQuery::by_name("Milk")).is_empty());
    }

    #[test]
    fn test_empty_query_returns_full_list() {
        let items = vec![item("a", "milk", 1), item("b", "eggs", 2)];
        assert_eq!(find_item_in_list(&items, &ItemQuery::default()).len(), 2);
    }

    #[test]
    fn test_display_text_variants() {
        let mut it = item("a", "bananas", 1);
        assert_eq!(item_display_text(&it), "bananas");

        it.unit = Some(Unit::new(None, 5.0));
        assert_eq!(item_display_text(&it), "5 bananas");

        it.unit = Some(Unit::new(Some("kg".to_string()), 2.0));
        assert_eq!(item_display_text(&it), "2 kg bananas");

        it.unit = Some(Unit::new(Some("kg".to_string()), 1.5));
        assert_eq!(item_display_text(&it), "1.5 kg bananas");
    }
}
