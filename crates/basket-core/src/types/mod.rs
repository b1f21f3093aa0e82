//! Core data model: shopping list items and partial references to them.

mod item;

pub use item::{
    find_item_in_list, format_unit_value, item_display_text, Item, ItemDraft, ItemPatch,
    ItemQuery, Unit,
};
