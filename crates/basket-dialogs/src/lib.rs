//! # Basket Dialogs
//!
//! The bot's closed dialog set and its recognizer abstraction:
//! - main: the intent router and idle loop
//! - add_item + unit: collect a new list entry
//! - mark_item / unmark_item / remove_item: reference resolution
//! - show_list: render the current list
//! - confirm_remove_all: guard the destructive bulk removal
//!
//! [`build_registry`] wires all of them (plus the core prompt dialogs)
//! into one registry for the engine.

pub mod add_item;
pub mod confirm_remove_all;
mod http_recognizer;
pub mod main_dialog;
pub mod recognizer;
pub mod results;
pub mod select_item;
pub mod services;
pub mod show_list;
pub mod unit_dialog;

pub use http_recognizer::{HttpRecognizer, HttpRecognizerConfig};
pub use main_dialog::MAIN_DIALOG;
pub use recognizer::{Entities, Intent, NoopRecognizer, Recognition, Recognizer, RecognizerError};
pub use results::TaskOutcome;
pub use services::Services;

use basket_core::prompts::register_prompts;
use basket_core::DialogRegistry;

/// Build the full dialog registry for one bot instance.
pub fn build_registry(services: &Services) -> DialogRegistry {
    let mut registry = DialogRegistry::new();
    register_prompts(&mut registry);
    registry.register(MAIN_DIALOG, main_dialog::dialog(services));
    registry.register(add_item::ADD_ITEM_DIALOG, add_item::dialog());
    registry.register(unit_dialog::UNIT_DIALOG, unit_dialog::dialog());
    registry.register(
        select_item::MARK_ITEM_DIALOG,
        select_item::dialog(
            select_item::MARK_ITEM_DIALOG,
            "Which item do you want to mark as done?",
        ),
    );
    registry.register(
        select_item::UNMARK_ITEM_DIALOG,
        select_item::dialog(
            select_item::UNMARK_ITEM_DIALOG,
            "Which item do you want to mark as not done?",
        ),
    );
    registry.register(
        select_item::REMOVE_ITEM_DIALOG,
        select_item::dialog(
            select_item::REMOVE_ITEM_DIALOG,
            "Which item do you want to remove?",
        ),
    );
    registry.register(show_list::SHOW_LIST_DIALOG, show_list::dialog());
    registry.register(
        confirm_remove_all::CONFIRM_REMOVE_ALL_DIALOG,
        confirm_remove_all::dialog(),
    );
    registry
}
