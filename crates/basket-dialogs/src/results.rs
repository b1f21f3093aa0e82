//! Results task dialogs hand back to the main dialog.
//!
//! Every task dialog ends with a value tagged by its dialog id so the
//! main dialog's final step knows which side effect to apply. The tag
//! travels inside the value because dialog results cross frame
//! boundaries as plain JSON.

use serde::{Deserialize, Serialize};

use basket_core::types::ItemDraft;

use crate::select_item::{MARK_ITEM_DIALOG, UNMARK_ITEM_DIALOG};

/// What a finished task dialog asks the main dialog to do.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "dialogId")]
pub enum TaskOutcome {
    #[serde(rename = "add_item")]
    AddItem {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item: Option<ItemDraft>,
    },
    #[serde(rename = "mark_item")]
    MarkItem {
        #[serde(rename = "foundItemId", default, skip_serializing_if = "Option::is_none")]
        found_item_id: Option<String>,
    },
    #[serde(rename = "unmark_item")]
    UnmarkItem {
        #[serde(rename = "foundItemId", default, skip_serializing_if = "Option::is_none")]
        found_item_id: Option<String>,
    },
    #[serde(rename = "remove_item")]
    RemoveItem {
        #[serde(rename = "foundItemId", default, skip_serializing_if = "Option::is_none")]
        found_item_id: Option<String>,
    },
    #[serde(rename = "confirm_remove_all")]
    RemoveAll { confirmed: bool },
    #[serde(rename = "show_list")]
    ShowList,
}

/// The dialog id a select-item registration reports under must be one
/// the main dialog dispatches on.
pub(crate) fn select_outcome(dialog_id: &str, found_item_id: Option<String>) -> TaskOutcome {
    match dialog_id {
        MARK_ITEM_DIALOG => TaskOutcome::MarkItem { found_item_id },
        UNMARK_ITEM_DIALOG => TaskOutcome::UnmarkItem { found_item_id },
        _ => TaskOutcome::RemoveItem { found_item_id },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_tag_round_trip() {
        let raw = serde_json::to_value(TaskOutcome::MarkItem {
            found_item_id: Some("a".to_string()),
        })
        .unwrap();
        assert_eq!(raw, json!({"dialogId": "mark_item", "foundItemId": "a"}));

        let parsed: TaskOutcome = serde_json::from_value(raw).unwrap();
        assert!(matches!(
            parsed,
            TaskOutcome::MarkItem { found_item_id: Some(id) } if id == "a"
        ));
    }

    #[test]
    fn test_show_list_outcome_is_bare_tag() {
        let raw = serde_json::to_value(TaskOutcome::ShowList).unwrap();
        assert_eq!(raw, json!({"dialogId": "show_list"}));
    }
}
