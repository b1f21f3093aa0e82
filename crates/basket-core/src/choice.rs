//! Choice sets for disambiguation prompts.

use serde::{Deserialize, Serialize};

use crate::types::{item_display_text, Item};

/// One selectable option in a choice prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// The value the choice resolves to (for item choices: the item id).
    pub value: String,
    /// Display text shown to the user.
    pub title: String,
    /// Additional inputs that select this choice.
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// Match a reply against a choice set.
///
/// Matching is exact, case-insensitive and whole-message, against value,
/// title or any synonym. No fuzzy guessing: an unmatched reply means the
/// prompt re-asks.
pub fn match_choice<'a>(choices: &'a [Choice], reply: &str) -> Option<&'a Choice> {
    let needle = reply.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    choices.iter().find(|choice| {
        choice.value.to_lowercase() == needle
            || choice.title.to_lowercase() == needle
            || choice.synonyms.iter().any(|s| s.to_lowercase() == needle)
    })
}

/// Build the choice for one list item: selectable by display text, plain
/// name or position. Items without an id cannot be selected.
pub fn item_choice(item: &Item) -> Option<Choice> {
    let id = item.id.clone()?;
    let title = item_display_text(item);
    Some(Choice {
        value: id,
        synonyms: vec![
            title.clone(),
            item.item_name.clone(),
            item.position_in_shopping_list.to_string(),
        ],
        title,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Unit;

    fn milk_choices() -> Vec<Choice> {
        let items = vec![
            Item {
                id: Some("a".to_string()),
                item_name: "milk".to_string(),
                marked: false,
                position_in_shopping_list: 1,
                unit: None,
            },
            Item {
                id: Some("b".to_string()),
                item_name: "milk".to_string(),
                marked: false,
                position_in_shopping_list: 2,
                unit: Some(Unit::new(Some("l".to_string()), 2.0)),
            },
        ];
        items.iter().filter_map(item_choice).collect()
    }

    #[test]
    fn test_position_synonym_selects_item() {
        let choices = milk_choices();
        let picked = match_choice(&choices, "2").unwrap();
        assert_eq!(picked.value, "b");
    }

    #[test]
    fn test_display_text_and_case_insensitive_name() {
        let choices = milk_choices();
        assert_eq!(match_choice(&choices, "2 l milk").unwrap().value, "b");
        assert_eq!(match_choice(&choices, "MILK").unwrap().value, "a");
    }

    #[test]
    fn test_unmatched_reply_returns_none() {
        let choices = milk_choices();
        assert!(match_choice(&choices, "bananas").is_none());
        assert!(match_choice(&choices, "").is_none());
        // a partial mention is not a whole-message match
        assert!(match_choice(&choices, "the milk please").is_none());
    }
}
