//! Reference resolution dialog: find one item in a list from partial
//! information, asking the user to pick when the reference is ambiguous.
//!
//! Registered once per task (mark / unmark / remove) with a
//! task-specific question; the step table is the same.

use serde::{Deserialize, Serialize};
use serde_json::json;

use basket_core::choice::item_choice;
use basket_core::prompts::{ChoicePromptOptions, CHOICE_PROMPT};
use basket_core::registry::{parse_options, step, to_value, DialogSpec};
use basket_core::types::{find_item_in_list, Item, ItemQuery};
use basket_core::{DialogError, StepOutcome};

use crate::results::select_outcome;

pub const MARK_ITEM_DIALOG: &str = "mark_item";
pub const UNMARK_ITEM_DIALOG: &str = "unmark_item";
pub const REMOVE_ITEM_DIALOG: &str = "remove_item";

const RETRY_PROMPT: &str =
    "I don't understand. Please say the name or the position of an item in your shopping list.";

/// What the caller must supply when starting a select-item dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectItemOptions {
    /// Snapshot of the list to search through.
    pub items: Vec<Item>,
    /// Everything known about the item to find.
    pub query: ItemQuery,
}

/// Build the select-item dialog for one task registration.
pub fn dialog(dialog_id: &'static str, question: &'static str) -> DialogSpec {
    DialogSpec::new(vec![
        // Resolve silently when the reference narrows to one item,
        // otherwise put the whole list up for choice: the parsed
        // reference may not be what the user meant.
        step(move |ctx| {
            Box::pin(async move {
                let opts: SelectItemOptions = parse_options(dialog_id, &ctx.options)?;
                if opts.items.is_empty() {
                    // Nothing to offer; end without prompting.
                    return Ok(StepOutcome::End(to_value(&select_outcome(dialog_id, None))?));
                }

                let found = find_item_in_list(&opts.items, &opts.query);
                if found.len() == 1 {
                    if let Some(id) = &found[0].id {
                        return Ok(StepOutcome::Next(json!(id)));
                    }
                }

                let choices = opts.items.iter().filter_map(item_choice).collect();
                let prompt_options = ChoicePromptOptions {
                    prompt: format!("{question} Please pick an item from your shopping list."),
                    retry_prompt: RETRY_PROMPT.to_string(),
                    choices,
                };
                Ok(StepOutcome::begin_child(
                    CHOICE_PROMPT,
                    to_value(&prompt_options)?,
                ))
            })
        }),
        step(move |ctx| {
            Box::pin(async move {
                let id = ctx
                    .input_text()
                    .ok_or_else(|| DialogError::InvalidInput("expected an item id".to_string()))?
                    .to_string();
                Ok(StepOutcome::End(to_value(&select_outcome(
                    dialog_id,
                    Some(id),
                ))?))
            })
        }),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::prompts::register_prompts;
    use basket_core::{ConversationState, DialogEngine, DialogRegistry, TurnStatus};
    use serde_json::Value;
    use std::sync::Arc;

    fn item(id: &str, name: &str, position: u32) -> Item {
        Item {
            id: Some(id.to_string()),
            item_name: name.to_string(),
            marked: false,
            position_in_shopping_list: position,
            unit: None,
        }
    }

    fn engine() -> DialogEngine {
        let mut registry = DialogRegistry::new();
        register_prompts(&mut registry);
        registry.register(
            MARK_ITEM_DIALOG,
            dialog(MARK_ITEM_DIALOG, "Which item do you want to mark as done?"),
        );
        DialogEngine::new(Arc::new(registry), MARK_ITEM_DIALOG)
    }

    async fn begin(engine: &DialogEngine, options: Value) -> (ConversationState, basket_core::TurnOutput) {
        let mut state = ConversationState::new();
        let out = engine
            .begin(&mut state, "conv", MARK_ITEM_DIALOG, options)
            .await
            .unwrap();
        (state, out)
    }

    fn two_milks() -> Vec<Item> {
        vec![item("a", "milk", 1), item("b", "milk", 2)]
    }

    #[test]
    fn test_id_precedence_resolves_without_prompting() {
        tokio_test::block_on(async {
            let engine = engine();
            let options = to_value(&SelectItemOptions {
                items: two_milks(),
                query: ItemQuery {
                    id: Some("a".to_string()),
                    item_name: Some("milk".to_string()),
                    ..ItemQuery::default()
                },
            })
            .unwrap();

            let (state, out) = begin(&engine, options).await;
            assert!(state.stack.is_empty());
            match out.status {
                TurnStatus::Complete(value) => {
                    assert_eq!(value["foundItemId"], json!("a"));
                    assert_eq!(value["dialogId"], json!("mark_item"));
                }
                other => panic!("expected completion, got {other:?}"),
            }
            assert!(out.responses.is_empty());
        });
    }

    #[test]
    fn test_ambiguous_name_offers_both_and_position_reply_resolves() {
        tokio_test::block_on(async {
            let engine = engine();
            let options = to_value(&SelectItemOptions {
                items: two_milks(),
                query: ItemQuery::by_name("milk"),
            })
            .unwrap();

            let (mut state, out) = begin(&engine, options).await;
            assert_eq!(out.status, TurnStatus::Waiting);
            let prompt = &out.responses[0].text;
            assert!(prompt.contains("milk"));
            assert!(prompt.lines().count() >= 3, "both items listed: {prompt}");

            let out = engine.handle_turn(&mut state, "conv", "2").await.unwrap();
            match out.status {
                TurnStatus::Complete(value) => assert_eq!(value["foundItemId"], json!("b")),
                other => panic!("expected completion, got {other:?}"),
            }
        });
    }

    #[test]
    fn test_no_match_reprompts_instead_of_guessing() {
        tokio_test::block_on(async {
            let engine = engine();
            let options = to_value(&SelectItemOptions {
                items: two_milks(),
                query: ItemQuery::by_name("butter"),
            })
            .unwrap();

            let (mut state, out) = begin(&engine, options).await;
            assert_eq!(out.status, TurnStatus::Waiting);

            let out = engine.handle_turn(&mut state, "conv", "cheese").await.unwrap();
            assert_eq!(out.status, TurnStatus::Waiting);
            assert!(out.responses[0].text.starts_with("I don't understand."));

            let out = engine.handle_turn(&mut state, "conv", "milk").await.unwrap();
            match out.status {
                // "milk" matches the first milk choice by name synonym.
                TurnStatus::Complete(value) => assert_eq!(value["foundItemId"], json!("a")),
                other => panic!("expected completion, got {other:?}"),
            }
        });
    }

    #[test]
    fn test_empty_list_ends_without_prompting() {
        tokio_test::block_on(async {
            let engine = engine();
            let options = to_value(&SelectItemOptions {
                items: Vec::new(),
                query: ItemQuery::by_name("milk"),
            })
            .unwrap();

            let (state, out) = begin(&engine, options).await;
            assert!(state.stack.is_empty());
            match out.status {
                TurnStatus::Complete(value) => {
                    assert_eq!(value["dialogId"], json!("mark_item"));
                    assert_eq!(value.get("foundItemId"), None);
                }
                other => panic!("expected completion, got {other:?}"),
            }
        });
    }
}
