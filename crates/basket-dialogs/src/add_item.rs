//! Item collection dialog: gathers name and unit for a new list entry.
//!
//! Whatever the recognizer already extracted is skipped over; only the
//! missing pieces are asked for.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use basket_core::prompts::{TextPromptOptions, TEXT_PROMPT};
use basket_core::registry::{parse_options, step, to_value, DialogSpec};
use basket_core::types::{ItemDraft, Unit};
use basket_core::{DialogError, StepOutcome};

use crate::results::TaskOutcome;
use crate::unit_dialog::UNIT_DIALOG;

pub const ADD_ITEM_DIALOG: &str = "add_item";

/// What intent parsing already knows about the item to add.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

pub fn dialog() -> DialogSpec {
    DialogSpec::new(vec![
        // Item name: skip the question when the recognizer found one.
        step(|ctx| {
            Box::pin(async move {
                let opts: AddItemOptions = parse_options(ADD_ITEM_DIALOG, &ctx.options)?;
                match opts.item_name {
                    Some(name) => Ok(StepOutcome::Next(json!(name))),
                    None => Ok(StepOutcome::begin_child(
                        TEXT_PROMPT,
                        to_value(&TextPromptOptions::new("Which item would you like to add?"))?,
                    )),
                }
            })
        }),
        // Unit: delegate to the unit dialog unless one was parsed.
        step(|ctx| {
            Box::pin(async move {
                let name = ctx
                    .input_text()
                    .ok_or_else(|| DialogError::InvalidInput("expected an item name".to_string()))?
                    .to_string();
                let mut opts: AddItemOptions = parse_options(ADD_ITEM_DIALOG, &ctx.options)?;
                opts.item_name = Some(name);
                let unit = opts.unit.clone();
                ctx.update_options(to_value(&opts)?);
                match unit {
                    Some(unit) => Ok(StepOutcome::Next(to_value(&unit)?)),
                    None => Ok(StepOutcome::begin_child(UNIT_DIALOG, Value::Null)),
                }
            })
        }),
        step(|ctx| {
            Box::pin(async move {
                let unit = match ctx.input.clone() {
                    None | Some(Value::Null) => None,
                    Some(raw) => Some(serde_json::from_value::<Unit>(raw).map_err(|err| {
                        DialogError::InvalidInput(format!("expected a unit: {err}"))
                    })?),
                };
                let opts: AddItemOptions = parse_options(ADD_ITEM_DIALOG, &ctx.options)?;
                let item_name = opts.item_name.ok_or_else(|| {
                    DialogError::invalid_options(ADD_ITEM_DIALOG, "item name missing".to_string())
                })?;
                Ok(StepOutcome::End(to_value(&TaskOutcome::AddItem {
                    item: Some(ItemDraft { item_name, unit }),
                })?))
            })
        }),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit_dialog;
    use basket_core::prompts::register_prompts;
    use basket_core::{ConversationState, DialogEngine, DialogRegistry, TurnStatus};
    use std::sync::Arc;

    fn engine() -> DialogEngine {
        let mut registry = DialogRegistry::new();
        register_prompts(&mut registry);
        registry.register(UNIT_DIALOG, unit_dialog::dialog());
        registry.register(ADD_ITEM_DIALOG, dialog());
        DialogEngine::new(Arc::new(registry), ADD_ITEM_DIALOG)
    }

    fn draft_from(value: Value) -> ItemDraft {
        let outcome: TaskOutcome = serde_json::from_value(value).unwrap();
        match outcome {
            TaskOutcome::AddItem { item: Some(draft) } => draft,
            other => panic!("expected add item outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_parsed_entities_skip_every_question() {
        tokio_test::block_on(async {
            let engine = engine();
            let mut state = ConversationState::new();
            let options = to_value(&AddItemOptions {
                item_name: Some("bananas".to_string()),
                unit: Some(Unit::new(Some("kg".to_string()), 2.0)),
            })
            .unwrap();

            let out = engine
                .begin(&mut state, "conv", ADD_ITEM_DIALOG, options)
                .await
                .unwrap();
            match out.status {
                TurnStatus::Complete(value) => {
                    let draft = draft_from(value);
                    assert_eq!(draft.item_name, "bananas");
                    assert_eq!(draft.unit.unwrap().value, 2.0);
                }
                other => panic!("expected completion, got {other:?}"),
            }
        });
    }

    #[test]
    fn test_missing_name_is_asked_then_unit_dialog_runs() {
        tokio_test::block_on(async {
            let engine = engine();
            let mut state = ConversationState::new();

            let out = engine
                .begin(&mut state, "conv", ADD_ITEM_DIALOG, json!({}))
                .await
                .unwrap();
            assert_eq!(out.status, TurnStatus::Waiting);
            assert_eq!(out.responses[0].text, "Which item would you like to add?");

            let out = engine.handle_turn(&mut state, "conv", "apples").await.unwrap();
            assert_eq!(out.status, TurnStatus::Waiting);
            assert!(out.responses[0].text.contains("unit"));

            let out = engine.handle_turn(&mut state, "conv", "no").await.unwrap();
            match out.status {
                TurnStatus::Complete(value) => {
                    let draft = draft_from(value);
                    assert_eq!(draft.item_name, "apples");
                    assert!(draft.unit.is_none());
                }
                other => panic!("expected completion, got {other:?}"),
            }
        });
    }
}
