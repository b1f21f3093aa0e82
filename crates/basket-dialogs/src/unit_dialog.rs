//! Unit collection dialog: asks whether the user wants a unit at all,
//! then collects name and value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use basket_core::prompts::{
    ConfirmPromptOptions, NumberPromptOptions, TextPromptOptions, CONFIRM_PROMPT, NUMBER_PROMPT,
    TEXT_PROMPT,
};
use basket_core::registry::{parse_options, step, to_value, DialogSpec};
use basket_core::types::Unit;
use basket_core::{DialogError, StepOutcome};

pub const UNIT_DIALOG: &str = "unit";

/// State this dialog accumulates across its own steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnitDialogState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit_name: Option<String>,
}

pub fn dialog() -> DialogSpec {
    DialogSpec::new(vec![
        // Does the user want a unit at all?
        step(|_ctx| {
            Box::pin(async move {
                Ok(StepOutcome::begin_child(
                    CONFIRM_PROMPT,
                    to_value(&ConfirmPromptOptions::new("Do you want to add a unit, e.g. 5 kg?"))?,
                ))
            })
        }),
        step(|ctx| {
            Box::pin(async move {
                let wants_unit = ctx
                    .input
                    .as_ref()
                    .and_then(Value::as_bool)
                    .ok_or_else(|| DialogError::InvalidInput("expected a yes/no answer".to_string()))?;
                if wants_unit {
                    Ok(StepOutcome::Next(Value::Null))
                } else {
                    Ok(StepOutcome::End(Value::Null))
                }
            })
        }),
        step(|_ctx| {
            Box::pin(async move {
                Ok(StepOutcome::begin_child(
                    TEXT_PROMPT,
                    to_value(&TextPromptOptions::new("Which unit (e.g. kg)?"))?,
                ))
            })
        }),
        step(|ctx| {
            Box::pin(async move {
                let unit_name = ctx
                    .input_text()
                    .ok_or_else(|| DialogError::InvalidInput("expected a unit name".to_string()))?
                    .to_string();
                let prompt = format!("How many {unit_name} (e.g. 500)?");
                ctx.update_options(to_value(&UnitDialogState {
                    unit_name: Some(unit_name),
                })?);
                Ok(StepOutcome::begin_child(
                    NUMBER_PROMPT,
                    to_value(&NumberPromptOptions::new(prompt).with_min_exclusive(0.0))?,
                ))
            })
        }),
        step(|ctx| {
            Box::pin(async move {
                let value = ctx
                    .input
                    .as_ref()
                    .and_then(Value::as_f64)
                    .ok_or_else(|| DialogError::InvalidInput("expected a unit value".to_string()))?;
                let state: UnitDialogState = parse_options(UNIT_DIALOG, &ctx.options)?;
                Ok(StepOutcome::End(to_value(&Unit::new(state.unit_name, value))?))
            })
        }),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::prompts::register_prompts;
    use basket_core::{ConversationState, DialogEngine, DialogRegistry, TurnStatus};
    use std::sync::Arc;

    fn engine() -> DialogEngine {
        let mut registry = DialogRegistry::new();
        register_prompts(&mut registry);
        registry.register(UNIT_DIALOG, dialog());
        DialogEngine::new(Arc::new(registry), UNIT_DIALOG)
    }

    #[test]
    fn test_declining_unit_ends_with_null() {
        tokio_test::block_on(async {
            let engine = engine();
            let mut state = ConversationState::new();

            let out = engine
                .begin(&mut state, "conv", UNIT_DIALOG, Value::Null)
                .await
                .unwrap();
            assert_eq!(out.status, TurnStatus::Waiting);

            let out = engine.handle_turn(&mut state, "conv", "no").await.unwrap();
            assert_eq!(out.status, TurnStatus::Complete(Value::Null));
        });
    }

    #[test]
    fn test_collects_name_and_value() {
        tokio_test::block_on(async {
            let engine = engine();
            let mut state = ConversationState::new();

            engine
                .begin(&mut state, "conv", UNIT_DIALOG, Value::Null)
                .await
                .unwrap();
            engine.handle_turn(&mut state, "conv", "yes").await.unwrap();
            let out = engine.handle_turn(&mut state, "conv", "kg").await.unwrap();
            assert!(out.responses[0].text.contains("How many kg"));

            let out = engine.handle_turn(&mut state, "conv", "2").await.unwrap();
            match out.status {
                TurnStatus::Complete(value) => {
                    let unit: Unit = serde_json::from_value(value).unwrap();
                    assert_eq!(unit.unit_name.as_deref(), Some("kg"));
                    assert_eq!(unit.value, 2.0);
                }
                other => panic!("expected completion, got {other:?}"),
            }
        });
    }
}
