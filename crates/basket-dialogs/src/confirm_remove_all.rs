//! Confirmation dialog for clearing the whole list. The store call
//! happens in the main dialog's final step, only after a "yes" here.

use serde_json::Value;

use basket_core::prompts::{ConfirmPromptOptions, CONFIRM_PROMPT};
use basket_core::registry::{step, to_value, DialogSpec};
use basket_core::{DialogError, StepOutcome};

use crate::results::TaskOutcome;

pub const CONFIRM_REMOVE_ALL_DIALOG: &str = "confirm_remove_all";

pub fn dialog() -> DialogSpec {
    DialogSpec::new(vec![
        step(|_ctx| {
            Box::pin(async move {
                Ok(StepOutcome::begin_child(
                    CONFIRM_PROMPT,
                    to_value(&ConfirmPromptOptions::new("Do you want to remove all items?"))?,
                ))
            })
        }),
        step(|ctx| {
            Box::pin(async move {
                let confirmed = ctx
                    .input
                    .as_ref()
                    .and_then(Value::as_bool)
                    .ok_or_else(|| DialogError::InvalidInput("expected a yes/no answer".to_string()))?;
                Ok(StepOutcome::End(to_value(&TaskOutcome::RemoveAll {
                    confirmed,
                })?))
            })
        }),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::prompts::register_prompts;
    use basket_core::{ConversationState, DialogEngine, DialogRegistry, TurnStatus};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_confirmation_is_reported_verbatim() {
        tokio_test::block_on(async {
            let mut registry = DialogRegistry::new();
            register_prompts(&mut registry);
            registry.register(CONFIRM_REMOVE_ALL_DIALOG, dialog());
            let engine = DialogEngine::new(Arc::new(registry), CONFIRM_REMOVE_ALL_DIALOG);
            let mut state = ConversationState::new();

            let out = engine
                .begin(&mut state, "conv", CONFIRM_REMOVE_ALL_DIALOG, Value::Null)
                .await
                .unwrap();
            assert_eq!(out.status, TurnStatus::Waiting);
            assert_eq!(out.responses[0].text, "Do you want to remove all items?");

            let out = engine.handle_turn(&mut state, "conv", "no").await.unwrap();
            match out.status {
                TurnStatus::Complete(value) => {
                    assert_eq!(value, json!({"dialogId": "confirm_remove_all", "confirmed": false}));
                }
                other => panic!("expected completion, got {other:?}"),
            }
        });
    }
}
