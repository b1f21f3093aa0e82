//! Display dialog: renders the current list as chat text.
//!
//! The list arrives prefetched through the options; this dialog only
//! formats, it never talks to the store.

use basket_core::registry::{parse_options, step, to_value, DialogSpec};
use basket_core::types::{item_display_text, Item};
use basket_core::{OutboundMessage, StepOutcome};
use serde_json::Value;

use crate::results::TaskOutcome;

pub const SHOW_LIST_DIALOG: &str = "show_list";

const EMPTY_LIST: &str = "Your shopping list is empty. To add an item say something like \
                          \"Add 5 bananas to my shopping list.\"";
const LIST_HEADER: &str = "Here are the items on your shopping list. You can check them off \
                           by saying something like \"Mark the first item\".";

/// One line per item, in list order, checked items ticked off.
fn render_lines(items: &mut [Item]) -> String {
    items.sort_by_key(|item| item.position_in_shopping_list);
    let mut text = String::from(LIST_HEADER);
    for item in items.iter() {
        let tick = if item.marked { "x" } else { " " };
        text.push_str(&format!(
            "\n  {}. [{}] {}",
            item.position_in_shopping_list,
            tick,
            item_display_text(item)
        ));
    }
    text
}

pub fn dialog() -> DialogSpec {
    DialogSpec::new(vec![
        step(|ctx| {
            Box::pin(async move {
                let mut items: Vec<Item> = parse_options(SHOW_LIST_DIALOG, &ctx.options)?;
                if items.is_empty() {
                    ctx.send(OutboundMessage::ignoring(EMPTY_LIST));
                } else {
                    ctx.send(OutboundMessage::ignoring(render_lines(&mut items)));
                }
                Ok(StepOutcome::Next(Value::Null))
            })
        }),
        step(|_ctx| {
            Box::pin(async move { Ok(StepOutcome::End(to_value(&TaskOutcome::ShowList)?)) })
        }),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::types::Unit;
    use basket_core::{ConversationState, DialogEngine, DialogRegistry, TurnStatus};
    use std::sync::Arc;

    fn engine() -> DialogEngine {
        let mut registry = DialogRegistry::new();
        registry.register(SHOW_LIST_DIALOG, dialog());
        DialogEngine::new(Arc::new(registry), SHOW_LIST_DIALOG)
    }

    #[test]
    fn test_renders_sorted_list_with_marks() {
        tokio_test::block_on(async {
            let items = vec![
                Item {
                    id: Some("b".to_string()),
                    item_name: "eggs".to_string(),
                    marked: true,
                    position_in_shopping_list: 2,
                    unit: None,
                },
                Item {
                    id: Some("a".to_string()),
                    item_name: "bananas".to_string(),
                    marked: false,
                    position_in_shopping_list: 1,
                    unit: Some(Unit::new(Some("kg".to_string()), 2.0)),
                },
            ];
            let engine = engine();
            let mut state = ConversationState::new();
            let out = engine
                .begin(
                    &mut state,
                    "conv",
                    SHOW_LIST_DIALOG,
                    serde_json::to_value(&items).unwrap(),
                )
                .await
                .unwrap();

            assert!(matches!(out.status, TurnStatus::Complete(_)));
            let text = &out.responses[0].text;
            let banana_line = text.find("1. [ ] 2 kg bananas").unwrap();
            let eggs_line = text.find("2. [x] eggs").unwrap();
            assert!(banana_line < eggs_line);
        });
    }

    #[test]
    fn test_empty_list_gets_the_hint() {
        tokio_test::block_on(async {
            let engine = engine();
            let mut state = ConversationState::new();
            let out = engine
                .begin(&mut state, "conv", SHOW_LIST_DIALOG, serde_json::json!([]))
                .await
                .unwrap();
            assert!(out.responses[0].text.contains("empty"));
        });
    }
}
