//! The top-level dialog: intro / act / final.
//!
//! intro asks what to do, act recognizes the reply and dispatches to a
//! task dialog (prefetching the list where the task needs it), final
//! applies the finished task's side effect and replaces itself to ask
//! "what else", which is the bot's idle loop.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use basket_core::prompts::{TextPromptOptions, TEXT_PROMPT};
use basket_core::registry::{parse_options, step, to_value, DialogSpec, StepContext};
use basket_core::types::{format_unit_value, ItemDraft, ItemPatch, ItemQuery};
use basket_core::{item_display_text, DialogError, OutboundMessage, StepOutcome};

use crate::add_item::{AddItemOptions, ADD_ITEM_DIALOG};
use crate::confirm_remove_all::CONFIRM_REMOVE_ALL_DIALOG;
use crate::recognizer::{Entities, Intent};
use crate::results::TaskOutcome;
use crate::select_item::{
    SelectItemOptions, MARK_ITEM_DIALOG, REMOVE_ITEM_DIALOG, UNMARK_ITEM_DIALOG,
};
use crate::services::Services;
use crate::show_list::SHOW_LIST_DIALOG;

pub const MAIN_DIALOG: &str = "main";

const INTRO_PROMPT: &str =
    "What can I help you with today?\nSay something like \"Add 2 kg bananas\".";
const WHAT_ELSE_PROMPT: &str = "What else can I do for you?";
const NOT_CONFIGURED_NOTE: &str =
    "NOTE: intent recognition is not configured, so I will treat everything you say \
     as an item to add.";
const DIDNT_GET_THAT: &str = "Sorry, I didn't get that. Please try asking in a different way.";
const CANNOT_UNDERSTAND_NOW: &str =
    "Sorry, I can not understand requests right now. Please try again later.";
const CANNOT_FETCH_ITEMS: &str =
    "Sorry, I can not get all items in your shopping list currently. Please try again later.";
const NOTHING_TO_PICK: &str = "Your shopping list is empty, so there is nothing to pick.";

/// Options the main dialog restarts itself with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_msg: Option<String>,
}

pub fn dialog(services: &Services) -> DialogSpec {
    let intro_services = services.clone();
    let act_services = services.clone();
    let final_services = services.clone();

    DialogSpec::new(vec![
        step(move |ctx| {
            let services = intro_services.clone();
            Box::pin(async move { intro_step(ctx, &services).await })
        }),
        step(move |ctx| {
            let services = act_services.clone();
            Box::pin(async move { act_step(ctx, &services).await })
        }),
        step(move |ctx| {
            let services = final_services.clone();
            Box::pin(async move { final_step(ctx, &services).await })
        }),
    ])
}

/// Ask the open-ended question, or skip straight to dispatch when no
/// recognizer is available.
async fn intro_step(
    ctx: &mut StepContext,
    services: &Services,
) -> Result<StepOutcome, DialogError> {
    if !services.recognizer.is_configured() {
        ctx.send(OutboundMessage::ignoring(NOT_CONFIGURED_NOTE));
        return Ok(StepOutcome::Next(Value::Null));
    }

    let opts: MainOptions = match &ctx.options {
        Value::Null => MainOptions::default(),
        raw => parse_options(MAIN_DIALOG, raw)?,
    };
    let prompt = opts.restart_msg.unwrap_or_else(|| INTRO_PROMPT.to_string());
    Ok(StepOutcome::begin_child(
        TEXT_PROMPT,
        to_value(&TextPromptOptions::new(prompt))?,
    ))
}

/// Recognize the reply and dispatch by intent.
async fn act_step(ctx: &mut StepContext, services: &Services) -> Result<StepOutcome, DialogError> {
    if !services.recognizer.is_configured() {
        // No recognizer: collect an item from scratch.
        return Ok(StepOutcome::begin_child(ADD_ITEM_DIALOG, json!({})));
    }

    let utterance = ctx.input_text().unwrap_or_default().to_string();
    let conversation_id = ctx.conversation_id.clone();
    let recognition = match services.recognizer.recognize(&conversation_id, &utterance).await {
        Ok(recognition) => recognition,
        Err(err) => {
            tracing::warn!(error = %err, "recognizer call failed");
            ctx.send(OutboundMessage::ignoring(CANNOT_UNDERSTAND_NOW));
            return Ok(StepOutcome::Next(Value::Null));
        }
    };
    tracing::debug!(intent = recognition.intent.name(), "dispatching intent");

    match recognition.intent {
        Intent::AddItem => {
            let options = AddItemOptions {
                item_name: recognition.entities.item_name,
                unit: recognition.entities.unit,
            };
            Ok(StepOutcome::begin_child(ADD_ITEM_DIALOG, to_value(&options)?))
        }
        Intent::GetAll => match services.store.fetch_items(&conversation_id).await {
            Ok(items) => Ok(StepOutcome::begin_child(SHOW_LIST_DIALOG, to_value(&items)?)),
            Err(err) => {
                tracing::warn!(error = %err, "could not fetch items for display");
                ctx.send(OutboundMessage::ignoring(CANNOT_FETCH_ITEMS));
                Ok(StepOutcome::Next(Value::Null))
            }
        },
        Intent::MarkItem => {
            begin_selection(ctx, services, MARK_ITEM_DIALOG, &recognition.entities).await
        }
        Intent::UnmarkItem => {
            begin_selection(ctx, services, UNMARK_ITEM_DIALOG, &recognition.entities).await
        }
        Intent::RemoveItem => {
            begin_selection(ctx, services, REMOVE_ITEM_DIALOG, &recognition.entities).await
        }
        Intent::RemoveAll => Ok(StepOutcome::begin_child(
            CONFIRM_REMOVE_ALL_DIALOG,
            Value::Null,
        )),
        Intent::Unrecognized(_) => {
            ctx.send(OutboundMessage::ignoring(DIDNT_GET_THAT));
            Ok(StepOutcome::Next(Value::Null))
        }
    }
}

/// Prefetch the list and start a select-item dialog seeded with the
/// parsed reference. A failed prefetch never starts the child.
async fn begin_selection(
    ctx: &mut StepContext,
    services: &Services,
    dialog_id: &str,
    entities: &Entities,
) -> Result<StepOutcome, DialogError> {
    match services.store.fetch_items(&ctx.conversation_id).await {
        Ok(items) => {
            let options = SelectItemOptions {
                items,
                query: ItemQuery {
                    id: None,
                    item_name: entities.item_name.clone(),
                    position_in_shopping_list: entities.position,
                },
            };
            Ok(StepOutcome::begin_child(dialog_id, to_value(&options)?))
        }
        Err(err) => {
            tracing::warn!(error = %err, dialog_id, "could not fetch items before selection");
            ctx.send(OutboundMessage::ignoring(CANNOT_FETCH_ITEMS));
            Ok(StepOutcome::Next(Value::Null))
        }
    }
}

/// Apply the finished task's side effect, then restart the idle loop.
async fn final_step(
    ctx: &mut StepContext,
    services: &Services,
) -> Result<StepOutcome, DialogError> {
    if let Some(input) = ctx.input.clone() {
        if let Ok(outcome) = serde_json::from_value::<TaskOutcome>(input) {
            apply_task_outcome(ctx, services, outcome).await;
        }
    }
    Ok(StepOutcome::replace(
        MAIN_DIALOG,
        to_value(&MainOptions {
            restart_msg: Some(WHAT_ELSE_PROMPT.to_string()),
        })?,
    ))
}

async fn apply_task_outcome(ctx: &mut StepContext, services: &Services, outcome: TaskOutcome) {
    let conversation_id = ctx.conversation_id.clone();
    match outcome {
        TaskOutcome::AddItem { item: Some(draft) } => {
            let text = draft_display_text(&draft);
            match services.store.add_item(&conversation_id, draft).await {
                Ok(added) => ctx.send(OutboundMessage::ignoring(format!(
                    "I added {} to your shopping list.",
                    item_display_text(&added)
                ))),
                Err(err) => {
                    tracing::warn!(error = %err, "add item failed");
                    ctx.send(OutboundMessage::ignoring(format!(
                        "Sorry, I could not add {text}."
                    )));
                }
            }
        }
        TaskOutcome::AddItem { item: None } => {
            ctx.send(OutboundMessage::ignoring(
                "Something went wrong trying to add an item.",
            ));
        }
        TaskOutcome::MarkItem { found_item_id } => {
            apply_mark(ctx, services, &conversation_id, found_item_id, true).await;
        }
        TaskOutcome::UnmarkItem { found_item_id } => {
            apply_mark(ctx, services, &conversation_id, found_item_id, false).await;
        }
        TaskOutcome::RemoveItem {
            found_item_id: Some(item_id),
        } => match services.store.remove_item(&conversation_id, &item_id).await {
            Ok(()) => ctx.send(OutboundMessage::ignoring(
                "I deleted the item from the shopping list for you.",
            )),
            Err(err) => {
                tracing::warn!(error = %err, "remove item failed");
                ctx.send(OutboundMessage::ignoring(
                    "Sorry, something went wrong deleting one item.",
                ));
            }
        },
        TaskOutcome::RemoveItem {
            found_item_id: None,
        } => {
            ctx.send(OutboundMessage::ignoring(NOTHING_TO_PICK));
        }
        TaskOutcome::RemoveAll { confirmed: true } => {
            match services.store.remove_all_items(&conversation_id).await {
                Ok(()) => ctx.send(OutboundMessage::ignoring(
                    "I removed all items from your shopping list.",
                )),
                Err(err) => {
                    tracing::warn!(error = %err, "remove all failed");
                    ctx.send(OutboundMessage::ignoring(
                        "Sorry, I currently cannot remove all items. Please try again later.",
                    ));
                }
            }
        }
        TaskOutcome::RemoveAll { confirmed: false } => {
            ctx.send(OutboundMessage::ignoring("Ok, I kept your items."));
        }
        TaskOutcome::ShowList => {}
    }
}

async fn apply_mark(
    ctx: &mut StepContext,
    services: &Services,
    conversation_id: &str,
    found_item_id: Option<String>,
    marked: bool,
) {
    let Some(item_id) = found_item_id else {
        ctx.send(OutboundMessage::ignoring(NOTHING_TO_PICK));
        return;
    };
    let result = services
        .store
        .patch_item(conversation_id, &item_id, ItemPatch::marked(marked))
        .await;
    let message = match (result, marked) {
        (Ok(item), true) => format!("I've marked {} as complete.", item_display_text(&item)),
        (Ok(item), false) => format!(
            "{} is now marked as not complete.",
            item_display_text(&item)
        ),
        (Err(err), true) => {
            tracing::warn!(error = %err, "mark item failed");
            "Sorry, something went wrong trying to mark an item in your shopping list as \
             complete."
                .to_string()
        }
        (Err(err), false) => {
            tracing::warn!(error = %err, "unmark item failed");
            "Sorry, something went wrong trying to change an item in your shopping list to \
             not complete."
                .to_string()
        }
    };
    ctx.send(OutboundMessage::ignoring(message));
}

/// Chat text for an item that only exists as a draft so far.
fn draft_display_text(draft: &ItemDraft) -> String {
    match &draft.unit {
        Some(unit) => match &unit.unit_name {
            Some(name) => format!(
                "{} {} {}",
                format_unit_value(unit.value),
                name,
                draft.item_name
            ),
            None => format!("{} {}", format_unit_value(unit.value), draft.item_name),
        },
        None => draft.item_name.clone(),
    }
}
