//! # Basket Core
//!
//! Core abstractions and deterministic logic for the basket dialog runtime.
//!
//! This crate contains:
//! - Item / Unit / ItemQuery definitions and list lookup
//! - DialogFrame / DialogStack / ConversationState persisted state
//! - The dialog stack engine and its waterfall step contract
//! - Interrupt screening (help / cancel) applied before any dialog resumes
//! - Built-in prompt dialogs (text, confirm, number, choice)
//!
//! This crate does NOT care about:
//! - Which chat channel the messages go to
//! - How conversation state is persisted between turns
//! - What the concrete dialogs of the bot look like
//! - How intents and entities are recognized

pub mod choice;
pub mod engine;
pub mod error;
pub mod interrupt;
pub mod outcome;
pub mod prompts;
pub mod registry;
pub mod state;
pub mod types;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::choice::{item_choice, match_choice, Choice};
    pub use crate::engine::{DialogEngine, EngineConfig};
    pub use crate::error::{DialogError, EngineError};
    pub use crate::interrupt::{InterruptAction, InterruptPolicy};
    pub use crate::outcome::{InputHint, OutboundMessage, StepOutcome, TurnOutput, TurnStatus};
    pub use crate::prompts::{
        register_prompts, ChoicePromptOptions, ConfirmPromptOptions, NumberPromptOptions,
        TextPromptOptions, CHOICE_PROMPT, CONFIRM_PROMPT, NUMBER_PROMPT, TEXT_PROMPT,
    };
    pub use crate::registry::{
        parse_options, step, to_value, DialogRegistry, DialogSpec, StepContext, StepFn,
    };
    pub use crate::state::{ConversationState, DialogFrame, DialogStack};
    pub use crate::types::{
        find_item_in_list, item_display_text, Item, ItemDraft, ItemPatch, ItemQuery, Unit,
    };
}

// Re-export key types at crate root
pub use choice::{item_choice, match_choice, Choice};
pub use engine::{DialogEngine, EngineConfig};
pub use error::{DialogError, EngineError};
pub use interrupt::{InterruptAction, InterruptPolicy};
pub use outcome::{InputHint, OutboundMessage, StepOutcome, TurnOutput, TurnStatus};
pub use registry::{parse_options, step, to_value, DialogRegistry, DialogSpec, StepContext, StepFn};
pub use state::{ConversationState, DialogFrame, DialogStack};
pub use types::{find_item_in_list, item_display_text, Item, ItemDraft, ItemPatch, ItemQuery, Unit};
