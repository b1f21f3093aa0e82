//! Built-in prompt dialogs: text, confirm, number and choice.
//!
//! Each prompt is an ordinary single-step dialog in the registry. On first
//! entry it emits its prompt; every reply is validated and an invalid
//! reply re-asks with the retry message. A valid reply ends the prompt
//! dialog with the parsed value, which lands on the caller's next step.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::choice::{match_choice, Choice};
use crate::outcome::{OutboundMessage, StepOutcome};
use crate::registry::{parse_options, step, DialogRegistry, DialogSpec, StepContext};

pub const TEXT_PROMPT: &str = "text_prompt";
pub const CONFIRM_PROMPT: &str = "confirm_prompt";
pub const NUMBER_PROMPT: &str = "number_prompt";
pub const CHOICE_PROMPT: &str = "choice_prompt";

/// Options for [`TEXT_PROMPT`]: any non-empty reply is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextPromptOptions {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_prompt: Option<String>,
}

impl TextPromptOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            retry_prompt: None,
        }
    }
}

/// Options for [`CONFIRM_PROMPT`]: replies parse to yes/no.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmPromptOptions {
    pub prompt: String,
    #[serde(default = "default_confirm_retry")]
    pub retry_prompt: String,
}

impl ConfirmPromptOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            retry_prompt: default_confirm_retry(),
        }
    }
}

fn default_confirm_retry() -> String {
    "Please answer with yes or no.".to_string()
}

/// Options for [`NUMBER_PROMPT`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberPromptOptions {
    pub prompt: String,
    #[serde(default = "default_number_retry")]
    pub retry_prompt: String,
    /// Accepted values must be strictly greater than this when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_exclusive: Option<f64>,
}

impl NumberPromptOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            retry_prompt: default_number_retry(),
            min_exclusive: None,
        }
    }

    pub fn with_min_exclusive(mut self, min: f64) -> Self {
        self.min_exclusive = Some(min);
        self
    }
}

fn default_number_retry() -> String {
    "Please give me a number (e.g. 500).".to_string()
}

/// Options for [`CHOICE_PROMPT`]: replies must match one choice by value,
/// display text or synonym.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoicePromptOptions {
    pub prompt: String,
    pub retry_prompt: String,
    pub choices: Vec<Choice>,
}

/// Parse a yes/no reply the way chat users actually type it.
fn parse_confirm(reply: &str) -> Option<bool> {
    match reply.trim().to_lowercase().as_str() {
        "yes" | "y" | "yeah" | "yep" | "sure" | "ok" | "okay" | "true" => Some(true),
        "no" | "n" | "nope" | "nah" | "false" => Some(false),
        _ => None,
    }
}

/// Render a choice prompt: the question plus a numbered list of choices.
fn choice_prompt_text(prompt: &str, choices: &[Choice]) -> String {
    let mut text = String::from(prompt);
    for (index, choice) in choices.iter().enumerate() {
        text.push_str(&format!("\n  {}. {}", index + 1, choice.title));
    }
    text
}

fn text_prompt_spec() -> DialogSpec {
    DialogSpec::new(vec![step(|ctx: &mut StepContext| {
        Box::pin(async move {
            let opts: TextPromptOptions = parse_options(TEXT_PROMPT, &ctx.options)?;
            match ctx.input_text() {
                None => Ok(StepOutcome::Prompt(OutboundMessage::expecting(&opts.prompt))),
                Some(reply) if !reply.is_empty() => Ok(StepOutcome::End(json!(reply))),
                Some(_) => {
                    let retry = opts.retry_prompt.as_deref().unwrap_or(&opts.prompt);
                    Ok(StepOutcome::Prompt(OutboundMessage::expecting(retry)))
                }
            }
        })
    })])
}

fn confirm_prompt_spec() -> DialogSpec {
    DialogSpec::new(vec![step(|ctx: &mut StepContext| {
        Box::pin(async move {
            let opts: ConfirmPromptOptions = parse_options(CONFIRM_PROMPT, &ctx.options)?;
            match ctx.input_text() {
                None => Ok(StepOutcome::Prompt(OutboundMessage::expecting(&opts.prompt))),
                Some(reply) => match parse_confirm(reply) {
                    Some(answer) => Ok(StepOutcome::End(json!(answer))),
                    None => Ok(StepOutcome::Prompt(OutboundMessage::expecting(
                        &opts.retry_prompt,
                    ))),
                },
            }
        })
    })])
}

fn number_prompt_spec() -> DialogSpec {
    DialogSpec::new(vec![step(|ctx: &mut StepContext| {
        Box::pin(async move {
            let opts: NumberPromptOptions = parse_options(NUMBER_PROMPT, &ctx.options)?;
            match ctx.input_text() {
                None => Ok(StepOutcome::Prompt(OutboundMessage::expecting(&opts.prompt))),
                Some(reply) => match reply.parse::<f64>() {
                    Ok(value)
                        if value.is_finite()
                            && opts.min_exclusive.map_or(true, |min| value > min) =>
                    {
                        Ok(StepOutcome::End(json!(value)))
                    }
                    _ => Ok(StepOutcome::Prompt(OutboundMessage::expecting(
                        &opts.retry_prompt,
                    ))),
                },
            }
        })
    })])
}

fn choice_prompt_spec() -> DialogSpec {
    DialogSpec::new(vec![step(|ctx: &mut StepContext| {
        Box::pin(async move {
            let opts: ChoicePromptOptions = parse_options(CHOICE_PROMPT, &ctx.options)?;
            match ctx.input_text() {
                None => Ok(StepOutcome::Prompt(OutboundMessage::expecting(
                    choice_prompt_text(&opts.prompt, &opts.choices),
                ))),
                Some(reply) => match match_choice(&opts.choices, reply) {
                    Some(choice) => Ok(StepOutcome::End(json!(choice.value))),
                    None => Ok(StepOutcome::Prompt(OutboundMessage::expecting(
                        choice_prompt_text(&opts.retry_prompt, &opts.choices),
                    ))),
                },
            }
        })
    })])
}

/// Register every built-in prompt dialog.
pub fn register_prompts(registry: &mut DialogRegistry) {
    registry.register(TEXT_PROMPT, text_prompt_spec());
    registry.register(CONFIRM_PROMPT, confirm_prompt_spec());
    registry.register(NUMBER_PROMPT, number_prompt_spec());
    registry.register(CHOICE_PROMPT, choice_prompt_spec());
}
