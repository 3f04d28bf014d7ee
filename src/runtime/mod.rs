pub mod client;
pub mod prompt;
pub mod stream;

pub use client::build_client;
pub use prompt::{create_complete_prompt, Prompt, PromptFiles, LOG_ENTRY_PLACEHOLDER};
pub use stream::{invoke_model, StreamEvent, StreamRenderer, StreamSummary, TokenUsage};

use crate::config::ModelEntry;
use crate::error::{Error, Result};

/// Pick a model by zero-based index, display name or model id.
pub fn select_model<'a>(models: &'a [ModelEntry], choice: &str) -> Result<&'a ModelEntry> {
    let choice = choice.trim();
    if let Ok(index) = choice.parse::<usize>() {
        return models.get(index).ok_or_else(|| {
            Error::InvalidSelection(format!(
                "model index {index} is out of range (0..{})",
                models.len()
            ))
        });
    }
    models
        .iter()
        .find(|m| m.name == choice || m.model_id == choice)
        .ok_or_else(|| Error::InvalidSelection(format!("no configured model matches '{choice}'")))
}
