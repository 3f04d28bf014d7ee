use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Placeholder in the prompt template replaced by the user content.
pub const LOG_ENTRY_PLACEHOLDER: &str = "{{log_entry}}";

/// Files a prompt is assembled from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptFiles {
    pub system: PathBuf,
    pub template: PathBuf,
    pub content: PathBuf,
}

impl Default for PromptFiles {
    fn default() -> Self {
        Self {
            system: PathBuf::from("system.txt"),
            template: PathBuf::from("prompt.txt"),
            content: PathBuf::from("user-query.txt"),
        }
    }
}

/// A system prompt and the user message built from the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl PromptFiles {
    pub fn load(&self) -> Result<Prompt> {
        let system = read_file_contents(&self.system)?;
        let template = read_file_contents(&self.template)?;
        let content = read_file_contents(&self.content)?;
        let user = create_complete_prompt(&template, &content);
        info!(
            "Prompt created using template {} and content {}",
            self.template.display(),
            self.content.display()
        );
        Ok(Prompt { system, user })
    }
}

pub fn read_file_contents(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Substitute every placeholder in `template` with `content`.
pub fn create_complete_prompt(template: &str, content: &str) -> String {
    template.replace(LOG_ENTRY_PLACEHOLDER, content)
}
