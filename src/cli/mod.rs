use crate::config::{ModelEntry, DEFAULT_CONFIG_PATH};
use crate::error::{Error, Result};
use crate::logging::LogFormat;
use clap::{Parser, Subcommand};
use inquire::ui::{RenderConfig, Styled};
use inquire::{InquireError, Select, Text};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bedrock-vault",
    version,
    about = "Encrypted configuration and credential resolution for Amazon Bedrock"
)]
pub struct Cli {
    /// Append logs to this file instead of stderr.
    #[arg(long, global = true, env = "BEDROCK_VAULT_LOG_FILE")]
    pub log_file: Option<PathBuf>,
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stream a completion from a configured model.
    Invoke(InvokeOpts),
    /// Encrypt the sensitive fields of a plaintext configuration file.
    EncryptConfig(EncryptOpts),
    Config(ConfigOpts),
    Version,
}

#[derive(clap::Args)]
pub struct InvokeOpts {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Model index, display name or model id from the `models` section.
    #[arg(short, long)]
    pub model: Option<String>,
    #[arg(long, default_value = "system.txt")]
    pub system: PathBuf,
    #[arg(long, default_value = "prompt.txt")]
    pub prompt: PathBuf,
    #[arg(long, default_value = "user-query.txt")]
    pub query: PathBuf,
}

#[derive(clap::Args)]
pub struct EncryptOpts {
    #[arg(short, long)]
    pub source: Option<PathBuf>,
    #[arg(short, long)]
    pub destination: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ConfigOpts {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    Show {
        #[arg(long)]
        json: bool,
    },
    Validate,
    Models,
}

// ============================================================================
// Interactive prompts
// ============================================================================

fn render_config() -> RenderConfig<'static> {
    RenderConfig::default()
        .with_scroll_up_prefix(Styled::new("⇡"))
        .with_scroll_down_prefix(Styled::new("⇣"))
        .with_highlighted_option_prefix(Styled::new("➤"))
}

fn prompt_error(err: InquireError) -> Error {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            Error::Prompt("cancelled by operator".to_string())
        }
        other => Error::Prompt(other.to_string()),
    }
}

/// An empty answer means `default`.
pub fn answer_or_default(answer: &str, default: &str) -> PathBuf {
    let answer = answer.trim();
    if answer.is_empty() {
        PathBuf::from(default)
    } else {
        PathBuf::from(answer)
    }
}

/// `given`, or ask for a path. An empty answer means `default`.
pub fn path_or_prompt(given: Option<PathBuf>, message: &str, default: &str) -> Result<PathBuf> {
    if let Some(path) = given {
        return Ok(path);
    }
    let answer = Text::new(message)
        .with_render_config(render_config())
        .with_help_message(&format!("Leave empty for {default}"))
        .prompt()
        .map_err(prompt_error)?;
    Ok(answer_or_default(&answer, default))
}

/// `given`, or ask for a path with no default.
pub fn required_path_or_prompt(given: Option<PathBuf>, message: &str) -> Result<PathBuf> {
    if let Some(path) = given {
        return Ok(path);
    }
    let answer = Text::new(message)
        .with_render_config(render_config())
        .prompt()
        .map_err(prompt_error)?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(Error::InvalidSelection("a path is required".to_string()));
    }
    Ok(PathBuf::from(answer))
}

pub fn config_path_or_prompt(given: Option<PathBuf>) -> Result<PathBuf> {
    path_or_prompt(
        given,
        "Configuration file path including its name:",
        DEFAULT_CONFIG_PATH,
    )
}

/// Ask the operator to pick one of `models`.
pub fn prompt_model(models: &[ModelEntry]) -> Result<ModelEntry> {
    if models.is_empty() {
        return Err(Error::ModelsSectionMissing);
    }
    let options: Vec<String> = models
        .iter()
        .enumerate()
        .map(|(index, m)| format!("{index}: {}", m.name))
        .collect();
    let choice = Select::new("Select the model:", options)
        .with_render_config(render_config())
        .with_help_message("Use arrow keys to navigate, Enter to select")
        .raw_prompt()
        .map_err(prompt_error)?;
    models
        .get(choice.index)
        .cloned()
        .ok_or_else(|| Error::InvalidSelection(format!("model index {}", choice.index)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn invoke_defaults_to_prompt_files_in_working_directory() {
        let cli = Cli::parse_from(["bedrock-vault", "invoke", "--config", "c.properties", "-m", "0"]);
        match cli.command {
            Commands::Invoke(opts) => {
                assert_eq!(opts.config, Some(PathBuf::from("c.properties")));
                assert_eq!(opts.model.as_deref(), Some("0"));
                assert_eq!(opts.system, PathBuf::from("system.txt"));
                assert_eq!(opts.prompt, PathBuf::from("prompt.txt"));
                assert_eq!(opts.query, PathBuf::from("user-query.txt"));
            }
            _ => panic!("expected invoke"),
        }
    }

    #[test]
    fn global_log_options_follow_subcommand() {
        let cli = Cli::parse_from([
            "bedrock-vault",
            "config",
            "validate",
            "--log-file",
            "invoke.log",
            "--log-format",
            "json",
        ]);
        assert_eq!(cli.log_file, Some(PathBuf::from("invoke.log")));
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn encrypt_config_takes_both_paths() {
        let cli = Cli::parse_from(["bedrock-vault", "encrypt-config", "-s", "plain", "-d", "enc"]);
        assert!(matches!(
            cli.command,
            Commands::EncryptConfig(EncryptOpts { source: Some(_), destination: Some(_) })
        ));
    }

    #[test]
    fn empty_answer_uses_default_path() {
        assert_eq!(answer_or_default("  ", "config.properties"), PathBuf::from("config.properties"));
        assert_eq!(answer_or_default("other.ini", "config.properties"), PathBuf::from("other.ini"));
    }

    #[test]
    fn given_path_skips_the_prompt() {
        let path = config_path_or_prompt(Some(PathBuf::from("given.properties"))).unwrap();
        assert_eq!(path, PathBuf::from("given.properties"));
    }
}
