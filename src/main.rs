use anyhow::Context;
use bedrock_vault::cli::{self, Cli, Commands, ConfigAction, ConfigOpts, EncryptOpts, InvokeOpts};
use bedrock_vault::config::{self, ConfigStore, DEFAULT_SECTION, KEY_REGION};
use bedrock_vault::credentials::{self, resolve_endpoint, StsRoleAssumptionService};
use bedrock_vault::runtime::{self, PromptFiles};
use bedrock_vault::{logging, provisioning, Error};
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if let Err(err) = logging::init(cli.log_file.as_deref(), cli.log_format) {
        eprintln!("error: {err}");
        return ExitCode::from(err.exit_code());
    }

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "Command failed");
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Exit status for a failure that reached the top level.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<Error>())
        .map(Error::exit_code)
        .unwrap_or(1)
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Invoke(opts) => invoke(opts).await,
        Commands::EncryptConfig(opts) => encrypt_config(opts),
        Commands::Config(opts) => manage_config(opts),
        Commands::Version => {
            println!("bedrock-vault {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn invoke(opts: InvokeOpts) -> anyhow::Result<()> {
    let config_path = cli::config_path_or_prompt(opts.config)?;
    let store = ConfigStore::open(&config_path)?;

    let endpoint_url = resolve_endpoint(&store).context("resolving the Bedrock endpoint")?;
    let region = store.get(DEFAULT_SECTION, KEY_REGION)?.to_string();
    let service = StsRoleAssumptionService::new(region);
    let target = credentials::resolve(&store, endpoint_url, &service)
        .await
        .context("resolving credentials")?;

    let models = store.list_models()?;
    let model = match opts.model {
        Some(choice) => runtime::select_model(&models, &choice)?.clone(),
        None => cli::prompt_model(&models)?,
    };
    info!(model_id = %model.model_id, "Model selected");

    let prompt = PromptFiles {
        system: opts.system,
        template: opts.prompt,
        content: opts.query,
    }
    .load()
    .context("assembling the prompt")?;

    let client = runtime::build_client(&target).await;
    println!("\nModel Selected: {}\n", model.model_id);
    runtime::invoke_model(&client, &model.model_id, &prompt, std::io::stdout()).await?;
    println!();
    Ok(())
}

fn encrypt_config(opts: EncryptOpts) -> anyhow::Result<()> {
    let source = cli::config_path_or_prompt(opts.source)?;
    let destination = cli::required_path_or_prompt(
        opts.destination,
        "Path for the encrypted configuration file:",
    )?;

    let report = provisioning::encrypt_config(&source, &destination)?;
    println!(
        "Encrypted {} into {}",
        report.encrypted_fields.join(", "),
        report.destination.display()
    );
    Ok(())
}

fn manage_config(opts: ConfigOpts) -> anyhow::Result<()> {
    let config_path = cli::config_path_or_prompt(opts.config)?;
    let store = ConfigStore::open(&config_path)?;

    match opts.action {
        ConfigAction::Show { json } => {
            if json {
                println!("{:#}", config::display_config_json(&store)?);
            } else {
                print!("{}", config::display_config(&store)?);
            }
        }
        ConfigAction::Validate => {
            config::validate_config_object(&store)?;
            println!("Configuration is valid");
        }
        ConfigAction::Models => {
            for (index, model) in store.list_models()?.iter().enumerate() {
                println!("{index}: {} ({})", model.name, model.model_id);
            }
        }
    }
    Ok(())
}
