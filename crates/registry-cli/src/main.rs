use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use registry_core::domain::{ArtifactId, GroupId, NewGroup, NewVersion, RuleConfig, RuleId, VersionId};
use registry_core::impls::InMemoryRegistryStorage;
use registry_core::ports::RegistryStorage;
use registry_core::{ArtifactType, ConfigError, ErrorResponse, RegistryConfig, RegistryError};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "registry", version, about = "Artifact registry storage tools")]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every known artifact type token.
    Types,

    /// Validate an artifact type token.
    Parse { token: String },

    /// Look up a group, an artifact or a version in the demo storage.
    Lookup {
        #[arg(long)]
        group: String,

        #[arg(long)]
        artifact: Option<String>,

        #[arg(long, requires = "artifact")]
        version: Option<String>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),

    #[error("failed to seed demo storage: {0}")]
    Seed(#[source] RegistryError),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// demo 用の in-memory storage を用意する
async fn seed(storage: &InMemoryRegistryStorage) -> Result<(), RegistryError> {
    storage
        .create_group(NewGroup::new("default").with_description("Default group"))
        .await?;
    storage
        .create_version(NewVersion::new("default", "orders", "1", ArtifactType::Avro))
        .await?;
    storage
        .create_version(NewVersion::new("default", "orders", "2", ArtifactType::Avro))
        .await?;

    storage.create_group(NewGroup::new("apis")).await?;
    storage
        .create_version(
            NewVersion::new("apis", "petstore", "1.0.0", ArtifactType::OpenApi).with_name("Petstore"),
        )
        .await?;
    storage
        .create_version(NewVersion::new("apis", "events", "1", ArtifactType::AsyncApi))
        .await?;

    storage
        .create_rule(RuleConfig {
            rule_id: RuleId::new("VALIDITY"),
            configuration: "FULL".to_string(),
        })
        .await?;
    Ok(())
}

async fn lookup(
    storage: &InMemoryRegistryStorage,
    group: String,
    artifact: Option<String>,
    version: Option<String>,
) -> Result<serde_json::Value, RegistryError> {
    let group = GroupId::new(group);
    let value = match (artifact, version) {
        (None, _) => serde_json::to_value(storage.get_group(&group).await?)?,
        (Some(artifact), None) => {
            let artifact = ArtifactId::new(artifact);
            serde_json::to_value(storage.get_latest_version(&group, &artifact).await?)?
        }
        (Some(artifact), Some(version)) => {
            let artifact = ArtifactId::new(artifact);
            let version = VersionId::new(version);
            serde_json::to_value(storage.get_version(&group, &artifact, &version).await?)?
        }
    };
    Ok(value)
}

fn print_error(err: &RegistryError) -> Result<ExitCode, CliError> {
    let body = ErrorResponse::from(err);
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(ExitCode::FAILURE)
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let config = match &cli.config {
        Some(path) => RegistryConfig::load(path)?,
        None => RegistryConfig::default(),
    };

    match cli.command {
        Command::Types => {
            for token in ArtifactType::tokens() {
                println!("{token}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Parse { token } => match ArtifactType::parse(&token) {
            Ok(artifact_type) => {
                println!("{artifact_type}");
                Ok(ExitCode::SUCCESS)
            }
            Err(invalid) => print_error(&invalid.into()),
        },
        Command::Lookup {
            group,
            artifact,
            version,
        } => {
            let storage = InMemoryRegistryStorage::new()
                .with_retry_policy(config.storage.read_retry.to_policy());
            seed(&storage).await.map_err(CliError::Seed)?;

            match lookup(&storage, group, artifact, version).await {
                Ok(record) => {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => print_error(&err),
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "registry command failed");
            ExitCode::FAILURE
        }
    }
}
