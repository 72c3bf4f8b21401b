// Copyright (c) 2025 - Cowboy AI, Inc.
//! Metabase Deploy
//!
//! Validates a component intent document and prints the resulting deployment
//! plan. With `--apply`, submits the plan to the provisioning engine over NATS.
//!
//! Usage:
//!
//! ```text
//! metabase-deploy <COMPONENT> <DOCUMENT> [--apply]
//! ```
//!
//! With `--apply`, engine settings are read from `METABASE_NATS_URL`,
//! `METABASE_NATS_CLIENT_NAME`, `METABASE_SUBJECT_ROOT` and
//! `METABASE_APPLY_TIMEOUT_SECS`.

use anyhow::{bail, Context, Result};
use clap::Parser;
use metabase_component::{
    config::{load_args, EngineSettings},
    ComponentConfig, ComponentName, DeploymentPlan, InvalidConfig, MetabaseArgs,
    MetabaseComponent, MetabaseError, NatsClient, NatsProvisioningEngine,
};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "metabase-deploy")]
#[command(about = "Plan and apply a self-hosted Metabase component")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Component name; prefixes every resource name
    component: String,

    /// JSON intent document in the component schema
    document: PathBuf,

    /// Submit the plan to the provisioning engine instead of printing it
    #[arg(long)]
    apply: bool,
}

fn report(invalid: &InvalidConfig) -> anyhow::Error {
    for violation in invalid.violations() {
        error!("{}", violation);
    }
    anyhow::anyhow!("{} configuration violation(s)", invalid.violations().len())
}

fn preview(name: &ComponentName, args: MetabaseArgs) -> Result<()> {
    if let Err(invalid) = InvalidConfig::check(args.validate()) {
        return Err(report(&invalid));
    }

    let config = ComponentConfig::try_from(args)?;
    let plan = DeploymentPlan::build(name, &config);
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

async fn apply(name: ComponentName, args: MetabaseArgs) -> Result<()> {
    let settings = EngineSettings::from_env()?;
    info!("Configuration loaded:");
    info!("  - NATS servers: {:?}", settings.nats.servers);
    info!("  - Subject root: {}", settings.subject_root);
    info!("  - Apply timeout: {}s", settings.apply_timeout.as_secs());

    info!("Connecting to NATS at {:?}", settings.nats.servers);
    let client = NatsClient::new(settings.nats.clone())
        .await
        .context("Failed to connect to NATS")?;

    let engine =
        NatsProvisioningEngine::new(client, settings.subject_root.clone(), settings.apply_timeout);
    let component = MetabaseComponent::new(name, engine);

    match component.deploy(args).await {
        Ok(deployment) => {
            info!("Deployment applied");
            println!("{}", serde_json::to_string_pretty(&deployment)?);
            Ok(())
        }
        Err(MetabaseError::InvalidConfig(invalid)) => Err(report(&invalid)),
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let name = match ComponentName::new(cli.component.as_str()) {
        Ok(name) => name,
        Err(rule) => bail!("invalid component name {:?}: {}", cli.component, rule),
    };
    let args = load_args(&cli.document).with_context(|| {
        format!("Failed to read intent document {}", cli.document.display())
    })?;

    if cli.apply {
        apply(name, args).await
    } else {
        preview(&name, args)
    }
}
