// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// idvbridge — command-line harness for the verification SDK bridge.
//
// Entry point. Initialises logging, loads configuration, and runs one
// subcommand against the stub SDK and the production decode pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use idvbridge_core::config::data_dir;
use idvbridge_core::error::{BridgeError, Result};
use idvbridge_core::{BridgeConfig, ImageReference, SdkErrorKind, SdkResult};
use idvbridge_imaging::{AsyncDecodePipeline, SyncImageResolver};
use idvbridge_sdk::{ChannelPromise, StubScript, StubSdk, VerificationBridge};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "idvbridge")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding `config.json` (defaults to the user data dir)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Override the bundled resource directory
    #[arg(long)]
    resources: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a branding image and print its dimensions
    ResolveLogo {
        /// Reference kind
        #[arg(long, default_value = ImageReference::KIND_LOCAL_RESOURCE)]
        kind: String,
        /// Resource name or URI
        value: String,
    },
    /// Launch a session on the stub SDK and print the result map
    Launch {
        /// JSON file with the host configuration object
        file: PathBuf,
        /// Outcome the stub SDK reports
        #[arg(long, value_enum, default_value_t = Outcome::Done)]
        outcome: Outcome,
    },
    /// Print the constants exported to the host
    Constants,
    /// Print the effective bridge configuration
    Config {
        /// Also write it to the config directory
        #[arg(long)]
        write: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Outcome {
    Done,
    Canceled,
    Error,
    /// No result at all, as when the flow is torn down
    Dismissed,
}

impl Outcome {
    fn script(self) -> StubScript {
        let (result, cancelled_by_host) = match self {
            Outcome::Done => (Some(SdkResult::Done), false),
            Outcome::Canceled => (Some(SdkResult::Canceled), false),
            Outcome::Error => (Some(SdkResult::Error(SdkErrorKind::Unknown)), false),
            Outcome::Dismissed => (None, true),
        };
        StubScript {
            result,
            cancelled_by_host,
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config_dir = args.config_dir.unwrap_or_else(data_dir);
    let mut config = BridgeConfig::load_or_default(&config_dir);
    if let Some(resources) = args.resources {
        config.resource_dir = resources;
    }
    info!(config_dir = %config_dir.display(), "idvbridge starting");

    match args.command {
        Command::ResolveLogo { kind, value } => {
            let reference = ImageReference::from_parts(&kind, value)?;
            let resolver = SyncImageResolver::new(AsyncDecodePipeline::new(&config)?);
            let image = resolver.resolve(&reference)?;
            println!("{}x{}", image.width(), image.height());
        }
        Command::Launch { file, outcome } => {
            let host: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            let sdk = Arc::new(StubSdk::new(outcome.script()));
            let bridge = VerificationBridge::with_decode_pipeline(sdk, config)?;

            let (promise, receiver) = ChannelPromise::new();
            bridge.launch(&host, promise);
            let result = receiver
                .blocking_wait()
                .map_err(|rejection| BridgeError::Launch(rejection.to_string()))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Constants => {
            let constants = VerificationBridge::exported_constants();
            println!("{}", serde_json::to_string_pretty(&constants)?);
        }
        Command::Config { write } => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            if write {
                config.persist(&config_dir)?;
                info!(config_dir = %config_dir.display(), "configuration written");
            }
        }
    }

    Ok(())
}
