use anyhow::{bail, Context};
use clap::Parser;
use http_bridge::HttpBridge;
use log::info;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use votecore::loader::{load_all, LoadOutcome};
use votecore::telemetry::LogManager;
use votecore::SourceKind;
use workflow::catalog::{Catalog, ConfiguredSource};
use workflow::config::PublisherConfig;

mod generator;
mod http_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Election document publisher")]
struct Args {
    /// Load publisher settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Address to listen on, overriding the config file
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Seed for synthetic results
    #[arg(long)]
    seed: Option<u64>,
    /// Serve jittered results generated from the configured table
    #[arg(long, default_value_t = false)]
    synthesize: bool,
    /// Load and audit every document, then exit
    #[arg(long, default_value_t = false)]
    check: bool,
    /// Write the three documents into this directory and exit
    #[arg(long)]
    export: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PublisherConfig::load(path)?,
        None => PublisherConfig::default(),
    };
    config.apply_overrides(args.bind, args.seed, args.synthesize);

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating publisher runtime")?;

    runtime.block_on(async {
        let outcome = load(&config).await;

        if args.check {
            return check(&outcome);
        }

        let catalog = Catalog::from_outcome(outcome);
        if let Some(dir) = &args.export {
            return export(&catalog, dir);
        }

        serve(config, catalog).await
    })
}

async fn load(config: &PublisherConfig) -> LoadOutcome {
    let outcome = load_all(&ConfiguredSource::new(config.clone())).await;
    outcome.log(&LogManager::with_target("publisher"));
    outcome
}

fn check(outcome: &LoadOutcome) -> anyhow::Result<()> {
    let failures = outcome.failures();
    if !failures.is_empty() {
        let summary: Vec<String> = failures
            .iter()
            .map(|(kind, err)| format!("{}: {}", kind.document_name(), err))
            .collect();
        bail!(
            "{} of 3 documents failed to load: {}",
            failures.len(),
            summary.join("; ")
        );
    }
    println!("All 3 documents loaded.");
    Ok(())
}

fn export(catalog: &Catalog, dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating export dir {}", dir.display()))?;
    for kind in SourceKind::ALL {
        let document = match catalog.document(kind) {
            Ok(document) => document,
            Err(reason) => bail!("cannot export {}: {}", kind.document_name(), reason),
        };
        let path = dir.join(kind.document_name());
        let text = serde_json::to_string_pretty(document)
            .with_context(|| format!("encoding {}", kind.document_name()))?;
        fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        info!("exported {}", path.display());
    }
    Ok(())
}

async fn serve(config: PublisherConfig, catalog: Catalog) -> anyhow::Result<()> {
    let bridge = Arc::new(HttpBridge::new(catalog));
    let shutdown = async {
        if let Err(err) = signal::ctrl_c().await {
            log::error!("awaiting Ctrl+C failed: {err}");
        }
    };
    let (addr, server) = bridge.serve(config.bind, shutdown)?;
    info!("HTTP bridge listening on http://{addr} (Ctrl+C to stop)");

    if let Some(secs) = config.refresh_secs.filter(|&secs| secs > 0) {
        let bridge = bridge.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(secs));
            ticker.tick().await;
            for round in 1u64.. {
                ticker.tick().await;
                let outcome = load(&config.for_round(round)).await;
                bridge.publish(Catalog::from_outcome(outcome));
            }
        });
    }

    server.await;
    info!("HTTP bridge stopped");
    Ok(())
}
