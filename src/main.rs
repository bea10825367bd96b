//! realm-sources: command-line harness around the source registry.
//!
//! Loads the YAML config, builds the registry once, freezes it behind an
//! `Arc`, and hands it to whichever command was asked for.

mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use realm_sources::{aggregate, poll, Config, PollMsg, RecordFeed, SourceRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output on stdout stays clean.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    let config = Config::load(&cli.config)
        .with_context(|| format!("couldn't load {}", cli.config.display()))?;
    let registry = Arc::new(config.build_registry());

    match cli.command {
        Commands::List => list(&registry),
        Commands::Choices { realm } => choices(&registry, &realm),
        Commands::Fetch { realm } => fetch(registry, realm).await,
        Commands::Watch { realms, interval } => {
            let interval = interval
                .map(|secs| Duration::from_secs(secs.max(1)))
                .unwrap_or_else(|| config.poll_interval());
            watch(registry, realms, interval).await
        }
    }
}

fn list(registry: &SourceRegistry) -> Result<()> {
    if registry.is_empty() {
        println!("No sources configured.");
        return Ok(());
    }

    println!("{:<12} {:<16} {:<32} {}", "REALM", "ALIAS", "TITLE", "ACTIVE");
    for realm in registry.realms() {
        for (alias, source) in registry.sources(realm).iter() {
            let active = if source.active() { "yes" } else { "no" };
            println!("{realm:<12} {alias:<16} {:<32} {active}", source.title());
        }
    }
    Ok(())
}

fn choices(registry: &SourceRegistry, realm: &str) -> Result<()> {
    let choices = registry.choices(realm)?;
    if choices.is_empty() {
        println!("No sources registered for realm `{realm}`.");
    }
    for choice in &choices {
        println!("{:<16} {}", choice.value, choice.label);
    }
    Ok(())
}

async fn fetch(registry: Arc<SourceRegistry>, realm: String) -> Result<()> {
    // Source I/O is blocking; keep it off the async workers.
    let harvest = tokio::task::spawn_blocking(move || aggregate::harvest(&registry, &realm))
        .await
        .context("fetch task panicked")?;

    let mut feed = RecordFeed::new();
    feed.merge(harvest.records);
    for record in feed.records() {
        println!("{record}");
    }

    for failure in &harvest.failures {
        eprintln!("Error: {}: {}", failure.alias, failure.message);
    }
    println!("Fetched {} records for `{}`", feed.len(), harvest.realm);
    Ok(())
}

async fn watch(registry: Arc<SourceRegistry>, realms: Vec<String>, interval: Duration) -> Result<()> {
    let realms = if realms.is_empty() {
        registry.realms().map(String::from).collect()
    } else {
        realms
    };

    for realm in &realms {
        if !registry.sources(realm).has_active() {
            tracing::warn!(realm = %realm, "no active sources registered for realm, nothing to poll");
        }
    }

    let mut rx = poll::spawn(registry, realms, interval);
    let mut feed = RecordFeed::new();

    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Some(PollMsg::Records { realm, alias, records }) => {
                    let fetched = records.len();
                    let mut added = 0;
                    for record in records {
                        let line = record.to_string();
                        if feed.insert(record) {
                            println!("{line}");
                            added += 1;
                        }
                    }
                    tracing::info!(realm = %realm, alias = %alias, fetched, added, "poll results");
                }
                Some(PollMsg::Error { realm, alias, message }) => {
                    eprintln!("Error: {realm}/{alias}: {message}");
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}
