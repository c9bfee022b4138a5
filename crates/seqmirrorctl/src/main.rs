use anyhow::Result;
use clap::{Parser, Subcommand};
use seqmirror_client::{HttpSequencerApi, PollingEngine};
use seqmirror_core::{Container, SequenceItem, Snapshot};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "seqmirrorctl", version, about = "Mirror and inspect an imaging-sequence controller")]
struct Cli {
    /// Controller base URL, e.g. http://127.0.0.1:1888
    #[arg(long, default_value = "http://127.0.0.1:1888")]
    backend_url: String,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Run one sync cycle and print the snapshot summary.
    Status {
        /// Print the full snapshot as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },
    /// Poll continuously, printing a summary line per tick, until Ctrl-C.
    Watch {
        /// Poll interval in milliseconds.
        #[arg(long, default_value_t = 2000)]
        interval_ms: u64,
    },
    /// Run one sync cycle and print the addressed sequence tree.
    Sequence,
    /// Fetch a sequence image by history index and print it as a data URL.
    Image {
        #[arg(long)]
        index: u32,
        #[arg(long, default_value_t = 80)]
        quality: u8,
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let api = Arc::new(HttpSequencerApi::new(&cli.backend_url));
    let engine = PollingEngine::new(api);

    match cli.cmd {
        Cmd::Status { json } => {
            engine.sync_once().await;
            let snap = engine.snapshot().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&snap)?);
            } else {
                print_summary(&snap);
            }
        }
        Cmd::Watch { interval_ms } => {
            info!("watching {} every {interval_ms}ms", cli.backend_url);
            let handle = engine.start(Duration::from_millis(interval_ms));
            let mut tick = tokio::time::interval(Duration::from_millis(interval_ms));
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    _ = tick.tick() => print_summary(&engine.snapshot().await),
                }
            }
            info!("stopping");
            handle.shutdown().await;
        }
        Cmd::Sequence => {
            engine.sync_once().await;
            let snap = engine.snapshot().await;
            if !snap.sequence_is_loaded {
                println!("no sequence loaded");
                return Ok(());
            }
            for container in &snap.sequence_tree {
                print_container(container);
            }
        }
        Cmd::Image {
            index,
            quality,
            scale,
        } => {
            let image = engine.image_by_index(index, quality, scale).await?;
            println!("{image}");
        }
    }

    Ok(())
}

fn print_summary(snap: &Snapshot) {
    if !snap.backend_reachable {
        println!("backend unreachable");
        return;
    }
    if !snap.version_compatible {
        println!("backend version incompatible");
        return;
    }
    println!(
        "api={} sequence_loaded={} running={} equipment={}",
        snap.current_api_version.as_deref().unwrap_or("?"),
        snap.sequence_is_loaded,
        snap.sequence_running,
        snap.existing_equipment_list
            .iter()
            .map(|e| e.api_name.as_str())
            .collect::<Vec<_>>()
            .join(","),
    );
}

fn print_container(container: &Container) {
    println!(
        "{} {}",
        container.path.as_deref().unwrap_or("?"),
        container.name.as_deref().unwrap_or("")
    );
    for trigger in &container.global_triggers {
        println!(
            "  {} {}",
            trigger.path.as_deref().unwrap_or("?"),
            trigger.name.as_deref().unwrap_or("")
        );
    }
    for item in &container.items {
        print_item(item, 1);
    }
}

fn print_item(item: &SequenceItem, depth: usize) {
    let indent = "  ".repeat(depth);
    println!(
        "{indent}{} {} [{}]",
        item.path.as_deref().unwrap_or("?"),
        item.name.as_deref().unwrap_or(""),
        item.status.as_deref().unwrap_or("-")
    );
    for node in item.triggers.iter().chain(&item.conditions) {
        println!(
            "{indent}  {} {}",
            node.path.as_deref().unwrap_or("?"),
            node.name.as_deref().unwrap_or("")
        );
    }
    for child in &item.items {
        print_item(child, depth + 1);
    }
}
