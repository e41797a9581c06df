use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use catalog_app::platform::{load_config, render, Deferred, Session};
use catalog_core::ApiKeyword;
use catalog_engine::{HtmlDocument, TimerHandle};
use clap::Parser;
use engine_logging::{engine_info, LogDestination};
use log::LevelFilter;
use serde_json::Value;

/// Replay a captured chat page and its intercepted responses through the
/// prompt catalog.
#[derive(Parser)]
#[command(name = "prompt-catalog", version)]
struct Cli {
    /// Captured HTML of the chat page.
    #[arg(long)]
    page: PathBuf,
    /// Intercepted JSON response bodies, applied in order.
    #[arg(long = "payload")]
    payloads: Vec<PathBuf>,
    /// Operation that produced the payloads.
    #[arg(long, default_value_t = ApiKeyword::ResolveDriveResource)]
    keyword: ApiKeyword,
    /// Request URL of the payloads; overrides `--keyword` and is ignored
    /// when it names no known operation.
    #[arg(long)]
    url: Option<String>,
    /// Engine config in RON.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Ids of turn elements to delete after the payloads are applied.
    #[arg(long = "remove")]
    removals: Vec<String>,
    /// Turn indices to navigate to, in order.
    #[arg(long = "navigate")]
    navigations: Vec<usize>,
    /// Write a markdown export of the conversation into this directory.
    #[arg(long)]
    export_dir: Option<PathBuf>,
    #[arg(long, default_value = "terminal")]
    log: LogDestination,
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    engine_logging::initialize(cli.log, cli.log_level);

    let config = load_config(cli.config.as_deref());
    let html = fs::read_to_string(&cli.page)
        .with_context(|| format!("reading page {:?}", cli.page))?;
    let doc = HtmlDocument::parse(&html, &config.selectors)?;
    engine_info!("Loaded {} turn element(s) from {:?}", doc.len(), cli.page);

    let timers = TimerHandle::<Deferred>::new().context("starting timer thread")?;
    let idle = config.validation_delay()
        + config.highlight.highlight_duration()
        + config.highlight.fade_duration();
    let export_requested = cli.export_dir.is_some();
    let mut session = Session::new(doc, timers, &config, cli.export_dir);

    session.on_toggle(Some(true));
    for path in &cli.payloads {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading payload {path:?}"))?;
        let payload: Value =
            serde_json::from_str(&text).with_context(|| format!("parsing payload {path:?}"))?;
        match &cli.url {
            Some(url) => session.on_intercepted(url, payload),
            None => session.on_payload(payload, cli.keyword.as_str()),
        }
    }

    for id in &cli.removals {
        session.mutate_document(|doc| doc.remove_turn(id));
    }
    session.drain_timers(idle);

    for &turn_index in &cli.navigations {
        session.on_activate(turn_index);
        session.drain_timers(idle);
    }

    if export_requested {
        session.on_export();
    }

    print!("{}", render(&session.view()));
    Ok(())
}
