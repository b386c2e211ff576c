//! RSVP Reader - command-line entry point
//!
//! Loads a plain text or Markdown file, plays it back one chunk at a time in
//! the terminal, and reports the reading position on exit so it can be
//! passed back with `--start`.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rsvp_common::config::TomlConfig;
use rsvp_common::events::PlayerEvent;
use rsvp_reader::ingest::{load_document, TokenizeOptions};
use rsvp_reader::terminal::{render_progress, render_word};
use rsvp_reader::ReaderEngine;
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for rsvp-reader
#[derive(Parser, Debug)]
#[command(name = "rsvp-reader")]
#[command(about = "Speed reader: one word at a time, eyes still")]
#[command(version)]
struct Args {
    /// Document to read (.txt or .md)
    file: PathBuf,

    /// Reading rate in words per minute (50-1500)
    #[arg(short, long, env = "RSVP_WPM")]
    wpm: Option<i64>,

    /// Words shown at once (1-3)
    #[arg(short, long, env = "RSVP_CHUNK_SIZE")]
    chunk_size: Option<i64>,

    /// Word index to start from (e.g. a saved position)
    #[arg(short, long, default_value = "0")]
    start: usize,

    /// Pause longer at paragraph breaks
    #[arg(long)]
    mark_paragraphs: bool,

    /// Print events as JSON lines instead of rendering words
    #[arg(long)]
    json: bool,

    /// Config file (defaults to $RSVP_CONFIG or the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let file_config = TomlConfig::load(args.config.as_deref()).context("Failed to load config")?;

    // Initialize tracing on stderr; stdout carries the reader output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("rsvp_reader={0},rsvp_common={0}", file_config.logging.level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = file_config.reader_config();
    if let Some(wpm) = args.wpm {
        config.set_rate(wpm);
    }
    if let Some(chunk_size) = args.chunk_size {
        config.set_chunk_size(chunk_size);
    }
    info!(
        "Reading {} at {} wpm, {} word(s) per chunk",
        args.file.display(),
        config.rate(),
        config.chunk_size()
    );

    let options = TokenizeOptions {
        mark_paragraphs: args.mark_paragraphs,
    };
    let words = load_document(&args.file, options)
        .await
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    if words.is_empty() {
        warn!("{} contains no words", args.file.display());
        return Ok(());
    }

    let engine = Arc::new(ReaderEngine::new(config).context("Failed to create reader engine")?);
    let mut events = engine.subscribe_events();

    engine.load(words, args.start);
    engine.play();

    let interrupted = tokio::select! {
        result = render_events(&mut events, args.json) => {
            result?;
            false
        }
        _ = shutdown_signal() => {
            engine.pause();
            true
        }
    };

    if !args.json {
        println!();
    }
    let progress = engine.progress();
    if interrupted {
        info!(
            "Paused at word {} of {} (resume with --start {})",
            progress.current, progress.total, progress.current
        );
    } else {
        info!("Finished {} words", progress.total);
    }
    Ok(())
}

/// Draw events until playback ends
async fn render_events(
    events: &mut tokio::sync::broadcast::Receiver<PlayerEvent>,
    json: bool,
) -> Result<()> {
    let mut stdout = std::io::stdout();
    let mut line = String::new();

    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                warn!("Renderer fell behind, skipped {} events", skipped);
                continue;
            }
            Err(RecvError::Closed) => return Ok(()),
        };

        if json {
            writeln!(stdout, "{}", serde_json::to_string(&event)?)?;
        } else {
            // Every word event is followed by its progress event
            match &event {
                PlayerEvent::Word(word) => line = render_word(word, true),
                PlayerEvent::Progress(progress) => {
                    write!(stdout, "\r\x1b[2K{}    {}", line, render_progress(progress))?;
                    stdout.flush()?;
                }
                _ => {}
            }
        }

        if matches!(event, PlayerEvent::End { .. }) {
            return Ok(());
        }
    }
}

/// Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, pausing");
        },
        _ = terminate => {
            info!("Received terminate signal, pausing");
        },
    }
}
