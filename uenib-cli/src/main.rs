//! UE-NIB event reader
//!
//! Subscribes to the events of the configured gNBs and, for every UE named in
//! a dual connectivity add or tunnel event, runs the full set of UE-NIB
//! queries and logs the results.
//!
//! The reader runs on an in-memory backend seeded from the `data` section of
//! the configuration. Events are typed on stdin and published on the event
//! channel of their gNB:
//!
//! ```bash
//! uenib-event-reader -c config/event-reader.yaml
//! somegnb:310-410-b5c67788#200#100_10.20.30.40#1999_S1UL_TUNNEL_ESTABLISH
//! ```

mod input;
mod queries;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use uenib_common::{
    init_logging, init_logging_with_filter, log_event_batch, LogLevel, ReaderConfig,
};
use uenib_reader::{event_channel, DcNotification, EventCategory, MemoryBackend, Reader};

use input::parse_input_line;
use queries::{run_ue_queries, triggers_queries};

/// uenib-event-reader - UE-NIB dual connectivity event reader
#[derive(Parser, Debug)]
#[command(name = "uenib-event-reader")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the reader configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config_file: String,

    /// Log level, overrides the configuration
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL")]
    log_level: Option<LogLevel>,
}

/// Event reader state
struct EventReaderApp {
    config: ReaderConfig,
    backend: Arc<MemoryBackend>,
    reader: Reader,
    dc_rx: mpsc::UnboundedReceiver<DcNotification>,
    queries: JoinSet<()>,
}

impl EventReaderApp {
    /// Creates the backend and the reader and subscribes to all events
    fn new(config: ReaderConfig) -> Result<Self> {
        let categories = config
            .categories
            .iter()
            .map(|name| name.parse::<EventCategory>())
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid event category in configuration")?;

        let backend = Arc::new(MemoryBackend::with_values(config.data.clone()));
        info!("UE-NIB snapshot loaded: {} key(s)", config.data.len());
        let reader = Reader::new(backend.clone());

        reader
            .subscribe_events(&config.gnbs, &categories, |gnb, category, events| {
                log_event_batch(&format!("{gnb}_{category}"), events);
            })
            .context("Failed to subscribe to UE-NIB events")?;
        let dc_rx = reader
            .dc_event_channel(&config.gnbs)
            .context("Failed to subscribe to dual connectivity events")?;
        info!(
            "Subscribed to {} gNB(s), categories: {}",
            config.gnbs.len(),
            config.categories.join(",")
        );

        Ok(Self {
            config,
            backend,
            reader,
            dc_rx,
            queries: JoinSet::new(),
        })
    }

    /// Runs until stdin is closed or Ctrl+C
    async fn run(&mut self) -> Result<()> {
        info!("Event reader started, reading events from stdin...");
        let mut lines = BufReader::new(io::stdin()).lines();

        loop {
            tokio::select! {
                biased;
                Some(notification) = self.dc_rx.recv() => {
                    self.handle_notification(notification);
                }
                _ = signal::ctrl_c() => {
                    info!("Received Ctrl+C, initiating shutdown...");
                    break;
                }
                line = lines.next_line() => {
                    match line.context("Failed to read stdin")? {
                        Some(line) => self.publish_line(&line),
                        None => {
                            info!("End of input");
                            break;
                        }
                    }
                }
            }
        }

        while let Ok(notification) = self.dc_rx.try_recv() {
            self.handle_notification(notification);
        }
        Ok(())
    }

    fn publish_line(&self, line: &str) {
        let Some(input) = parse_input_line(line, &self.config.gnbs[0]) else {
            return;
        };
        let Some(channel) = event_channel(&input.gnb, EventCategory::DualConnectivity) else {
            return;
        };

        match self.backend.publish(&channel, &[input.event]) {
            Ok(0) => warn!("No subscriber on channel {}", channel),
            Ok(_) => {}
            Err(e) => error!("Failed to publish on {}: {}", channel, e),
        }
    }

    fn handle_notification(&mut self, notification: DcNotification) {
        let event_type = notification.event.event_type;
        let Some(ue_id) = notification.event.ue_id else {
            info!(gnb = %notification.gnb, "{} event", event_type);
            return;
        };
        if !triggers_queries(event_type) {
            info!(gnb = %notification.gnb, "{} event for {}", event_type, ue_id);
            return;
        }

        let reader = self.reader.clone();
        self.queries.spawn_blocking(move || {
            run_ue_queries(&reader, &ue_id, event_type);
        });
    }

    /// Waits for running queries and closes the reader
    async fn shutdown(mut self) -> Result<()> {
        info!("Waiting for {} query set(s)...", self.queries.len());
        while let Some(result) = self.queries.join_next().await {
            if let Err(e) = result {
                warn!("Query task failed: {}", e);
            }
        }

        self.reader.close().context("Failed to close UE-NIB reader")?;
        Ok(())
    }
}

fn load_config(path: &str) -> Result<ReaderConfig> {
    let config = ReaderConfig::from_yaml_file(path)
        .with_context(|| format!("Failed to load configuration from {path}"))?;
    config
        .validate()
        .with_context(|| format!("Invalid configuration in {path}"))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run_event_reader(args).await {
        Ok(()) => {
            info!("Event reader exited successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Event reader failed: {:#}", e);
            eprintln!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_event_reader(args: Args) -> Result<()> {
    let config = load_config(&args.config_file)?;
    match args.log_level {
        Some(level) => init_logging(level),
        None => init_logging_with_filter(&config.filter_directive()),
    }
    info!("Configuration loaded from {}", args.config_file);

    let mut app = EventReaderApp::new(config)?;
    app.run().await?;
    app.shutdown().await
}
