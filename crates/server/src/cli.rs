use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use leadlog_config::Settings;

/// Top-level CLI parser for the `leadlog` binary.
#[derive(Debug, Parser)]
#[command(name = "leadlog", version, about = "Customer message lead signals and chat logger")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Event log path (overrides storage.data_file)
    #[arg(short, long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Chat model (overrides llm.model)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Configuration environment, e.g. `production` (defaults to $LEADLOG_ENV)
    #[arg(short, long, global = true)]
    pub env: Option<String>,
}

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Chat with the support agent; every message is logged and scored.
    Chat,
    /// Print the dashboard summary of the event log.
    Summary(SummaryArgs),
    /// Serve the dashboard API over HTTP.
    Serve(ServeArgs),
}

#[derive(Clone, Debug, Default, Args)]
pub struct SummaryArgs {
    /// Comma-separated intents to include, e.g. `pricing,demo_request`
    #[arg(long)]
    pub intent: Option<String>,

    /// Comma-separated sentiments to include
    #[arg(long)]
    pub sentiment: Option<String>,

    /// Print JSON instead of text tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, Default, Args)]
pub struct ServeArgs {
    /// Bind host (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides server.port)
    #[arg(long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Apply flag overrides on top of loaded settings
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(path) = &self.data_file {
            settings.storage.data_file = path.display().to_string();
        }
        if let Some(model) = &self.model {
            settings.llm.model = model.clone();
        }
        if let Commands::Serve(args) = &self.command {
            if let Some(host) = &args.host {
                settings.server.host = host.clone();
            }
            if let Some(port) = args.port {
                settings.server.port = port;
            }
        }
    }
}
