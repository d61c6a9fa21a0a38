//! leadlog entry point

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use leadlog_agent::{summarize, ChatSession, EventFilter, IngestionPipeline};
use leadlog_config::{load_settings, Settings};
use leadlog_llm::{LlmBackend, LlmConfig, OllamaBackend};
use leadlog_persistence::{EventStore, JsonFileEventStore};
use leadlog_server::cli::SummaryArgs;
use leadlog_server::{
    create_router, init_metrics, init_metrics_listener, run_repl, AppState, Cli, Commands,
    SummaryReport,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Priority: flags > env vars > config/{env} > config/default > defaults
    let env = cli.env.clone().or_else(|| std::env::var("LEADLOG_ENV").ok());
    let mut config = load_settings(env.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    let log_level = match cli.command {
        Commands::Chat => &config.observability.chat_log_level,
        _ => &config.observability.log_level,
    };
    init_tracing(&config, log_level);
    tracing::debug!(
        environment = ?config.environment,
        config_env = env.as_deref().unwrap_or("default"),
        data_file = %config.storage.data_file,
        "Configuration loaded"
    );

    let store: Arc<dyn EventStore> = Arc::new(JsonFileEventStore::new(&config.storage.data_file));

    match &cli.command {
        Commands::Chat => run_chat(&config, store).await,
        Commands::Summary(args) => print_summary(args, store).await,
        Commands::Serve(_) => serve(config, store).await,
    }
}

fn build_backend(config: &Settings) -> anyhow::Result<Arc<dyn LlmBackend>> {
    let backend = OllamaBackend::new(LlmConfig::from(&config.llm))
        .context("Failed to create chat backend")?;
    Ok(Arc::new(backend))
}

async fn run_chat(config: &Settings, store: Arc<dyn EventStore>) -> anyhow::Result<()> {
    if config.observability.metrics_enabled {
        let addr = SocketAddr::from(([127, 0, 0, 1], config.observability.metrics_port));
        // A busy port must not keep the chat from starting
        match init_metrics_listener(addr) {
            Ok(()) => tracing::info!("Serving Prometheus metrics on {}", addr),
            Err(e) => tracing::warn!(error = %e, "Metrics exporter not started"),
        }
    }

    let backend = build_backend(config)?;
    let mut session = ChatSession::new(
        IngestionPipeline::new(store),
        backend,
        config.chat.system_prompt.clone(),
    );

    run_repl(&mut session, BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("Chat stopped")?;
    Ok(())
}

async fn print_summary(args: &SummaryArgs, store: Arc<dyn EventStore>) -> anyhow::Result<()> {
    let filter = EventFilter::parse(args.intent.as_deref(), args.sentiment.as_deref())?;
    let summary = summarize(&store.load().await, &filter);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", SummaryReport(&summary));
    }
    Ok(())
}

async fn serve(config: Settings, store: Arc<dyn EventStore>) -> anyhow::Result<()> {
    tracing::info!("Starting leadlog dashboard API v{}", env!("CARGO_PKG_VERSION"));

    let backend = build_backend(&config)?;
    let metrics_enabled = config.observability.metrics_enabled;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server bind address")?;

    let mut state = AppState::new(config, store).with_backend(backend);
    if metrics_enabled {
        state = state.with_metrics(init_metrics()?);
        tracing::info!("Initialized Prometheus metrics at /metrics");
    }

    let app = create_router(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

/// Initialize tracing on stderr.
///
/// Chat mode passes the quieter `chat_log_level`, so by default only warnings
/// share the terminal with the transcript. `RUST_LOG` overrides both levels.
fn init_tracing(config: &Settings, level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("leadlog={},tower_http=debug", level).into());

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stderr).boxed()
    };
    subscriber.with(fmt_layer).init();
}
