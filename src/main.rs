//! Entry point for the speech statistics service.
//!
//! Parses the CLI, wires up logging, then serves the evaluation API over
//! HTTP until interrupted.

use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use speech_stats::{api, evaluator::Evaluator, fetch::BasicClient, stats::StatsConfig};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "speech_stats")]
#[command(about = "HTTP service computing speech statistics from CSV sources", long_about = None)]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/speech_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("speech_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = StatsConfig::from_env();
    info!(
        target_year = config.target_year,
        target_topic = %config.target_topic,
        "statistics targets loaded"
    );

    let evaluator = Arc::new(Evaluator::new(BasicClient::new(), config));
    let app = api::router(evaluator);

    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "statistics server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
