//! advisor-server: chat API for the academic scheduling assistant.
//!
//! Serves session management, blocking chat and SSE-streamed chat over
//! HTTP. The caller's bearer token is passed through to the scheduling
//! backend whenever the model uses a tool.

mod auth;
mod cli;
mod error;
mod protocol;
mod routes;
mod state;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use advisor_ai::prompt::load_system_prompt;
use advisor_ai::tools::schedule_tools;
use advisor_ai::{
    GeminiClient, GeminiConfig, HistoryStore, HttpScheduleBackend, MemoryStore, Orchestrator,
    RedisStore, SessionLimits, SessionService,
};
use advisor_common::AdvisorError;
use advisor_config::AdvisorConfig;

use crate::cli::Args;
use crate::state::AppState;

/// Read `KEY=value` lines from `.env` without overriding variables that
/// are already set.
fn load_dotenv() {
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return;
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}

fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn open_store(config: &AdvisorConfig) -> Result<Arc<dyn HistoryStore>, AdvisorError> {
    match &config.session.redis_url {
        Some(url) => {
            let store = RedisStore::connect(url)
                .await
                .map_err(|e| AdvisorError::Network(e.to_string()))?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("session.redis_url unset, histories are kept in memory");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn build_service(config: &AdvisorConfig) -> Result<SessionService, AdvisorError> {
    let model = GeminiClient::new(
        GeminiConfig::new(config.model.api_key.clone())
            .with_model(config.model.name.clone())
            .with_max_tokens(config.model.max_tokens)
            .with_temperature(config.model.temperature),
    )
    .map_err(|e| AdvisorError::Ai(e.to_string()))?;

    let backend = HttpScheduleBackend::new(&config.backend.url)
        .map_err(|e| AdvisorError::Network(e.to_string()))?;
    let tools = schedule_tools(Arc::new(backend));
    let prompt = load_system_prompt(config.model.system_prompt_file.as_deref())?;

    let orchestrator =
        Orchestrator::new(Arc::new(model), Arc::new(tools)).with_system_instruction(prompt);
    let service = SessionService::new(open_store(config).await?, orchestrator).with_limits(
        SessionLimits {
            max_rounds: config.chat.max_rounds,
            max_stream_rounds: config.chat.max_stream_rounds,
            ttl: config.session.ttl(),
        },
    );

    Ok(if config.chat.serialize_sessions {
        service.with_serialized_sessions()
    } else {
        service
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn run(args: Args) -> advisor_common::Result<()> {
    let mut config = advisor_config::load_config(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    init_tracing(args.log_level.as_deref().unwrap_or(&config.logging.level));
    tracing::info!("advisor-server v{} starting", env!("CARGO_PKG_VERSION"));

    advisor_config::require_model_credential(&config)?;
    let state = AppState::new(build_service(&config).await?);

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        %addr,
        model = %config.model.name,
        backend = %config.backend.url,
        "listening"
    );

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "advisor-server stopped");
            eprintln!("advisor-server: {e}");
            ExitCode::FAILURE
        }
    }
}
