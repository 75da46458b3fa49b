//! Advisor Zen Tools server binary.
//!
//! Loads configuration, installs logging, wires the tool registry to its
//! adapters and serves the tool-call HTTP surface until Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use advisor_zen_tools::adapters::http::{workflow_router, WorkflowAppState};
use advisor_zen_tools::adapters::{
    AnthropicAnalystConfig, AnthropicExpertAnalyst, FileEvidenceSource,
    InMemoryInvestigationRepository, MockExpertAnalyst,
};
use advisor_zen_tools::application::handlers::workflow::{
    CallToolHandler, GetInvestigationHandler, ListToolsHandler, ResolveExpertHandler,
    SubmitStepHandler,
};
use advisor_zen_tools::config::{AppConfig, ExpertConfig, ExpertProvider, ServerConfig};
use advisor_zen_tools::domain::tools::catalog;
use advisor_zen_tools::ports::{ExpertAnalyst, InvestigationRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_logging(&config.server);
    config.validate()?;

    let state = build_state(&config)?;
    let app = workflow_router(state)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        expert_provider = ?config.expert.provider,
        auto_expert = config.workflow.auto_expert,
        "Advisor Zen tools listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_logging(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if server.json_logs() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

fn build_state(config: &AppConfig) -> Result<WorkflowAppState, Box<dyn std::error::Error>> {
    let registry = Arc::new(catalog::default_registry());
    let repository: Arc<dyn InvestigationRepository> = Arc::new(
        InMemoryInvestigationRepository::new()
            .with_retired_capacity(config.workflow.retired_capacity),
    );

    let submit = Arc::new(
        SubmitStepHandler::new(registry.clone(), repository.clone())
            .with_max_total_steps(config.workflow.max_total_steps),
    );
    let resolve = Arc::new(ResolveExpertHandler::new(repository.clone()));

    let evidence = FileEvidenceSource::new(config.evidence.root.clone())
        .with_max_file_bytes(config.evidence.max_file_bytes);
    let mut call_tool = CallToolHandler::new(registry.clone(), submit, resolve.clone())
        .with_evidence(Arc::new(evidence));
    if config.workflow.auto_expert {
        call_tool = call_tool
            .with_auto_expert(build_analyst(&config.expert)?)
            .with_expert_timeout(config.workflow.expert_timeout());
    }

    Ok(WorkflowAppState {
        list_tools: Arc::new(ListToolsHandler::new(registry)),
        call_tool: Arc::new(call_tool),
        resolve_expert: resolve,
        get_investigation: Arc::new(GetInvestigationHandler::new(repository)),
    })
}

fn build_analyst(config: &ExpertConfig) -> Result<Arc<dyn ExpertAnalyst>, Box<dyn std::error::Error>> {
    match (&config.provider, &config.anthropic_api_key) {
        (ExpertProvider::Anthropic, Some(key)) => {
            let analyst_config = AnthropicAnalystConfig::from_secret(key.clone())
                .with_model(config.model.clone())
                .with_base_url(config.base_url.clone())
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries);
            Ok(Arc::new(AnthropicExpertAnalyst::new(analyst_config)?))
        }
        (ExpertProvider::Anthropic, None) => {
            Err("expert.provider is anthropic but no API key is configured".into())
        }
        (ExpertProvider::Mock, _) => {
            tracing::warn!("Using mock expert analyst; verdicts are canned");
            Ok(Arc::new(MockExpertAnalyst::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
