use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;

use incident_extractor::api::{start_api_server, ApiContext};
use incident_extractor::config::{self, ExtractorConfig};
use incident_extractor::pipeline::preprocess::TextPreprocessor;
use incident_extractor::pipeline::structuring::{GenerationOptions, IncidentExtractor, OllamaClient};

fn main() -> anyhow::Result<()> {
    incident_extractor::init_tracing();

    let config = ExtractorConfig::from_env();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    tracing::info!(host = %config.ollama_host, model = %config.model, "Using Ollama backend");

    let llm = OllamaClient::new(
        &config.ollama_host,
        config.timeout_secs,
        GenerationOptions {
            temperature: config.temperature,
        },
    )
    .context("Failed to build Ollama client")?;

    // Requests carry their own reference date; this one only serves
    // direct library calls through `extract`.
    let preprocessor = TextPreprocessor::new(chrono::Local::now().naive_local());
    let extractor = Arc::new(IncidentExtractor::new(preprocessor, Box::new(llm), &config.model));

    match extractor.check_model() {
        Ok(true) => tracing::info!(model = %config.model, "Model available"),
        Ok(false) => tracing::warn!(
            model = %config.model,
            "Model not installed on Ollama; run `ollama pull {}`",
            config.model
        ),
        Err(e) => tracing::warn!(error = %e, "Could not query Ollama models"),
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    let result = runtime.block_on(serve(ApiContext::new(extractor.clone()), config.bind_addr));

    // The blocking HTTP client inside the extractor must be dropped outside the runtime.
    drop(runtime);
    drop(extractor);

    result
}

async fn serve(ctx: ApiContext, addr: SocketAddr) -> anyhow::Result<()> {
    let server = start_api_server(ctx, addr)
        .await
        .map_err(anyhow::Error::msg)?;
    tracing::info!(addr = %server.session.server_addr, "Listening for incident reports");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    server.shutdown_and_wait().await;
    Ok(())
}
