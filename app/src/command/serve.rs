use crate::command::CommandStrategy;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use yubot_config::Config;
use yubot_core::ReplyEngine;
use yubot_http::AppState;
use yubot_providers::RetrievalProvider;

/// Input for the HTTP transport command.
pub struct ServeInput {
    /// Optional bind address (overrides config)
    pub bind: Option<String>,
}

/// Strategy for running the HTTP transport.
pub struct ServeStrategy;

impl CommandStrategy for ServeStrategy {
    type Input = ServeInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        let engine: Arc<dyn ReplyEngine> = Arc::new(RetrievalProvider::new(
            config.engine.base_url.clone(),
            Duration::from_secs(config.engine.timeout_secs),
        )?);

        let bind = input.bind.unwrap_or(config.http.bind_addr);
        info!("Starting HTTP transport on {bind}");

        yubot_http::serve(Arc::new(AppState { engine }), &bind).await
    }
}
