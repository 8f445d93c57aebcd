use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use common::{config::AppConfig, logging};
use gh_transport::{AccessToken, ReqwestExecutor};
use ingestor::HttpGithubClient;
use prebuild::Pipeline;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging("info");
    let config = AppConfig::load()?;

    let exec = Arc::new(
        ReqwestExecutor::new(
            &config.github.user_agent,
            Duration::from_secs(config.github.timeout_secs),
        )
        .context("building http client")?,
    );
    let token = AccessToken::from_optional(config.github.token());
    info!(
        owner = %config.github.owner,
        repo = %config.github.repo,
        profile = %config.github.profile_login(),
        authenticated = token.is_some(),
        "prebuild starting"
    );
    let client = Arc::new(HttpGithubClient::new(
        exec,
        &config.github.api_base,
        config.github.user_agent.clone(),
        token,
    )?);

    let pipeline = Pipeline::new(client, &config);
    match pipeline.run().await {
        Ok(report) => {
            info!(documents = report.documents.len(), "prebuild finished");
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "prebuild failed");
            Err(err.into())
        }
    }
}
