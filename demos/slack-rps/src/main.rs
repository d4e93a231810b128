//! Rock, paper, scissors for a Slack workspace.
//!
//! Point a slash command (default `/rps`) and the app's interactivity URL
//! at `http://<host>:<RPS_PORT>/slack/rps`, then:
//!
//! ```text
//! RPS_PORT=8081 RPS_SLACK_OAUTH=xoxb-... RUST_LOG=info cargo run -p slack-rps
//! ```

use throwdown::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type SlackServer = ThrowdownServer<MentionResolver, SlackNotifier>;

async fn build_server(config: GatewayConfig) -> Result<SlackServer, ThrowdownError> {
    let notifier = SlackNotifier::new(&config)?;
    ThrowdownServer::builder()
        .gateway_config(config)
        .build(MentionResolver, notifier)
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = GatewayConfig::from_env()?;
    let route = config.route.clone();
    let command = config.command_name.clone();

    let server = build_server(config).await?;
    tracing::info!(
        addr = %server.local_addr()?,
        route = %route,
        command = %format!("/{command}"),
        "slack-rps listening"
    );

    server.run_until(shutdown_signal()).await?;
    Ok(())
}
