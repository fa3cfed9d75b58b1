use anyhow::Context;

use astexo_edge::config::EdgeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = EdgeConfig::from_env()?;
    astexo_observability::init(config.log_format);

    let app = astexo_edge::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        environment = ?config.environment,
        "edge server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
