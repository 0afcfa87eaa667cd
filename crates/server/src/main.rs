use anyhow::Context;
use deployment::Deployment;
use server::DeploymentImpl;
use tracing::info;
use utils::log::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("info");

    let deployment = DeploymentImpl::new()
        .await
        .context("failed to start deployment")?;

    let address = deployment.config().bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(address = %address, "Recipe server listening");

    axum::serve(listener, server::app(deployment)).await?;
    Ok(())
}
