use axum::Router;
use deployment::LocalDeployment;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod error;
pub mod routes;

pub type DeploymentImpl = LocalDeployment;

/// Full application router with tracing and CORS layers applied
pub fn app(deployment: DeploymentImpl) -> Router {
    routes::router(&deployment)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(deployment)
}
