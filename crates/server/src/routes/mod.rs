use axum::Router;

use crate::DeploymentImpl;

pub mod ingredients;
pub mod recipe_categories;
pub mod recipe_ingredients;
pub mod recipe_instructions;
pub mod recipes;

pub fn router(deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    let v1 = Router::new()
        .merge(recipes::router(deployment))
        .merge(ingredients::router(deployment))
        .merge(recipe_categories::router(deployment))
        .merge(recipe_ingredients::router(deployment))
        .merge(recipe_instructions::router(deployment));

    Router::new().nest("/api/v1", v1)
}
