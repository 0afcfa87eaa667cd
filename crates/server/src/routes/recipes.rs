use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{delete, get, post, put},
};
use axum_extra::extract::WithRejection;
use db::models::recipe::{CreateRecipe, RecipeView, UpdateRecipe};
use deployment::Deployment;
use serde::Deserialize;
use services::services::{error::ServiceError, recipe::RecipeService};
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeNameQuery {
    pub recipe_name: String,
}

pub async fn list_recipes(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<RecipeView>>>, ApiError> {
    let recipes = RecipeService::find_all(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(recipes)))
}

pub async fn get_recipe(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<ResponseJson<ApiResponse<RecipeView>>, ApiError> {
    let recipe = RecipeService::find_by_id(&deployment.db().pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(recipe)))
}

pub async fn find_recipes_by_name(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Query(query), _): WithRejection<Query<RecipeNameQuery>, ApiError>,
) -> Result<ResponseJson<ApiResponse<Vec<RecipeView>>>, ApiError> {
    let recipes =
        RecipeService::find_by_name_contains(&deployment.db().pool, &query.recipe_name).await?;
    Ok(ResponseJson(ApiResponse::success(recipes)))
}

/// Saves the instruction and the recipe together
pub async fn create_recipe(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateRecipe>, ApiError>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<RecipeView>>), ApiError> {
    let recipe = RecipeService::save(&deployment.db().pool, &payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(recipe))))
}

pub async fn update_recipe(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateRecipe>, ApiError>,
) -> Result<ResponseJson<ApiResponse<RecipeView>>, ApiError> {
    let recipe = RecipeService::update(&deployment.db().pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(recipe)))
}

pub async fn delete_recipe(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<StatusCode, ApiError> {
    if RecipeService::delete_by_id(&deployment.db().pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServiceError::not_found("Recipe", id).into())
    }
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/recipe",
        Router::new()
            .route("/list", get(list_recipes))
            .route("/find-by-id/{id}", get(get_recipe))
            .route("/find-by-name", get(find_recipes_by_name))
            .route("/add", post(create_recipe))
            .route("/update/{id}", put(update_recipe))
            .route("/delete/{id}", delete(delete_recipe)),
    )
}
