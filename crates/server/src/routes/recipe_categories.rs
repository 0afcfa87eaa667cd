use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{delete, get, post, put},
};
use axum_extra::extract::WithRejection;
use db::models::{
    recipe::RecipeLink,
    recipe_category::{CreateRecipeCategory, RecipeCategoryView, UpdateRecipeCategory},
};
use deployment::Deployment;
use services::services::{error::ServiceError, recipe_category::RecipeCategoryService};
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

pub async fn list_categories(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<RecipeCategoryView>>>, ApiError> {
    let categories = RecipeCategoryService::find_all(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(categories)))
}

pub async fn get_category(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<ResponseJson<ApiResponse<RecipeCategoryView>>, ApiError> {
    let category = RecipeCategoryService::find_by_id(&deployment.db().pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(category)))
}

pub async fn create_category(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateRecipeCategory>, ApiError>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<RecipeCategoryView>>), ApiError> {
    let category = RecipeCategoryService::save(&deployment.db().pool, &payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(category))))
}

pub async fn update_category(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateRecipeCategory>, ApiError>,
) -> Result<ResponseJson<ApiResponse<RecipeCategoryView>>, ApiError> {
    let category = RecipeCategoryService::update(&deployment.db().pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(category)))
}

pub async fn delete_category(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<StatusCode, ApiError> {
    if RecipeCategoryService::delete_by_id(&deployment.db().pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServiceError::not_found("Recipe category", id).into())
    }
}

/// Link a recipe to the category. An unknown recipe leaves the category unchanged.
pub async fn add_recipe_to_category(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<RecipeLink>, ApiError>,
) -> Result<ResponseJson<ApiResponse<RecipeCategoryView>>, ApiError> {
    let category =
        RecipeCategoryService::add_recipe(&deployment.db().pool, id, payload.recipe_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Recipe category with id {id} not found")))?;
    Ok(ResponseJson(ApiResponse::success(category)))
}

/// `data` is true when a link was removed
pub async fn remove_recipe_from_category(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<RecipeLink>, ApiError>,
) -> Result<ResponseJson<ApiResponse<bool>>, ApiError> {
    let removed =
        RecipeCategoryService::remove_recipe(&deployment.db().pool, id, payload.recipe_id).await?;
    Ok(ResponseJson(ApiResponse::success(removed)))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/recipe-category",
        Router::new()
            .route("/list", get(list_categories))
            .route("/find-by-id/{id}", get(get_category))
            .route("/add", post(create_category))
            .route("/update/{id}", put(update_category))
            .route("/delete/{id}", delete(delete_category))
            .route("/add-recipe/{id}", put(add_recipe_to_category))
            .route("/remove-recipe/{id}", put(remove_recipe_from_category)),
    )
}
