use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{delete, get, post, put},
};
use axum_extra::extract::WithRejection;
use db::models::ingredient::{CreateIngredient, IngredientView, UpdateIngredient};
use deployment::Deployment;
use serde::Deserialize;
use services::services::{error::ServiceError, ingredient::IngredientService};
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientNameQuery {
    pub ingredient_name: String,
}

pub async fn list_ingredients(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<IngredientView>>>, ApiError> {
    let ingredients = IngredientService::find_all(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(ingredients)))
}

pub async fn get_ingredient(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<ResponseJson<ApiResponse<IngredientView>>, ApiError> {
    let ingredient = IngredientService::find_by_id(&deployment.db().pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(ingredient)))
}

/// Case-insensitive substring match
pub async fn find_ingredients_by_name(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Query(query), _): WithRejection<Query<IngredientNameQuery>, ApiError>,
) -> Result<ResponseJson<ApiResponse<Vec<IngredientView>>>, ApiError> {
    let ingredients =
        IngredientService::find_by_name_contains(&deployment.db().pool, &query.ingredient_name)
            .await?;
    Ok(ResponseJson(ApiResponse::success(ingredients)))
}

pub async fn find_ingredient_by_exact_name(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Query(query), _): WithRejection<Query<IngredientNameQuery>, ApiError>,
) -> Result<ResponseJson<ApiResponse<IngredientView>>, ApiError> {
    let ingredient =
        IngredientService::find_by_name(&deployment.db().pool, &query.ingredient_name).await?;
    Ok(ResponseJson(ApiResponse::success(ingredient)))
}

pub async fn create_ingredient(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateIngredient>, ApiError>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<IngredientView>>), ApiError> {
    let ingredient = IngredientService::save(&deployment.db().pool, &payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(ingredient))))
}

pub async fn update_ingredient(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateIngredient>, ApiError>,
) -> Result<ResponseJson<ApiResponse<IngredientView>>, ApiError> {
    let ingredient = IngredientService::update(&deployment.db().pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(ingredient)))
}

pub async fn delete_ingredient(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<StatusCode, ApiError> {
    if IngredientService::delete_by_id(&deployment.db().pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServiceError::not_found("Ingredient", id).into())
    }
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/ingredient",
        Router::new()
            .route("/list", get(list_ingredients))
            .route("/find-by-id/{id}", get(get_ingredient))
            .route("/find-by-name", get(find_ingredients_by_name))
            .route("/find-by-exact-name", get(find_ingredient_by_exact_name))
            .route("/add", post(create_ingredient))
            .route("/update/{id}", put(update_ingredient))
            .route("/delete/{id}", delete(delete_ingredient)),
    )
}
