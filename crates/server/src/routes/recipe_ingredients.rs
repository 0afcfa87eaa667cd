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
    recipe_ingredient::{CreateRecipeIngredient, RecipeIngredientView, UpdateRecipeIngredient},
};
use deployment::Deployment;
use services::services::{error::ServiceError, recipe_ingredient::RecipeIngredientService};
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

pub async fn list_recipe_ingredients(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<RecipeIngredientView>>>, ApiError> {
    let rows = RecipeIngredientService::find_all(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(rows)))
}

pub async fn list_unassigned_recipe_ingredients(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<RecipeIngredientView>>>, ApiError> {
    let rows =
        RecipeIngredientService::find_all_not_associated_with_recipe(&deployment.db().pool)
            .await?;
    Ok(ResponseJson(ApiResponse::success(rows)))
}

pub async fn get_recipe_ingredient(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<ResponseJson<ApiResponse<RecipeIngredientView>>, ApiError> {
    let row = RecipeIngredientService::find_by_id(&deployment.db().pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(row)))
}

pub async fn find_by_ingredient(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(ingredient_id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<ResponseJson<ApiResponse<Vec<RecipeIngredientView>>>, ApiError> {
    let rows =
        RecipeIngredientService::find_all_by_ingredient_id(&deployment.db().pool, ingredient_id)
            .await?;
    Ok(ResponseJson(ApiResponse::success(rows)))
}

pub async fn create_recipe_ingredient(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateRecipeIngredient>, ApiError>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<RecipeIngredientView>>), ApiError> {
    let row = RecipeIngredientService::save(&deployment.db().pool, &payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(row))))
}

pub async fn update_recipe_ingredient(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateRecipeIngredient>, ApiError>,
) -> Result<ResponseJson<ApiResponse<RecipeIngredientView>>, ApiError> {
    let row = RecipeIngredientService::update(&deployment.db().pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(row)))
}

pub async fn delete_recipe_ingredient(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<StatusCode, ApiError> {
    if RecipeIngredientService::delete_by_id(&deployment.db().pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServiceError::not_found("Recipe ingredient", id).into())
    }
}

pub async fn add_recipe_to_recipe_ingredient(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<RecipeLink>, ApiError>,
) -> Result<ResponseJson<ApiResponse<RecipeIngredientView>>, ApiError> {
    let row = RecipeIngredientService::add_recipe(&deployment.db().pool, id, payload.recipe_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Recipe ingredient with id {id} not found")))?;
    Ok(ResponseJson(ApiResponse::success(row)))
}

pub async fn remove_recipe_from_recipe_ingredient(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<ResponseJson<ApiResponse<bool>>, ApiError> {
    let detached = RecipeIngredientService::remove_recipe(&deployment.db().pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(detached)))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/recipe-ingredient",
        Router::new()
            .route("/list", get(list_recipe_ingredients))
            .route("/list-unassigned", get(list_unassigned_recipe_ingredients))
            .route("/find-by-id/{id}", get(get_recipe_ingredient))
            .route("/find-by-ingredient/{id}", get(find_by_ingredient))
            .route("/add", post(create_recipe_ingredient))
            .route("/update/{id}", put(update_recipe_ingredient))
            .route("/delete/{id}", delete(delete_recipe_ingredient))
            .route("/add-recipe/{id}", put(add_recipe_to_recipe_ingredient))
            .route("/remove-recipe/{id}", put(remove_recipe_from_recipe_ingredient)),
    )
}
