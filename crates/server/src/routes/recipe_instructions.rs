use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{delete, get, post, put},
};
use axum_extra::extract::WithRejection;
use db::models::recipe_instruction::{
    CreateRecipeInstruction, RecipeInstructionView, UpdateRecipeInstruction,
};
use deployment::Deployment;
use services::services::{error::ServiceError, recipe_instruction::RecipeInstructionService};
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

pub async fn list_instructions(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<RecipeInstructionView>>>, ApiError> {
    let instructions = RecipeInstructionService::find_all(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(instructions)))
}

pub async fn get_instruction(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<ResponseJson<ApiResponse<RecipeInstructionView>>, ApiError> {
    let instruction = RecipeInstructionService::find_by_id(&deployment.db().pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(instruction)))
}

pub async fn create_instruction(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateRecipeInstruction>, ApiError>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<RecipeInstructionView>>), ApiError> {
    let instruction = RecipeInstructionService::save(&deployment.db().pool, &payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(instruction))))
}

pub async fn update_instruction(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateRecipeInstruction>, ApiError>,
) -> Result<ResponseJson<ApiResponse<RecipeInstructionView>>, ApiError> {
    let instruction =
        RecipeInstructionService::update(&deployment.db().pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(instruction)))
}

pub async fn delete_instruction(
    State(deployment): State<DeploymentImpl>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<StatusCode, ApiError> {
    if RecipeInstructionService::delete_by_id(&deployment.db().pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServiceError::not_found("Recipe instruction", id).into())
    }
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/recipe-instruction",
        Router::new()
            .route("/list", get(list_instructions))
            .route("/find-by-id/{id}", get(get_instruction))
            .route("/add", post(create_instruction))
            .route("/update/{id}", put(update_instruction))
            .route("/delete/{id}", delete(delete_instruction)),
    )
}
