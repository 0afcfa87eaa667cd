use db::models::{
    recipe::Recipe,
    recipe_instruction::{
        CreateRecipeInstruction, RecipeInstruction, RecipeInstructionView, UpdateRecipeInstruction,
    },
};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::error::{ServiceError, ensure_not_blank, ensure_valid_id};

const ENTITY: &str = "Recipe instruction";

pub struct RecipeInstructionService;

impl RecipeInstructionService {
    pub(crate) fn validate(title: &str, instruction: &str) -> Result<(), ServiceError> {
        ensure_not_blank("title", title)?;
        ensure_not_blank("instruction", instruction)
    }

    pub async fn save(
        pool: &SqlitePool,
        data: &CreateRecipeInstruction,
    ) -> Result<RecipeInstructionView, ServiceError> {
        Self::validate(&data.title, &data.instruction)?;

        let instruction = RecipeInstruction::create(pool, data).await?;
        info!(instruction_id = instruction.id, "Created recipe instruction");
        Ok(instruction.into())
    }

    pub async fn find_by_id(
        pool: &SqlitePool,
        id: i64,
    ) -> Result<RecipeInstructionView, ServiceError> {
        ensure_valid_id(id)?;

        RecipeInstruction::find_by_id(pool, id)
            .await?
            .map(RecipeInstructionView::from)
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<RecipeInstructionView>, ServiceError> {
        let instructions = RecipeInstruction::find_all(pool).await?;
        Ok(instructions
            .into_iter()
            .map(RecipeInstructionView::from)
            .collect())
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &UpdateRecipeInstruction,
    ) -> Result<RecipeInstructionView, ServiceError> {
        ensure_valid_id(id)?;
        Self::validate(&data.title, &data.instruction)?;

        let instruction = RecipeInstruction::update(pool, id, data)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))?;

        info!(instruction_id = id, "Updated recipe instruction");
        Ok(instruction.into())
    }

    /// Detaches the instruction from any recipe using it, then deletes it
    pub async fn delete_by_id(pool: &SqlitePool, id: i64) -> Result<bool, ServiceError> {
        ensure_valid_id(id)?;

        let mut tx = pool.begin().await?;

        if !RecipeInstruction::exists(&mut *tx, id).await? {
            debug!(instruction_id = id, "Delete skipped, recipe instruction does not exist");
            return Ok(false);
        }

        let detached = Recipe::nullify_instruction(&mut *tx, id).await?;
        RecipeInstruction::delete(&mut *tx, id).await?;
        tx.commit().await?;

        info!(
            instruction_id = id,
            detached_recipes = detached,
            "Deleted recipe instruction"
        );
        Ok(true)
    }
}
