//! Recipes. Creating or updating a recipe writes its instruction first and the
//! recipe second, both inside one transaction.

use db::models::{
    recipe::{CreateRecipe, Recipe, RecipeView, UpdateRecipe},
    recipe_category::{CategorySummary, RecipeCategory},
    recipe_ingredient::{RecipeIngredient, RecipeIngredientView},
    recipe_instruction::{
        CreateRecipeInstruction, RecipeInstruction, RecipeInstructionView, UpdateRecipeInstruction,
    },
};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use super::{
    error::{ServiceError, ensure_not_blank, ensure_valid_id},
    recipe_instruction::RecipeInstructionService,
};

const ENTITY: &str = "Recipe";

pub struct RecipeService;

impl RecipeService {
    async fn to_view(conn: &mut SqliteConnection, recipe: Recipe) -> Result<RecipeView, ServiceError> {
        let instruction = match recipe.instruction_id {
            Some(instruction_id) => RecipeInstruction::find_by_id(&mut *conn, instruction_id)
                .await?
                .map(RecipeInstructionView::from),
            None => None,
        };
        let categories = RecipeCategory::find_by_recipe_id(&mut *conn, recipe.id)
            .await?
            .into_iter()
            .map(CategorySummary::from)
            .collect();
        let recipe_ingredients = RecipeIngredient::find_by_recipe_id(&mut *conn, recipe.id)
            .await?
            .into_iter()
            .map(RecipeIngredientView::from)
            .collect();

        Ok(RecipeView {
            id: recipe.id,
            recipe_name: recipe.recipe_name,
            instruction,
            categories,
            recipe_ingredients,
        })
    }

    async fn to_views(
        pool: &SqlitePool,
        recipes: Vec<Recipe>,
    ) -> Result<Vec<RecipeView>, ServiceError> {
        let mut conn = pool.acquire().await?;
        let mut views = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            views.push(Self::to_view(&mut conn, recipe).await?);
        }
        Ok(views)
    }

    /// Persist the instruction, then the recipe pointing at it, then the
    /// category and ingredient links. Any failure rolls back all of it.
    pub async fn save(pool: &SqlitePool, data: &CreateRecipe) -> Result<RecipeView, ServiceError> {
        ensure_not_blank("recipeName", &data.recipe_name)?;
        RecipeInstructionService::validate(&data.instruction_title, &data.instruction_detail)?;

        let mut tx = pool.begin().await?;

        let instruction = RecipeInstruction::create(
            &mut *tx,
            &CreateRecipeInstruction {
                title: data.instruction_title.clone(),
                instruction: data.instruction_detail.clone(),
            },
        )
        .await?;

        let recipe = Recipe::create(&mut *tx, &data.recipe_name, Some(instruction.id)).await?;

        for &category_id in &data.category_ids {
            ensure_valid_id(category_id)?;
            if !RecipeCategory::exists(&mut *tx, category_id).await? {
                return Err(ServiceError::not_found("Recipe category", category_id));
            }
            RecipeCategory::link_recipe(&mut *tx, category_id, recipe.id).await?;
        }

        for &recipe_ingredient_id in &data.recipe_ingredient_ids {
            ensure_valid_id(recipe_ingredient_id)?;
            if RecipeIngredient::set_recipe(&mut *tx, recipe_ingredient_id, Some(recipe.id)).await? == 0 {
                return Err(ServiceError::not_found("Recipe ingredient", recipe_ingredient_id));
            }
        }

        let view = Self::to_view(&mut tx, recipe).await?;
        tx.commit().await?;

        info!(
            recipe_id = view.id,
            instruction_id = instruction.id,
            categories = view.categories.len(),
            recipe_ingredients = view.recipe_ingredients.len(),
            "Created recipe"
        );
        Ok(view)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<RecipeView, ServiceError> {
        ensure_valid_id(id)?;

        let mut conn = pool.acquire().await?;
        let recipe = Recipe::find_by_id(&mut *conn, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))?;
        Self::to_view(&mut conn, recipe).await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<RecipeView>, ServiceError> {
        let recipes = Recipe::find_all(pool).await?;
        Self::to_views(pool, recipes).await
    }

    pub async fn find_by_name_contains(
        pool: &SqlitePool,
        fragment: &str,
    ) -> Result<Vec<RecipeView>, ServiceError> {
        let recipes = Recipe::find_by_name_contains(pool, fragment).await?;
        Self::to_views(pool, recipes).await
    }

    /// Update the recipe's instruction in place (creating one if the recipe has
    /// none) and then the recipe itself, in one transaction.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &UpdateRecipe,
    ) -> Result<RecipeView, ServiceError> {
        ensure_valid_id(id)?;
        ensure_not_blank("recipeName", &data.recipe_name)?;
        RecipeInstructionService::validate(&data.instruction_title, &data.instruction_detail)?;

        let mut tx = pool.begin().await?;

        let existing = Recipe::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))?;

        let updated_instruction = match existing.instruction_id {
            Some(instruction_id) => {
                RecipeInstruction::update(
                    &mut *tx,
                    instruction_id,
                    &UpdateRecipeInstruction {
                        title: data.instruction_title.clone(),
                        instruction: data.instruction_detail.clone(),
                    },
                )
                .await?
            }
            None => None,
        };
        let instruction = match updated_instruction {
            Some(instruction) => instruction,
            None => {
                debug!(recipe_id = id, "Recipe has no instruction, creating one");
                RecipeInstruction::create(
                    &mut *tx,
                    &CreateRecipeInstruction {
                        title: data.instruction_title.clone(),
                        instruction: data.instruction_detail.clone(),
                    },
                )
                .await?
            }
        };

        let recipe = Recipe::update(&mut *tx, id, &data.recipe_name, Some(instruction.id))
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))?;
        let view = Self::to_view(&mut tx, recipe).await?;
        tx.commit().await?;

        info!(recipe_id = id, instruction_id = instruction.id, "Updated recipe");
        Ok(view)
    }

    /// Detaches ingredient rows and category links, then deletes the recipe.
    /// The instruction row is left in place.
    pub async fn delete_by_id(pool: &SqlitePool, id: i64) -> Result<bool, ServiceError> {
        ensure_valid_id(id)?;

        let mut tx = pool.begin().await?;

        if !Recipe::exists(&mut *tx, id).await? {
            debug!(recipe_id = id, "Delete skipped, recipe does not exist");
            return Ok(false);
        }

        let detached = RecipeIngredient::nullify_recipe(&mut *tx, id).await?;
        let unlinked = RecipeCategory::unlink_all_categories(&mut *tx, id).await?;
        Recipe::delete(&mut *tx, id).await?;
        tx.commit().await?;

        info!(
            recipe_id = id,
            detached_recipe_ingredients = detached,
            unlinked_categories = unlinked,
            "Deleted recipe"
        );
        Ok(true)
    }

    pub async fn delete(pool: &SqlitePool, recipe: &Recipe) -> Result<bool, ServiceError> {
        Self::delete_by_id(pool, recipe.id).await
    }
}
