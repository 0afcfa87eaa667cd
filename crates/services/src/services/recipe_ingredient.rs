//! Recipe-ingredient join rows: amount and unit of one ingredient in one recipe.

use db::models::{
    ingredient::Ingredient,
    recipe::Recipe,
    recipe_ingredient::{
        CreateRecipeIngredient, RecipeIngredient, RecipeIngredientView, UpdateRecipeIngredient,
    },
};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use super::error::{ServiceError, ensure_valid_id};

const ENTITY: &str = "Recipe ingredient";

pub struct RecipeIngredientService;

impl RecipeIngredientService {
    fn validate_amount(amount: f64) -> Result<(), ServiceError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ServiceError::InvalidArgument(format!(
                "amount must be a non-negative number, got {amount}"
            )));
        }
        Ok(())
    }

    async fn ensure_ingredient(
        tx: &mut Transaction<'_, Sqlite>,
        ingredient_id: Option<i64>,
    ) -> Result<(), ServiceError> {
        if let Some(ingredient_id) = ingredient_id {
            ensure_valid_id(ingredient_id)?;
            if !Ingredient::exists(&mut **tx, ingredient_id).await? {
                return Err(ServiceError::not_found("Ingredient", ingredient_id));
            }
        }
        Ok(())
    }

    async fn load_view(
        tx: &mut Transaction<'_, Sqlite>,
        id: i64,
    ) -> Result<RecipeIngredientView, ServiceError> {
        RecipeIngredient::find_with_ingredient_by_id(&mut **tx, id)
            .await?
            .map(RecipeIngredientView::from)
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    pub async fn save(
        pool: &SqlitePool,
        data: &CreateRecipeIngredient,
    ) -> Result<RecipeIngredientView, ServiceError> {
        Self::validate_amount(data.amount)?;

        let mut tx = pool.begin().await?;
        Self::ensure_ingredient(&mut tx, data.ingredient_id).await?;

        let row = RecipeIngredient::create(&mut *tx, data).await?;
        let view = Self::load_view(&mut tx, row.id).await?;
        tx.commit().await?;

        info!(
            recipe_ingredient_id = row.id,
            ingredient_id = ?row.ingredient_id,
            "Created recipe ingredient"
        );
        Ok(view)
    }

    pub async fn find_by_id(
        pool: &SqlitePool,
        id: i64,
    ) -> Result<RecipeIngredientView, ServiceError> {
        ensure_valid_id(id)?;

        RecipeIngredient::find_with_ingredient_by_id(pool, id)
            .await?
            .map(RecipeIngredientView::from)
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<RecipeIngredientView>, ServiceError> {
        let rows = RecipeIngredient::find_all_with_ingredient(pool).await?;
        Ok(rows.into_iter().map(RecipeIngredientView::from).collect())
    }

    pub async fn find_all_by_ingredient_id(
        pool: &SqlitePool,
        ingredient_id: i64,
    ) -> Result<Vec<RecipeIngredientView>, ServiceError> {
        ensure_valid_id(ingredient_id)?;

        let rows = RecipeIngredient::find_all_by_ingredient_id(pool, ingredient_id).await?;
        Ok(rows.into_iter().map(RecipeIngredientView::from).collect())
    }

    pub async fn find_all_not_associated_with_recipe(
        pool: &SqlitePool,
    ) -> Result<Vec<RecipeIngredientView>, ServiceError> {
        let rows = RecipeIngredient::find_unassigned(pool).await?;
        Ok(rows.into_iter().map(RecipeIngredientView::from).collect())
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &UpdateRecipeIngredient,
    ) -> Result<RecipeIngredientView, ServiceError> {
        ensure_valid_id(id)?;
        Self::validate_amount(data.amount)?;

        let mut tx = pool.begin().await?;
        Self::ensure_ingredient(&mut tx, data.ingredient_id).await?;

        RecipeIngredient::update(&mut *tx, id, data)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))?;
        let view = Self::load_view(&mut tx, id).await?;
        tx.commit().await?;

        info!(recipe_ingredient_id = id, "Updated recipe ingredient");
        Ok(view)
    }

    pub async fn delete_by_id(pool: &SqlitePool, id: i64) -> Result<bool, ServiceError> {
        ensure_valid_id(id)?;

        let deleted = RecipeIngredient::delete(pool, id).await?;
        if deleted == 0 {
            debug!(recipe_ingredient_id = id, "Delete skipped, recipe ingredient does not exist");
            return Ok(false);
        }

        info!(recipe_ingredient_id = id, "Deleted recipe ingredient");
        Ok(true)
    }

    pub async fn delete(
        pool: &SqlitePool,
        recipe_ingredient: &RecipeIngredient,
    ) -> Result<bool, ServiceError> {
        Self::delete_by_id(pool, recipe_ingredient.id).await
    }

    /// Attach the row to a recipe.
    ///
    /// `None` when the row does not exist; a missing recipe leaves the row unchanged.
    pub async fn add_recipe(
        pool: &SqlitePool,
        id: i64,
        recipe_id: i64,
    ) -> Result<Option<RecipeIngredientView>, ServiceError> {
        if id < 1 {
            return Ok(None);
        }

        let mut tx = pool.begin().await?;

        if !RecipeIngredient::exists(&mut *tx, id).await? {
            debug!(recipe_ingredient_id = id, recipe_id, "add_recipe: recipe ingredient does not exist");
            return Ok(None);
        }

        if recipe_id >= 1 && Recipe::exists(&mut *tx, recipe_id).await? {
            RecipeIngredient::set_recipe(&mut *tx, id, Some(recipe_id)).await?;
            info!(recipe_ingredient_id = id, recipe_id, "Attached recipe ingredient to recipe");
        } else {
            debug!(recipe_ingredient_id = id, recipe_id, "add_recipe: recipe does not exist");
        }

        let view = Self::load_view(&mut tx, id).await?;
        tx.commit().await?;
        Ok(Some(view))
    }

    /// Detach the row from its recipe. Returns whether a row was changed.
    pub async fn remove_recipe(pool: &SqlitePool, id: i64) -> Result<bool, ServiceError> {
        if id < 1 {
            return Ok(false);
        }

        let changed = RecipeIngredient::set_recipe(pool, id, None).await?;
        if changed > 0 {
            info!(recipe_ingredient_id = id, "Detached recipe ingredient from recipe");
        }
        Ok(changed > 0)
    }
}
