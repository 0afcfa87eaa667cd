//! Ingredient CRUD. Deleting an ingredient detaches the recipe-ingredient rows that use it.

use db::models::{
    ingredient::{CreateIngredient, Ingredient, IngredientView, UpdateIngredient},
    recipe_ingredient::RecipeIngredient,
};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::error::{ServiceError, ensure_not_blank, ensure_valid_id};

const ENTITY: &str = "Ingredient";

pub struct IngredientService;

impl IngredientService {
    pub async fn save(
        pool: &SqlitePool,
        data: &CreateIngredient,
    ) -> Result<IngredientView, ServiceError> {
        ensure_not_blank("ingredientName", &data.ingredient_name)?;

        let ingredient = Ingredient::create(pool, data)
            .await
            .map_err(|e| ServiceError::from_write(e, "ingredient"))?;

        info!(
            ingredient_id = ingredient.id,
            ingredient_name = %ingredient.ingredient_name,
            "Created ingredient"
        );
        Ok(ingredient.into())
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<IngredientView, ServiceError> {
        ensure_valid_id(id)?;

        Ingredient::find_by_id(pool, id)
            .await?
            .map(IngredientView::from)
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<IngredientView>, ServiceError> {
        let ingredients = Ingredient::find_all(pool).await?;
        Ok(ingredients.into_iter().map(IngredientView::from).collect())
    }

    /// Exact, case-insensitive lookup by name
    pub async fn find_by_name(
        pool: &SqlitePool,
        ingredient_name: &str,
    ) -> Result<IngredientView, ServiceError> {
        ensure_not_blank("ingredientName", ingredient_name)?;

        Ingredient::find_by_ingredient_name(pool, ingredient_name.trim())
            .await?
            .map(IngredientView::from)
            .ok_or_else(|| ServiceError::NameNotFound {
                entity: ENTITY,
                name: ingredient_name.to_string(),
            })
    }

    pub async fn find_by_name_contains(
        pool: &SqlitePool,
        fragment: &str,
    ) -> Result<Vec<IngredientView>, ServiceError> {
        let ingredients = Ingredient::find_by_name_contains(pool, fragment).await?;
        Ok(ingredients.into_iter().map(IngredientView::from).collect())
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &UpdateIngredient,
    ) -> Result<IngredientView, ServiceError> {
        ensure_valid_id(id)?;
        ensure_not_blank("ingredientName", &data.ingredient_name)?;

        let ingredient = Ingredient::update(pool, id, &data.ingredient_name)
            .await
            .map_err(|e| ServiceError::from_write(e, "ingredient"))?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))?;

        info!(ingredient_id = id, "Updated ingredient");
        Ok(ingredient.into())
    }

    /// Returns false when no ingredient has this id
    pub async fn delete_by_id(pool: &SqlitePool, id: i64) -> Result<bool, ServiceError> {
        ensure_valid_id(id)?;

        let mut tx = pool.begin().await?;

        if !Ingredient::exists(&mut *tx, id).await? {
            debug!(ingredient_id = id, "Delete skipped, ingredient does not exist");
            return Ok(false);
        }

        // Break links before deleting so no recipe-ingredient row points at a missing ingredient
        let detached = RecipeIngredient::nullify_ingredient(&mut *tx, id).await?;
        Ingredient::delete(&mut *tx, id).await?;
        tx.commit().await?;

        info!(
            ingredient_id = id,
            detached_recipe_ingredients = detached,
            "Deleted ingredient"
        );
        Ok(true)
    }

    pub async fn delete(pool: &SqlitePool, ingredient: &Ingredient) -> Result<bool, ServiceError> {
        Self::delete_by_id(pool, ingredient.id).await
    }
}
