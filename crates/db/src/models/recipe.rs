use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite};
use ts_rs::TS;

use super::{
    recipe_category::CategorySummary, recipe_ingredient::RecipeIngredientView,
    recipe_instruction::RecipeInstructionView,
};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Recipe {
    pub id: i64,
    pub recipe_name: String,
    pub instruction_id: Option<i64>, // Foreign key to RecipeInstruction
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full projection of a recipe with its instruction, categories and ingredient lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView {
    pub id: i64,
    pub recipe_name: String,
    pub instruction: Option<RecipeInstructionView>,
    pub categories: Vec<CategorySummary>,
    pub recipe_ingredients: Vec<RecipeIngredientView>,
}

/// Recipe reference embedded in category views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: i64,
    pub recipe_name: String,
}

impl From<Recipe> for RecipeSummary {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            recipe_name: recipe.recipe_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipe {
    pub recipe_name: String,
    pub instruction_title: String,
    pub instruction_detail: String,
    #[serde(default)]
    pub category_ids: Vec<i64>,
    #[serde(default)]
    pub recipe_ingredient_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipe {
    pub recipe_name: String,
    pub instruction_title: String,
    pub instruction_detail: String,
}

/// Body for the association endpoints that attach something to a recipe
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct RecipeLink {
    pub recipe_id: i64,
}

impl Recipe {
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Recipe>(
            r#"SELECT id, recipe_name, instruction_id, created_at, updated_at
               FROM recipes
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_all<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Recipe>(
            r#"SELECT id, recipe_name, instruction_id, created_at, updated_at
               FROM recipes
               ORDER BY id ASC"#,
        )
        .fetch_all(executor)
        .await
    }

    pub async fn find_by_name_contains<'e, E>(
        executor: E,
        fragment: &str,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Recipe>(
            r#"SELECT id, recipe_name, instruction_id, created_at, updated_at
               FROM recipes
               WHERE instr(lower(recipe_name), lower($1)) > 0
               ORDER BY recipe_name ASC"#,
        )
        .bind(fragment)
        .fetch_all(executor)
        .await
    }

    /// Recipes linked to a category through the join table
    pub async fn find_by_category_id<'e, E>(
        executor: E,
        category_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Recipe>(
            r#"SELECT r.id, r.recipe_name, r.instruction_id, r.created_at, r.updated_at
               FROM recipes r
               JOIN recipe_category_links l ON l.recipe_id = r.id
               WHERE l.category_id = $1
               ORDER BY r.id ASC"#,
        )
        .bind(category_id)
        .fetch_all(executor)
        .await
    }

    pub async fn exists<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM recipes WHERE id = $1")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(count > 0)
    }

    pub async fn create<'e, E>(
        executor: E,
        recipe_name: &str,
        instruction_id: Option<i64>,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Recipe>(
            r#"INSERT INTO recipes (recipe_name, instruction_id)
               VALUES ($1, $2)
               RETURNING id, recipe_name, instruction_id, created_at, updated_at"#,
        )
        .bind(recipe_name.trim())
        .bind(instruction_id)
        .fetch_one(executor)
        .await
    }

    pub async fn update<'e, E>(
        executor: E,
        id: i64,
        recipe_name: &str,
        instruction_id: Option<i64>,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Recipe>(
            r#"UPDATE recipes
               SET recipe_name = $2, instruction_id = $3, updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING id, recipe_name, instruction_id, created_at, updated_at"#,
        )
        .bind(id)
        .bind(recipe_name.trim())
        .bind(instruction_id)
        .fetch_optional(executor)
        .await
    }

    /// Clear instruction_id on every recipe that references the given instruction
    pub async fn nullify_instruction<'e, E>(
        executor: E,
        instruction_id: i64,
    ) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE recipes SET instruction_id = NULL, updated_at = datetime('now', 'subsec') WHERE instruction_id = $1",
        )
        .bind(instruction_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Category links are removed by ON DELETE CASCADE; recipe_ingredients must be detached first
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
