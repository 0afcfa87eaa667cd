use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use super::ingredient::IngredientView;

/// Unit an ingredient amount is expressed in
#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "measurement", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Measurement {
    Tsp,
    Tbsp,
    Cup,
    Ml,
    Cl,
    Dl,
    L,
    Mg,
    G,
    Hg,
    Kg,
    Pinch,
    #[default]
    Piece,
}

/// Join row between a recipe and an ingredient, carrying the amount
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct RecipeIngredient {
    pub id: i64,
    pub amount: f64,
    pub measurement: Measurement,
    pub ingredient_id: Option<i64>, // Foreign key to Ingredient, cleared when the ingredient is deleted
    pub recipe_id: Option<i64>,     // Foreign key to Recipe, cleared when the recipe is deleted
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct RecipeIngredientWithIngredient {
    #[sqlx(flatten)]
    #[serde(flatten)]
    #[ts(flatten)]
    pub recipe_ingredient: RecipeIngredient,
    pub ingredient_name: Option<String>,
}

impl std::ops::Deref for RecipeIngredientWithIngredient {
    type Target = RecipeIngredient;
    fn deref(&self) -> &Self::Target {
        &self.recipe_ingredient
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredientView {
    pub id: i64,
    pub amount: f64,
    pub measurement: Measurement,
    pub ingredient: Option<IngredientView>,
    pub recipe_id: Option<i64>,
}

impl From<RecipeIngredientWithIngredient> for RecipeIngredientView {
    fn from(row: RecipeIngredientWithIngredient) -> Self {
        let ingredient = match (row.recipe_ingredient.ingredient_id, row.ingredient_name) {
            (Some(id), Some(ingredient_name)) => Some(IngredientView {
                id,
                ingredient_name,
            }),
            _ => None,
        };
        Self {
            id: row.recipe_ingredient.id,
            amount: row.recipe_ingredient.amount,
            measurement: row.recipe_ingredient.measurement,
            ingredient,
            recipe_id: row.recipe_ingredient.recipe_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeIngredient {
    pub amount: f64,
    #[serde(default)]
    pub measurement: Measurement,
    pub ingredient_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeIngredient {
    pub amount: f64,
    #[serde(default)]
    pub measurement: Measurement,
    pub ingredient_id: Option<i64>,
}

const SELECT_WITH_INGREDIENT: &str = r#"SELECT
    ri.id,
    ri.amount,
    ri.measurement,
    ri.ingredient_id,
    ri.recipe_id,
    ri.created_at,
    ri.updated_at,
    i.ingredient_name
FROM recipe_ingredients ri
LEFT JOIN ingredients i ON i.id = ri.ingredient_id"#;

impl RecipeIngredient {
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, RecipeIngredient>(
            r#"SELECT id, amount, measurement, ingredient_id, recipe_id, created_at, updated_at
               FROM recipe_ingredients
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_with_ingredient_by_id<'e, E>(
        executor: E,
        id: i64,
    ) -> Result<Option<RecipeIngredientWithIngredient>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("{SELECT_WITH_INGREDIENT} WHERE ri.id = $1");
        sqlx::query_as::<_, RecipeIngredientWithIngredient>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_all_with_ingredient<'e, E>(
        executor: E,
    ) -> Result<Vec<RecipeIngredientWithIngredient>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("{SELECT_WITH_INGREDIENT} ORDER BY ri.id ASC");
        sqlx::query_as::<_, RecipeIngredientWithIngredient>(&sql)
            .fetch_all(executor)
            .await
    }

    pub async fn find_all_by_ingredient_id<'e, E>(
        executor: E,
        ingredient_id: i64,
    ) -> Result<Vec<RecipeIngredientWithIngredient>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("{SELECT_WITH_INGREDIENT} WHERE ri.ingredient_id = $1 ORDER BY ri.id ASC");
        sqlx::query_as::<_, RecipeIngredientWithIngredient>(&sql)
            .bind(ingredient_id)
            .fetch_all(executor)
            .await
    }

    pub async fn find_by_recipe_id<'e, E>(
        executor: E,
        recipe_id: i64,
    ) -> Result<Vec<RecipeIngredientWithIngredient>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("{SELECT_WITH_INGREDIENT} WHERE ri.recipe_id = $1 ORDER BY ri.id ASC");
        sqlx::query_as::<_, RecipeIngredientWithIngredient>(&sql)
            .bind(recipe_id)
            .fetch_all(executor)
            .await
    }

    /// Rows not attached to any recipe yet
    pub async fn find_unassigned<'e, E>(
        executor: E,
    ) -> Result<Vec<RecipeIngredientWithIngredient>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("{SELECT_WITH_INGREDIENT} WHERE ri.recipe_id IS NULL ORDER BY ri.id ASC");
        sqlx::query_as::<_, RecipeIngredientWithIngredient>(&sql)
            .fetch_all(executor)
            .await
    }

    pub async fn exists<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM recipe_ingredients WHERE id = $1")
                .bind(id)
                .fetch_one(executor)
                .await?;
        Ok(count > 0)
    }

    pub async fn create<'e, E>(
        executor: E,
        data: &CreateRecipeIngredient,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, RecipeIngredient>(
            r#"INSERT INTO recipe_ingredients (amount, measurement, ingredient_id)
               VALUES ($1, $2, $3)
               RETURNING id, amount, measurement, ingredient_id, recipe_id, created_at, updated_at"#,
        )
        .bind(data.amount)
        .bind(data.measurement)
        .bind(data.ingredient_id)
        .fetch_one(executor)
        .await
    }

    pub async fn update<'e, E>(
        executor: E,
        id: i64,
        data: &UpdateRecipeIngredient,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, RecipeIngredient>(
            r#"UPDATE recipe_ingredients
               SET amount = $2, measurement = $3, ingredient_id = $4, updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING id, amount, measurement, ingredient_id, recipe_id, created_at, updated_at"#,
        )
        .bind(id)
        .bind(data.amount)
        .bind(data.measurement)
        .bind(data.ingredient_id)
        .fetch_optional(executor)
        .await
    }

    /// Attach the row to a recipe, or detach it with `None`
    pub async fn set_recipe<'e, E>(
        executor: E,
        id: i64,
        recipe_id: Option<i64>,
    ) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE recipe_ingredients SET recipe_id = $2, updated_at = datetime('now', 'subsec') WHERE id = $1",
        )
        .bind(id)
        .bind(recipe_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Nullify ingredient_id for all rows that reference the given ingredient.
    /// Rows survive; only the link is cleared.
    pub async fn nullify_ingredient<'e, E>(
        executor: E,
        ingredient_id: i64,
    ) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE recipe_ingredients SET ingredient_id = NULL, updated_at = datetime('now', 'subsec') WHERE ingredient_id = $1",
        )
        .bind(ingredient_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Nullify recipe_id for all rows attached to the given recipe
    pub async fn nullify_recipe<'e, E>(executor: E, recipe_id: i64) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE recipe_ingredients SET recipe_id = NULL, updated_at = datetime('now', 'subsec') WHERE recipe_id = $1",
        )
        .bind(recipe_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM recipe_ingredients WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
