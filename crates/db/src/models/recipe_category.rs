use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite};
use ts_rs::TS;

use super::recipe::{Recipe, RecipeSummary};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct RecipeCategory {
    pub id: i64,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct RecipeCategoryView {
    pub id: i64,
    pub category: String,
    pub recipes: Vec<RecipeSummary>,
}

impl RecipeCategoryView {
    pub fn new(category: RecipeCategory, recipes: Vec<Recipe>) -> Self {
        Self {
            id: category.id,
            category: category.category,
            recipes: recipes.into_iter().map(RecipeSummary::from).collect(),
        }
    }
}

/// Category reference embedded in recipe views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: i64,
    pub category: String,
}

impl From<RecipeCategory> for CategorySummary {
    fn from(category: RecipeCategory) -> Self {
        Self {
            id: category.id,
            category: category.category,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeCategory {
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeCategory {
    pub category: String,
}

impl RecipeCategory {
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, RecipeCategory>(
            r#"SELECT id, category, created_at, updated_at
               FROM recipe_categories
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
        sqlx::query_as::<_, RecipeCategory>(
            r#"SELECT id, category, created_at, updated_at
               FROM recipe_categories
               ORDER BY id ASC"#,
        )
        .fetch_all(executor)
        .await
    }

    /// Categories a recipe belongs to
    pub async fn find_by_recipe_id<'e, E>(
        executor: E,
        recipe_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, RecipeCategory>(
            r#"SELECT c.id, c.category, c.created_at, c.updated_at
               FROM recipe_categories c
               JOIN recipe_category_links l ON l.category_id = c.id
               WHERE l.recipe_id = $1
               ORDER BY c.id ASC"#,
        )
        .bind(recipe_id)
        .fetch_all(executor)
        .await
    }

    pub async fn exists<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM recipe_categories WHERE id = $1")
                .bind(id)
                .fetch_one(executor)
                .await?;
        Ok(count > 0)
    }

    pub async fn create<'e, E>(executor: E, data: &CreateRecipeCategory) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, RecipeCategory>(
            r#"INSERT INTO recipe_categories (category)
               VALUES ($1)
               RETURNING id, category, created_at, updated_at"#,
        )
        .bind(data.category.trim())
        .fetch_one(executor)
        .await
    }

    pub async fn update<'e, E>(
        executor: E,
        id: i64,
        category: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, RecipeCategory>(
            r#"UPDATE recipe_categories
               SET category = $2, updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING id, category, created_at, updated_at"#,
        )
        .bind(id)
        .bind(category.trim())
        .fetch_optional(executor)
        .await
    }

    /// Link a recipe to a category. Returns 0 when the link already exists.
    pub async fn link_recipe<'e, E>(
        executor: E,
        category_id: i64,
        recipe_id: i64,
    ) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO recipe_category_links (recipe_id, category_id) VALUES ($1, $2)",
        )
        .bind(recipe_id)
        .bind(category_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn unlink_recipe<'e, E>(
        executor: E,
        category_id: i64,
        recipe_id: i64,
    ) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "DELETE FROM recipe_category_links WHERE recipe_id = $1 AND category_id = $2",
        )
        .bind(recipe_id)
        .bind(category_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Remove this category from every recipe's category collection
    pub async fn unlink_all_recipes<'e, E>(executor: E, category_id: i64) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM recipe_category_links WHERE category_id = $1")
            .bind(category_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Remove every category link held by a recipe
    pub async fn unlink_all_categories<'e, E>(executor: E, recipe_id: i64) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM recipe_category_links WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM recipe_categories WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DBService;

    #[tokio::test]
    async fn test_link_recipe_is_idempotent() {
        let db = DBService::new_in_memory().await.unwrap();
        let category = RecipeCategory::create(
            &db.pool,
            &CreateRecipeCategory {
                category: "Dessert".to_string(),
            },
        )
        .await
        .unwrap();
        let recipe = Recipe::create(&db.pool, "Pancakes", None).await.unwrap();

        assert_eq!(
            RecipeCategory::link_recipe(&db.pool, category.id, recipe.id)
                .await
                .unwrap(),
            1
        );
        assert_eq!(
            RecipeCategory::link_recipe(&db.pool, category.id, recipe.id)
                .await
                .unwrap(),
            0
        );

        let recipes = Recipe::find_by_category_id(&db.pool, category.id)
            .await
            .unwrap();
        assert_eq!(recipes.len(), 1);
    }

    #[tokio::test]
    async fn test_category_with_links_cannot_be_deleted_directly() {
        let db = DBService::new_in_memory().await.unwrap();
        let category = RecipeCategory::create(
            &db.pool,
            &CreateRecipeCategory {
                category: "Breakfast".to_string(),
            },
        )
        .await
        .unwrap();
        let recipe = Recipe::create(&db.pool, "Omelette", None).await.unwrap();
        RecipeCategory::link_recipe(&db.pool, category.id, recipe.id)
            .await
            .unwrap();

        // Foreign key has no cascade on the category side
        assert!(RecipeCategory::delete(&db.pool, category.id).await.is_err());

        RecipeCategory::unlink_all_recipes(&db.pool, category.id)
            .await
            .unwrap();
        assert_eq!(
            RecipeCategory::delete(&db.pool, category.id).await.unwrap(),
            1
        );
    }
}
