use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite};
use ts_rs::TS;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Ingredient {
    pub id: i64,
    pub ingredient_name: String, // Unique, compared case-insensitively
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct IngredientView {
    pub id: i64,
    pub ingredient_name: String,
}

impl From<Ingredient> for IngredientView {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            ingredient_name: ingredient.ingredient_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateIngredient {
    pub ingredient_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIngredient {
    pub ingredient_name: String,
}

impl Ingredient {
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Ingredient>(
            r#"SELECT id, ingredient_name, created_at, updated_at
               FROM ingredients
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
        sqlx::query_as::<_, Ingredient>(
            r#"SELECT id, ingredient_name, created_at, updated_at
               FROM ingredients
               ORDER BY id ASC"#,
        )
        .fetch_all(executor)
        .await
    }

    /// Exact match; the column collation makes it case-insensitive
    pub async fn find_by_ingredient_name<'e, E>(
        executor: E,
        ingredient_name: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Ingredient>(
            r#"SELECT id, ingredient_name, created_at, updated_at
               FROM ingredients
               WHERE ingredient_name = $1"#,
        )
        .bind(ingredient_name)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_by_name_contains<'e, E>(
        executor: E,
        fragment: &str,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Ingredient>(
            r#"SELECT id, ingredient_name, created_at, updated_at
               FROM ingredients
               WHERE instr(lower(ingredient_name), lower($1)) > 0
               ORDER BY ingredient_name ASC"#,
        )
        .bind(fragment)
        .fetch_all(executor)
        .await
    }

    pub async fn exists<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ingredients WHERE id = $1")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(count > 0)
    }

    pub async fn create<'e, E>(executor: E, data: &CreateIngredient) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Ingredient>(
            r#"INSERT INTO ingredients (ingredient_name)
               VALUES ($1)
               RETURNING id, ingredient_name, created_at, updated_at"#,
        )
        .bind(data.ingredient_name.trim())
        .fetch_one(executor)
        .await
    }

    pub async fn update<'e, E>(
        executor: E,
        id: i64,
        ingredient_name: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Ingredient>(
            r#"UPDATE ingredients
               SET ingredient_name = $2, updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING id, ingredient_name, created_at, updated_at"#,
        )
        .bind(id)
        .bind(ingredient_name.trim())
        .fetch_optional(executor)
        .await
    }

    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
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
    async fn test_find_by_ingredient_name_ignores_case() {
        let db = DBService::new_in_memory().await.unwrap();
        Ingredient::create(
            &db.pool,
            &CreateIngredient {
                ingredient_name: "Flour".to_string(),
            },
        )
        .await
        .unwrap();

        let found = Ingredient::find_by_ingredient_name(&db.pool, "FLOUR")
            .await
            .unwrap();
        assert_eq!(found.map(|i| i.ingredient_name), Some("Flour".to_string()));
    }

    #[tokio::test]
    async fn test_find_by_name_contains_is_case_insensitive() {
        let db = DBService::new_in_memory().await.unwrap();
        for name in ["Wheat Flour", "Rye flour", "Sugar"] {
            Ingredient::create(
                &db.pool,
                &CreateIngredient {
                    ingredient_name: name.to_string(),
                },
            )
            .await
            .unwrap();
        }

        let names: Vec<String> = Ingredient::find_by_name_contains(&db.pool, "FLOUR")
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.ingredient_name)
            .collect();
        assert_eq!(names, vec!["Rye flour", "Wheat Flour"]);
    }

    #[tokio::test]
    async fn test_update_missing_row_returns_none() {
        let db = DBService::new_in_memory().await.unwrap();
        let updated = Ingredient::update(&db.pool, 99, "Salt").await.unwrap();
        assert!(updated.is_none());
    }
}
