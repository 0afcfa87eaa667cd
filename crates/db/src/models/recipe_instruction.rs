use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite};
use ts_rs::TS;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct RecipeInstruction {
    pub id: i64,
    pub title: String,
    pub instruction: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInstructionView {
    pub id: i64,
    pub title: String,
    pub instruction: String,
}

impl From<RecipeInstruction> for RecipeInstructionView {
    fn from(instruction: RecipeInstruction) -> Self {
        Self {
            id: instruction.id,
            title: instruction.title,
            instruction: instruction.instruction,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeInstruction {
    pub title: String,
    pub instruction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeInstruction {
    pub title: String,
    pub instruction: String,
}

impl RecipeInstruction {
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, RecipeInstruction>(
            r#"SELECT id, title, instruction, created_at, updated_at
               FROM recipe_instructions
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
        sqlx::query_as::<_, RecipeInstruction>(
            r#"SELECT id, title, instruction, created_at, updated_at
               FROM recipe_instructions
               ORDER BY id ASC"#,
        )
        .fetch_all(executor)
        .await
    }

    pub async fn exists<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM recipe_instructions WHERE id = $1")
                .bind(id)
                .fetch_one(executor)
                .await?;
        Ok(count > 0)
    }

    pub async fn create<'e, E>(
        executor: E,
        data: &CreateRecipeInstruction,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, RecipeInstruction>(
            r#"INSERT INTO recipe_instructions (title, instruction)
               VALUES ($1, $2)
               RETURNING id, title, instruction, created_at, updated_at"#,
        )
        .bind(data.title.trim())
        .bind(&data.instruction)
        .fetch_one(executor)
        .await
    }

    pub async fn update<'e, E>(
        executor: E,
        id: i64,
        data: &UpdateRecipeInstruction,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, RecipeInstruction>(
            r#"UPDATE recipe_instructions
               SET title = $2, instruction = $3, updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING id, title, instruction, created_at, updated_at"#,
        )
        .bind(id)
        .bind(data.title.trim())
        .bind(&data.instruction)
        .fetch_optional(executor)
        .await
    }

    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM recipe_instructions WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
