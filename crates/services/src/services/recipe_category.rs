//! Recipe categories and their many-to-many link with recipes.

use db::models::{
    recipe::Recipe,
    recipe_category::{
        CreateRecipeCategory, RecipeCategory, RecipeCategoryView, UpdateRecipeCategory,
    },
};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::error::{ServiceError, ensure_not_blank, ensure_valid_id};

const ENTITY: &str = "Recipe category";

pub struct RecipeCategoryService;

impl RecipeCategoryService {
    async fn to_view(
        pool: &SqlitePool,
        category: RecipeCategory,
    ) -> Result<RecipeCategoryView, ServiceError> {
        let recipes = Recipe::find_by_category_id(pool, category.id).await?;
        Ok(RecipeCategoryView::new(category, recipes))
    }

    pub async fn save(
        pool: &SqlitePool,
        data: &CreateRecipeCategory,
    ) -> Result<RecipeCategoryView, ServiceError> {
        ensure_not_blank("category", &data.category)?;

        let category = RecipeCategory::create(pool, data).await?;
        info!(category_id = category.id, category = %category.category, "Created recipe category");

        Ok(RecipeCategoryView::new(category, Vec::new()))
    }

    pub async fn find_by_id(
        pool: &SqlitePool,
        id: i64,
    ) -> Result<RecipeCategoryView, ServiceError> {
        ensure_valid_id(id)?;

        let category = RecipeCategory::find_by_id(pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))?;
        Self::to_view(pool, category).await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<RecipeCategoryView>, ServiceError> {
        let categories = RecipeCategory::find_all(pool).await?;

        let mut views = Vec::with_capacity(categories.len());
        for category in categories {
            views.push(Self::to_view(pool, category).await?);
        }
        Ok(views)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &UpdateRecipeCategory,
    ) -> Result<RecipeCategoryView, ServiceError> {
        ensure_valid_id(id)?;
        ensure_not_blank("category", &data.category)?;

        let category = RecipeCategory::update(pool, id, &data.category)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))?;

        info!(category_id = id, "Updated recipe category");
        Self::to_view(pool, category).await
    }

    /// Unlinks the category from every recipe, then removes it. False when absent.
    pub async fn delete_by_id(pool: &SqlitePool, id: i64) -> Result<bool, ServiceError> {
        ensure_valid_id(id)?;

        let mut tx = pool.begin().await?;

        if !RecipeCategory::exists(&mut *tx, id).await? {
            debug!(category_id = id, "Delete skipped, recipe category does not exist");
            return Ok(false);
        }

        let unlinked = RecipeCategory::unlink_all_recipes(&mut *tx, id).await?;
        RecipeCategory::delete(&mut *tx, id).await?;
        tx.commit().await?;

        info!(
            category_id = id,
            unlinked_recipes = unlinked,
            "Deleted recipe category"
        );
        Ok(true)
    }

    pub async fn delete(
        pool: &SqlitePool,
        category: &RecipeCategory,
    ) -> Result<bool, ServiceError> {
        Self::delete_by_id(pool, category.id).await
    }

    /// Link a recipe to the category.
    ///
    /// `None` when the category does not exist. A missing recipe leaves the
    /// category unchanged and its current view is returned.
    pub async fn add_recipe(
        pool: &SqlitePool,
        category_id: i64,
        recipe_id: i64,
    ) -> Result<Option<RecipeCategoryView>, ServiceError> {
        if category_id < 1 {
            return Ok(None);
        }

        let mut tx = pool.begin().await?;

        let Some(category) = RecipeCategory::find_by_id(&mut *tx, category_id).await? else {
            debug!(category_id, recipe_id, "add_recipe: recipe category does not exist");
            return Ok(None);
        };

        if recipe_id >= 1 && Recipe::exists(&mut *tx, recipe_id).await? {
            RecipeCategory::link_recipe(&mut *tx, category_id, recipe_id).await?;
            info!(category_id, recipe_id, "Linked recipe to category");
        } else {
            debug!(category_id, recipe_id, "add_recipe: recipe does not exist");
        }

        let recipes = Recipe::find_by_category_id(&mut *tx, category_id).await?;
        tx.commit().await?;

        Ok(Some(RecipeCategoryView::new(category, recipes)))
    }

    /// Unlink a recipe from the category. Returns whether a link was removed;
    /// an absent category or recipe is a no-op.
    pub async fn remove_recipe(
        pool: &SqlitePool,
        category_id: i64,
        recipe_id: i64,
    ) -> Result<bool, ServiceError> {
        if category_id < 1 || recipe_id < 1 {
            return Ok(false);
        }

        let mut tx = pool.begin().await?;

        let both_exist = RecipeCategory::exists(&mut *tx, category_id).await?
            && Recipe::exists(&mut *tx, recipe_id).await?;
        if !both_exist {
            debug!(category_id, recipe_id, "remove_recipe: category or recipe does not exist");
            return Ok(false);
        }

        let removed = RecipeCategory::unlink_recipe(&mut *tx, category_id, recipe_id).await?;
        tx.commit().await?;

        if removed > 0 {
            info!(category_id, recipe_id, "Unlinked recipe from category");
        }
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use db::DBService;

    use super::*;

    async fn category(pool: &SqlitePool, name: &str) -> RecipeCategoryView {
        RecipeCategoryService::save(
            pool,
            &CreateRecipeCategory {
                category: name.to_string(),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_delete_removes_category_from_all_recipes() {
        let db = DBService::new_in_memory().await.unwrap();
        let vegan = category(&db.pool, "Vegan").await;
        let quick = category(&db.pool, "Quick").await;

        let mut recipe_ids = Vec::new();
        for name in ["Salad", "Curry", "Soup"] {
            let recipe = Recipe::create(&db.pool, name, None).await.unwrap();
            RecipeCategoryService::add_recipe(&db.pool, vegan.id, recipe.id)
                .await
                .unwrap();
            RecipeCategoryService::add_recipe(&db.pool, quick.id, recipe.id)
                .await
                .unwrap();
            recipe_ids.push(recipe.id);
        }

        assert!(RecipeCategoryService::delete_by_id(&db.pool, vegan.id)
            .await
            .unwrap());

        for recipe_id in recipe_ids {
            let categories = RecipeCategory::find_by_recipe_id(&db.pool, recipe_id)
                .await
                .unwrap();
            let ids: Vec<i64> = categories.iter().map(|c| c.id).collect();
            assert_eq!(ids, vec![quick.id]);
        }
        assert!(matches!(
            RecipeCategoryService::find_by_id(&db.pool, vegan.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_add_recipe_with_missing_recipe_returns_unchanged_view() {
        let db = DBService::new_in_memory().await.unwrap();
        let dinner = category(&db.pool, "Dinner").await;

        let view = RecipeCategoryService::add_recipe(&db.pool, dinner.id, 404)
            .await
            .unwrap()
            .expect("category exists");
        assert_eq!(view, dinner);
        assert!(view.recipes.is_empty());
    }

    #[tokio::test]
    async fn test_add_recipe_with_missing_category_returns_none() {
        let db = DBService::new_in_memory().await.unwrap();
        let recipe = Recipe::create(&db.pool, "Toast", None).await.unwrap();

        assert!(RecipeCategoryService::add_recipe(&db.pool, 77, recipe.id)
            .await
            .unwrap()
            .is_none());
        assert!(RecipeCategoryService::add_recipe(&db.pool, 77, 404)
            .await
            .unwrap()
            .is_none());
        assert!(RecipeCategoryService::add_recipe(&db.pool, 0, recipe.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_add_then_remove_recipe() {
        let db = DBService::new_in_memory().await.unwrap();
        let lunch = category(&db.pool, "Lunch").await;
        let recipe = Recipe::create(&db.pool, "Wrap", None).await.unwrap();

        let view = RecipeCategoryService::add_recipe(&db.pool, lunch.id, recipe.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(view.recipes.len(), 1);
        assert_eq!(view.recipes[0].recipe_name, "Wrap");

        assert!(RecipeCategoryService::remove_recipe(&db.pool, lunch.id, recipe.id)
            .await
            .unwrap());
        // Second removal is a silent no-op
        assert!(!RecipeCategoryService::remove_recipe(&db.pool, lunch.id, recipe.id)
            .await
            .unwrap());
        assert!(!RecipeCategoryService::remove_recipe(&db.pool, 999, recipe.id)
            .await
            .unwrap());

        let view = RecipeCategoryService::find_by_id(&db.pool, lunch.id)
            .await
            .unwrap();
        assert!(view.recipes.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_category_is_not_found() {
        let db = DBService::new_in_memory().await.unwrap();
        let result = RecipeCategoryService::update(
            &db.pool,
            3,
            &UpdateRecipeCategory {
                category: "Brunch".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(ServiceError::NotFound { id: 3, .. })));
    }

    #[tokio::test]
    async fn test_invalid_ids_are_rejected_before_lookup() {
        let db = DBService::new_in_memory().await.unwrap();
        db.pool.close().await;

        for id in [0, -1, i64::MIN] {
            assert!(matches!(
                RecipeCategoryService::find_by_id(&db.pool, id).await,
                Err(ServiceError::InvalidArgument(_))
            ));
            assert!(matches!(
                RecipeCategoryService::delete_by_id(&db.pool, id).await,
                Err(ServiceError::InvalidArgument(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_blank_category_is_invalid() {
        let db = DBService::new_in_memory().await.unwrap();

        for name in ["", "   "] {
            assert!(matches!(
                RecipeCategoryService::save(
                    &db.pool,
                    &CreateRecipeCategory {
                        category: name.to_string(),
                    },
                )
                .await,
                Err(ServiceError::InvalidArgument(_))
            ));
        }

        let brunch = category(&db.pool, "Brunch").await;
        assert!(matches!(
            RecipeCategoryService::update(
                &db.pool,
                brunch.id,
                &UpdateRecipeCategory {
                    category: " ".to_string(),
                },
            )
            .await,
            Err(ServiceError::InvalidArgument(_))
        ));

        let all = RecipeCategoryService::find_all(&db.pool).await.unwrap();
        assert_eq!(all, vec![brunch]);
    }

    #[tokio::test]
    async fn test_remove_missing_recipe_keeps_existing_links() {
        let db = DBService::new_in_memory().await.unwrap();
        let dessert = category(&db.pool, "Dessert").await;
        let pie = Recipe::create(&db.pool, "Pie", None).await.unwrap();
        RecipeCategoryService::add_recipe(&db.pool, dessert.id, pie.id)
            .await
            .unwrap();

        assert!(!RecipeCategoryService::remove_recipe(&db.pool, dessert.id, 404)
            .await
            .unwrap());
        assert!(!RecipeCategoryService::remove_recipe(&db.pool, dessert.id, 0)
            .await
            .unwrap());

        let view = RecipeCategoryService::find_by_id(&db.pool, dessert.id)
            .await
            .unwrap();
        assert_eq!(view.recipes.len(), 1);
        assert_eq!(view.recipes[0].id, pie.id);
    }

    #[tokio::test]
    async fn test_delete_missing_category_returns_false() {
        let db = DBService::new_in_memory().await.unwrap();
        assert!(!RecipeCategoryService::delete_by_id(&db.pool, 42)
            .await
            .unwrap());

        let snack = category(&db.pool, "Snack").await;
        assert!(RecipeCategoryService::delete_by_id(&db.pool, snack.id)
            .await
            .unwrap());
        assert!(!RecipeCategoryService::delete_by_id(&db.pool, snack.id)
            .await
            .unwrap());
    }
}
