use std::{env, fs, path::PathBuf};

use anyhow::Context;
use db::models::{
    ingredient::{CreateIngredient, IngredientView, UpdateIngredient},
    recipe::{CreateRecipe, RecipeLink, RecipeSummary, RecipeView, UpdateRecipe},
    recipe_category::{
        CategorySummary, CreateRecipeCategory, RecipeCategoryView, UpdateRecipeCategory,
    },
    recipe_ingredient::{
        CreateRecipeIngredient, Measurement, RecipeIngredientView, UpdateRecipeIngredient,
    },
    recipe_instruction::{CreateRecipeInstruction, RecipeInstructionView, UpdateRecipeInstruction},
};
use ts_rs::TS;
use utils::response::ApiResponse;

fn generate_types_content() -> String {
    let decls = [
        ApiResponse::<()>::decl(),
        Measurement::decl(),
        IngredientView::decl(),
        CreateIngredient::decl(),
        UpdateIngredient::decl(),
        RecipeInstructionView::decl(),
        CreateRecipeInstruction::decl(),
        UpdateRecipeInstruction::decl(),
        RecipeSummary::decl(),
        CategorySummary::decl(),
        RecipeCategoryView::decl(),
        CreateRecipeCategory::decl(),
        UpdateRecipeCategory::decl(),
        RecipeIngredientView::decl(),
        CreateRecipeIngredient::decl(),
        UpdateRecipeIngredient::decl(),
        RecipeView::decl(),
        CreateRecipe::decl(),
        UpdateRecipe::decl(),
        RecipeLink::decl(),
    ];

    let body = decls
        .iter()
        .map(|decl| format!("export {}", decl.trim_end_matches(';')))
        .collect::<Vec<_>>()
        .join(";\n\n");

    format!(
        "// This file was generated by `cargo run --bin generate_types`. Do not edit.\n\n{body};\n"
    )
}

fn main() -> anyhow::Result<()> {
    let output = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("shared/types.ts"));

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&output, generate_types_content())
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("Wrote TypeScript declarations to {}", output.display());
    Ok(())
}
