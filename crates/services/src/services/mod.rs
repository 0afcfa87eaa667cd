pub mod database_validator;
pub mod error;
pub mod ingredient;
pub mod recipe;
pub mod recipe_category;
pub mod recipe_ingredient;
pub mod recipe_instruction;
