// Gateway module for catalog - follows the Train Station Pattern
// All external access must go through this gateway

mod types;

pub use types::{find_recipe, Recipe, RecipeResponse};
