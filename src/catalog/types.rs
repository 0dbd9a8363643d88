use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::utils::Result;

/// Response body of the catalog endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub recipes: Vec<Recipe>,
}

impl RecipeResponse {
    /// Parse a catalog document
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }
}

/// A single recipe record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Cuisine type (e.g. "Italian", "Malaysian")
    #[serde(default)]
    pub cuisine: Option<String>,
    pub name: String,
    /// High resolution photo, shown on the detail screen
    #[serde(default)]
    pub photo_url_large: Option<Url>,
    /// Thumbnail, shown in list rows
    #[serde(default)]
    pub photo_url_small: Option<Url>,
    #[serde(rename = "uuid")]
    pub id: Uuid,
    #[serde(default)]
    pub source_url: Option<Url>,
    #[serde(default)]
    pub youtube_url: Option<Url>,
}

/// Find a recipe by its uuid, or else by name ignoring case
pub fn find_recipe<'a>(recipes: &'a [Recipe], query: &str) -> Option<&'a Recipe> {
    let query = query.trim();
    if let Ok(id) = Uuid::parse_str(query) {
        if let Some(recipe) = recipes.iter().find(|r| r.id == id) {
            return Some(recipe);
        }
    }
    let lowered = query.to_lowercase();
    recipes.iter().find(|r| r.name.to_lowercase() == lowered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_recipe_decoding() {
        let json = r#"{
            "name": "Test Recipe",
            "cuisine": "Italian",
            "uuid": "123e4567-e89b-12d3-a456-426614174000",
            "photo_url_large": "https://test.com/large.jpg",
            "photo_url_small": "https://test.com/small.jpg",
            "source_url": "https://test.com/recipe",
            "youtube_url": "https://youtube.com/watch"
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.name, "Test Recipe");
        assert_eq!(recipe.cuisine.as_deref(), Some("Italian"));
        assert_eq!(
            recipe.photo_url_large.as_ref().map(Url::as_str),
            Some("https://test.com/large.jpg")
        );
        assert_eq!(
            recipe.id,
            Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap()
        );
    }

    #[test]
    fn test_recipe_decoding_optional_fields() {
        let json = r#"{
            "name": "Test Recipe",
            "uuid": "123e4567-e89b-12d3-a456-426614174000"
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.name, "Test Recipe");
        assert_eq!(recipe.cuisine, None);
        assert_eq!(recipe.photo_url_large, None);
        assert_eq!(recipe.photo_url_small, None);
    }

    #[test]
    fn test_recipe_requires_name_and_uuid() {
        assert!(serde_json::from_str::<Recipe>(r#"{"name": "No id"}"#).is_err());
        assert!(serde_json::from_str::<Recipe>(
            r#"{"uuid": "123e4567-e89b-12d3-a456-426614174000"}"#
        )
        .is_err());
    }

    #[test]
    fn test_empty_response() {
        let response = RecipeResponse::from_slice(br#"{"recipes": []}"#).unwrap();
        assert!(response.recipes.is_empty());
    }

    #[test]
    fn test_invalid_json_is_catalog_error() {
        let err = RecipeResponse::from_slice(b"invalid json").unwrap_err();
        assert!(matches!(err, crate::utils::RecipeError::Catalog(_)));
    }

    fn recipe(name: &str, id: &str) -> Recipe {
        Recipe {
            cuisine: None,
            name: name.to_string(),
            photo_url_large: None,
            photo_url_small: None,
            id: Uuid::parse_str(id).unwrap(),
            source_url: None,
            youtube_url: None,
        }
    }

    #[test]
    fn test_find_recipe_by_uuid_or_name() {
        let recipes = vec![
            recipe("Apam Balik", "0c6ca6e7-e32a-4053-b824-1dbf749910d8"),
            recipe("Bakewell Tart", "eed6005f-f8c8-451f-98d0-4088e2b40eb6"),
        ];

        let by_id = find_recipe(&recipes, "eed6005f-f8c8-451f-98d0-4088e2b40eb6").unwrap();
        assert_eq!(by_id.name, "Bakewell Tart");

        let by_name = find_recipe(&recipes, "  apam balik ").unwrap();
        assert_eq!(by_name.id, recipes[0].id);

        assert!(find_recipe(&recipes, "Crème Brûlée").is_none());
        assert!(find_recipe(&recipes, "123e4567-e89b-12d3-a456-426614174000").is_none());
    }

    #[test]
    fn test_find_recipe_non_ascii_name() {
        let recipes = vec![recipe("Crème Brûlée", "123e4567-e89b-12d3-a456-426614174000")];
        assert!(find_recipe(&recipes, "CRÈME BRÛLÉE").is_some());
    }
}
