use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;
use url::Url;

use crate::app::{init_config, AppState};
use crate::catalog::{find_recipe, Recipe};
use crate::coordinator::RefreshOutcome;

use super::Commands;

/// Handle CLI subcommands that need the application state
pub async fn handle_command(command: &Commands, app: &AppState) -> Result<()> {
    match command {
        Commands::List => list_recipes(app).await,
        Commands::Show { query } => show_recipe(app, query).await,
        Commands::Photo { url, output } => load_photo(app, url, output.as_deref()).await,
        Commands::Warm => warm_thumbnails(app).await,
        Commands::Stats => {
            println!("{}", app.cache.stats().await.format());
            Ok(())
        }
        Commands::ClearCache => {
            app.coordinator.clear_resource_cache().await;
            println!("{}", "Photo cache cleared".green());
            Ok(())
        }
        Commands::Init => init(),
    }
}

/// Write the default config file
pub fn init() -> Result<()> {
    match init_config()? {
        Some(path) => println!("Created default configuration at: {}", path.display()),
        None => println!("Configuration already exists"),
    }
    Ok(())
}

async fn refresh(app: &AppState) -> Result<usize> {
    match app.coordinator.refresh_catalog().await {
        RefreshOutcome::Completed(count) => Ok(count),
        RefreshOutcome::Skipped => Ok(app.coordinator.recipes().len()),
        RefreshOutcome::Failed => {
            let reason = app
                .coordinator
                .last_error()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string());
            bail!("Could not load recipes from {}: {}", app.coordinator.catalog_url(), reason)
        }
    }
}

async fn list_recipes(app: &AppState) -> Result<()> {
    if refresh(app).await? == 0 {
        println!("{}", "No recipes available".yellow());
        return Ok(());
    }

    for recipe in app.coordinator.recipes() {
        match &recipe.cuisine {
            Some(cuisine) => println!("  • {} {}", recipe.name.bold(), cuisine.dimmed()),
            None => println!("  • {}", recipe.name.bold()),
        }
    }
    Ok(())
}

/// A recipe with its large photo, if one could be loaded
#[derive(Debug)]
struct RecipeDetail {
    recipe: Recipe,
    photo: Option<Arc<DynamicImage>>,
}

async fn recipe_detail(app: &AppState, query: &str) -> Result<RecipeDetail> {
    refresh(app).await?;
    let recipe = find_recipe(&app.coordinator.recipes(), query)
        .cloned()
        .ok_or_else(|| anyhow!("No recipe matches '{}'", query))?;

    let photo = match &recipe.photo_url_large {
        Some(url) => app.coordinator.load_resource(url).await,
        None => None,
    };
    Ok(RecipeDetail { recipe, photo })
}

async fn show_recipe(app: &AppState, query: &str) -> Result<()> {
    let RecipeDetail { recipe, photo } = recipe_detail(app, query).await?;

    println!("{}", recipe.name.bold());
    if let Some(cuisine) = &recipe.cuisine {
        println!("  Cuisine: {}", cuisine);
    }
    match (&photo, &recipe.photo_url_large) {
        (Some(image), _) => println!("  Photo:   {}x{}", image.width(), image.height()),
        (None, Some(url)) => println!("  Photo:   {}", format!("unavailable ({})", url).yellow()),
        (None, None) => println!("  Photo:   {}", "none".dimmed()),
    }
    if let Some(url) = &recipe.source_url {
        println!("  Source:  {}", url.as_str().cyan());
    }
    if let Some(url) = &recipe.youtube_url {
        println!("  YouTube: {}", url.as_str().cyan());
    }
    Ok(())
}

async fn load_photo(app: &AppState, url: &str, output: Option<&Path>) -> Result<()> {
    let url = Url::parse(url).with_context(|| format!("Invalid photo URL '{}'", url))?;

    let Some(image) = app.coordinator.load_resource(&url).await else {
        bail!("Could not load photo from {}", url);
    };
    println!("{} {}x{}", "Loaded".green(), image.width(), image.height());

    if let Some(path) = output {
        image
            .save(path)
            .with_context(|| format!("Failed to save photo to {}", path.display()))?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}

async fn warm_thumbnails(app: &AppState) -> Result<()> {
    refresh(app).await?;
    let total = app
        .coordinator
        .recipes()
        .iter()
        .filter(|r| r.photo_url_small.is_some())
        .count();
    let loaded = app
        .coordinator
        .warm_thumbnails(app.config.thumbnails.concurrency)
        .await;

    let summary = format!("{}/{} thumbnails cached", loaded, total);
    if loaded == total {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.yellow());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Config;
    use crate::network::MockByteFetcher;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    const CATALOG: &[u8] = br#"{
        "recipes": [
            {
                "name": "Apam Balik",
                "cuisine": "Malaysian",
                "uuid": "0c6ca6e7-e32a-4053-b824-1dbf749910d8",
                "photo_url_large": "https://test.com/large.jpg",
                "photo_url_small": "https://test.com/small.jpg",
                "source_url": "https://www.nyonyacooking.com/recipes/apam-balik",
                "youtube_url": "https://www.youtube.com/watch?v=6R8ffRRJcrg"
            },
            {
                "name": "Bakewell Tart",
                "cuisine": "British",
                "uuid": "eed6005f-f8c8-451f-98d0-4088e2b40eb6"
            }
        ]
    }"#;

    fn png(width: u32, height: u32) -> bytes::Bytes {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 10, 10])))
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        bytes::Bytes::from(out.into_inner())
    }

    fn app_with(temp_dir: &TempDir, fetcher: MockByteFetcher) -> AppState {
        let mut config = Config::default();
        config.cache.directory = Some(temp_dir.path().to_path_buf());
        config.catalog.url = "https://test.com/recipes.json".to_string();
        AppState::with_fetcher(config, Arc::new(fetcher)).unwrap()
    }

    #[tokio::test]
    async fn test_recipe_detail_loads_large_photo_and_links() {
        let temp_dir = TempDir::new().unwrap();
        let mut fetcher = MockByteFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|u| u.path() == "/recipes.json")
            .times(1)
            .returning(|_| Ok(bytes::Bytes::from_static(CATALOG)));
        let large = png(12, 9);
        fetcher
            .expect_fetch()
            .withf(|u| u.path() == "/large.jpg")
            .times(1)
            .returning(move |_| Ok(large.clone()));
        let app = app_with(&temp_dir, fetcher);

        let detail = recipe_detail(&app, "apam balik").await.unwrap();
        assert_eq!(detail.recipe.cuisine.as_deref(), Some("Malaysian"));
        let photo = detail.photo.unwrap();
        assert_eq!((photo.width(), photo.height()), (12, 9));
        assert_eq!(
            detail.recipe.source_url.as_ref().map(Url::as_str),
            Some("https://www.nyonyacooking.com/recipes/apam-balik")
        );
        assert_eq!(
            detail.recipe.youtube_url.as_ref().map(Url::as_str),
            Some("https://www.youtube.com/watch?v=6R8ffRRJcrg")
        );

        // The large photo is now cached under its own URL
        let large_url = Url::parse("https://test.com/large.jpg").unwrap();
        assert!(app.cache.retrieve(&large_url).await.is_some());
    }

    #[tokio::test]
    async fn test_recipe_detail_without_photo_skips_network() {
        let temp_dir = TempDir::new().unwrap();
        let mut fetcher = MockByteFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|u| u.path() == "/recipes.json")
            .times(1)
            .returning(|_| Ok(bytes::Bytes::from_static(CATALOG)));
        let app = app_with(&temp_dir, fetcher);

        let detail = recipe_detail(&app, "eed6005f-f8c8-451f-98d0-4088e2b40eb6")
            .await
            .unwrap();
        assert_eq!(detail.recipe.name, "Bakewell Tart");
        assert!(detail.photo.is_none());
        assert!(detail.recipe.source_url.is_none());
    }

    #[tokio::test]
    async fn test_recipe_detail_unknown_recipe() {
        let temp_dir = TempDir::new().unwrap();
        let mut fetcher = MockByteFetcher::new();
        fetcher
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(bytes::Bytes::from_static(CATALOG)));
        let app = app_with(&temp_dir, fetcher);

        let err = recipe_detail(&app, "Chocolate Gateau").await.unwrap_err();
        assert!(err.to_string().contains("Chocolate Gateau"));
    }
}
