use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "recipes")]
#[command(version)]
#[command(about = "Browse the recipe catalog with a cached photo store", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Refresh the catalog and list recipes
    List,
    /// Show one recipe with its large photo and links
    Show {
        /// Recipe uuid or name
        query: String,
    },
    /// Load a single photo through the cache
    Photo {
        /// Photo URL
        url: String,
        /// Save the decoded photo to this path (format from extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Refresh the catalog and load every thumbnail
    Warm,
    /// Show cache statistics
    Stats,
    /// Remove every cached photo
    ClearCache,
    /// Write the default configuration file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_photo_with_output() {
        let cli = Cli::parse_from([
            "recipes",
            "--verbose",
            "photo",
            "https://x/a.jpg",
            "-o",
            "a.png",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Photo { url, output } => {
                assert_eq!(url, "https://x/a.jpg");
                assert_eq!(output, Some(PathBuf::from("a.png")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_show_by_name() {
        let cli = Cli::parse_from(["recipes", "show", "Apam Balik"]);
        match cli.command {
            Commands::Show { query } => assert_eq!(query, "Apam Balik"),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_config_after_subcommand() {
        let cli = Cli::parse_from(["recipes", "clear-cache", "--config", "c.toml"]);
        assert!(matches!(cli.command, Commands::ClearCache));
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
    }
}
