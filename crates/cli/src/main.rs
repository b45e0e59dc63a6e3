mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use walltastic_core::{Gallery, GalleryConfig};

/// Walltastic — local wallpaper gallery
#[derive(Parser)]
#[command(name = "walltastic", version, about)]
struct Cli {
    /// Path to the config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the gallery database (overrides the config)
    #[arg(long)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add image files, or every image under the given directories
    Add {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Remove an image from the gallery
    Rm {
        /// Image ID
        id: String,
    },
    /// List images a page at a time
    Ls {
        /// Number of pages to show
        #[arg(long, default_value_t = 1)]
        pages: usize,
        /// Only show favorites
        #[arg(long)]
        favorites: bool,
    },
    /// Toggle the favorite flag of an image
    Fav {
        /// Image ID
        id: String,
    },
    /// Copy an image into the download directory
    Download {
        /// Image ID
        id: String,
    },
    /// Copy an image into the download directory and print its path for sharing
    Share {
        /// Image ID
        id: String,
    },
    /// Show gallery status summary
    Status,
    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,walltastic_core=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(GalleryConfig::default_path);
    let mut config = GalleryConfig::load_from_path(&config_path)?;
    if let Some(database) = cli.database {
        config.storage.database = database;
    }

    if let Commands::Config { init } = cli.command {
        return commands::config::run(&config, &config_path, init);
    }

    let mut gallery = Gallery::open_sqlite(&config).await?;

    match cli.command {
        Commands::Add { paths } => commands::images::add(&mut gallery, paths).await?,
        Commands::Rm { id } => commands::images::rm(&mut gallery, &id)?,
        Commands::Ls { pages, favorites } => {
            if favorites {
                commands::images::list_favorites(&gallery)?
            } else {
                commands::images::list(&mut gallery, pages)?
            }
        }
        Commands::Fav { id } => commands::images::toggle_favorite(&mut gallery, &id)?,
        Commands::Download { id } => {
            commands::device::download(&gallery, &id, &config.device.download_dir).await?
        }
        Commands::Share { id } => {
            commands::device::share(&gallery, &id, &config.device.download_dir).await?
        }
        Commands::Status => commands::status::run(&gallery, &config).await?,
        Commands::Config { .. } => unreachable!("handled before opening the gallery"),
    }

    // Writes are queued in the background; wait for them before exiting.
    gallery.flush().await?;
    Ok(())
}
