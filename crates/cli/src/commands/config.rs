use std::path::Path;

use anyhow::Result;
use walltastic_core::GalleryConfig;

pub fn run(config: &GalleryConfig, path: &Path, init: bool) -> Result<()> {
    if init {
        config.save_to_path(path)?;
        println!("Config written to: {}", path.display());
        return Ok(());
    }

    println!("Config file: {}", path.display());
    if !path.exists() {
        println!("(not present, using defaults; run `walltastic config --init` to create it)");
    }
    println!();
    println!("database       {}", config.storage.database.display());
    println!("catalog key    {}", config.storage.catalog_key);
    println!("favorites key  {}", config.storage.favorites_key);
    println!("page size      {}", config.display.page_size);
    println!("download dir   {}", config.device.download_dir.display());
    Ok(())
}
