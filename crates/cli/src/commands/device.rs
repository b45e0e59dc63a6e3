use std::path::Path;

use anyhow::Result;
use walltastic_core::device::{FsDownloader, Sharer};
use walltastic_core::{Gallery, Notice, SqliteStore};

/// Terminal stand-in for a share sheet: prints the file to hand off.
struct PrintSharer;

impl Sharer for PrintSharer {
    async fn share(&self, path: &Path) -> walltastic_core::Result<()> {
        println!("{}", path.display());
        Ok(())
    }
}

pub async fn download(gallery: &Gallery<SqliteStore>, id: &str, dir: &Path) -> Result<()> {
    let downloader = FsDownloader::new(dir);
    let path = gallery.download(id, &downloader).await?;
    println!("{}", Notice::downloaded(&path));
    Ok(())
}

pub async fn share(gallery: &Gallery<SqliteStore>, id: &str, dir: &Path) -> Result<()> {
    let downloader = FsDownloader::new(dir);
    let path = gallery.share(id, &downloader, &PrintSharer).await?;
    eprintln!("{}", Notice::shared(&path));
    Ok(())
}
