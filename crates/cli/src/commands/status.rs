use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use walltastic_core::{Gallery, GalleryConfig, SqliteStore};

pub async fn run(gallery: &Gallery<SqliteStore>, config: &GalleryConfig) -> Result<()> {
    let total = gallery.entries().len();
    let favorites = gallery.favorite_entries().len();
    let dangling = gallery.favorites().len() - favorites;

    println!();
    println!("  Database:   {}", config.storage.database.display());
    println!("  Downloads:  {}", config.device.download_dir.display());
    println!("  Page size:  {}", gallery.pager().page_size());
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("Images"), Cell::new("Favorites"), Cell::new("Pages")]);
    let page_size = gallery.pager().page_size();
    table.add_row(vec![
        Cell::new(total),
        Cell::new(favorites),
        Cell::new(total.div_ceil(page_size)),
    ]);
    println!("{table}");

    if dangling > 0 {
        println!("  {dangling} favorites point at removed images.");
    }

    let store = SqliteStore::open(&config.storage.database)?;
    let keys = store.keys().await?;
    if !keys.is_empty() {
        println!();
        for (key, updated) in keys {
            println!("  {key:<20} last saved {}", updated.format("%Y-%m-%d %H:%M:%S UTC"));
        }
    }
    println!();
    Ok(())
}
