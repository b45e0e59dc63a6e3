use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use walltastic_core::device::PathPicker;
use walltastic_core::{Gallery, ImageEntry, Notice, SqliteStore};

pub async fn add(gallery: &mut Gallery<SqliteStore>, paths: Vec<PathBuf>) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.set_message("Looking for images...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let picked = gallery.pick_and_import(&PathPicker::new(paths)).await;
    spinner.finish_and_clear();
    let report = picked?;

    for entry in &report.added {
        println!("  + {}  {}", entry.id, entry.uri);
    }
    for uri in &report.duplicates {
        println!("  = {uri} (already in gallery)");
    }
    match Notice::imported(&report) {
        Some(notice) => println!("{notice}"),
        None => println!("No images found."),
    }
    Ok(())
}

pub fn rm(gallery: &mut Gallery<SqliteStore>, id: &str) -> Result<()> {
    match gallery.remove(id) {
        Some(entry) => println!("Removed {} ({})", entry.id, entry.uri),
        None => println!("No image with ID {id}."),
    }
    Ok(())
}

pub fn toggle_favorite(gallery: &mut Gallery<SqliteStore>, id: &str) -> Result<()> {
    let now_favorite = gallery.toggle_favorite(id)?;
    println!("{}", Notice::favorite_toggled(now_favorite));
    Ok(())
}

/// Show the first `pages` pages, advancing the pager the way a scrolling grid would.
pub fn list(gallery: &mut Gallery<SqliteStore>, pages: usize) -> Result<()> {
    if gallery.entries().is_empty() {
        println!("Gallery is empty. Add images with `walltastic add <path>`.");
        return Ok(());
    }

    for _ in 1..pages {
        if !gallery.on_near_end() {
            break;
        }
    }

    let total = gallery.entries().len();
    let visible = gallery.visible().to_vec();
    let flags: Vec<bool> = visible.iter().map(|e| gallery.is_favorite(&e.id)).collect();

    println!("{}", entries_table(&visible, &flags));
    println!(
        "Showing {} of {} images ({} per page)",
        visible.len(),
        total,
        gallery.pager().page_size()
    );
    if visible.len() < total {
        println!("Use --pages {} to see more.", gallery.pager().loaded_pages() + 1);
    }
    Ok(())
}

pub fn list_favorites(gallery: &Gallery<SqliteStore>) -> Result<()> {
    let favorites: Vec<ImageEntry> = gallery.favorite_entries().into_iter().cloned().collect();
    if favorites.is_empty() {
        println!("No favorites added yet.");
        return Ok(());
    }
    let flags = vec![true; favorites.len()];
    println!("{}", entries_table(&favorites, &flags));
    println!("{} favorites", favorites.len());
    Ok(())
}

fn entries_table(entries: &[ImageEntry], favorite: &[bool]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("#"), Cell::new("ID"), Cell::new("Fav"), Cell::new("URI")]);

    for (i, (entry, fav)) in entries.iter().zip(favorite).enumerate() {
        let fav_cell = if *fav {
            Cell::new("♥").fg(Color::Red)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&entry.id),
            fav_cell,
            Cell::new(&entry.uri),
        ]);
    }
    table
}
