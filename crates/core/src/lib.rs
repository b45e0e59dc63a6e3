pub mod catalog;
pub mod codec;
pub mod config;
pub mod device;
pub mod domain;
pub mod error;
pub mod favorites;
pub mod notice;
pub mod pager;
pub mod store;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

pub use catalog::Catalog;
pub use config::GalleryConfig;
pub use device::{Downloader, MediaPicker, Sharer};
pub use domain::{ImageEntry, ImportReport, LoadOutcome};
pub use error::{Error, Result};
pub use favorites::Favorites;
pub use notice::{Notice, NoticeLevel};
pub use pager::Pager;
pub use store::{KeyValueStore, MemoryStore, SqliteStore};

/// The main entry point: catalog, favorites and the grid pager over one store.
pub struct Gallery<S: KeyValueStore> {
    catalog: Catalog<S>,
    favorites: Favorites<S>,
    pager: Pager,
}

impl Gallery<SqliteStore> {
    /// Open the SQLite store named by the config and load both collections.
    pub async fn open_sqlite(config: &GalleryConfig) -> Result<Self> {
        let store = SqliteStore::open(&config.storage.database)?;
        Self::open(Arc::new(store), config).await
    }
}

impl<S: KeyValueStore> Gallery<S> {
    /// Bind to `store`, load catalog and favorites, start on the first page.
    pub async fn open(store: Arc<S>, config: &GalleryConfig) -> Result<Self> {
        config.validate()?;
        let pager = Pager::new(config.display.page_size)?;
        let mut gallery = Self {
            catalog: Catalog::new(Arc::clone(&store), config.storage.catalog_key.clone()),
            favorites: Favorites::new(store, config.storage.favorites_key.clone()),
            pager,
        };
        gallery.refresh().await;
        Ok(gallery)
    }

    /// Reload both collections from the store and go back to the first page.
    pub async fn refresh(&mut self) -> (LoadOutcome, LoadOutcome) {
        let catalog = self.catalog.load().await;
        let favorites = self.favorites.load().await;
        self.pager.restart();
        (catalog, favorites)
    }

    pub fn catalog(&self) -> &Catalog<S> {
        &self.catalog
    }

    pub fn favorites(&self) -> &Favorites<S> {
        &self.favorites
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn pager_mut(&mut self) -> &mut Pager {
        &mut self.pager
    }

    pub fn entries(&self) -> &[ImageEntry] {
        self.catalog.list()
    }

    pub fn get(&self, id: &str) -> Result<&ImageEntry> {
        self.catalog
            .get(id)
            .ok_or_else(|| Error::EntryNotFound(id.to_string()))
    }

    pub fn add(&mut self, uri: &str) -> Result<ImageEntry> {
        self.catalog.add(uri)
    }

    /// Add every URI, skipping ones already present or empty.
    pub fn import<I, T>(&mut self, uris: I) -> ImportReport
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut report = ImportReport::default();
        for uri in uris {
            let uri = uri.as_ref();
            match self.catalog.add(uri) {
                Ok(entry) => report.added.push(entry),
                Err(Error::DuplicateEntry { uri }) => report.duplicates.push(uri),
                Err(_) => report.invalid += 1,
            }
        }
        if !report.is_empty() {
            info!(
                added = report.added.len(),
                duplicates = report.duplicates.len(),
                invalid = report.invalid,
                "import finished"
            );
        }
        report
    }

    /// Ask `picker` for images and import them. A cancelled pick yields an empty report.
    pub async fn pick_and_import<P: MediaPicker>(&mut self, picker: &P) -> Result<ImportReport> {
        let uris = picker.pick().await?;
        Ok(self.import(uris))
    }

    pub fn remove(&mut self, id: &str) -> Option<ImageEntry> {
        self.catalog.remove(id)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.is_favorite(id)
    }

    /// Toggle the favorite flag of a catalog entry. Returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool> {
        if self.catalog.get(id).is_none() {
            return Err(Error::EntryNotFound(id.to_string()));
        }
        Ok(self.favorites.toggle(id))
    }

    pub fn favorite_entries(&self) -> Vec<&ImageEntry> {
        self.favorites.list_favorite_entries(self.catalog.list())
    }

    /// Entries currently shown in the grid.
    pub fn visible(&self) -> &[ImageEntry] {
        self.pager.visible_slice(self.catalog.list())
    }

    /// The grid reached its end; load another page if there is one.
    pub fn on_near_end(&mut self) -> bool {
        self.pager.sync_len(self.catalog.len());
        self.pager.on_near_end()
    }

    /// Per-frame scroll reading from the grid; advances once per arrival at the end.
    pub fn on_scroll(&mut self, at_end: bool) -> bool {
        self.pager.sync_len(self.catalog.len());
        self.pager.on_scroll(at_end)
    }

    /// Save a local copy of an entry's image.
    pub async fn download<D: Downloader>(&self, id: &str, downloader: &D) -> Result<PathBuf> {
        let entry = self.get(id)?;
        downloader.download(&entry.uri).await
    }

    /// Save a local copy of an entry's image and hand it to `sharer`.
    pub async fn share<D: Downloader, H: Sharer>(
        &self,
        id: &str,
        downloader: &D,
        sharer: &H,
    ) -> Result<PathBuf> {
        let path = self.download(id, downloader).await?;
        sharer.share(&path).await?;
        Ok(path)
    }

    /// Wait for both collections' latest writes. Reports the first failure.
    pub async fn flush(&mut self) -> Result<()> {
        let catalog = self.catalog.flush().await;
        let favorites = self.favorites.flush().await;
        catalog.and(favorites)
    }
}

impl<S: KeyValueStore> std::fmt::Debug for Gallery<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gallery")
            .field("catalog", &self.catalog)
            .field("favorites", &self.favorites)
            .field("pager", &self.pager)
            .finish()
    }
}
