use serde::{Deserialize, Serialize};

/// One image known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageEntry {
    /// Stable identifier, unique within the catalog.
    pub id: String,
    /// Opaque handle to the image: local path, `file://` URI or remote URL.
    pub uri: String,
}

impl ImageEntry {
    pub fn new(id: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uri: uri.into(),
        }
    }

    /// Last path segment of the URI, used as a file name for downloads.
    pub fn file_name(&self) -> &str {
        file_name_of(&self.uri)
    }
}

/// Last non-empty `/`-separated segment of a URI, with any query or fragment removed.
pub fn file_name_of(uri: &str) -> &str {
    let without_suffix = uri.split(['?', '#']).next().unwrap_or(uri);
    without_suffix
        .rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or(without_suffix)
}

/// What a load found in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Blob decoded; holds the number of records.
    Loaded(usize),
    /// No blob under the key (first run).
    Missing,
    /// Blob present but undecodable; state reset to empty.
    Corrupt,
    /// Store read failed; in-memory state left as it was.
    Unavailable,
}

/// Result of importing a batch of picked URIs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub added: Vec<ImageEntry>,
    /// URIs skipped because the catalog already holds them.
    pub duplicates: Vec<String>,
    /// URIs skipped because they were empty.
    pub invalid: usize,
}

impl ImportReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.duplicates.is_empty() && self.invalid == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_of_path_and_url() {
        assert_eq!(file_name_of("file:///data/photos/a.png"), "a.png");
        assert_eq!(file_name_of("https://cdn.example.com/w/b.jpg?size=large"), "b.jpg");
        assert_eq!(file_name_of("/tmp/dir/"), "dir");
        assert_eq!(file_name_of("plain.webp"), "plain.webp");
    }

    #[test]
    fn test_entry_file_name() {
        let entry = ImageEntry::new("abc", "file:///sdcard/DCIM/IMG_0001.JPG");
        assert_eq!(entry.file_name(), "IMG_0001.JPG");
    }

    #[test]
    fn test_import_report_is_empty() {
        assert!(ImportReport::default().is_empty());
        let report = ImportReport {
            invalid: 1,
            ..Default::default()
        };
        assert!(!report.is_empty());
    }
}
