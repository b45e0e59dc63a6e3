use std::fmt;
use std::path::Path;

use crate::domain::ImportReport;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Short, dismissible message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn favorite_toggled(now_favorite: bool) -> Self {
        if now_favorite {
            Self::success("Added to favorites")
        } else {
            Self::success("Removed from favorites")
        }
    }

    pub fn downloaded(path: &Path) -> Self {
        Self::success(format!("Image downloaded to {}", path.display()))
    }

    pub fn shared(path: &Path) -> Self {
        Self::success(format!("Shared {}", path.display()))
    }

    /// Summary of an import; `None` when the picker was cancelled.
    pub fn imported(report: &ImportReport) -> Option<Self> {
        if report.is_empty() {
            return None;
        }
        let added = report.added.len();
        let skipped = report.duplicates.len() + report.invalid;
        let message = match (added, skipped) {
            (1, 0) => "Added 1 image".to_string(),
            (n, 0) => format!("Added {n} images"),
            (0, s) => format!("Nothing added, {s} already in catalog or invalid"),
            (n, s) => format!("Added {n} images, skipped {s}"),
        };
        Some(if added > 0 {
            Self::success(message)
        } else {
            Self::info(message)
        })
    }
}

impl From<&Error> for Notice {
    fn from(err: &Error) -> Self {
        match err {
            Error::DuplicateEntry { uri } => Self::info(format!("Already in catalog: {uri}")),
            other => Self::error(other.to_string()),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ImageEntry;

    #[test]
    fn test_favorite_messages() {
        assert_eq!(Notice::favorite_toggled(true).message, "Added to favorites");
        assert_eq!(Notice::favorite_toggled(false).message, "Removed from favorites");
    }

    #[test]
    fn test_duplicate_is_informational() {
        let notice = Notice::from(&Error::DuplicateEntry {
            uri: "file:///a.png".into(),
        });
        assert_eq!(notice.level, NoticeLevel::Info);
        assert!(notice.message.contains("file:///a.png"));
    }

    #[test]
    fn test_download_failure_is_error() {
        let notice = Notice::from(&Error::DownloadFailed {
            uri: "file:///a.png".into(),
            message: "No such file".into(),
        });
        assert_eq!(notice.level, NoticeLevel::Error);
    }

    #[test]
    fn test_import_summaries() {
        assert!(Notice::imported(&ImportReport::default()).is_none());

        let one = ImportReport {
            added: vec![ImageEntry::new("1", "file:///a.png")],
            ..Default::default()
        };
        assert_eq!(Notice::imported(&one).unwrap().to_string(), "Added 1 image");

        let mixed = ImportReport {
            added: vec![
                ImageEntry::new("1", "file:///a.png"),
                ImageEntry::new("2", "file:///b.png"),
            ],
            duplicates: vec!["file:///c.png".into()],
            invalid: 0,
        };
        assert_eq!(
            Notice::imported(&mixed).unwrap().message,
            "Added 2 images, skipped 1"
        );

        let none = ImportReport {
            duplicates: vec!["file:///c.png".into()],
            ..Default::default()
        };
        assert_eq!(Notice::imported(&none).unwrap().level, NoticeLevel::Info);
    }
}
