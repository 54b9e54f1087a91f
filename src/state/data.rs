/// Records stored in the media library catalog
///
/// These structs represent the data model that flows between
/// the database layer and the picker grid.
use super::item::DisplayItem;

/// Kind of media a library asset holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }

    /// Classify a file by its extension
    pub fn from_extension(extension: &str) -> Option<Self> {
        const IMAGE_EXTENSIONS: [&str; 9] = ["jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff", "ico"];
        const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "m4v", "mov"];

        let extension = extension.to_lowercase();
        if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            Some(MediaKind::Image)
        } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

/// A single asset in the library
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    /// Unique database ID
    pub id: i64,
    /// Filename only (e.g., "IMG_0001.JPG")
    pub filename: String,
    /// Full path to the file; doubles as the asset identifier
    pub path: String,
    pub kind: MediaKind,
    /// Duration for videos whose header could be read
    pub duration_seconds: Option<f64>,
    /// File status: 'exists' or 'deleted'
    pub file_status: String,
}

impl Asset {
    /// What the grid shows for this asset
    pub fn display_item(&self) -> DisplayItem {
        match (self.kind, self.duration_seconds) {
            (MediaKind::Image, _) => DisplayItem::asset(self.path.clone(), 0.0),
            (MediaKind::Video, Some(duration)) => DisplayItem::asset(self.path.clone(), duration),
            (MediaKind::Video, None) => DisplayItem::VideoPlaceholder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(kind: MediaKind, duration_seconds: Option<f64>) -> Asset {
        Asset {
            id: 1,
            filename: "file".to_string(),
            path: "/photos/file".to_string(),
            kind,
            duration_seconds,
            file_status: "exists".to_string(),
        }
    }

    #[test]
    fn test_extension_classification() {
        assert_eq!(MediaKind::from_extension("JPG"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_extension("mov"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_extension("nef"), None);
    }

    #[test]
    fn test_display_items() {
        let image = asset(MediaKind::Image, None).display_item();
        assert_eq!(image.identifier(), Some("/photos/file"));

        match asset(MediaKind::Video, Some(12.5)).display_item() {
            DisplayItem::Asset { duration_seconds, .. } => assert_eq!(duration_seconds, 12.5),
            other => panic!("unexpected item {:?}", other),
        }

        assert!(matches!(
            asset(MediaKind::Video, None).display_item(),
            DisplayItem::VideoPlaceholder
        ));
    }
}
