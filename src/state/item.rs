/// What a grid cell can display
///
/// These types flow from the data source (the media library, or the camera
/// capture) into `GridCell::configure`.
use iced::widget::image::Handle;
use iced::ContentFit;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PICTURE_ID: AtomicU64 = AtomicU64::new(1);

/// One entry of the picker grid
#[derive(Debug, Clone)]
pub enum DisplayItem {
    /// A reference into the media library
    Asset {
        identifier: String,
        duration_seconds: f64,
    },
    /// A pre-decoded image shown as-is
    StaticImage(Picture),
    /// A video that has no usable thumbnail
    VideoPlaceholder,
    /// The camera launch tile
    CameraAction,
}

impl DisplayItem {
    pub fn asset(identifier: impl Into<String>, duration_seconds: f64) -> Self {
        DisplayItem::Asset {
            identifier: identifier.into(),
            duration_seconds,
        }
    }

    /// Identifier of the library asset, if this item refers to one
    pub fn identifier(&self) -> Option<&str> {
        match self {
            DisplayItem::Asset { identifier, .. } => Some(identifier),
            _ => None,
        }
    }

    /// Key under which the item's selection is remembered across pages;
    /// the camera tile and placeholders cannot be selected
    pub fn selection_key(&self) -> Option<String> {
        match self {
            DisplayItem::Asset { identifier, .. } => Some(identifier.clone()),
            DisplayItem::StaticImage(picture) => Some(format!("capture:{}", picture.id())),
            DisplayItem::VideoPlaceholder | DisplayItem::CameraAction => None,
        }
    }
}

/// A decoded RGBA image ready for display
///
/// Every picture gets a process-unique id so two pictures can be told apart
/// without comparing pixels.
#[derive(Debug, Clone)]
pub struct Picture {
    id: u64,
    width: u32,
    height: u32,
    handle: Handle,
}

impl Picture {
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            id: NEXT_PICTURE_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            handle: Handle::from_rgba(width, height, pixels),
        }
    }

    pub fn from_image(image: image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self::from_rgba(width, height, image.into_raw())
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl PartialEq for Picture {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Picture {}

/// How content is placed inside its bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentMode {
    /// Scale to cover the bounds and clip the overflow
    #[default]
    AspectFill,
    /// Scale to fit entirely inside the bounds
    AspectFit,
    /// No scaling, centred
    Center,
}

impl From<ContentMode> for ContentFit {
    fn from(mode: ContentMode) -> Self {
        match mode {
            ContentMode::AspectFill => ContentFit::Cover,
            ContentMode::AspectFit => ContentFit::Contain,
            ContentMode::Center => ContentFit::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_keys() {
        assert_eq!(DisplayItem::asset("a", 0.0).selection_key().as_deref(), Some("a"));
        assert_eq!(DisplayItem::CameraAction.selection_key(), None);
        assert_eq!(DisplayItem::VideoPlaceholder.selection_key(), None);

        let picture = Picture::from_rgba(1, 1, vec![0; 4]);
        let key = DisplayItem::StaticImage(picture.clone()).selection_key().unwrap();
        assert_eq!(key, format!("capture:{}", picture.id()));
    }

    #[test]
    fn test_pictures_compare_by_identity() {
        let a = Picture::from_rgba(1, 1, vec![0, 0, 0, 255]);
        let b = Picture::from_rgba(1, 1, vec![0, 0, 0, 255]);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_picture_from_image_keeps_dimensions() {
        let picture = Picture::from_image(image::RgbaImage::new(3, 2));
        assert_eq!((picture.width(), picture.height()), (3, 2));
    }

    #[test]
    fn test_only_assets_have_identifiers() {
        assert_eq!(DisplayItem::asset("a", 0.0).identifier(), Some("a"));
        assert_eq!(DisplayItem::CameraAction.identifier(), None);
        assert_eq!(DisplayItem::VideoPlaceholder.identifier(), None);
    }
}
