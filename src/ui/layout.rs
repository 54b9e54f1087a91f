/// Static layout of a grid cell
///
/// All four sub-views are placed relative to the cell's content bounds. The
/// constants are fixed at construction and never change per `configure`.
use iced::{Padding, Point, Rectangle, Size};

/// Edge length of the selection badge
pub const BADGE_SIZE: f32 = 24.0;
/// Badge inset from the top edge
pub const BADGE_TOP_INSET: f32 = 4.0;
/// Badge inset from the trailing edge
pub const BADGE_TRAILING_INSET: f32 = 5.0;
/// Width of the badge's white border
pub const BADGE_BORDER_WIDTH: f32 = 1.0;

/// Duration label inset from the leading edge
pub const LABEL_LEADING_INSET: f32 = 5.0;
/// Duration label inset from the bottom edge
pub const LABEL_BOTTOM_INSET: f32 = 4.0;
pub const LABEL_HEIGHT: f32 = 20.0;
pub const LABEL_FONT_SIZE: f32 = 12.0;

pub const SCRIM_HEIGHT: f32 = 25.0;

/// Point size of the camera placeholder glyph
pub const CAMERA_GLYPH_SIZE: f32 = 40.0;

/// Reading direction the cell is laid out for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Frames of the four sub-views, relative to the cell origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellLayout {
    pub image: Rectangle,
    pub badge: Rectangle,
    /// The label's width follows its text; this frame spans the room it may use
    pub label: Rectangle,
    pub scrim: Rectangle,
}

impl CellLayout {
    pub fn compute(size: Size, direction: LayoutDirection) -> Self {
        let image = Rectangle::new(Point::ORIGIN, size);

        let badge_x = match direction {
            LayoutDirection::LeftToRight => size.width - BADGE_TRAILING_INSET - BADGE_SIZE,
            LayoutDirection::RightToLeft => BADGE_TRAILING_INSET,
        };
        let badge = Rectangle::new(
            Point::new(badge_x, BADGE_TOP_INSET),
            Size::new(BADGE_SIZE, BADGE_SIZE),
        );

        let label_width = (size.width - LABEL_LEADING_INSET).max(0.0);
        let label_x = match direction {
            LayoutDirection::LeftToRight => LABEL_LEADING_INSET,
            LayoutDirection::RightToLeft => 0.0,
        };
        let label = Rectangle::new(
            Point::new(label_x, size.height - LABEL_BOTTOM_INSET - LABEL_HEIGHT),
            Size::new(label_width, LABEL_HEIGHT),
        );

        let scrim = Rectangle::new(
            Point::new(0.0, size.height - SCRIM_HEIGHT),
            Size::new(size.width, SCRIM_HEIGHT),
        );

        Self {
            image,
            badge,
            label,
            scrim,
        }
    }
}

/// Padding that puts a child's top-left corner at `frame`'s origin when the
/// child sits top-left aligned in a container spanning the cell
pub fn frame_offset(frame: Rectangle) -> Padding {
    Padding {
        top: frame.y.max(0.0),
        right: 0.0,
        bottom: 0.0,
        left: frame.x.max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_offset_places_badge() {
        let layout = CellLayout::compute(Size::new(100.0, 100.0), LayoutDirection::LeftToRight);
        let padding = frame_offset(layout.badge);
        assert_eq!((padding.top, padding.left), (4.0, 71.0));
        assert_eq!((padding.right, padding.bottom), (0.0, 0.0));
    }

    #[test]
    fn test_frame_offset_clamps_tiny_cells() {
        let layout = CellLayout::compute(Size::new(10.0, 10.0), LayoutDirection::LeftToRight);
        assert_eq!(frame_offset(layout.badge).left, 0.0);
        assert_eq!(frame_offset(layout.label).top, 0.0);
    }

    #[test]
    fn test_left_to_right_frames() {
        let layout = CellLayout::compute(Size::new(100.0, 100.0), LayoutDirection::LeftToRight);

        assert_eq!(layout.image, Rectangle::new(Point::ORIGIN, Size::new(100.0, 100.0)));
        assert_eq!(layout.badge, Rectangle::new(Point::new(71.0, 4.0), Size::new(24.0, 24.0)));
        assert_eq!(layout.label.x, 5.0);
        assert_eq!(layout.label.y + layout.label.height, 96.0);
        assert_eq!(layout.label.height, 20.0);
        assert_eq!(layout.scrim, Rectangle::new(Point::new(0.0, 75.0), Size::new(100.0, 25.0)));
    }

    #[test]
    fn test_right_to_left_mirrors_badge_and_label() {
        let layout = CellLayout::compute(Size::new(100.0, 100.0), LayoutDirection::RightToLeft);

        assert_eq!(layout.badge.x, 5.0);
        assert_eq!(layout.label.x + layout.label.width, 95.0);
        assert_eq!(layout.scrim.width, 100.0);
    }

    #[test]
    fn test_scrim_sits_behind_label() {
        let layout = CellLayout::compute(Size::new(80.0, 60.0), LayoutDirection::LeftToRight);
        assert!(layout.scrim.y <= layout.label.y);
        assert_eq!(layout.scrim.y + layout.scrim.height, 60.0);
    }
}
