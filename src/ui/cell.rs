/// A single photo-picker grid cell
///
/// The cell owns four sub-views: the image surface, the selection badge, the
/// duration label and the bottom scrim. The host binds it to a `DisplayItem`
/// with `configure`, feeds thumbnail deliveries back through
/// `deliver_thumbnail`, and calls `reset` before rebinding it to another item.
use iced::alignment::{Horizontal, Vertical};
use iced::font::Weight;
use iced::widget::{button, container, image, svg, text, Space, Stack};
use iced::{Background, Border, Color, Element, Font, Length, Rectangle, Size, Theme};

use super::layout::{
    frame_offset, CellLayout, LayoutDirection, BADGE_BORDER_WIDTH, BADGE_SIZE, CAMERA_GLYPH_SIZE,
    LABEL_FONT_SIZE,
};
use super::scrim::GradientScrim;
use crate::media::cache::{RequestOptions, ThumbnailRequest};
use crate::state::item::{ContentMode, DisplayItem, Picture};

const SYSTEM_BLUE: Color = Color {
    r: 0.0,
    g: 0.478,
    b: 1.0,
    a: 1.0,
};

/// Placeholder symbols drawn instead of a thumbnail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Camera,
}

const CAMERA_ICON: &[u8] = include_bytes!("../../resources/icons/camera.svg");

impl Glyph {
    fn icon(self) -> &'static [u8] {
        match self {
            Glyph::Camera => CAMERA_ICON,
        }
    }
}

/// What the image surface currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceContent {
    Picture(Picture),
    Glyph(Glyph),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageSurface {
    content: Option<SurfaceContent>,
    mode: ContentMode,
    hidden: bool,
}

impl ImageSurface {
    pub fn content(&self) -> Option<&SurfaceContent> {
        self.content.as_ref()
    }

    pub fn picture(&self) -> Option<&Picture> {
        match &self.content {
            Some(SurfaceContent::Picture(picture)) => Some(picture),
            _ => None,
        }
    }

    pub fn mode(&self) -> ContentMode {
        self.mode
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DurationLabel {
    text: Option<String>,
    hidden: bool,
}

impl DurationLabel {
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

/// Identifies the request a thumbnail delivery answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailTicket {
    identifier: String,
    generation: u64,
}

impl ThumbnailTicket {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// A thumbnail request issued by `configure`, to be run by the host
#[derive(Debug, Clone, PartialEq)]
pub struct PendingThumbnail {
    pub ticket: ThumbnailTicket,
    pub request: ThumbnailRequest,
}

#[derive(Debug, Clone)]
pub struct GridCell {
    represented_identifier: Option<String>,
    /// Bumped on every configure and reset; tickets from older generations
    /// are stale even when the identifier matches
    generation: u64,
    is_selected: bool,
    surface: ImageSurface,
    badge_hidden: bool,
    label: DurationLabel,
    scrim: GradientScrim,
    size: Size,
    direction: LayoutDirection,
}

impl GridCell {
    pub fn new(size: Size) -> Self {
        let mut cell = Self {
            represented_identifier: None,
            generation: 0,
            is_selected: false,
            surface: ImageSurface::default(),
            badge_hidden: true,
            label: DurationLabel {
                text: None,
                hidden: true,
            },
            scrim: GradientScrim::bottom_fade(),
            size,
            direction: LayoutDirection::default(),
        };
        cell.scrim.set_hidden(true);
        cell.scrim.relayout(cell.layout().scrim);
        cell
    }

    /// Bind the cell to `item`
    ///
    /// Returns the thumbnail request the host must run for asset items. Its
    /// delivery goes back through `deliver_thumbnail`.
    pub fn configure(&mut self, item: &DisplayItem, target_size: iced::Size<u32>) -> Option<PendingThumbnail> {
        self.generation += 1;

        match item {
            DisplayItem::Asset {
                identifier,
                duration_seconds,
            } => {
                self.represented_identifier = Some(identifier.clone());
                let pending = PendingThumbnail {
                    ticket: ThumbnailTicket {
                        identifier: identifier.clone(),
                        generation: self.generation,
                    },
                    request: ThumbnailRequest {
                        identifier: identifier.clone(),
                        target_size,
                        content_mode: ContentMode::AspectFill,
                        options: RequestOptions {
                            network_access_allowed: true,
                        },
                    },
                };
                self.configure_duration(*duration_seconds);
                Some(pending)
            }
            DisplayItem::StaticImage(picture) => {
                self.represented_identifier = None;
                self.surface.content = Some(SurfaceContent::Picture(picture.clone()));
                None
            }
            DisplayItem::VideoPlaceholder => {
                self.represented_identifier = None;
                self.surface.hidden = true;
                None
            }
            DisplayItem::CameraAction => {
                self.represented_identifier = None;
                self.surface.content = Some(SurfaceContent::Glyph(Glyph::Camera));
                self.surface.mode = ContentMode::Center;
                None
            }
        }
    }

    /// Apply a thumbnail delivery if its ticket is still current
    ///
    /// Returns whether the surface was updated. A `None` delivery for a
    /// current ticket leaves the surface blank.
    pub fn deliver_thumbnail(&mut self, ticket: &ThumbnailTicket, picture: Option<Picture>) -> bool {
        if !self.is_current(ticket) {
            tracing::trace!("Dropping stale thumbnail for {}", ticket.identifier);
            return false;
        }
        self.surface.content = picture.map(SurfaceContent::Picture);
        true
    }

    pub fn is_current(&self, ticket: &ThumbnailTicket) -> bool {
        ticket.generation == self.generation
            && self.represented_identifier.as_deref() == Some(ticket.identifier.as_str())
    }

    /// Return the reusable view state to its neutral baseline
    pub fn reset(&mut self) {
        self.represented_identifier = None;
        self.generation += 1;
        self.surface.content = None;
        self.surface.mode = ContentMode::AspectFill;
        self.surface.hidden = false;
        self.label.text = None;
        self.scrim.set_hidden(true);
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.is_selected = selected;
        self.badge_hidden = !selected;
    }

    pub fn is_badge_hidden(&self) -> bool {
        self.badge_hidden
    }

    pub fn represented_identifier(&self) -> Option<&str> {
        self.represented_identifier.as_deref()
    }

    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn label(&self) -> &DurationLabel {
        &self.label
    }

    pub fn scrim(&self) -> &GradientScrim {
        &self.scrim
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.scrim.relayout(self.layout().scrim);
    }

    pub fn set_layout_direction(&mut self, direction: LayoutDirection) {
        self.direction = direction;
        self.scrim.relayout(self.layout().scrim);
    }

    pub fn layout(&self) -> CellLayout {
        CellLayout::compute(self.size, self.direction)
    }

    fn configure_duration(&mut self, duration_seconds: f64) {
        match format_duration(duration_seconds) {
            Some(text) => {
                self.label.text = Some(text);
                self.label.hidden = false;
            }
            None => self.label.hidden = true,
        }
        self.scrim.set_hidden(self.label.hidden);
        self.scrim.relayout(self.layout().scrim);
    }

    /// Render the cell; pressing it emits `on_press`
    ///
    /// Every sub-view is drawn at its `CellLayout` frame.
    pub fn view<'a, Message: Clone + 'a>(&'a self, on_press: Message) -> Element<'a, Message> {
        let layout = self.layout();
        let mut layers = Stack::new()
            .width(Length::Fill)
            .height(Length::Fill)
            .push(place(self.surface_view(layout.image), layout.image));

        if !self.badge_hidden {
            layers = layers.push(place(self.badge_view(), layout.badge));
        }

        if !self.scrim.is_hidden() {
            layers = layers.push(place(self.scrim.view(), self.scrim.bounds()));
        }

        if let (false, Some(label)) = (self.label.hidden, self.label.text()) {
            layers = layers.push(place(self.label_view(label, layout.label), layout.label));
        }

        button(layers)
            .padding(0)
            .width(Length::Fixed(self.size.width))
            .height(Length::Fixed(self.size.height))
            .on_press(on_press)
            .style(|_theme: &Theme, _status| button::Style {
                background: Some(Background::Color(Color::from_rgb(0.12, 0.12, 0.12))),
                ..Default::default()
            })
            .into()
    }

    fn surface_view<'a, Message: 'a>(&'a self, frame: Rectangle) -> Element<'a, Message> {
        let (width, height) = (Length::Fixed(frame.width), Length::Fixed(frame.height));
        if self.surface.hidden {
            return Space::new(width, height).into();
        }

        match &self.surface.content {
            Some(SurfaceContent::Picture(picture)) => image(picture.handle().clone())
                .width(width)
                .height(height)
                .content_fit(self.surface.mode.into())
                .into(),
            Some(SurfaceContent::Glyph(glyph)) => container(
                svg(svg::Handle::from_memory(glyph.icon()))
                    .width(Length::Fixed(CAMERA_GLYPH_SIZE))
                    .height(Length::Fixed(CAMERA_GLYPH_SIZE)),
            )
            .center_x(width)
            .center_y(height)
            .into(),
            None => Space::new(width, height).into(),
        }
    }

    fn badge_view<'a, Message: 'a>(&'a self) -> Element<'a, Message> {
        container(text("✓").size(16).color(SYSTEM_BLUE))
            .center_x(Length::Fixed(BADGE_SIZE))
            .center_y(Length::Fixed(BADGE_SIZE))
            .style(|_theme: &Theme| container::Style {
                background: Some(Background::Color(Color::from_rgba(1.0, 1.0, 1.0, 0.8))),
                border: Border {
                    color: Color::WHITE,
                    width: BADGE_BORDER_WIDTH,
                    radius: (BADGE_SIZE / 2.0).into(),
                },
                ..Default::default()
            })
            .into()
    }

    fn label_view<'a, Message: 'a>(&'a self, label: &'a str, frame: Rectangle) -> Element<'a, Message> {
        let medium = Font {
            weight: Weight::Medium,
            ..Font::DEFAULT
        };

        // The frame spans the label's available room; the text hugs the leading edge
        let align = match self.direction {
            LayoutDirection::LeftToRight => Horizontal::Left,
            LayoutDirection::RightToLeft => Horizontal::Right,
        };

        container(text(label).size(LABEL_FONT_SIZE).font(medium).color(Color::WHITE))
            .width(Length::Fixed(frame.width))
            .height(Length::Fixed(frame.height))
            .align_x(align)
            .align_y(Vertical::Center)
            .into()
    }
}

/// Put `content` at `frame`'s origin inside a layer spanning the cell
fn place<'a, Message: 'a>(content: impl Into<Element<'a, Message>>, frame: Rectangle) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(frame_offset(frame))
        .align_x(Horizontal::Left)
        .align_y(Vertical::Top)
        .into()
}

/// Format a video duration as `m:ss`
///
/// Uses the truncated whole-second count; non-positive durations (and NaN)
/// have no badge.
pub fn format_duration(duration_seconds: f64) -> Option<String> {
    if !(duration_seconds.is_finite() && duration_seconds > 0.0) {
        return None;
    }
    let total = duration_seconds.trunc() as u64;
    Some(format!("{}:{:02}", total / 60, total % 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> iced::Size<u32> {
        iced::Size::new(240, 240)
    }

    fn cell() -> GridCell {
        GridCell::new(Size::new(120.0, 120.0))
    }

    fn picture() -> Picture {
        Picture::from_rgba(2, 2, vec![255; 16])
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(75.0).as_deref(), Some("1:15"));
        assert_eq!(format_duration(59.9).as_deref(), Some("0:59"));
        assert_eq!(format_duration(600.0).as_deref(), Some("10:00"));
        assert_eq!(format_duration(0.4).as_deref(), Some("0:00"));
        assert_eq!(format_duration(3725.0).as_deref(), Some("62:05"));
    }

    #[test]
    fn test_format_duration_rejects_non_positive() {
        assert_eq!(format_duration(0.0), None);
        assert_eq!(format_duration(-3.0), None);
        assert_eq!(format_duration(f64::NAN), None);
        assert_eq!(format_duration(f64::INFINITY), None);
    }

    #[test]
    fn test_new_cell_defaults() {
        let cell = cell();
        assert!(cell.surface().content().is_none());
        assert_eq!(cell.surface().mode(), ContentMode::AspectFill);
        assert!(!cell.surface().is_hidden());
        assert!(cell.is_badge_hidden());
        assert!(cell.label().is_hidden());
        assert!(cell.scrim().is_hidden());
        assert_eq!(cell.scrim().bounds(), cell.layout().scrim);
    }

    #[test]
    fn test_asset_without_duration_hides_badge_and_scrim() {
        for duration in [0.0, -1.0] {
            let mut cell = cell();
            cell.configure(&DisplayItem::asset("photo", 30.0), target());
            cell.configure(&DisplayItem::asset("still", duration), target());
            assert!(cell.label().is_hidden());
            assert!(cell.scrim().is_hidden());
        }
    }

    #[test]
    fn test_asset_with_duration_shows_badge_and_scrim() {
        let mut cell = cell();
        let pending = cell.configure(&DisplayItem::asset("clip", 75.0), target()).unwrap();

        assert_eq!(cell.label().text(), Some("1:15"));
        assert!(!cell.label().is_hidden());
        assert!(!cell.scrim().is_hidden());
        assert_eq!(cell.scrim().bounds(), cell.layout().scrim);

        assert_eq!(cell.represented_identifier(), Some("clip"));
        assert_eq!(pending.request.identifier, "clip");
        assert_eq!(pending.request.target_size, target());
        assert_eq!(pending.request.content_mode, ContentMode::AspectFill);
        assert!(pending.request.options.network_access_allowed);
    }

    #[test]
    fn test_static_image_is_applied_without_request() {
        let mut cell = cell();
        let image = picture();

        let pending = cell.configure(&DisplayItem::StaticImage(image.clone()), target());

        assert!(pending.is_none());
        assert_eq!(cell.surface().picture(), Some(&image));
        assert!(cell.label().is_hidden());
    }

    #[test]
    fn test_camera_action_shows_centered_glyph() {
        let mut cell = cell();
        let pending = cell.configure(&DisplayItem::CameraAction, target());

        assert!(pending.is_none());
        assert_eq!(cell.surface().content(), Some(&SurfaceContent::Glyph(Glyph::Camera)));
        assert_eq!(cell.surface().mode(), ContentMode::Center);
    }

    #[test]
    fn test_video_placeholder_hides_surface() {
        let mut cell = cell();
        assert!(cell.configure(&DisplayItem::VideoPlaceholder, target()).is_none());
        assert!(cell.surface().is_hidden());
    }

    #[test]
    fn test_current_delivery_is_applied() {
        let mut cell = cell();
        let pending = cell.configure(&DisplayItem::asset("a", 0.0), target()).unwrap();
        let image = picture();

        assert!(cell.deliver_thumbnail(&pending.ticket, Some(image.clone())));
        assert_eq!(cell.surface().picture(), Some(&image));
    }

    #[test]
    fn test_late_delivery_for_previous_asset_is_dropped() {
        let mut cell = cell();
        let first = cell.configure(&DisplayItem::asset("a", 0.0), target()).unwrap();
        let second = cell.configure(&DisplayItem::asset("b", 0.0), target()).unwrap();

        let b = picture();
        assert!(cell.deliver_thumbnail(&second.ticket, Some(b.clone())));
        assert!(!cell.deliver_thumbnail(&first.ticket, Some(picture())));
        assert_eq!(cell.surface().picture(), Some(&b));
    }

    #[test]
    fn test_out_of_order_delivery_before_current_one() {
        let mut cell = cell();
        let first = cell.configure(&DisplayItem::asset("a", 0.0), target()).unwrap();
        let _second = cell.configure(&DisplayItem::asset("b", 0.0), target()).unwrap();

        assert!(!cell.deliver_thumbnail(&first.ticket, Some(picture())));
        assert!(cell.surface().content().is_none());
    }

    #[test]
    fn test_delivery_after_reset_with_same_identifier_is_dropped() {
        let mut cell = cell();
        let before = cell.configure(&DisplayItem::asset("dup", 0.0), target()).unwrap();
        cell.reset();
        let after = cell.configure(&DisplayItem::asset("dup", 0.0), target()).unwrap();

        assert!(!cell.deliver_thumbnail(&before.ticket, Some(picture())));
        assert!(cell.deliver_thumbnail(&after.ticket, Some(picture())));
    }

    #[test]
    fn test_delivery_after_switch_to_static_image_is_dropped() {
        let mut cell = cell();
        let pending = cell.configure(&DisplayItem::asset("a", 0.0), target()).unwrap();
        let still = picture();
        cell.configure(&DisplayItem::StaticImage(still.clone()), target());

        assert!(!cell.deliver_thumbnail(&pending.ticket, Some(picture())));
        assert_eq!(cell.surface().picture(), Some(&still));
    }

    #[test]
    fn test_failed_delivery_leaves_surface_blank() {
        let mut cell = cell();
        let pending = cell.configure(&DisplayItem::asset("broken", 0.0), target()).unwrap();

        assert!(cell.deliver_thumbnail(&pending.ticket, None));
        assert!(cell.surface().content().is_none());
    }

    #[test]
    fn test_reset_restores_baseline() {
        let items = [
            DisplayItem::asset("clip", 42.0),
            DisplayItem::StaticImage(picture()),
            DisplayItem::VideoPlaceholder,
            DisplayItem::CameraAction,
        ];

        for item in &items {
            let mut cell = cell();
            if let Some(pending) = cell.configure(item, target()) {
                cell.deliver_thumbnail(&pending.ticket, Some(picture()));
            }

            cell.reset();

            assert!(cell.surface().content().is_none());
            assert_eq!(cell.surface().mode(), ContentMode::AspectFill);
            assert!(!cell.surface().is_hidden());
            assert_eq!(cell.label().text(), None);
            assert!(cell.scrim().is_hidden());
            assert_eq!(cell.represented_identifier(), None);
        }
    }

    #[test]
    fn test_selection_only_toggles_badge() {
        let mut cell = cell();
        cell.configure(&DisplayItem::asset("clip", 75.0), target());
        let surface = cell.surface().clone();
        let label = cell.label().clone();
        let scrim = cell.scrim().clone();

        cell.set_selected(true);
        assert!(cell.is_selected());
        assert!(!cell.is_badge_hidden());

        cell.set_selected(false);
        assert!(!cell.is_selected());
        assert!(cell.is_badge_hidden());

        assert_eq!(cell.surface(), &surface);
        assert_eq!(cell.label(), &label);
        assert_eq!(cell.scrim(), &scrim);
    }

    #[test]
    fn test_resize_reframes_scrim() {
        let mut cell = cell();
        cell.configure(&DisplayItem::asset("clip", 10.0), target());

        cell.set_size(Size::new(200.0, 150.0));

        assert_eq!(cell.scrim().bounds().width, 200.0);
        assert_eq!(cell.scrim().bounds().y, 125.0);
    }

    #[test]
    fn test_right_to_left_reframes_scrim_with_layout() {
        let mut cell = cell();
        cell.configure(&DisplayItem::asset("clip", 10.0), target());

        cell.set_layout_direction(LayoutDirection::RightToLeft);

        assert_eq!(cell.layout().badge.x, 5.0);
        assert_eq!(cell.scrim().bounds(), cell.layout().scrim);
    }

    #[test]
    fn test_camera_icon_is_svg() {
        let icon = std::str::from_utf8(Glyph::Camera.icon()).unwrap();
        assert!(icon.trim_start().starts_with("<svg"));
    }
}
