/// Bottom gradient scrim
///
/// A vertical two-stop gradient that keeps the duration label legible over
/// bright thumbnails. The painted layer is sized from the scrim's bounds, so
/// whoever changes the bounds or visibility calls `relayout` and the next
/// view re-frames the gradient.
use iced::widget::{container, Space};
use iced::{gradient, Background, Color, Element, Length, Radians, Rectangle, Theme};

#[derive(Debug, Clone, PartialEq)]
pub struct GradientScrim {
    /// Colour at the top edge
    top: Color,
    /// Colour at the bottom edge
    bottom: Color,
    hidden: bool,
    bounds: Rectangle,
}

impl GradientScrim {
    pub fn new(top: Color, bottom: Color) -> Self {
        Self {
            top,
            bottom,
            hidden: false,
            bounds: Rectangle::default(),
        }
    }

    /// The picker's scrim: black at 60% fading to clear
    pub fn bottom_fade() -> Self {
        Self::new(Color::from_rgba(0.0, 0.0, 0.0, 0.6), Color::TRANSPARENT)
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn stops(&self) -> (Color, Color) {
        (self.top, self.bottom)
    }

    /// Take new bounds; the gradient layer follows them on the next view
    pub fn relayout(&mut self, bounds: Rectangle) {
        self.bounds = bounds;
    }

    /// The gradient layer, sized to the current bounds. The caller places it
    /// at the bounds' origin.
    pub fn view<'a, Message: 'a>(&self) -> Element<'a, Message> {
        let (top, bottom) = self.stops();

        container(Space::new(Length::Fill, Length::Fill))
            .width(Length::Fixed(self.bounds.width))
            .height(Length::Fixed(self.bounds.height))
            .style(move |_theme: &Theme| {
                // Top to bottom (180deg = PI radians)
                let fade = gradient::Linear::new(Radians(std::f32::consts::PI))
                    .add_stop(0.0, top)
                    .add_stop(1.0, bottom);
                container::Style {
                    background: Some(Background::Gradient(fade.into())),
                    ..Default::default()
                }
            })
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::{Point, Size};

    #[test]
    fn test_relayout_reframes_layer() {
        let mut scrim = GradientScrim::bottom_fade();
        let bounds = Rectangle::new(Point::new(0.0, 95.0), Size::new(120.0, 25.0));

        scrim.relayout(bounds);
        assert_eq!(scrim.bounds(), bounds);

        let wider = Rectangle::new(Point::new(0.0, 125.0), Size::new(200.0, 25.0));
        scrim.relayout(wider);
        assert_eq!(scrim.bounds(), wider);
    }

    #[test]
    fn test_bottom_fade_stops() {
        let (top, bottom) = GradientScrim::bottom_fade().stops();
        assert_eq!(top.a, 0.6);
        assert_eq!(bottom, Color::TRANSPARENT);
    }
}
