//! Styled text fragments and single-line layout.
//!
//! A [`Span`] carries a run of text together with the inline attributes the reports use: a fill
//! color and an optional link target.  [`layout_line`] places a sequence of spans on one baseline,
//! advancing the pen by each span's measured width so consecutive spans abut without a gap or an
//! overlap.  The measured width of a linked span is what later sizes its clickable region.

use crate::fonts::TimesRoman;
use crate::model::{LinkRegion, Rect};

/// An RGB fill color with 8-bit channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns the channels scaled to the `0.0..=1.0` range PDF color operators expect.
    pub fn components(&self) -> [f32; 3] {
        [self.r, self.g, self.b].map(|channel| f32::from(channel) / 255.0)
    }
}

/// A slice of text together with inline style attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    color: Option<Color>,
    link: Option<String>,
}

impl Span {
    /// Creates a new span with the provided text and no styles applied.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text contained in this span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the configured color for the span, if any.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Returns the link target of the span, if any.
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Sets the span color and returns the updated span.
    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    /// Sets the link target and returns the updated span.
    pub fn with_link(mut self, link: Option<String>) -> Self {
        self.link = link;
        self
    }

    /// Convenience shorthand that assigns a color to the span.
    pub fn colored(self, color: Color) -> Self {
        self.with_color(Some(color))
    }

    /// Convenience shorthand that turns the span into a link to `uri`.
    pub fn linked(self, uri: impl Into<String>) -> Self {
        self.with_link(Some(uri.into()))
    }
}

/// A span positioned on the page.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedSpan {
    pub span: Span,
    /// Left edge of the first glyph.
    pub x: f32,
    pub baseline: f32,
    /// Sum of the glyph advance widths at the layout font size.
    pub width: f32,
}

impl PlacedSpan {
    /// Returns the clickable region covering this span's glyphs, if the span is a link.
    ///
    /// The region spans the measured advance width horizontally and runs from `descent` below
    /// the baseline up to one font size above it.
    pub fn link_region(&self, font_size: f32, descent: f32) -> Option<LinkRegion> {
        let uri = self.span.link()?;
        let rect = Rect::new(
            self.x,
            self.baseline - descent,
            self.x + self.width,
            self.baseline + font_size,
        );
        Some(LinkRegion::new(rect, uri))
    }
}

/// Lays out `spans` left to right on the baseline at `baseline`, starting at `x`.
pub fn layout_line(
    spans: &[Span],
    x: f32,
    baseline: f32,
    font: &TimesRoman,
    font_size: f32,
) -> Vec<PlacedSpan> {
    let mut cursor = x;
    spans
        .iter()
        .map(|span| {
            let width = font.width_of_text_at_size(span.text(), font_size);
            let placed = PlacedSpan {
                span: span.clone(),
                x: cursor,
                baseline,
                width,
            };
            cursor += width;
            placed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_components_are_normalized() {
        assert_eq!(Color::BLUE.components(), [0.0, 0.0, 1.0]);
        assert_eq!(Color::BLACK.components(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn spans_abut_on_the_baseline() {
        let font = TimesRoman;
        let spans = [
            Span::new("Heat").colored(Color::BLUE).linked("http://x/1"),
            Span::new(" (Rating: 8)"),
        ];
        let placed = layout_line(&spans, 50.0, 700.0, &font, 12.0);

        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].x, 50.0);
        assert_eq!(placed[1].x, 50.0 + placed[0].width);
        assert!(placed.iter().all(|span| span.baseline == 700.0));
        assert_eq!(placed[0].width, font.width_of_text_at_size("Heat", 12.0));
    }

    #[test]
    fn only_linked_spans_produce_regions() {
        let font = TimesRoman;
        let spans = [Span::new("Heat").linked("http://x/1"), Span::new(" suffix")];
        let placed = layout_line(&spans, 50.0, 700.0, &font, 12.0);

        let region = placed[0].link_region(12.0, 2.0).expect("linked span");
        assert_eq!(region.uri(), "http://x/1");
        assert_eq!(region.rect().x_min, 50.0);
        assert_eq!(region.rect().y_min, 698.0);
        assert_eq!(region.rect().y_max, 712.0);
        assert!((region.rect().width() - placed[0].width).abs() < 1e-4);
        assert!(placed[1].link_region(12.0, 2.0).is_none());
    }
}
