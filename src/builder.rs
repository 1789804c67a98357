//! Construction helpers for [`ReportRenderer`] instances.

use std::str::FromStr;

use printpdf::{Mm, Pt};

use crate::error::RenderError;
use crate::links::LinkStyle;
use crate::report::ReportRenderer;
use crate::richtext::Color;

/// Width and height of a page in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// US Letter, 8.5 × 11 inches.
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    /// Converts a paper size given in millimetres.
    pub fn from_mm(width: Mm, height: Mm) -> Self {
        let width: Pt = width.into();
        let height: Pt = height.into();
        Self {
            width: width.0 as f32,
            height: height.0 as f32,
        }
    }

    /// ISO A4, 210 × 297 mm.
    pub fn a4() -> Self {
        Self::from_mm(Mm(210.0), Mm(297.0))
    }
}

impl FromStr for PageSize {
    type Err = RenderError;

    /// Parses a paper name (`letter`, `a4`) or a `WIDTHxHEIGHT` size in millimetres.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("letter") {
            return Ok(Self::LETTER);
        }
        if value.eq_ignore_ascii_case("a4") {
            return Ok(Self::a4());
        }

        let invalid = || RenderError::Layout(format!("unknown page size {:?}", value));
        let (width, height) = value.split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: f64 = width.trim().parse().map_err(|_| invalid())?;
        let height: f64 = height.trim().parse().map_err(|_| invalid())?;
        Ok(Self::from_mm(Mm(width), Mm(height)))
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::LETTER
    }
}

/// What the listing report does with rows that no longer fit on the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Overflow {
    /// Keep drawing below the bottom edge; the rows are clipped by the viewer.
    #[default]
    Clip,
    /// Continue on a fresh page once the cursor reaches the bottom margin.
    Paginate,
}

/// Fixed layout settings shared by both report templates.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub page_size: PageSize,
    pub font_size: f32,
    pub left_margin: f32,
    pub text_color: Color,
    pub link_color: Color,
    pub link_style: LinkStyle,
    /// Distance a link region extends below the baseline.
    pub link_descent: f32,
    /// Factor applied to the poster's natural size.
    pub poster_scale: f32,
    pub overflow: Overflow,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            font_size: 12.0,
            left_margin: 50.0,
            text_color: Color::BLACK,
            link_color: Color::BLUE,
            link_style: LinkStyle::default(),
            link_descent: 2.0,
            poster_scale: 0.5,
            overflow: Overflow::default(),
        }
    }
}

impl Layout {
    /// Vertical distance between consecutive baselines.
    pub fn line_pitch(&self) -> f32 {
        self.font_size * 2.0
    }
}

/// Builder for [`ReportRenderer`] instances pre-configured with the crate defaults.
#[derive(Clone, Debug, Default)]
pub struct ReportBuilder {
    layout: Layout,
}

impl ReportBuilder {
    /// Creates a new builder instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size used for every page.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.layout.page_size = page_size;
        self
    }

    /// Sets the font size in points; the line pitch follows as twice this value.
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.layout.font_size = font_size;
        self
    }

    pub fn with_left_margin(mut self, left_margin: f32) -> Self {
        self.layout.left_margin = left_margin;
        self
    }

    pub fn with_link_style(mut self, link_style: LinkStyle) -> Self {
        self.layout.link_style = link_style;
        self
    }

    pub fn with_poster_scale(mut self, poster_scale: f32) -> Self {
        self.layout.poster_scale = poster_scale;
        self
    }

    /// Selects how the listing report handles rows past the bottom of the page.
    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.layout.overflow = overflow;
        self
    }

    /// Validates the settings and builds the renderer.
    pub fn build(self) -> Result<ReportRenderer, RenderError> {
        let layout = self.layout;
        let PageSize { width, height } = layout.page_size;

        if !(width > 0.0 && height > 0.0) {
            return Err(RenderError::Layout(format!(
                "page size must be positive, got {} x {}",
                width, height
            )));
        }
        if !(layout.font_size > 0.0) {
            return Err(RenderError::Layout(format!(
                "font size must be positive, got {}",
                layout.font_size
            )));
        }
        if layout.line_pitch() >= height {
            return Err(RenderError::Layout(format!(
                "font size {} leaves no room for a line on a {} pt page",
                layout.font_size, height
            )));
        }
        if layout.overflow == Overflow::Paginate && layout.line_pitch() * 2.0 > height {
            return Err(RenderError::Layout(format!(
                "a {} pt page cannot hold a paginated row at font size {}",
                height, layout.font_size
            )));
        }
        if !(layout.poster_scale > 0.0) {
            return Err(RenderError::Layout(format!(
                "poster scale must be positive, got {}",
                layout.poster_scale
            )));
        }

        Ok(ReportRenderer::new(layout))
    }
}
