//! The listing and detail report templates.
//!
//! Both templates draw onto a fresh [`Canvas`] at fixed positions measured from the top of the
//! page.  The listing report places one row per catalog item, two font sizes apart, with the
//! title drawn as a link and the release date and rating following it on the same baseline.  The
//! detail report draws three labelled lines and, when poster bytes are supplied, the poster at
//! a fixed scale underneath them.

use log::{debug, warn};

use crate::builder::{Layout, Overflow, ReportBuilder};
use crate::canvas::Canvas;
use crate::elements::JpegImage;
use crate::error::RenderError;
use crate::fonts::TimesRoman;
use crate::model::{CatalogItem, CatalogListing};
use crate::richtext::{self, Span};

const LISTING_TITLE: &str = "Popular Movies";

/// Renders catalog records into PDF reports using a fixed [`Layout`].
#[derive(Clone, Debug, Default)]
pub struct ReportRenderer {
    layout: Layout,
    font: TimesRoman,
}

impl ReportRenderer {
    pub(crate) fn new(layout: Layout) -> Self {
        Self {
            layout,
            font: TimesRoman,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    fn canvas(&self) -> Canvas {
        let size = self.layout.page_size;
        Canvas::new(size.width, size.height)
    }

    /// Baseline of the first line on a page.
    fn top_baseline(&self) -> f32 {
        self.layout.page_size.height - self.layout.line_pitch()
    }

    /// Renders one row per item, linking each title to `link_uri_for(item.id)`.
    pub fn render_listing<F>(
        &self,
        listing: &CatalogListing,
        link_uri_for: F,
    ) -> Result<Vec<u8>, RenderError>
    where
        F: Fn(&str) -> String,
    {
        let layout = &self.layout;
        let font_size = layout.font_size;
        let pitch = layout.line_pitch();

        let mut canvas = self.canvas();
        canvas.set_title(LISTING_TITLE);

        let mut baseline = self.top_baseline();
        let mut off_page = 0usize;

        for item in listing {
            if layout.overflow == Overflow::Paginate && baseline < pitch {
                canvas.add_page();
                baseline = self.top_baseline();
            }
            if baseline < 0.0 {
                off_page += 1;
            }

            let spans = [
                Span::new(item.title())
                    .colored(layout.link_color)
                    .linked(link_uri_for(item.id())),
                Span::new(listing_suffix(item)).colored(layout.text_color),
            ];
            let placed =
                richtext::layout_line(&spans, layout.left_margin, baseline, &self.font, font_size);

            for span in &placed {
                let color = span.span.color().unwrap_or(layout.text_color);
                canvas.draw_text(span.span.text(), span.x, span.baseline, font_size, color);
                if let Some(region) = span.link_region(font_size, layout.link_descent) {
                    canvas.add_link(&region, &layout.link_style);
                }
            }

            baseline -= pitch;
        }

        if off_page > 0 {
            warn!(
                "{} of {} listing rows fall below the bottom of the page",
                off_page,
                listing.len()
            );
        }
        debug!(
            "Rendered listing report with {} rows on {} page(s)",
            listing.len(),
            canvas.page_count()
        );

        canvas.finish()
    }

    /// Renders the title, release date and rating of `item`, followed by its poster if given.
    pub fn render_detail(
        &self,
        item: &CatalogItem,
        poster: Option<&[u8]>,
    ) -> Result<Vec<u8>, RenderError> {
        let layout = &self.layout;
        let font_size = layout.font_size;
        let height = layout.page_size.height;

        let poster = poster.map(JpegImage::from_bytes).transpose()?;

        let mut canvas = self.canvas();
        canvas.set_title(item.title());

        let lines = [
            format!("Title: {}", item.title()),
            format!("Release Date: {}", item.release_date()),
            format!("Rating: {}", item.rating()),
        ];
        for (index, line) in lines.iter().enumerate() {
            let baseline = height - layout.line_pitch() * (index as f32 + 1.0);
            canvas.draw_text(line, layout.left_margin, baseline, font_size, layout.text_color);
        }

        if let Some(poster) = &poster {
            let (width, scaled_height) = poster.scaled(layout.poster_scale);
            let text_block = layout.line_pitch() * (lines.len() as f32 + 1.0);
            let y = height - scaled_height - text_block;
            canvas.draw_image(poster, layout.left_margin, y, width, scaled_height);
        }

        debug!(
            "Rendered detail report for item {} ({})",
            item.id(),
            if poster.is_some() { "with poster" } else { "no poster" }
        );

        canvas.finish()
    }
}

/// Plain-text tail of a listing row, drawn right after the linked title.
///
/// Ratings are printed the way the catalog's JSON shows them: `8` rather than `8.0`.
fn listing_suffix(item: &CatalogItem) -> String {
    format!(
        " (Release Date: {}, Rating: {})",
        item.release_date(),
        item.rating()
    )
}

fn default_renderer() -> Result<ReportRenderer, RenderError> {
    ReportBuilder::new().build()
}

/// Renders the listing report with the default layout.
pub fn render_listing_report<F>(
    listing: &CatalogListing,
    link_uri_for: F,
) -> Result<Vec<u8>, RenderError>
where
    F: Fn(&str) -> String,
{
    default_renderer()?.render_listing(listing, link_uri_for)
}

/// Renders the detail report with the default layout.
pub fn render_detail_report(
    item: &CatalogItem,
    poster: Option<&[u8]>,
) -> Result<Vec<u8>, RenderError> {
    default_renderer()?.render_detail(item, poster)
}
