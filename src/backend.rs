//! The boundary between the table layout engine and whatever actually produces
//! pages.
//!
//! The layout engine only ever talks to three traits:
//!
//! - [`FontMetrics`] answers "how wide is this string" and "how tall is this font",
//!   both in the 1000-units-per-em convention, scaled by the point size at call time.
//! - [`Canvas`] draws onto a single page: filled rectangles, stroked lines, glyph
//!   runs and images.
//! - [`Backend`] owns the pages: it hands out a [`Canvas`] for the current page,
//!   starts new pages and takes canvases back when a page is finished.
//!
//! [`Document`](crate::Document) implements all of them for PDF output.

use crate::colour::Colour;
use crate::font::Font;
use crate::image::Image;
use crate::page::SpanFont;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::units::Pt;
use crate::PDFError;
use id_arena::Id;

/// Vertical font metrics in 1000-units-per-em. `descent` is usually negative.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VerticalMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub x_height: f32,
}

impl VerticalMetrics {
    /// Ascent scaled to the given font size
    pub fn ascent_at(&self, size: Pt) -> Pt {
        size * (self.ascent / 1000.0)
    }

    /// Height of one line of text (ascent to descent) at the given font size
    pub fn line_height_at(&self, size: Pt) -> Pt {
        size * ((self.ascent - self.descent) / 1000.0)
    }

    /// The x-height scaled to the given font size
    pub fn x_height_at(&self, size: Pt) -> Pt {
        size * (self.x_height / 1000.0)
    }
}

/// Provides font measurements for text layout
pub trait FontMetrics {
    /// The advance width of `text` in 1000-units-per-em. Multiply by `size / 1000`
    /// to get the width in points.
    fn string_width(&self, font: Id<Font>, text: &str) -> Result<f32, PDFError>;

    /// Ascent, descent and x-height of the font in 1000-units-per-em
    fn vertical_metrics(&self, font: Id<Font>) -> Result<VerticalMetrics, PDFError>;

    /// Width of `text` in points when set in `font` at `size`
    fn text_width(&self, font: Id<Font>, size: Pt, text: &str) -> Result<Pt, PDFError> {
        Ok(size * (self.string_width(font, text)? / 1000.0))
    }
}

/// A drawing surface for a single page.
///
/// Coordinates are PDF page coordinates: the origin is at the bottom-left and y
/// grows upwards.
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, colour: Colour) -> Result<(), PDFError>;

    fn stroke_line(
        &mut self,
        from: (Pt, Pt),
        to: (Pt, Pt),
        width: Pt,
        colour: Colour,
    ) -> Result<(), PDFError>;

    /// Draw `text` with its baseline starting at `origin`
    fn draw_text(
        &mut self,
        origin: (Pt, Pt),
        text: &str,
        font: SpanFont,
        colour: Colour,
    ) -> Result<(), PDFError>;

    /// Draw an image scaled to fill `rect`
    fn draw_image(&mut self, image: Id<Image>, rect: Rect) -> Result<(), PDFError>;

    /// Stroke the outline of `rect`
    fn stroke_rect(&mut self, rect: Rect, width: Pt, colour: Colour) -> Result<(), PDFError> {
        let Rect { x1, y1, x2, y2 } = rect;
        self.stroke_line((x1, y2), (x2, y2), width, colour)?;
        self.stroke_line((x2, y2), (x2, y1), width, colour)?;
        self.stroke_line((x2, y1), (x1, y1), width, colour)?;
        self.stroke_line((x1, y1), (x1, y2), width, colour)
    }
}

/// Owns the pages that tables are rendered onto.
///
/// Canvases are owned values: every canvas obtained from [Backend::current_page]
/// or [Backend::begin_page] must be handed back through [Backend::end_page]
/// exactly once, at which point its contents become part of the page.
pub trait Backend: FontMetrics {
    type Canvas: Canvas;

    /// The size of the current (last) page
    fn page_size(&self) -> Result<PageSize, PDFError>;

    /// Open a canvas that appends to the current (last) page
    fn current_page(&mut self) -> Result<Self::Canvas, PDFError>;

    /// Append a new page of the given size and open a canvas on it
    fn begin_page(&mut self, size: PageSize) -> Result<Self::Canvas, PDFError>;

    /// Finish drawing on a canvas, committing its contents to its page
    fn end_page(&mut self, canvas: Self::Canvas) -> Result<(), PDFError>;
}
