//! Fakes for exercising the layout engine without font files or a PDF document.

use crate::backend::{Backend, Canvas, FontMetrics, VerticalMetrics};
use crate::colour::Colour;
use crate::font::Font;
use crate::image::Image;
use crate::page::SpanFont;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::units::Pt;
use crate::PDFError;
use id_arena::{Arena, Id};

/// A font id for measuring with [FixedMetrics]. It is never resolved against a
/// real font.
pub fn font_id() -> Id<Font> {
    Arena::<Font>::new().next_id()
}

/// An image id for drawing on a [RecordingCanvas]
pub fn image_id() -> Id<Image> {
    Arena::<Image>::new().next_id()
}

/// Monospaced metrics: every character (spaces included) advances by `advance`
/// units, and a line is exactly as tall as the font size.
#[derive(Debug, Clone)]
pub struct FixedMetrics {
    pub advance: f32,
    pub vertical: VerticalMetrics,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        FixedMetrics {
            advance: 500.0,
            vertical: VerticalMetrics {
                ascent: 800.0,
                descent: -200.0,
                x_height: 500.0,
            },
        }
    }
}

impl FontMetrics for FixedMetrics {
    fn string_width(&self, _font: Id<Font>, text: &str) -> Result<f32, PDFError> {
        Ok(text.chars().count() as f32 * self.advance)
    }

    fn vertical_metrics(&self, _font: Id<Font>) -> Result<VerticalMetrics, PDFError> {
        Ok(self.vertical)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill(Rect, Colour),
    Line {
        from: (Pt, Pt),
        to: (Pt, Pt),
        width: Pt,
    },
    Text {
        origin: (Pt, Pt),
        text: String,
        size: Pt,
    },
    Image(Rect),
}

/// Records every drawing operation in order
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub page: usize,
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn texts(&self) -> Vec<&str> {
        texts(&self.ops)
    }
}

pub fn texts(ops: &[DrawOp]) -> Vec<&str> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, colour: Colour) -> Result<(), PDFError> {
        self.ops.push(DrawOp::Fill(rect, colour));
        Ok(())
    }

    fn stroke_line(
        &mut self,
        from: (Pt, Pt),
        to: (Pt, Pt),
        width: Pt,
        _colour: Colour,
    ) -> Result<(), PDFError> {
        self.ops.push(DrawOp::Line { from, to, width });
        Ok(())
    }

    fn draw_text(
        &mut self,
        origin: (Pt, Pt),
        text: &str,
        font: SpanFont,
        _colour: Colour,
    ) -> Result<(), PDFError> {
        self.ops.push(DrawOp::Text {
            origin,
            text: text.to_string(),
            size: font.size,
        });
        Ok(())
    }

    fn draw_image(&mut self, _image: Id<Image>, rect: Rect) -> Result<(), PDFError> {
        self.ops.push(DrawOp::Image(rect));
        Ok(())
    }
}

/// A backend whose pages are lists of recorded operations
#[derive(Debug)]
pub struct RecordingBackend {
    pub metrics: FixedMetrics,
    pub size: PageSize,
    pub pages: Vec<Vec<DrawOp>>,
    /// How many canvases were handed back for each page
    pub ended: Vec<usize>,
}

impl RecordingBackend {
    /// A backend holding one empty page of the given size
    pub fn new(size: PageSize) -> RecordingBackend {
        RecordingBackend {
            metrics: FixedMetrics::default(),
            size,
            pages: vec![Vec::new()],
            ended: vec![0],
        }
    }
}

impl FontMetrics for RecordingBackend {
    fn string_width(&self, font: Id<Font>, text: &str) -> Result<f32, PDFError> {
        self.metrics.string_width(font, text)
    }

    fn vertical_metrics(&self, font: Id<Font>) -> Result<VerticalMetrics, PDFError> {
        self.metrics.vertical_metrics(font)
    }
}

impl Backend for RecordingBackend {
    type Canvas = RecordingCanvas;

    fn page_size(&self) -> Result<PageSize, PDFError> {
        Ok(self.size)
    }

    fn current_page(&mut self) -> Result<RecordingCanvas, PDFError> {
        let page = self.pages.len().checked_sub(1).ok_or(PDFError::NoPages)?;
        Ok(RecordingCanvas {
            page,
            ops: Vec::new(),
        })
    }

    fn begin_page(&mut self, size: PageSize) -> Result<RecordingCanvas, PDFError> {
        self.size = size;
        self.pages.push(Vec::new());
        self.ended.push(0);
        self.current_page()
    }

    fn end_page(&mut self, canvas: RecordingCanvas) -> Result<(), PDFError> {
        let RecordingCanvas { page, ops } = canvas;
        self.pages
            .get_mut(page)
            .ok_or(PDFError::MissingPage(page))?
            .extend(ops);
        self.ended[page] += 1;
        Ok(())
    }
}
