use crate::{
    backend::{Backend, Canvas, FontMetrics, VerticalMetrics},
    colour::Colour,
    font::Font,
    image::Image,
    info::Info,
    page::{ImageLayout, Page, PageContents, SpanFont, SpanLayout},
    pagesize::PageSize,
    rect::Rect,
    refs::{ObjectReferences, RefType},
    units::Pt,
    PDFError,
};
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Pdf, Ref};
use std::io::Write;

#[derive(Default)]
/// A document is the main object that stores all the contents of the PDF
/// then renders it out with a call to [Document::write]
pub struct Document {
    pub info: Option<Info>,
    pub pages: Arena<Page>,
    pub page_order: Vec<Id<Page>>,
    pub fonts: Arena<Font>,
    pub images: Arena<Image>,
}

impl Document {
    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a page to the end of the document, returning its id
    pub fn add_page(&mut self, page: Page) -> Id<Page> {
        let id = self.pages.alloc(page);
        self.page_order.push(id);
        id
    }

    /// The last page in the document, which is where tables start rendering
    pub fn last_page(&self) -> Option<Id<Page>> {
        self.page_order.last().copied()
    }

    /// Add a font to the document. Fonts are stored "globally" within the document,
    /// such that any page or table cell can refer to it by the returned id.
    pub fn add_font(&mut self, font: Font) -> Id<Font> {
        self.fonts.alloc(font)
    }

    /// Add an image to the document. Like fonts, images are shared by every page and
    /// can be drawn any number of times by referring to the returned id.
    pub fn add_image(&mut self, image: Image) -> Id<Image> {
        self.images.alloc(image)
    }

    fn font(&self, id: Id<Font>) -> Result<&Font, PDFError> {
        self.fonts.get(id).ok_or(PDFError::MissingFont(id.index()))
    }

    /// Write the entire document to the writer. The whole document is rendered in
    /// memory first, so very large documents allocate accordingly.
    ///
    /// Until `write` is called, all references are un-resolved; calling `write`
    /// generates PDF objects and the references between them.
    pub fn write<W: Write>(self, mut w: W) -> Result<(), PDFError> {
        let Document {
            info,
            pages,
            page_order,
            fonts,
            images,
        } = self;

        let mut refs = ObjectReferences::new();
        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = (0..page_order.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (i, font) in fonts.iter() {
            font.write(&mut refs, i, &mut writer);
        }

        for (i, image) in images.iter() {
            image.write(&mut refs, i.index(), &mut writer)?;
        }

        for (page_index, id) in page_order.iter().enumerate() {
            let page = pages.get(*id).ok_or(PDFError::MissingPage(id.index()))?;
            page.write(&mut refs, page_index, &fonts, &images, &mut writer)?;
        }
        log::debug!(
            "writing document with {} pages, {} fonts, {} images",
            page_order.len(),
            fonts.len(),
            images.len()
        );

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        w.write_all(writer.finish().as_slice()).map_err(Into::into)
    }
}

impl FontMetrics for Document {
    fn string_width(&self, font: Id<Font>, text: &str) -> Result<f32, PDFError> {
        Ok(self.font(font)?.string_width(text))
    }

    fn vertical_metrics(&self, font: Id<Font>) -> Result<VerticalMetrics, PDFError> {
        Ok(self.font(font)?.vertical_metrics())
    }
}

/// A canvas on one page of a [Document]. Drawing operations are buffered and
/// appended to the page when the canvas is handed back through
/// [Backend::end_page].
#[derive(Debug)]
pub struct PdfCanvas {
    page: Id<Page>,
    contents: Vec<PageContents>,
}

impl PdfCanvas {
    fn new(page: Id<Page>) -> PdfCanvas {
        PdfCanvas {
            page,
            contents: Vec::default(),
        }
    }
}

impl Canvas for PdfCanvas {
    fn fill_rect(&mut self, rect: Rect, colour: Colour) -> Result<(), PDFError> {
        self.contents.push(PageContents::Fill { rect, colour });
        Ok(())
    }

    fn stroke_line(
        &mut self,
        from: (Pt, Pt),
        to: (Pt, Pt),
        width: Pt,
        colour: Colour,
    ) -> Result<(), PDFError> {
        self.contents.push(PageContents::Line {
            from,
            to,
            width,
            colour,
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        origin: (Pt, Pt),
        text: &str,
        font: SpanFont,
        colour: Colour,
    ) -> Result<(), PDFError> {
        let span = SpanLayout {
            text: text.to_string(),
            font,
            colour,
            coords: origin,
        };
        // consecutive spans share one text block
        match self.contents.last_mut() {
            Some(PageContents::Text(spans)) => spans.push(span),
            _ => self.contents.push(PageContents::Text(vec![span])),
        }
        Ok(())
    }

    fn draw_image(&mut self, image: Id<Image>, rect: Rect) -> Result<(), PDFError> {
        self.contents.push(PageContents::Image(ImageLayout {
            image_id: image,
            position: rect,
        }));
        Ok(())
    }
}

impl Backend for Document {
    type Canvas = PdfCanvas;

    fn page_size(&self) -> Result<PageSize, PDFError> {
        let id = self.last_page().ok_or(PDFError::NoPages)?;
        let page = self.pages.get(id).ok_or(PDFError::MissingPage(id.index()))?;
        Ok(page.size())
    }

    fn current_page(&mut self) -> Result<PdfCanvas, PDFError> {
        let id = self.last_page().ok_or(PDFError::NoPages)?;
        Ok(PdfCanvas::new(id))
    }

    fn begin_page(&mut self, size: PageSize) -> Result<PdfCanvas, PDFError> {
        let id = self.add_page(Page::new(size, None));
        log::debug!("began page {}", self.page_order.len());
        Ok(PdfCanvas::new(id))
    }

    fn end_page(&mut self, canvas: PdfCanvas) -> Result<(), PDFError> {
        let PdfCanvas { page, contents } = canvas;
        let page = self
            .pages
            .get_mut(page)
            .ok_or(PDFError::MissingPage(page.index()))?;
        page.contents.extend(contents);
        Ok(())
    }
}
