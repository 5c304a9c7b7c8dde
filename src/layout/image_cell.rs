use super::cell::BoxModel;
use crate::backend::Canvas;
use crate::document::Document;
use crate::image::Image;
use crate::rect::{Bounds, Rect};
use crate::units::Pt;
use crate::PDFError;
use id_arena::Id;

/// An image shrunk to fit its cell, keeping its aspect ratio. Images are never
/// enlarged.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCell {
    image: Id<Image>,
    width: Pt,
    height: Pt,
}

impl ImageCell {
    /// An image cell for an image of the given intrinsic size
    pub fn new<P: Into<Pt>>(image: Id<Image>, width: P, height: P) -> ImageCell {
        ImageCell {
            image,
            width: width.into(),
            height: height.into(),
        }
    }

    /// An image cell for an image added to `document`, using the image's pixel
    /// dimensions as its intrinsic size
    pub fn from_document(document: &Document, image: Id<Image>) -> Result<ImageCell, PDFError> {
        let img = document
            .images
            .get(image)
            .ok_or(PDFError::MissingImage(image.index()))?;
        Ok(ImageCell::new(image, img.width, img.height))
    }

    pub fn image(&self) -> Id<Image> {
        self.image
    }

    /// The size the image is drawn at inside a content box of the given size
    pub fn scaled_size(&self, max_width: Pt, max_height: Pt) -> (Pt, Pt) {
        let (mut width, mut height) = (self.width, self.height);
        let ratio = if height > Pt(0.0) { width / height } else { 1.0 };
        if width > max_width {
            width = max_width;
            height = width / ratio;
        }
        if height > max_height {
            height = max_height;
            width = height * ratio;
        }
        (width, height)
    }

    /// Background and borders hug the scaled image, which is positioned within the
    /// cell by the cell's alignment
    pub(crate) fn render(
        &self,
        canvas: &mut dyn Canvas,
        bounds: Bounds,
        model: &BoxModel,
    ) -> Result<(), PDFError> {
        let insets = &model.insets;
        let (width, height) = self.scaled_size(
            bounds.width - insets.horizontal(),
            bounds.height - insets.vertical(),
        );

        let frame = Bounds::new(
            bounds.left + (bounds.width - width) * model.halign.factor(),
            bounds.top - (bounds.height - height) * model.valign.factor(),
            width,
            height,
        );
        model.render_base(canvas, frame)?;

        let left = frame.left + insets.left;
        let top = frame.top - insets.top;
        canvas.draw_image(
            self.image,
            Rect {
                x1: left,
                y1: top - height,
                x2: left + width,
                y2: top,
            },
        )
    }
}
