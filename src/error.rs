use thiserror::Error;

/// All errors that the crate can generate.
///
/// Measurement failures (missing fonts), backend failures (missing pages, I/O) and
/// decoding failures all abort the current operation; nothing is retried and a
/// table whose render failed should not be rendered again into the same document.
#[derive(Error, Debug)]
pub enum PDFError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to parse the image
    Image(#[from] image::ImageError),

    #[error("font #{0} is not registered with the document")]
    /// A font id was used to measure or draw text but the font is unknown
    MissingFont(usize),

    #[error("image #{0} is not registered with the document")]
    /// An image id was drawn but the image is unknown
    MissingImage(usize),

    #[error("page #{0} is not part of the document")]
    /// A page id was referenced that is not part of the document
    MissingPage(usize),

    #[error("the document has no pages to render into")]
    /// Rendering needs an existing page to start on
    NoPages,

    #[error("no PDF object reference was generated for {0}")]
    /// Internal bookkeeping error while writing the PDF
    UnresolvedReference(String),

    #[error("text cell has no font; set one on the cell or its column")]
    /// A text cell was measured without a font from either the cell or its column
    MissingTextFont,
}
