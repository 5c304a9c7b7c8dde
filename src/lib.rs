//! Table layout for PDF documents.
//!
//! Tables are built from [layout::Column]s and rows of [layout::Cell]s, then
//! rendered onto the pages of a [Document]. Column widths, row heights (including
//! cells spanning several rows or columns) and the font sizes of text cells are
//! resolved automatically, and tables taller than a page continue onto new pages
//! with their header rows repeated.
//!
//! The layout engine only depends on the [backend] traits; [Document] is the PDF
//! implementation of them.

pub mod backend;

mod colour;
pub use colour::*;

mod content;

mod document;
pub use document::*;

mod font;
pub use font::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

pub mod layout;

mod page;
pub use page::*;

pub mod pagesize;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod units;
pub use units::*;

mod error;
pub use error::*;

#[cfg(test)]
pub(crate) mod test_utils;

/// Re-export PDF-writer functionality
pub use pdf_writer;
