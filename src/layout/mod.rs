//! Table layout: columns, rows and cells, resolved into a [TableLayout] and drawn
//! onto a [Backend](crate::backend::Backend).
//!
//! A [Table] is built up front. Each [Column] sets width bounds and the defaults
//! that cells added to it inherit: font, font size range, alignment and border
//! widths. Cells hold blank space, [TextCell] text, an [ImageCell] image or a
//! nested table, and may span several columns and rows.
//!
//! Rendering happens in two steps:
//!
//! - [Table::resolve] measures the table at a width, producing column widths and
//!   row heights. Text cells pick the largest font size in their range that fits.
//! - [Table::render] resolves the table and draws it at a [Placement], breaking
//!   onto new pages between rows and repeating the header rows on every page.
//!
//! # Example
//!
//! ```
//! use pdf_tables::{Document, Font, Page, Pt};
//! use pdf_tables::layout::{Cell, Column, HAlign, Margins, Placement, Table};
//! use pdf_tables::pagesize;
//!
//! let font_data = include_bytes!("../../assets/DejaVuSansMono.ttf");
//! let font = Font::load(font_data.to_vec()).expect("can load font");
//!
//! let mut doc = Document::default();
//! let font = doc.add_font(font);
//! doc.add_page(Page::new(pagesize::A4, None));
//!
//! let mut table = Table::new(vec![
//!     Column::new(Pt(60.0), Pt(200.0), font, Pt(8.0), Pt(12.0), HAlign::Left),
//!     Column::fixed(Pt(80.0), font, Pt(10.0), HAlign::Right),
//! ]);
//! table.add_row([Cell::text("Item"), Cell::text("Price")]);
//! table.add_row(["Coffee", "3.50"]);
//! table.add_row(["Cake", "4.25"]);
//!
//! let placement = Placement::new(Pt(400.0), Pt(72.0), Pt(770.0))
//!     .with_margins(Margins::all(Pt(72.0)));
//! let bottom = table.render(&mut doc, &placement).expect("can render table");
//! assert!(bottom < Pt(770.0));
//!
//! let mut out = Vec::new();
//! doc.write(&mut out).expect("can write pdf");
//! ```

mod cell;
mod column;
mod event;
mod filler;
mod image_cell;
mod margins;
mod paginate;
mod row;
mod style;
mod table;
mod text;
mod text_cell;

pub use cell::{Cell, CellContent};
pub use column::Column;
pub use event::{EventHandler, EventSource, EventType, TableEvent};
pub use filler::{CellFiller, ColumnStripe, RowStripe};
pub use image_cell::ImageCell;
pub use margins::*;
pub use paginate::Placement;
pub use row::Row;
pub use style::{HAlign, Sides, VAlign};
pub use table::{Table, TableLayout};
pub use text::TextRun;
pub use text_cell::TextCell;
