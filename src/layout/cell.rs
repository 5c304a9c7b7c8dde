use super::column::Column;
use super::event::{EventSource, EventType, TableEvent};
use super::image_cell::ImageCell;
use super::style::{stroke_borders, HAlign, Sides, VAlign};
use super::table::Table;
use super::text_cell::TextCell;
use crate::backend::{Canvas, FontMetrics};
use crate::colour::Colour;
use crate::rect::Bounds;
use crate::units::Pt;
use crate::PDFError;

/// What a cell shows
#[derive(Debug)]
pub enum CellContent {
    /// Nothing but the cell's background and borders
    Blank,
    Text(TextCell),
    Image(ImageCell),
    /// A table laid out inside the cell, using all of the cell's width
    Table(Box<Table>),
    /// The grid slot of a cell spanning down from an earlier row. Covered slots take
    /// up their columns but draw nothing, get no filler colour and fire no events.
    Covered,
}

/// A unit of content occupying `col_span` × `row_span` grid positions.
///
/// Alignment and border widths left unset are taken from the column the cell
/// starts in when the cell is added to a table, as are the font and font sizes of
/// text cells.
#[derive(Debug)]
pub struct Cell {
    content: CellContent,
    col_span: usize,
    row_span: usize,
    min_width: Pt,
    min_height: Pt,
    padding: Sides<Pt>,
    halign: Option<HAlign>,
    valign: Option<VAlign>,
    background: Option<Colour>,
    borders: Sides<Option<Pt>>,
    events: EventSource,
}

/// The resolved geometry and style a cell hands to its content
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BoxModel {
    /// Padding plus half of each border width
    pub insets: Sides<Pt>,
    pub borders: Sides<Pt>,
    pub background: Option<Colour>,
    pub min_height: Pt,
    pub halign: HAlign,
    pub valign: VAlign,
}

impl BoxModel {
    /// Background and borders of a plain cell
    pub fn render_base(&self, canvas: &mut dyn Canvas, bounds: Bounds) -> Result<(), PDFError> {
        if let Some(background) = self.background {
            canvas.fill_rect(bounds.to_rect(), background)?;
        }
        stroke_borders(canvas, bounds, &self.borders)
    }
}

impl Cell {
    pub fn new(content: CellContent) -> Cell {
        // text keeps a point of air from the vertical borders
        let padding = match content {
            CellContent::Text(_) => Sides::symmetric(Pt(0.0), Pt(1.0)),
            _ => Sides::zero(),
        };
        Cell {
            content,
            col_span: 1,
            row_span: 1,
            min_width: Pt(0.0),
            min_height: Pt(0.0),
            padding,
            halign: None,
            valign: None,
            background: None,
            borders: Sides::all(None),
            events: EventSource::new(),
        }
    }

    pub fn blank() -> Cell {
        Cell::new(CellContent::Blank)
    }

    /// A placeholder for a slot covered by a cell spanning from a row above
    pub fn covered() -> Cell {
        Cell::new(CellContent::Covered)
    }

    pub fn text<S: ToString>(text: S) -> Cell {
        Cell::new(CellContent::Text(TextCell::new(text)))
    }

    pub fn with_col_span(mut self, span: usize) -> Cell {
        self.col_span = span.max(1);
        self
    }

    pub fn with_row_span(mut self, span: usize) -> Cell {
        self.row_span = span.max(1);
        self
    }

    pub fn with_min_width<P: Into<Pt>>(mut self, width: P) -> Cell {
        self.min_width = width.into();
        self
    }

    pub fn with_min_height<P: Into<Pt>>(mut self, height: P) -> Cell {
        self.min_height = height.into();
        self
    }

    pub fn with_padding(mut self, padding: Sides<Pt>) -> Cell {
        self.padding = padding;
        self
    }

    pub fn with_halign(mut self, halign: HAlign) -> Cell {
        self.halign = Some(halign);
        self
    }

    pub fn with_valign(mut self, valign: VAlign) -> Cell {
        self.valign = Some(valign);
        self
    }

    pub fn with_background(mut self, background: Colour) -> Cell {
        self.background = Some(background);
        self
    }

    /// Set border widths; sides left as `None` are inherited from the column
    pub fn with_borders<S: Into<Sides<Option<Pt>>>>(mut self, borders: S) -> Cell {
        self.borders = borders.into();
        self
    }

    /// Register a handler for this cell's `BeforeCell` / `AfterCell` events
    pub fn on<F>(mut self, kind: EventType, handler: F) -> Cell
    where
        F: Fn(&mut dyn Canvas, &TableEvent) -> Result<(), PDFError> + 'static,
    {
        self.events.on(kind, handler);
        self
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    pub fn col_span(&self) -> usize {
        self.col_span
    }

    pub fn row_span(&self) -> usize {
        self.row_span
    }

    pub fn min_width(&self) -> Pt {
        self.min_width
    }

    pub fn min_height(&self) -> Pt {
        self.min_height
    }

    pub fn padding(&self) -> Sides<Pt> {
        self.padding
    }

    pub fn halign(&self) -> Option<HAlign> {
        self.halign
    }

    pub fn valign(&self) -> Option<VAlign> {
        self.valign
    }

    pub fn background(&self) -> Option<Colour> {
        self.background
    }

    pub fn borders(&self) -> Sides<Option<Pt>> {
        self.borders
    }

    pub fn events(&self) -> &EventSource {
        &self.events
    }

    pub fn is_covered(&self) -> bool {
        matches!(self.content, CellContent::Covered)
    }

    /// Take every unset inheritable property from `column`
    pub(crate) fn adopt(&mut self, column: &Column) {
        self.halign = self.halign.or(Some(column.halign()));
        self.valign = self.valign.or(Some(column.valign()));
        self.borders = self.borders.or(column.borders());
        if let CellContent::Text(text) = &mut self.content {
            text.adopt(column);
        }
    }

    pub(crate) fn box_model(&self) -> BoxModel {
        let borders = self.borders.resolved();
        let insets = Sides {
            top: self.padding.top + borders.top / 2.0,
            right: self.padding.right + borders.right / 2.0,
            bottom: self.padding.bottom + borders.bottom / 2.0,
            left: self.padding.left + borders.left / 2.0,
        };
        BoxModel {
            insets,
            borders,
            background: self.background,
            min_height: self.min_height,
            halign: self.halign.unwrap_or_default(),
            valign: self.valign.unwrap_or_default(),
        }
    }

    /// The width this cell would like its column to have. Cells spanning several
    /// columns never constrain a single column, so their natural width is zero.
    pub(crate) fn natural_width(&self, metrics: &dyn FontMetrics) -> Result<Pt, PDFError> {
        match &self.content {
            CellContent::Covered => Ok(Pt(0.0)),
            CellContent::Text(_) if self.col_span > 1 => Ok(Pt(0.0)),
            CellContent::Text(text) => Ok(text
                .natural_width(metrics, &self.box_model())?
                .max(self.min_width)),
            CellContent::Blank | CellContent::Image(_) | CellContent::Table(_) => {
                Ok(self.min_width)
            }
        }
    }

    /// The height this cell needs when it is `width` wide
    pub(crate) fn required_height(
        &self,
        metrics: &dyn FontMetrics,
        width: Pt,
    ) -> Result<Pt, PDFError> {
        match &self.content {
            CellContent::Covered => Ok(Pt(0.0)),
            CellContent::Text(text) => text.required_height(metrics, width, &self.box_model()),
            CellContent::Table(table) => Ok(table.resolve(metrics, width)?.height()),
            CellContent::Blank | CellContent::Image(_) => Ok(self.min_height),
        }
    }

    /// Draw the cell into `bounds`, which covers every row and column it spans
    pub(crate) fn render(
        &self,
        metrics: &dyn FontMetrics,
        canvas: &mut dyn Canvas,
        bounds: Bounds,
    ) -> Result<(), PDFError> {
        match &self.content {
            CellContent::Covered => Ok(()),
            CellContent::Blank => self.box_model().render_base(canvas, bounds),
            CellContent::Text(text) => {
                let model = self.box_model();
                model.render_base(canvas, bounds)?;
                text.render(metrics, canvas, bounds, &model)
            }
            CellContent::Image(image) => image.render(canvas, bounds, &self.box_model()),
            CellContent::Table(table) => {
                let layout = table.resolve(metrics, bounds.width)?;
                layout.render_rows(
                    metrics,
                    canvas,
                    0..layout.row_count(),
                    bounds.left,
                    bounds.top,
                )?;
                Ok(())
            }
        }
    }
}

impl From<CellContent> for Cell {
    fn from(content: CellContent) -> Self {
        Cell::new(content)
    }
}

impl From<TextCell> for Cell {
    fn from(text: TextCell) -> Self {
        Cell::new(CellContent::Text(text))
    }
}

impl From<ImageCell> for Cell {
    fn from(image: ImageCell) -> Self {
        Cell::new(CellContent::Image(image))
    }
}

impl From<Table> for Cell {
    fn from(table: Table) -> Self {
        Cell::new(CellContent::Table(Box::new(table)))
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::text(text)
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colours;
    use crate::test_utils::{font_id, FixedMetrics, RecordingCanvas};

    #[test]
    fn cells_inherit_from_their_column() {
        let column = Column::fixed(Pt(50.0), font_id(), Pt(10.0), HAlign::Right);
        let mut cell = Cell::text("x").with_borders(Sides {
            top: Some(Pt(2.0)),
            right: None,
            bottom: None,
            left: None,
        });
        cell.adopt(&column);

        assert_eq!(cell.halign(), Some(HAlign::Right));
        assert_eq!(cell.valign(), Some(VAlign::Middle));
        assert_eq!(
            cell.borders().resolved(),
            Sides::trbl(Pt(2.0), Pt(0.25), Pt(0.25), Pt(0.25))
        );
    }

    #[test]
    fn explicit_properties_win() {
        let column = Column::fixed(Pt(50.0), font_id(), Pt(10.0), HAlign::Right);
        let mut cell = Cell::blank()
            .with_halign(HAlign::Center)
            .with_valign(VAlign::Top)
            .with_borders(Sides::all(Pt(0.0)));
        cell.adopt(&column);

        assert_eq!(cell.halign(), Some(HAlign::Center));
        assert_eq!(cell.valign(), Some(VAlign::Top));
        assert_eq!(cell.borders().resolved(), Sides::zero());
    }

    #[test]
    fn insets_include_half_the_borders() {
        let cell = Cell::text("x").with_borders(Sides::all(Pt(2.0)));
        let model = cell.box_model();
        assert_eq!(model.insets, Sides::symmetric(Pt(1.0), Pt(2.0)));
    }

    #[test]
    fn blank_cells_measure_their_minimums() {
        let metrics = FixedMetrics::default();
        let cell = Cell::blank().with_min_width(30.0).with_min_height(12.0);
        assert_eq!(cell.natural_width(&metrics).unwrap(), Pt(30.0));
        assert_eq!(cell.required_height(&metrics, Pt(100.0)).unwrap(), Pt(12.0));

        let covered = Cell::covered().with_min_height(12.0);
        assert_eq!(covered.required_height(&metrics, Pt(100.0)).unwrap(), Pt(0.0));
    }

    #[test]
    fn spanning_text_has_no_natural_width() {
        let column = Column::new(Pt(0.0), Pt(500.0), font_id(), Pt(10.0), Pt(10.0), HAlign::Left);
        let mut cell = Cell::text("a rather long heading").with_col_span(2);
        cell.adopt(&column);
        assert_eq!(cell.natural_width(&FixedMetrics::default()).unwrap(), Pt(0.0));
    }

    #[test]
    fn blank_render_draws_background_then_positive_borders() {
        let cell = Cell::blank()
            .with_background(colours::LIGHT_GREY)
            .with_borders(Sides::trbl(Pt(1.0), Pt(0.0), Pt(1.0), Pt(0.0)));
        let mut canvas = RecordingCanvas::default();
        let bounds = Bounds::new(Pt(10.0), Pt(100.0), Pt(40.0), Pt(20.0));
        cell.render(&FixedMetrics::default(), &mut canvas, bounds)
            .unwrap();

        assert_eq!(canvas.ops.len(), 3);
        assert_eq!(
            canvas.ops[0],
            crate::test_utils::DrawOp::Fill(bounds.to_rect(), colours::LIGHT_GREY)
        );
    }

    #[test]
    fn covered_cells_draw_nothing() {
        let cell = Cell::covered().with_background(colours::RED);
        let mut canvas = RecordingCanvas::default();
        cell.render(&FixedMetrics::default(), &mut canvas, Bounds::default())
            .unwrap();
        assert!(canvas.ops.is_empty());
    }
}
