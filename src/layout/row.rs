use super::cell::Cell;
use super::event::{EventSource, EventType, TableEvent};
use super::style::{stroke_borders, Sides};
use super::table::TableLayout;
use crate::backend::{Canvas, FontMetrics};
use crate::rect::Bounds;
use crate::units::Pt;
use crate::PDFError;

/// An ordered list of cells. Together the cells should span exactly as many
/// columns as their table has.
#[derive(Debug, Default)]
pub struct Row {
    cells: Vec<Cell>,
    borders: Sides<Pt>,
    events: EventSource,
}

impl Row {
    pub fn new() -> Row {
        Row::default()
    }

    pub fn with_cell<C: Into<Cell>>(mut self, cell: C) -> Row {
        self.cells.push(cell.into());
        self
    }

    /// Border drawn around the whole row, before its cells. Rows have none by
    /// default.
    pub fn with_borders(mut self, borders: Sides<Pt>) -> Row {
        self.borders = borders;
        self
    }

    /// Register a handler for this row's row and cell events
    pub fn on<F>(mut self, kind: EventType, handler: F) -> Row
    where
        F: Fn(&mut dyn Canvas, &TableEvent) -> Result<(), PDFError> + 'static,
    {
        self.events.on(kind, handler);
        self
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The number of grid columns the cells cover
    pub fn column_count(&self) -> usize {
        self.cells.iter().map(Cell::col_span).sum()
    }

    pub fn events(&self) -> &EventSource {
        &self.events
    }

    pub(crate) fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    pub(crate) fn take_cells(&mut self) -> Vec<Cell> {
        std::mem::take(&mut self.cells)
    }

    /// The cell covering grid column `column`, with the column it starts in
    pub(crate) fn cell_at(&self, column: usize) -> Option<(usize, &Cell)> {
        let mut start = 0;
        for cell in self.cells.iter() {
            let end = start + cell.col_span();
            if column < end {
                return Some((start, cell));
            }
            start = end;
        }
        None
    }

    /// Cells with the grid column each of them starts in
    pub(crate) fn positioned_cells(&self) -> impl Iterator<Item = (usize, &Cell)> {
        self.cells.iter().scan(0, |column, cell| {
            let start = *column;
            *column += cell.col_span();
            Some((start, cell))
        })
    }

    /// Draw the row at `index` of `layout` with its top edge at `top`
    pub(crate) fn render(
        &self,
        layout: &TableLayout<'_>,
        metrics: &dyn FontMetrics,
        canvas: &mut dyn Canvas,
        index: usize,
        left: Pt,
        top: Pt,
    ) -> Result<(), PDFError> {
        let table = layout.table();
        let bounds = Bounds::new(left, top, layout.width(), layout.row_height(index));
        stroke_borders(canvas, bounds, &self.borders)?;

        let mut x = left;
        for (column, cell) in self.positioned_cells() {
            let width = layout.spanned_width(column, cell.col_span());
            if !cell.is_covered() {
                let extent = layout.spanned_height(index, cell.row_span());
                let cell_bounds = Bounds::new(x, top, width, extent);

                if let Some(colour) = table.filler().and_then(|f| f.fill(index, column)) {
                    canvas.fill_rect(cell_bounds.to_rect(), colour)?;
                }

                table.events().fire(EventType::BeforeCell, canvas, cell_bounds)?;
                self.events.fire(EventType::BeforeCell, canvas, cell_bounds)?;
                cell.events().fire(EventType::BeforeCell, canvas, cell_bounds)?;
                cell.render(metrics, canvas, cell_bounds)?;
                cell.events().fire(EventType::AfterCell, canvas, cell_bounds)?;
                self.events.fire(EventType::AfterCell, canvas, cell_bounds)?;
                table.events().fire(EventType::AfterCell, canvas, cell_bounds)?;
            }
            x += width;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_found_by_cumulative_span() {
        let row = Row::new()
            .with_cell("a")
            .with_cell(Cell::text("wide").with_col_span(2))
            .with_cell("d");

        assert_eq!(row.column_count(), 4);
        assert_eq!(row.cell_at(0).map(|(start, _)| start), Some(0));
        assert_eq!(row.cell_at(2).map(|(start, _)| start), Some(1));
        assert_eq!(row.cell_at(3).map(|(start, _)| start), Some(3));
        assert!(row.cell_at(4).is_none());

        let starts: Vec<usize> = row.positioned_cells().map(|(start, _)| start).collect();
        assert_eq!(starts, vec![0, 1, 3]);
    }
}
