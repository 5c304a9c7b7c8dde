use super::cell::Cell;
use super::column::Column;
use super::event::{EventSource, EventType, TableEvent};
use super::filler::CellFiller;
use super::row::Row;
use super::style::Sides;
use crate::backend::{Canvas, FontMetrics};
use crate::units::Pt;
use crate::PDFError;
use std::ops::Range;

/// A table under construction: columns, rows of cells and table-wide settings.
///
/// Cells are adopted by the table as they are added: unset properties are filled
/// in from the column they start in, after which the cells can no longer be
/// changed. Measuring happens in [Table::resolve], which produces a [TableLayout]
/// for one particular width.
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Row>,
    header_rows: usize,
    borders: Sides<Pt>,
    filler: Option<Box<dyn CellFiller>>,
    events: EventSource,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.columns)
            .field("rows", &self.rows)
            .field("header_rows", &self.header_rows)
            .field("borders", &self.borders)
            .field("filler", &self.filler.is_some())
            .field("events", &self.events)
            .finish()
    }
}

impl Table {
    /// An empty table with one header row and a 1pt border
    pub fn new(columns: Vec<Column>) -> Table {
        Table {
            columns,
            rows: Vec::new(),
            header_rows: 1,
            borders: Sides::all(Pt(1.0)),
            filler: None,
            events: EventSource::new(),
        }
    }

    /// The number of leading rows repeated at the top of every continuation page
    pub fn with_header_rows(mut self, header_rows: usize) -> Table {
        self.header_rows = header_rows;
        self
    }

    /// Border drawn around each page's fragment of the table
    pub fn with_borders(mut self, borders: Sides<Pt>) -> Table {
        self.borders = borders;
        self
    }

    pub fn with_filler<F: CellFiller + 'static>(mut self, filler: F) -> Table {
        self.filler = Some(Box::new(filler));
        self
    }

    /// Register a handler for table, page, row or cell events
    pub fn on<F>(&mut self, kind: EventType, handler: F) -> &mut Self
    where
        F: Fn(&mut dyn Canvas, &TableEvent) -> Result<(), PDFError> + 'static,
    {
        self.events.on(kind, handler);
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn header_rows(&self) -> usize {
        self.header_rows
    }

    pub fn borders(&self) -> Sides<Pt> {
        self.borders
    }

    pub fn filler(&self) -> Option<&dyn CellFiller> {
        self.filler.as_deref()
    }

    pub fn events(&self) -> &EventSource {
        &self.events
    }

    fn adopt(&self, mut cell: Cell, column: usize) -> Cell {
        if let Some(column) = self.columns.get(column) {
            cell.adopt(column);
        }
        cell
    }

    fn append(&self, row: &mut Row, cell: Cell) {
        let column = row.column_count();
        row.push(self.adopt(cell, column));
    }

    /// Add cells left to right, continuing the last row and starting a new row
    /// whenever the current one is full
    pub fn add_cells<I>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Cell>,
    {
        let mut rows = std::mem::take(&mut self.rows);
        if rows.is_empty() {
            rows.push(Row::new());
        }
        for cell in cells {
            let full = rows
                .last()
                .map(|row| row.column_count() >= self.columns.len())
                .unwrap_or(true);
            if full {
                rows.push(Row::new());
            }
            if let Some(row) = rows.last_mut() {
                self.append(row, cell.into());
            }
        }
        self.rows = rows;
        self
    }

    /// Add a row after the last one. Missing cells are padded with blank cells and
    /// cells beyond the last column are dropped.
    pub fn add_row<I>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Cell>,
    {
        let index = self.rows.len();
        self.insert_row(index, cells)
    }

    /// Like [Table::add_row], but placing the row at `index`
    pub fn insert_row<I>(&mut self, index: usize, cells: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Cell>,
    {
        let mut row = Row::new();
        let mut cells = cells.into_iter();
        while row.column_count() < self.columns.len() {
            let cell = cells.next().map(Into::into).unwrap_or_else(Cell::blank);
            self.append(&mut row, cell);
        }
        self.rows.insert(index.min(self.rows.len()), row);
        self
    }

    /// Add a prepared row, keeping its own borders and event handlers
    pub fn push_row(&mut self, mut row: Row) -> &mut Self {
        for cell in row.take_cells() {
            self.append(&mut row, cell);
        }
        self.rows.push(row);
        self
    }

    /// Pad the last row with blank cells up to the number of columns
    pub fn complete_row(&mut self) -> &mut Self {
        let mut rows = std::mem::take(&mut self.rows);
        if let Some(row) = rows.last_mut() {
            while row.column_count() < self.columns.len() {
                self.append(row, Cell::blank());
            }
        }
        self.rows = rows;
        self
    }

    /// Measure the table at `width`: resolve every column width and row height
    pub fn resolve<'t>(
        &'t self,
        metrics: &dyn FontMetrics,
        width: Pt,
    ) -> Result<TableLayout<'t>, PDFError> {
        let column_widths = self.column_widths(metrics, width)?;
        log::debug!("resolved column widths {column_widths:?} for a table {width} wide");
        let row_heights = self.row_heights(metrics, &column_widths)?;
        Ok(TableLayout {
            table: self,
            width,
            column_widths,
            row_heights,
        })
    }

    /// Total height of the table at `width`
    pub fn height(&self, metrics: &dyn FontMetrics, width: Pt) -> Result<Pt, PDFError> {
        Ok(self.resolve(metrics, width)?.height())
    }

    fn column_width(&self, metrics: &dyn FontMetrics, index: usize) -> Result<Pt, PDFError> {
        let Some(column) = self.columns.get(index) else {
            return Ok(Pt(0.0));
        };
        if column.is_fixed() {
            return Ok(column.min_width());
        }

        let mut width = column.min_width();
        for row in self.rows.iter() {
            let Some((_, cell)) = row.cell_at(index) else {
                continue;
            };
            if cell.col_span() != 1 {
                continue;
            }
            width = width.max(cell.natural_width(metrics)?);
        }
        Ok(width.min(column.max_width()))
    }

    /// Every column but the last is sized by its bounds and content, the last one
    /// takes whatever is left of `width`
    fn column_widths(&self, metrics: &dyn FontMetrics, width: Pt) -> Result<Vec<Pt>, PDFError> {
        let Some(last) = self.columns.len().checked_sub(1) else {
            return Ok(Vec::new());
        };
        let mut widths = Vec::with_capacity(self.columns.len());
        for index in 0..last {
            widths.push(self.column_width(metrics, index)?);
        }
        let used: Pt = widths.iter().copied().sum();
        widths.push(width - used);
        Ok(widths)
    }

    /// Rows are as tall as their tallest cell that doesn't span rows. A cell that
    /// spans rows then stretches the last row it covers if the rows together are
    /// too short for it.
    fn row_heights(
        &self,
        metrics: &dyn FontMetrics,
        column_widths: &[Pt],
    ) -> Result<Vec<Pt>, PDFError> {
        let mut heights = Vec::with_capacity(self.rows.len());
        for row in self.rows.iter() {
            let mut height = Pt(0.0);
            for (column, cell) in row.positioned_cells() {
                if cell.row_span() > 1 {
                    continue;
                }
                let width = spanned(column_widths, column, cell.col_span());
                height = height.max(cell.required_height(metrics, width)?);
            }
            heights.push(height);
        }

        for (index, row) in self.rows.iter().enumerate() {
            for (column, cell) in row.positioned_cells() {
                if cell.row_span() < 2 {
                    continue;
                }
                let end = (index + cell.row_span()).min(heights.len());
                let width = spanned(column_widths, column, cell.col_span());
                let required = cell.required_height(metrics, width)?;
                let available: Pt = heights[index..end].iter().copied().sum();
                if required > available {
                    heights[end - 1] += required - available;
                }
            }
        }
        Ok(heights)
    }
}

/// Sum of `values[start..start + count]`, ignoring whatever lies out of range
fn spanned(values: &[Pt], start: usize, count: usize) -> Pt {
    values.iter().skip(start).take(count).copied().sum()
}

/// A table measured at one width: the resolved column widths and row heights.
///
/// The layout never changes; laying the table out at another width takes another
/// call to [Table::resolve].
#[derive(Debug)]
pub struct TableLayout<'t> {
    table: &'t Table,
    width: Pt,
    column_widths: Vec<Pt>,
    row_heights: Vec<Pt>,
}

impl<'t> TableLayout<'t> {
    pub fn table(&self) -> &'t Table {
        self.table
    }

    pub fn width(&self) -> Pt {
        self.width
    }

    pub fn column_widths(&self) -> &[Pt] {
        &self.column_widths
    }

    pub fn row_heights(&self) -> &[Pt] {
        &self.row_heights
    }

    pub fn row_count(&self) -> usize {
        self.row_heights.len()
    }

    /// Height of row `index`, zero if there is no such row
    pub fn row_height(&self, index: usize) -> Pt {
        self.row_heights.get(index).copied().unwrap_or_default()
    }

    pub fn height(&self) -> Pt {
        self.row_heights.iter().copied().sum()
    }

    /// Width of `span` columns starting at `column`
    pub fn spanned_width(&self, column: usize, span: usize) -> Pt {
        spanned(&self.column_widths, column, span)
    }

    /// Height of `span` rows starting at `row`
    pub fn spanned_height(&self, row: usize, span: usize) -> Pt {
        spanned(&self.row_heights, row, span)
    }

    /// Height of a range of rows
    pub fn rows_height(&self, rows: Range<usize>) -> Pt {
        self.spanned_height(rows.start, rows.len())
    }

    /// The end of the group of rows starting at `start` that must stay on one
    /// page: the row itself and every row its cells, and the cells of the rows
    /// they reach, span into
    pub fn group_end(&self, start: usize) -> usize {
        let rows = self.table.rows();
        let mut end = (start + 1).min(rows.len());
        let mut index = start;
        while index < end {
            for cell in rows[index].cells() {
                end = end.max(index + cell.row_span()).min(rows.len());
            }
            index += 1;
        }
        end
    }

    /// Draw `rows` one below the other starting at `top`, without any page
    /// breaks, returning the bottom of the last row drawn. Used for header rows
    /// and for tables nested in cells.
    pub fn render_rows(
        &self,
        metrics: &dyn FontMetrics,
        canvas: &mut dyn Canvas,
        rows: Range<usize>,
        left: Pt,
        top: Pt,
    ) -> Result<Pt, PDFError> {
        let events = self.table.events();
        let mut y = top;
        let end = rows.end.min(self.table.rows().len());
        for index in rows.start..end {
            let row = &self.table.rows()[index];
            let height = self.row_height(index);
            let bounds = crate::rect::Bounds::new(left, y, self.width, height);

            events.fire(EventType::BeforeRow, canvas, bounds)?;
            row.events().fire(EventType::BeforeRow, canvas, bounds)?;
            row.render(self, metrics, canvas, index, left, y)?;
            row.events().fire(EventType::AfterRow, canvas, bounds)?;
            events.fire(EventType::AfterRow, canvas, bounds)?;

            y -= height;
        }
        Ok(y)
    }
}
