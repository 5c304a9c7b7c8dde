use super::event::EventType;
use super::margins::Margins;
use super::style::stroke_borders;
use super::table::{Table, TableLayout};
use super::text::FIT_TOLERANCE;
use crate::backend::{Backend, Canvas};
use crate::rect::Bounds;
use crate::units::Pt;
use crate::PDFError;

/// Where a table goes: its width, the top-left corner of its first row and the
/// margins that bound every page it flows onto.
///
/// Only the top and bottom margins are used. A continuation page starts at
/// `page height - margins.top` and rows may extend down to `margins.bottom`.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub width: Pt,
    pub left: Pt,
    pub top: Pt,
    pub margins: Margins,
}

impl Placement {
    pub fn new(width: Pt, left: Pt, top: Pt) -> Placement {
        Placement {
            width,
            left,
            top,
            margins: Margins::empty(),
        }
    }

    pub fn with_margins(mut self, margins: Margins) -> Placement {
        self.margins = margins;
        self
    }
}

impl Table {
    /// Lay the table out at the placement's width and draw it onto the backend's
    /// last page, adding pages as needed. Returns the y coordinate of the bottom
    /// of the last row drawn.
    pub fn render<B: Backend>(&self, backend: &mut B, placement: &Placement) -> Result<Pt, PDFError> {
        let layout = self.resolve(&*backend, placement.width)?;
        layout.render(backend, placement)
    }
}

impl TableLayout<'_> {
    /// Draw the table onto the backend's last page, adding pages as needed.
    ///
    /// Rows are never split. A table taller than a whole page is drawn row by
    /// row, with a page break before every row (or group of rows joined by
    /// row-spanning cells) that would cross the bottom margin; continuation pages
    /// start with the table's header rows. Shorter tables are moved to a new page
    /// as a whole if they do not fit where they start.
    pub fn render<B: Backend>(&self, backend: &mut B, placement: &Placement) -> Result<Pt, PDFError> {
        let table = self.table();
        let margins = &placement.margins;
        let (_, page_height) = backend.page_size()?;
        let fresh_top = page_height - margins.top;
        let capacity = fresh_top - margins.bottom;
        let height = self.height();
        let left = placement.left;

        let mut canvas = backend.current_page()?;
        let mut y = placement.top;
        let mut pages = 1;

        if height.0 > capacity.0 + FIT_TOLERANCE {
            table.events().fire(
                EventType::BeforeTable,
                &mut canvas,
                Bounds::new(left, y, self.width(), height),
            )?;

            let headers = table.header_rows().min(self.row_count());
            let mut fragment_top = y;
            let mut placed = 0;
            let mut index = 0;
            while index < self.row_count() {
                let end = self.group_end(index);
                let unit = self.rows_height(index..end);
                let overflows = (y - unit).0 < margins.bottom.0 - FIT_TOLERANCE;
                if overflows && (placed > 0 || y.0 < fresh_top.0 - FIT_TOLERANCE) {
                    self.stroke_fragment(&mut canvas, left, fragment_top, y)?;
                    canvas = self.next_page(backend, canvas)?;
                    pages += 1;

                    y = self.render_rows(&*backend, &mut canvas, 0..headers, left, fresh_top)?;
                    fragment_top = fresh_top;
                    placed = headers;
                    if index < headers {
                        index = headers;
                        continue;
                    }
                }

                y = self.render_rows(&*backend, &mut canvas, index..end, left, y)?;
                placed += end - index;
                index = end;
            }

            self.finish(backend, canvas, left, fragment_top, y)?;
        } else {
            if (y - height).0 < margins.bottom.0 - FIT_TOLERANCE {
                canvas = self.next_page(backend, canvas)?;
                pages += 1;
                y = fresh_top;
            }

            let top = y;
            table.events().fire(
                EventType::BeforeTable,
                &mut canvas,
                Bounds::new(left, top, self.width(), height),
            )?;
            y = self.render_rows(&*backend, &mut canvas, 0..self.row_count(), left, top)?;
            self.finish(backend, canvas, left, top, y)?;
        }

        log::debug!("table of {} rows rendered over {pages} page(s)", self.row_count());
        Ok(y)
    }

    /// Outline the part of the table drawn on one page
    fn stroke_fragment(
        &self,
        canvas: &mut dyn Canvas,
        left: Pt,
        top: Pt,
        bottom: Pt,
    ) -> Result<Bounds, PDFError> {
        let bounds = Bounds::new(left, top, self.width(), top - bottom);
        stroke_borders(canvas, bounds, &self.table().borders())?;
        Ok(bounds)
    }

    fn finish<B: Backend>(
        &self,
        backend: &mut B,
        mut canvas: B::Canvas,
        left: Pt,
        top: Pt,
        bottom: Pt,
    ) -> Result<(), PDFError> {
        let bounds = self.stroke_fragment(&mut canvas, left, top, bottom)?;
        self.table()
            .events()
            .fire(EventType::AfterTable, &mut canvas, bounds)?;
        backend.end_page(canvas)
    }

    /// Close the current page and open a new one of the same size
    fn next_page<B: Backend>(&self, backend: &mut B, mut canvas: B::Canvas) -> Result<B::Canvas, PDFError> {
        let size = backend.page_size()?;
        let page = Bounds::new(Pt(0.0), size.1, size.0, size.1);
        let events = self.table().events();

        events.fire(EventType::EndPage, &mut canvas, page)?;
        backend.end_page(canvas)?;
        let mut canvas = backend.begin_page(size)?;
        events.fire(EventType::BeginPage, &mut canvas, page)?;
        log::debug!("table continues on a new page");
        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colours;
    use crate::layout::cell::Cell;
    use crate::layout::column::Column;
    use crate::layout::filler::RowStripe;
    use crate::layout::row::Row;
    use crate::layout::style::HAlign;
    use crate::test_utils::{font_id, DrawOp, RecordingBackend};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    const PAGE: (Pt, Pt) = (Pt(600.0), Pt(800.0));

    fn placement(top: f32) -> Placement {
        Placement::new(Pt(200.0), Pt(50.0), Pt(top)).with_margins(Margins::symmetric(50.0, 0.0))
    }

    fn table(rows: usize, row_height: f32) -> Table {
        let mut table = Table::new(vec![Column::fixed(Pt(200.0), font_id(), Pt(10.0), HAlign::Left)]);
        for _ in 0..rows {
            table.add_row([Cell::blank().with_min_height(row_height)]);
        }
        table
    }

    /// Records the top edge of every row as it is drawn
    fn record_row_tops(table: &mut Table) -> Rc<RefCell<Vec<Pt>>> {
        let tops = Rc::new(RefCell::new(Vec::new()));
        let seen = tops.clone();
        table.on(EventType::BeforeRow, move |_, event| {
            seen.borrow_mut().push(event.bounds.top);
            Ok(())
        });
        tops
    }

    fn tops(values: &[f32]) -> Vec<Pt> {
        values.iter().copied().map(Pt).collect()
    }

    #[test]
    fn tall_tables_break_once_and_repeat_headers() {
        let mut backend = RecordingBackend::new(PAGE);
        // a header and nine rows: 1000pt, with 700pt on every page
        let mut table = table(10, 100.0);
        let rows = record_row_tops(&mut table);
        let breaks = Rc::new(RefCell::new(0));
        let seen = breaks.clone();
        table.on(EventType::BeginPage, move |_, _| {
            *seen.borrow_mut() += 1;
            Ok(())
        });

        let bottom = table.render(&mut backend, &placement(750.0)).unwrap();

        assert_eq!(*breaks.borrow(), 1);
        assert_eq!(backend.pages.len(), 2);
        assert_eq!(backend.ended, vec![1, 1]);
        assert_eq!(
            *rows.borrow(),
            tops(&[750.0, 650.0, 550.0, 450.0, 350.0, 250.0, 150.0, 750.0, 650.0, 550.0, 450.0])
        );
        assert_eq!(bottom, Pt(350.0));
    }

    #[test]
    fn breaks_inside_the_header_skip_to_the_body() {
        let mut backend = RecordingBackend::new(PAGE);
        let mut table = table(10, 100.0).with_header_rows(2);
        let rows = record_row_tops(&mut table);

        // only the first header row fits above the bottom margin
        let bottom = table.render(&mut backend, &placement(180.0)).unwrap();

        assert_eq!(backend.pages.len(), 3);
        assert_eq!(backend.ended, vec![1, 1, 1]);
        // the second header row is drawn only as part of the repeated header
        assert_eq!(
            *rows.borrow(),
            tops(&[
                180.0, 750.0, 650.0, 550.0, 450.0, 350.0, 250.0, 150.0, 750.0, 650.0, 550.0,
                450.0, 350.0,
            ])
        );
        assert_eq!(bottom, Pt(250.0));
    }

    #[test]
    fn row_span_groups_move_together() {
        let mut backend = RecordingBackend::new(PAGE);
        let mut table = table(6, 100.0);
        table.add_row([Cell::blank().with_min_height(200.0).with_row_span(2)]);
        table.add_row([Cell::covered()]);
        let rows = record_row_tops(&mut table);

        let bottom = table.render(&mut backend, &placement(750.0)).unwrap();

        assert_eq!(backend.pages.len(), 2);
        // rows 6 and 7 would cross the bottom margin together; the spanning
        // cell's height all goes to row 7
        assert_eq!(
            *rows.borrow(),
            tops(&[750.0, 650.0, 550.0, 450.0, 350.0, 250.0, 750.0, 650.0, 650.0])
        );
        assert_eq!(bottom, Pt(450.0));
    }

    #[test]
    fn short_tables_move_to_a_new_page_whole() {
        let mut backend = RecordingBackend::new(PAGE);
        let mut table = table(3, 100.0);
        let starts = Rc::new(RefCell::new(Vec::new()));
        let seen = starts.clone();
        table.on(EventType::BeforeTable, move |_, event| {
            seen.borrow_mut().push(event.bounds);
            Ok(())
        });

        let bottom = table.render(&mut backend, &placement(200.0)).unwrap();

        assert_eq!(backend.pages.len(), 2);
        assert_eq!(backend.ended, vec![1, 1]);
        assert!(backend.pages[0].is_empty());
        assert_eq!(
            *starts.borrow(),
            vec![Bounds::new(Pt(50.0), Pt(750.0), Pt(200.0), Pt(300.0))]
        );
        assert_eq!(bottom, Pt(450.0));
    }

    #[test]
    fn tables_that_fit_stay_on_the_current_page() {
        let mut backend = RecordingBackend::new(PAGE);
        let table = table(3, 100.0);
        let bottom = table.render(&mut backend, &placement(700.0)).unwrap();

        assert_eq!(backend.pages.len(), 1);
        assert_eq!(backend.ended, vec![1]);
        assert_eq!(bottom, Pt(400.0));

        // the table border is the last thing drawn
        let outline: Vec<&DrawOp> = backend.pages[0]
            .iter()
            .filter(|op| matches!(op, DrawOp::Line { width, .. } if *width == Pt(1.0)))
            .collect();
        assert_eq!(outline.len(), 4);
        assert_eq!(backend.pages[0].last(), outline.last().copied());
    }

    #[test]
    fn events_fire_from_the_outside_in() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let record = |who: &'static str| {
            let seen = seen.clone();
            move |_: &mut dyn Canvas, event: &crate::layout::event::TableEvent| {
                seen.borrow_mut().push(format!("{who} {:?}", event.kind));
                Ok(())
            }
        };

        let mut cell = Cell::blank().with_min_height(20.0);
        let mut row = Row::new();
        let mut table = Table::new(vec![Column::fixed(Pt(200.0), font_id(), Pt(10.0), HAlign::Left)]);
        for kind in [
            EventType::BeforeTable,
            EventType::AfterTable,
            EventType::BeforeRow,
            EventType::AfterRow,
            EventType::BeforeCell,
            EventType::AfterCell,
        ] {
            table.on(kind, record("table"));
            row = row.on(kind, record("row"));
            cell = cell.on(kind, record("cell"));
        }
        table.push_row(row.with_cell(cell));

        let mut backend = RecordingBackend::new(PAGE);
        table.render(&mut backend, &placement(700.0)).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                "table BeforeTable",
                "table BeforeRow",
                "row BeforeRow",
                "table BeforeCell",
                "row BeforeCell",
                "cell BeforeCell",
                "cell AfterCell",
                "row AfterCell",
                "table AfterCell",
                "row AfterRow",
                "table AfterRow",
                "table AfterTable",
            ]
        );
    }

    #[test]
    fn handler_errors_abort_rendering() {
        let mut table = table(2, 10.0);
        table.on(EventType::AfterRow, |_, _| Err(PDFError::NoPages));
        let mut backend = RecordingBackend::new(PAGE);
        assert!(matches!(
            table.render(&mut backend, &placement(700.0)),
            Err(PDFError::NoPages)
        ));
    }

    #[test]
    fn filler_colours_the_striped_rows() {
        let mut table = table(3, 10.0).with_filler(RowStripe::new(colours::LIGHT_GREY));
        table.add_row([Cell::blank().with_min_height(10.0)]);
        let mut backend = RecordingBackend::new(PAGE);
        table.render(&mut backend, &placement(700.0)).unwrap();

        let filled: Vec<Pt> = backend.pages[0]
            .iter()
            .filter_map(|op| match op {
                DrawOp::Fill(rect, colour) if *colour == colours::LIGHT_GREY => Some(rect.y2),
                _ => None,
            })
            .collect();
        assert_eq!(filled, vec![Pt(700.0), Pt(680.0)]);
    }

    #[test]
    fn nested_tables_draw_inside_their_cell() {
        let mut inner = table(2, 15.0);
        let inner_rows = record_row_tops(&mut inner);

        let mut outer = Table::new(vec![
            Column::fixed(Pt(50.0), font_id(), Pt(10.0), HAlign::Left),
            Column::fixed(Pt(150.0), font_id(), Pt(10.0), HAlign::Left),
        ]);
        outer.add_row([Cell::blank().with_min_height(10.0), Cell::from(inner)]);

        let mut backend = RecordingBackend::new(PAGE);
        let bottom = outer.render(&mut backend, &placement(700.0)).unwrap();

        assert_eq!(bottom, Pt(670.0));
        assert_eq!(*inner_rows.borrow(), tops(&[700.0, 685.0]));
    }
}
