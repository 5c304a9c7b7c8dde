//! Hook points where callers can draw extra decoration while a table renders.
//!
//! Tables, rows and cells each own an [EventSource]. Handlers receive the canvas
//! of the page being drawn and the geometry of the element the event is about;
//! they cannot change the layout.
//!
//! For cell and row events the order is always table, row, cell for `Before*`
//! events and the reverse for `After*` events.

use crate::backend::Canvas;
use crate::rect::Bounds;
use crate::PDFError;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Fired once before the first row of a table is drawn
    BeforeTable,
    /// Fired once after the border of the last table fragment is drawn
    AfterTable,
    BeforeRow,
    AfterRow,
    BeforeCell,
    AfterCell,
    /// Fired on the table after a page break opened a new page
    BeginPage,
    /// Fired on the table before a page break closes the current page
    EndPage,
}

/// What a handler gets to see. For page events the bounds cover the whole page.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TableEvent {
    pub kind: EventType,
    pub bounds: Bounds,
}

pub type EventHandler = Rc<dyn Fn(&mut dyn Canvas, &TableEvent) -> Result<(), PDFError>>;

/// Ordered lists of handlers, one per [EventType]
#[derive(Default, Clone)]
pub struct EventSource {
    handlers: HashMap<EventType, Vec<EventHandler>>,
}

impl std::fmt::Debug for EventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&EventType, usize> =
            self.handlers.iter().map(|(k, v)| (k, v.len())).collect();
        f.debug_struct("EventSource")
            .field("handlers", &counts)
            .finish()
    }
}

impl EventSource {
    pub fn new() -> EventSource {
        EventSource::default()
    }

    /// Register a handler, to be called after every handler already registered
    /// for the same kind of event
    pub fn on<F>(&mut self, kind: EventType, handler: F)
    where
        F: Fn(&mut dyn Canvas, &TableEvent) -> Result<(), PDFError> + 'static,
    {
        self.handlers.entry(kind).or_default().push(Rc::new(handler));
    }

    /// Call every handler registered for `kind`, in registration order. The list
    /// is copied before the first call, and the first error stops dispatch.
    pub fn fire(
        &self,
        kind: EventType,
        canvas: &mut dyn Canvas,
        bounds: Bounds,
    ) -> Result<(), PDFError> {
        let Some(handlers) = self.handlers.get(&kind) else {
            return Ok(());
        };
        let handlers: Vec<EventHandler> = handlers.clone();
        let event = TableEvent { kind, bounds };
        for handler in handlers.iter() {
            handler(canvas, &event)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingCanvas;
    use crate::units::Pt;
    use std::cell::RefCell;

    #[test]
    fn handlers_fire_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut source = EventSource::new();
        for label in ["first", "second"] {
            let seen = seen.clone();
            source.on(EventType::BeforeRow, move |_, event| {
                seen.borrow_mut().push((label, event.kind));
                Ok(())
            });
        }

        let mut canvas = RecordingCanvas::default();
        let bounds = Bounds::new(Pt(0.0), Pt(100.0), Pt(50.0), Pt(10.0));
        source.fire(EventType::BeforeRow, &mut canvas, bounds).unwrap();
        source.fire(EventType::AfterRow, &mut canvas, bounds).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                ("first", EventType::BeforeRow),
                ("second", EventType::BeforeRow)
            ]
        );
    }

    #[test]
    fn handler_errors_stop_dispatch() {
        let calls = Rc::new(RefCell::new(0));
        let mut source = EventSource::new();
        source.on(EventType::EndPage, |_, _| Err(PDFError::NoPages));
        {
            let calls = calls.clone();
            source.on(EventType::EndPage, move |_, _| {
                *calls.borrow_mut() += 1;
                Ok(())
            });
        }

        let mut canvas = RecordingCanvas::default();
        let result = source.fire(EventType::EndPage, &mut canvas, Bounds::default());
        assert!(matches!(result, Err(PDFError::NoPages)));
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn handlers_can_draw() {
        let mut source = EventSource::new();
        source.on(EventType::AfterCell, |canvas, event| {
            canvas.stroke_rect(event.bounds.to_rect(), Pt(2.0), crate::colours::RED)
        });
        let mut canvas = RecordingCanvas::default();
        source
            .fire(
                EventType::AfterCell,
                &mut canvas,
                Bounds::new(Pt(0.0), Pt(10.0), Pt(10.0), Pt(10.0)),
            )
            .unwrap();
        assert_eq!(canvas.ops.len(), 4);
    }
}
