use crate::units::*;

/// A rectangle, specified by two opposite corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    /// The x-coordinate of the first (typically, lower-left) corner.
    pub x1: Pt,
    /// The y-coordinate of the first (typically, lower-left) corner.
    pub y1: Pt,
    /// The x-coordinate of the second (typically, upper-right) corner.
    pub x2: Pt,
    /// The y-coordinate of the second (typically, upper-right) corner.
    pub y2: Pt,
}

impl Rect {
    pub fn width(&self) -> Pt {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Pt {
        self.y2 - self.y1
    }
}

impl From<Rect> for pdf_writer::Rect {
    fn from(r: Rect) -> Self {
        pdf_writer::Rect {
            x1: r.x1.into(),
            y1: r.y1.into(),
            x2: r.x2.into(),
            y2: r.y2.into(),
        }
    }
}

/// The geometry of a table element (table fragment, row or cell) as the layout
/// engine sees it: a top-left anchor growing right and down the page.
///
/// PDF coordinates grow upwards, so the element occupies `top - height ..= top`
/// vertically.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub left: Pt,
    pub top: Pt,
    pub width: Pt,
    pub height: Pt,
}

impl Bounds {
    pub fn new(left: Pt, top: Pt, width: Pt, height: Pt) -> Bounds {
        Bounds {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> Pt {
        self.left + self.width
    }

    pub fn bottom(&self) -> Pt {
        self.top - self.height
    }

    /// Convert to a corner rectangle in page coordinates
    pub fn to_rect(&self) -> Rect {
        Rect {
            x1: self.left,
            y1: self.bottom(),
            x2: self.right(),
            y2: self.top,
        }
    }
}

impl From<Bounds> for Rect {
    fn from(b: Bounds) -> Self {
        b.to_rect()
    }
}
