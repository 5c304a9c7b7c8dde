use crate::backend::Canvas;
use crate::colour::colours;
use crate::rect::Bounds;
use crate::units::Pt;
use crate::PDFError;

/// Horizontal placement of content within a cell
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl HAlign {
    /// How much of the free horizontal space goes to the left of the content
    pub fn factor(&self) -> f32 {
        match self {
            HAlign::Left => 0.0,
            HAlign::Center => 0.5,
            HAlign::Right => 1.0,
        }
    }
}

/// Vertical placement of content within a cell
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum VAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

impl VAlign {
    /// How much of the free vertical space goes above the content
    pub fn factor(&self) -> f32 {
        match self {
            VAlign::Top => 0.0,
            VAlign::Middle => 0.5,
            VAlign::Bottom => 1.0,
        }
    }
}

/// One value per side of a box, used for paddings and border widths. Sides are
/// listed clockwise from the top, like CSS.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Sides<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Copy> Sides<T> {
    pub fn trbl(top: T, right: T, bottom: T, left: T) -> Sides<T> {
        Sides {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn all(value: T) -> Sides<T> {
        Sides::trbl(value, value, value, value)
    }

    /// Same value for top and bottom, and another for left and right
    pub fn symmetric(vertical: T, horizontal: T) -> Sides<T> {
        Sides::trbl(vertical, horizontal, vertical, horizontal)
    }

    pub fn map<U, F: Fn(T) -> U>(self, f: F) -> Sides<U> {
        Sides {
            top: f(self.top),
            right: f(self.right),
            bottom: f(self.bottom),
            left: f(self.left),
        }
    }
}

impl Sides<Pt> {
    pub fn zero() -> Sides<Pt> {
        Sides::all(Pt(0.0))
    }

    /// `left + right`
    pub fn horizontal(&self) -> Pt {
        self.left + self.right
    }

    /// `top + bottom`
    pub fn vertical(&self) -> Pt {
        self.top + self.bottom
    }
}

impl Sides<Option<Pt>> {
    /// Fill every unset side from `defaults`
    pub fn or(self, defaults: Sides<Pt>) -> Sides<Option<Pt>> {
        Sides {
            top: self.top.or(Some(defaults.top)),
            right: self.right.or(Some(defaults.right)),
            bottom: self.bottom.or(Some(defaults.bottom)),
            left: self.left.or(Some(defaults.left)),
        }
    }

    /// Unset sides count as no border
    pub fn resolved(self) -> Sides<Pt> {
        self.map(|side| side.unwrap_or_default())
    }
}

impl From<Sides<Pt>> for Sides<Option<Pt>> {
    fn from(sides: Sides<Pt>) -> Self {
        sides.map(Some)
    }
}

/// Stroke the sides of `bounds` that have a positive width, each centred on the
/// edge of the box
pub(crate) fn stroke_borders(
    canvas: &mut dyn Canvas,
    bounds: Bounds,
    borders: &Sides<Pt>,
) -> Result<(), PDFError> {
    let (left, top, right, bottom) = (bounds.left, bounds.top, bounds.right(), bounds.bottom());
    let edges = [
        (borders.top, (left, top), (right, top)),
        (borders.right, (right, top), (right, bottom)),
        (borders.bottom, (right, bottom), (left, bottom)),
        (borders.left, (left, bottom), (left, top)),
    ];
    for (width, from, to) in edges {
        if width > Pt(0.0) {
            canvas.stroke_line(from, to, width, colours::BLACK)?;
        }
    }
    Ok(())
}
