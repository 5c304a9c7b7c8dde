use crate::colour::Colour;

/// Decides the background colour of a grid position before its cell is drawn.
///
/// `row` is the index of the row within its table and `column` the index of the
/// first column the cell covers. The colour is filled over the whole cell extent,
/// underneath the cell's own background and borders.
pub trait CellFiller {
    fn fill(&self, row: usize, column: usize) -> Option<Colour>;
}

/// Colours every other column, starting with the first (or the second when
/// inverted)
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColumnStripe {
    pub colour: Colour,
    pub inverted: bool,
}

impl ColumnStripe {
    pub fn new(colour: Colour) -> ColumnStripe {
        ColumnStripe {
            colour,
            inverted: false,
        }
    }

    pub fn inverted(mut self, inverted: bool) -> ColumnStripe {
        self.inverted = inverted;
        self
    }
}

impl CellFiller for ColumnStripe {
    fn fill(&self, _row: usize, column: usize) -> Option<Colour> {
        (column % 2 == self.inverted as usize).then_some(self.colour)
    }
}

/// Colours every other row, starting with the first (or the second when inverted)
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RowStripe {
    pub colour: Colour,
    pub inverted: bool,
}

impl RowStripe {
    pub fn new(colour: Colour) -> RowStripe {
        RowStripe {
            colour,
            inverted: false,
        }
    }

    pub fn inverted(mut self, inverted: bool) -> RowStripe {
        self.inverted = inverted;
        self
    }
}

impl CellFiller for RowStripe {
    fn fill(&self, row: usize, _column: usize) -> Option<Colour> {
        (row % 2 == self.inverted as usize).then_some(self.colour)
    }
}

impl<F> CellFiller for F
where
    F: Fn(usize, usize) -> Option<Colour>,
{
    fn fill(&self, row: usize, column: usize) -> Option<Colour> {
        self(row, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colours::{LIGHT_GREY, RED};

    #[test]
    fn stripes_alternate() {
        let rows = RowStripe::new(LIGHT_GREY);
        assert_eq!(rows.fill(0, 3), Some(LIGHT_GREY));
        assert_eq!(rows.fill(1, 3), None);
        assert_eq!(rows.inverted(true).fill(1, 0), Some(LIGHT_GREY));

        let columns = ColumnStripe::new(LIGHT_GREY).inverted(true);
        assert_eq!(columns.fill(0, 0), None);
        assert_eq!(columns.fill(0, 1), Some(LIGHT_GREY));
    }

    #[test]
    fn closures_are_fillers() {
        let diagonal = |row: usize, column: usize| (row == column).then_some(RED);
        let filler: &dyn CellFiller = &diagonal;
        assert_eq!(filler.fill(2, 2), Some(RED));
        assert_eq!(filler.fill(2, 1), None);
    }
}
