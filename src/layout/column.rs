use super::style::{HAlign, Sides, VAlign};
use crate::font::Font;
use crate::units::Pt;
use id_arena::Id;

/// Width bounds of a column and the defaults its cells inherit: font and font size
/// range for text, alignment and border widths
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    min_width: Pt,
    max_width: Pt,
    font: Id<Font>,
    min_font_size: Pt,
    max_font_size: Pt,
    halign: HAlign,
    valign: VAlign,
    borders: Sides<Pt>,
}

impl Column {
    /// A column between `min_width` and `max_width` wide, sized to its content
    pub fn new(
        min_width: Pt,
        max_width: Pt,
        font: Id<Font>,
        min_font_size: Pt,
        max_font_size: Pt,
        halign: HAlign,
    ) -> Column {
        Column {
            min_width,
            max_width,
            font,
            min_font_size,
            max_font_size,
            halign,
            valign: VAlign::Middle,
            borders: Sides::all(Pt(0.25)),
        }
    }

    /// A column of exactly `width`, whose text is always set at `font_size`
    pub fn fixed(width: Pt, font: Id<Font>, font_size: Pt, halign: HAlign) -> Column {
        Column::new(width, width, font, font_size, font_size, halign)
    }

    pub fn with_halign(mut self, halign: HAlign) -> Column {
        self.halign = halign;
        self
    }

    pub fn with_valign(mut self, valign: VAlign) -> Column {
        self.valign = valign;
        self
    }

    pub fn with_borders(mut self, borders: Sides<Pt>) -> Column {
        self.borders = borders;
        self
    }

    pub fn min_width(&self) -> Pt {
        self.min_width
    }

    pub fn max_width(&self) -> Pt {
        self.max_width
    }

    /// Fixed columns take their width without looking at their cells
    pub fn is_fixed(&self) -> bool {
        self.min_width == self.max_width
    }

    pub fn font(&self) -> Id<Font> {
        self.font
    }

    pub fn min_font_size(&self) -> Pt {
        self.min_font_size
    }

    pub fn max_font_size(&self) -> Pt {
        self.max_font_size
    }

    pub fn halign(&self) -> HAlign {
        self.halign
    }

    pub fn valign(&self) -> VAlign {
        self.valign
    }

    pub fn borders(&self) -> Sides<Pt> {
        self.borders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::font_id;
    use pretty_assertions::assert_eq;

    #[test]
    fn fixed_columns_have_one_width_and_size() {
        let column = Column::fixed(Pt(60.0), font_id(), Pt(9.0), HAlign::Right);
        assert!(column.is_fixed());
        assert_eq!(column.min_width(), Pt(60.0));
        assert_eq!(column.max_width(), Pt(60.0));
        assert_eq!(column.min_font_size(), Pt(9.0));
        assert_eq!(column.max_font_size(), Pt(9.0));

        let flexible = Column::new(Pt(40.0), Pt(80.0), font_id(), Pt(8.0), Pt(12.0), HAlign::Left);
        assert!(!flexible.is_fixed());
    }

    #[test]
    fn defaults_can_be_overridden() {
        let font = font_id();
        let column = Column::new(Pt(40.0), Pt(80.0), font, Pt(8.0), Pt(12.0), HAlign::Left);
        assert_eq!(column.valign(), VAlign::Middle);
        assert_eq!(column.borders(), Sides::all(Pt(0.25)));

        let column = column
            .with_halign(HAlign::Center)
            .with_valign(VAlign::Bottom)
            .with_borders(Sides::symmetric(Pt(1.0), Pt(0.0)));
        assert_eq!(column.halign(), HAlign::Center);
        assert_eq!(column.valign(), VAlign::Bottom);
        assert_eq!(column.borders(), Sides::symmetric(Pt(1.0), Pt(0.0)));
        assert_eq!(column.font(), font);
        assert_eq!(column.min_width(), Pt(40.0));
        assert_eq!(column.max_font_size(), Pt(12.0));
    }
}
