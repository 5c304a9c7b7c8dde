use super::cell::BoxModel;
use super::column::Column;
use super::text::{
    block_height, fit_font_size, split_words, whole_runs, Measure, TextRun, Word, FIT_TOLERANCE,
};
use crate::backend::{Canvas, FontMetrics, VerticalMetrics};
use crate::colour::colours;
use crate::font::Font;
use crate::page::SpanFont;
use crate::rect::Bounds;
use crate::units::Pt;
use crate::PDFError;
use id_arena::Id;
use std::cell::OnceCell;

/// Used when neither the cell nor its column say how large text should be
const DEFAULT_FONT_SIZE: Pt = Pt(10.0);

/// Width of underlines, strike-throughs and row separators
const DECORATION_WIDTH: Pt = Pt(0.25);

/// The content of a text cell: a list of runs laid out with the largest font size
/// in `[min_font_size, max_font_size]` that lets them fit the cell.
///
/// Text is broken into lines at explicit line breaks, and between words wherever a
/// line would otherwise get too wide. Words themselves are never broken.
#[derive(Debug, Default)]
pub struct TextCell {
    runs: Vec<TextRun>,
    font: Option<Id<Font>>,
    min_font_size: Option<Pt>,
    max_font_size: Option<Pt>,
    equally_spaced: bool,
    draw_rows: bool,
    paragraphs: OnceCell<Vec<Vec<Word>>>,
}

impl TextCell {
    pub fn new<S: ToString>(text: S) -> TextCell {
        TextCell::default().with_run(TextRun::new(text))
    }

    pub fn with_run<R: Into<TextRun>>(mut self, run: R) -> TextCell {
        self.runs.push(run.into());
        self.paragraphs = OnceCell::new();
        self
    }

    pub fn with_font(mut self, font: Id<Font>) -> TextCell {
        self.font = Some(font);
        self
    }

    pub fn with_font_sizes<P: Into<Pt>>(mut self, min: P, max: P) -> TextCell {
        self.min_font_size = Some(min.into());
        self.max_font_size = Some(max.into());
        self
    }

    /// Lay the runs out on a single line, each centred on an equal share of the
    /// width. Such cells are never wrapped.
    pub fn equally_spaced(mut self, equally_spaced: bool) -> TextCell {
        self.equally_spaced = equally_spaced;
        self.paragraphs = OnceCell::new();
        self
    }

    /// Draw separator lines between wrapped lines of text
    pub fn with_draw_rows(mut self, draw_rows: bool) -> TextCell {
        self.draw_rows = draw_rows;
        self
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    pub fn font(&self) -> Option<Id<Font>> {
        self.font
    }

    pub fn min_font_size(&self) -> Option<Pt> {
        self.min_font_size
    }

    pub fn max_font_size(&self) -> Option<Pt> {
        self.max_font_size
    }

    pub(crate) fn adopt(&mut self, column: &Column) {
        self.font = self.font.or(Some(column.font()));
        self.min_font_size = self.min_font_size.or(Some(column.min_font_size()));
        self.max_font_size = self.max_font_size.or(Some(column.max_font_size()));
    }

    fn base_font(&self) -> Result<Id<Font>, PDFError> {
        self.font.ok_or(PDFError::MissingTextFont)
    }

    fn font_sizes(&self) -> (Pt, Pt) {
        match (self.min_font_size, self.max_font_size) {
            (Some(min), Some(max)) => (min, max),
            (Some(size), None) | (None, Some(size)) => (size, size),
            (None, None) => (DEFAULT_FONT_SIZE, DEFAULT_FONT_SIZE),
        }
    }

    /// Paragraphs of words, derived once from the runs
    fn paragraphs(&self) -> &[Vec<Word>] {
        self.paragraphs.get_or_init(|| {
            if self.equally_spaced {
                whole_runs(&self.runs)
            } else {
                split_words(&self.runs)
            }
        })
    }

    fn measure<'a>(
        &'a self,
        metrics: &'a dyn FontMetrics,
        font: Id<Font>,
        size: Pt,
    ) -> Measure<'a> {
        Measure {
            metrics,
            runs: &self.runs,
            font,
            size,
        }
    }

    fn lines<'a>(
        &'a self,
        measure: &Measure<'_>,
        width: Pt,
        model: &BoxModel,
    ) -> Result<Vec<Vec<&'a Word>>, PDFError> {
        let paragraphs = self.paragraphs();
        if self.equally_spaced {
            return Ok(paragraphs.iter().map(|p| p.iter().collect()).collect());
        }
        measure.break_lines(paragraphs, width - model.insets.horizontal())
    }

    fn text_height(vertical: &VerticalMetrics, size: Pt, lines: usize, model: &BoxModel) -> Pt {
        block_height(vertical, size, lines) + model.insets.vertical()
    }

    /// Whether the text set at `size` fits `width` and stays within `budget`
    fn fits(
        &self,
        metrics: &dyn FontMetrics,
        size: Pt,
        width: Pt,
        budget: Pt,
        model: &BoxModel,
    ) -> Result<bool, PDFError> {
        let font = self.base_font()?;
        let vertical = metrics.vertical_metrics(font)?;
        let measure = self.measure(metrics, font, size);
        let lines = self.lines(&measure, width, model)?;

        let height = Self::text_height(&vertical, size, lines.len(), model);
        if height.0 > budget.0 + FIT_TOLERANCE {
            return Ok(false);
        }
        for line in lines.iter() {
            let line_width = measure.line_width(line)? + model.insets.horizontal();
            if line_width.0 > width.0 + FIT_TOLERANCE {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The largest font size found that fits `width` and `budget`
    pub(crate) fn font_size(
        &self,
        metrics: &dyn FontMetrics,
        width: Pt,
        budget: Pt,
        model: &BoxModel,
    ) -> Result<Pt, PDFError> {
        let (min, max) = self.font_sizes();
        fit_font_size(min, max, |size| {
            self.fits(metrics, size, width, budget, model)
        })
    }

    fn height_at(
        &self,
        metrics: &dyn FontMetrics,
        size: Pt,
        width: Pt,
        model: &BoxModel,
    ) -> Result<Pt, PDFError> {
        let font = self.base_font()?;
        let vertical = metrics.vertical_metrics(font)?;
        let lines = self.lines(&self.measure(metrics, font, size), width, model)?;
        Ok(Self::text_height(&vertical, size, lines.len(), model).max(model.min_height))
    }

    /// The widest paragraph set on one line at the minimum font size, insets
    /// included
    pub(crate) fn natural_width(
        &self,
        metrics: &dyn FontMetrics,
        model: &BoxModel,
    ) -> Result<Pt, PDFError> {
        let (min, _) = self.font_sizes();
        let measure = self.measure(metrics, self.base_font()?, min);
        let mut widest = Pt(0.0);
        for paragraph in self.paragraphs() {
            let words: Vec<&Word> = paragraph.iter().collect();
            widest = widest.max(measure.line_width(&words)?);
        }
        Ok(widest + model.insets.horizontal())
    }

    /// Height of the cell at `width`. The text is first fitted as if it were a
    /// single line at the maximum size; only if it needs more lines than that is
    /// the search repeated without a height limit.
    pub(crate) fn required_height(
        &self,
        metrics: &dyn FontMetrics,
        width: Pt,
        model: &BoxModel,
    ) -> Result<Pt, PDFError> {
        let (_, max) = self.font_sizes();
        let vertical = metrics.vertical_metrics(self.base_font()?)?;
        let single_line = Self::text_height(&vertical, max, 1, model);

        let size = self.font_size(metrics, width, single_line, model)?;
        let height = self.height_at(metrics, size, width, model)?;
        if height.0 <= single_line.0 + FIT_TOLERANCE {
            return Ok(height);
        }

        let size = self.font_size(metrics, width, Pt::INFINITY, model)?;
        self.height_at(metrics, size, width, model)
    }

    pub(crate) fn render(
        &self,
        metrics: &dyn FontMetrics,
        canvas: &mut dyn Canvas,
        bounds: Bounds,
        model: &BoxModel,
    ) -> Result<(), PDFError> {
        let font = self.base_font()?;
        let size = self.font_size(metrics, bounds.width, bounds.height, model)?;
        let vertical = metrics.vertical_metrics(font)?;
        let measure = self.measure(metrics, font, size);
        let lines = self.lines(&measure, bounds.width, model)?;

        let insets = &model.insets;
        let content_height = bounds.height - insets.vertical();
        let block = block_height(&vertical, size, lines.len());
        let block_top = bounds.top - insets.top - (content_height - block) * model.valign.factor();
        let ascent = vertical.ascent_at(size);

        if self.equally_spaced {
            let words = lines.first().map(Vec::as_slice).unwrap_or_default();
            let share = (bounds.width - insets.horizontal()) / (words.len() + 1) as f32;
            let baseline = block_top - ascent;
            for (i, word) in words.iter().enumerate() {
                let centre = bounds.left + insets.left + share * (i + 1) as f32;
                let x = centre - measure.word_width(word)? / 2.0;
                self.draw_word(canvas, &measure, &vertical, word, x, baseline)?;
            }
            return Ok(());
        }

        if self.draw_rows && lines.len() > 1 {
            let row_height = bounds.height / lines.len() as f32;
            for i in 1..lines.len() {
                let y = bounds.bottom() + row_height * i as f32;
                canvas.stroke_line(
                    (bounds.left + model.borders.left / 2.0, y),
                    (bounds.right() - model.borders.right / 2.0, y),
                    model.borders.bottom,
                    colours::BLACK,
                )?;
            }
        }

        let line_pitch = vertical.line_height_at(size) + size / 10.0;
        for (i, line) in lines.iter().enumerate() {
            let line_width = measure.line_width(line)? + insets.horizontal();
            let mut x = bounds.left + insets.left + (bounds.width - line_width) * model.halign.factor();
            let baseline = block_top - ascent - line_pitch * i as f32;
            for (j, word) in line.iter().enumerate() {
                if j > 0 {
                    x += measure.space_width(word)?;
                }
                x += self.draw_word(canvas, &measure, &vertical, word, x, baseline)?;
            }
        }
        Ok(())
    }

    /// Draw one word with its decorations, returning its width
    fn draw_word(
        &self,
        canvas: &mut dyn Canvas,
        measure: &Measure<'_>,
        vertical: &VerticalMetrics,
        word: &Word,
        x: Pt,
        baseline: Pt,
    ) -> Result<Pt, PDFError> {
        let width = measure.word_width(word)?;
        let Some(run) = self.runs.get(word.run) else {
            return Ok(width);
        };
        let size = measure.size_of(word);
        let y = baseline + run.vertical_offset;

        if !word.text.is_empty() {
            let font = SpanFont {
                id: measure.font_of(word),
                size,
            };
            canvas.draw_text((x, y), &word.text, font, run.colour)?;
        }
        if run.strike {
            let strike_y = y + vertical.x_height_at(size) / 2.0;
            canvas.stroke_line((x, strike_y), (x + width, strike_y), DECORATION_WIDTH, run.colour)?;
        }
        if run.underline {
            let underline_y = y - size / 10.0;
            canvas.stroke_line(
                (x, underline_y),
                (x + width, underline_y),
                DECORATION_WIDTH,
                run.colour,
            )?;
        }
        Ok(width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::cell::Cell;
    use crate::layout::style::{HAlign, Sides, VAlign};
    use crate::test_utils::{font_id, DrawOp, FixedMetrics, RecordingCanvas};

    fn model() -> BoxModel {
        BoxModel {
            insets: Sides::symmetric(Pt(0.0), Pt(1.0)),
            borders: Sides::zero(),
            background: None,
            min_height: Pt(0.0),
            halign: HAlign::Left,
            valign: VAlign::Top,
        }
    }

    fn cell(text: &str, min: f32, max: f32) -> TextCell {
        TextCell::new(text)
            .with_font(font_id())
            .with_font_sizes(min, max)
    }

    #[test]
    fn unfontable_text_is_an_error() {
        let result = TextCell::new("x").natural_width(&FixedMetrics::default(), &model());
        assert!(matches!(result, Err(PDFError::MissingTextFont)));
    }

    #[test]
    fn natural_width_is_the_widest_paragraph_at_min_size() {
        let metrics = FixedMetrics::default();
        let text = cell("ab cd\nabcdefgh", 10.0, 20.0);
        // "abcdefgh" at 10pt is 40pt, plus 1pt padding on each side
        assert_eq!(text.natural_width(&metrics, &model()).unwrap(), Pt(42.0));
    }

    #[test]
    fn roomy_cells_use_the_maximum_size() {
        let metrics = FixedMetrics::default();
        let text = cell("hello", 8.0, 24.0);
        let size = text
            .font_size(&metrics, Pt(500.0), Pt::INFINITY, &model())
            .unwrap();
        assert_eq!(size, Pt(24.0));
    }

    #[test]
    fn narrow_cells_shrink_the_text() {
        let metrics = FixedMetrics::default();
        let text = cell("narrow", 8.0, 24.0);
        // 6 characters at 24pt need 72pt, at 8pt 24pt
        let width = Pt(50.0);
        let size = text.font_size(&metrics, width, Pt::INFINITY, &model()).unwrap();

        assert!(size < Pt(24.0));
        assert!(size >= Pt(8.0));
        assert!(text.fits(&metrics, size, width, Pt::INFINITY, &model()).unwrap());
        // 6 * size / 2 + 2 <= 50 holds up to 16pt
        assert!(size.approx_eq(Pt(16.0), 0.05), "{size}");
    }

    #[test]
    fn long_text_wraps_before_shrinking() {
        let metrics = FixedMetrics::default();
        let text = cell("aaaa bbbb cccc dddd", 10.0, 10.0);
        // each word is 20pt, two words and a space fit in 47pt
        let height = text.required_height(&metrics, Pt(47.0), &model()).unwrap();
        // two lines of 10pt with 1pt of leading
        assert_eq!(height, Pt(21.0));
    }

    #[test]
    fn single_line_text_keeps_the_single_line_height() {
        let metrics = FixedMetrics::default();
        let text = cell("short", 8.0, 12.0);
        let height = text.required_height(&metrics, Pt(200.0), &model()).unwrap();
        assert_eq!(height, Pt(12.0));

        let mut tall = model();
        tall.min_height = Pt(30.0);
        assert_eq!(text.required_height(&metrics, Pt(200.0), &tall).unwrap(), Pt(30.0));
    }

    #[test]
    fn required_height_is_idempotent() {
        let metrics = FixedMetrics::default();
        let text = cell(&lipsum::lipsum(40), 6.0, 14.0);
        let first = text.required_height(&metrics, Pt(150.0), &model()).unwrap();
        let second = text.required_height(&metrics, Pt(150.0), &model()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn renders_one_span_per_word_on_wrapped_lines() {
        let metrics = FixedMetrics::default();
        let text = cell("aaaa bbbb cccc", 10.0, 10.0);
        let bounds = Bounds::new(Pt(0.0), Pt(100.0), Pt(47.0), Pt(21.0));
        let mut canvas = RecordingCanvas::default();
        text.render(&metrics, &mut canvas, bounds, &model()).unwrap();

        assert_eq!(canvas.texts(), vec!["aaaa", "bbbb", "cccc"]);
        let origins: Vec<(Pt, Pt)> = canvas
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { origin, .. } => Some(*origin),
                _ => None,
            })
            .collect();
        // baselines sit one ascent (8pt) below the top, lines 11pt apart
        assert_eq!(
            origins,
            vec![
                (Pt(1.0), Pt(92.0)),
                (Pt(26.0), Pt(92.0)),
                (Pt(1.0), Pt(81.0))
            ]
        );
    }

    #[test]
    fn right_aligned_lines_end_at_the_padding() {
        let metrics = FixedMetrics::default();
        let text = cell("abc", 10.0, 10.0);
        let mut right = model();
        right.halign = HAlign::Right;
        let mut canvas = RecordingCanvas::default();
        text.render(
            &metrics,
            &mut canvas,
            Bounds::new(Pt(0.0), Pt(50.0), Pt(100.0), Pt(10.0)),
            &right,
        )
        .unwrap();
        // 15pt of text ending 1pt before the right edge
        assert!(matches!(
            &canvas.ops[0],
            DrawOp::Text { origin, .. } if origin.0 == Pt(84.0)
        ));
    }

    #[test]
    fn equally_spaced_runs_are_centred_on_shares() {
        let metrics = FixedMetrics::default();
        let text = TextCell::default()
            .with_run("ab")
            .with_run("cd")
            .with_run("ef")
            .with_font(font_id())
            .with_font_sizes(10.0, 10.0)
            .equally_spaced(true);
        let mut canvas = RecordingCanvas::default();
        let model = BoxModel {
            insets: Sides::zero(),
            ..model()
        };
        text.render(
            &metrics,
            &mut canvas,
            Bounds::new(Pt(0.0), Pt(10.0), Pt(80.0), Pt(10.0)),
            &model,
        )
        .unwrap();

        let xs: Vec<Pt> = canvas
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { origin, .. } => Some(origin.0),
                _ => None,
            })
            .collect();
        // centres at 20, 40 and 60, each run 10pt wide
        assert_eq!(xs, vec![Pt(15.0), Pt(35.0), Pt(55.0)]);
    }

    #[test]
    fn decorations_are_thin_lines() {
        let metrics = FixedMetrics::default();
        let text = TextCell::default()
            .with_run(TextRun::new("struck").with_strike(true))
            .with_run(TextRun::new("under").with_underline(true))
            .with_font(font_id())
            .with_font_sizes(10.0, 10.0);
        let mut canvas = RecordingCanvas::default();
        text.render(
            &metrics,
            &mut canvas,
            Bounds::new(Pt(0.0), Pt(10.0), Pt(200.0), Pt(10.0)),
            &model(),
        )
        .unwrap();

        let lines: Vec<&DrawOp> = canvas
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Line { .. }))
            .collect();
        assert_eq!(lines.len(), 2);
        // strike through at half the x-height (2.5pt) above the baseline (2pt)
        assert!(matches!(
            lines[0],
            DrawOp::Line { from, width, .. } if from.1 == Pt(4.5) && *width == Pt(0.25)
        ));
        // underline a tenth of the size below it
        assert!(matches!(lines[1], DrawOp::Line { from, .. } if from.1 == Pt(1.0)));
    }

    #[test]
    fn strike_follows_the_run_size() {
        let metrics = FixedMetrics::default();
        let text = TextCell::default()
            .with_run(TextRun::new("big").with_size(20.0).with_strike(true))
            .with_font(font_id())
            .with_font_sizes(10.0, 10.0);
        let mut canvas = RecordingCanvas::default();
        text.render(
            &metrics,
            &mut canvas,
            Bounds::new(Pt(0.0), Pt(30.0), Pt(200.0), Pt(30.0)),
            &model(),
        )
        .unwrap();

        // baseline at 22pt (top 30pt less the 8pt ascent at the cell's 10pt),
        // struck at half the x-height of the run's 20pt
        let strikes: Vec<Pt> = canvas
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line { from, .. } => Some(from.1),
                _ => None,
            })
            .collect();
        assert_eq!(strikes, vec![Pt(27.0)]);
    }

    #[test]
    fn trailing_line_breaks_add_no_height() {
        let metrics = FixedMetrics::default();
        let plain = cell("abc", 10.0, 10.0);
        let trailing = cell("abc\n", 10.0, 10.0);
        let crlf = cell("abc\r\n", 10.0, 10.0);

        let height = plain.required_height(&metrics, Pt(200.0), &model()).unwrap();
        assert_eq!(height, Pt(10.0));
        assert_eq!(trailing.required_height(&metrics, Pt(200.0), &model()).unwrap(), height);
        assert_eq!(crlf.required_height(&metrics, Pt(200.0), &model()).unwrap(), height);

        // an inner empty line still counts: 3 lines plus 2 gaps of a tenth
        let inner = cell("abc\n\nabc", 10.0, 10.0);
        assert_eq!(inner.required_height(&metrics, Pt(200.0), &model()).unwrap(), Pt(32.0));
    }

    #[test]
    fn cells_pad_text_by_default() {
        let cell = Cell::from(cell("x", 10.0, 10.0));
        assert_eq!(cell.padding(), Sides::symmetric(Pt(0.0), Pt(1.0)));
    }
}
