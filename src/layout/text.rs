//! Text runs and the text flow primitives used by text cells: splitting text into
//! words, greedy line packing and the font size search.

use crate::backend::{FontMetrics, VerticalMetrics};
use crate::colour::Colour;
use crate::font::Font;
use crate::units::Pt;
use crate::PDFError;
use id_arena::Id;

/// Comparisons of measured widths and heights allow for this much rounding error
pub(crate) const FIT_TOLERANCE: f32 = 1e-3;

/// The smallest step the font size search still takes
const SEARCH_RESOLUTION: f32 = 0.01;

/// A fragment of text with its own formatting. Unset font and size fall back to the
/// font and fitted size of the cell the run is placed in.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font: Option<Id<Font>>,
    pub size: Option<Pt>,
    pub colour: Colour,
    /// Shift of the baseline, positive moves the text up
    pub vertical_offset: Pt,
    pub underline: bool,
    pub strike: bool,
}

impl TextRun {
    pub fn new<S: ToString>(text: S) -> TextRun {
        TextRun {
            text: text.to_string(),
            font: None,
            size: None,
            colour: Colour::default(),
            vertical_offset: Pt(0.0),
            underline: false,
            strike: false,
        }
    }

    /// A run with the same formatting as this one but different text
    pub fn copy_with<S: ToString>(&self, text: S) -> TextRun {
        TextRun {
            text: text.to_string(),
            ..self.clone()
        }
    }

    pub fn with_font(mut self, font: Id<Font>) -> TextRun {
        self.font = Some(font);
        self
    }

    pub fn with_size<S: Into<Pt>>(mut self, size: S) -> TextRun {
        self.size = Some(size.into());
        self
    }

    pub fn with_colour(mut self, colour: Colour) -> TextRun {
        self.colour = colour;
        self
    }

    pub fn with_vertical_offset<P: Into<Pt>>(mut self, offset: P) -> TextRun {
        self.vertical_offset = offset.into();
        self
    }

    pub fn with_underline(mut self, underline: bool) -> TextRun {
        self.underline = underline;
        self
    }

    pub fn with_strike(mut self, strike: bool) -> TextRun {
        self.strike = strike;
        self
    }

    pub fn font_or(&self, default: Id<Font>) -> Id<Font> {
        self.font.unwrap_or(default)
    }

    pub fn size_or(&self, default: Pt) -> Pt {
        self.size.unwrap_or(default)
    }
}

impl From<&str> for TextRun {
    fn from(text: &str) -> Self {
        TextRun::new(text)
    }
}

impl From<String> for TextRun {
    fn from(text: String) -> Self {
        TextRun::new(text)
    }
}

/// A piece of text that is never broken, with the index of the run it came from
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Word {
    pub text: String,
    pub run: usize,
}

/// Split runs into paragraphs at explicit line breaks (`\r\n`, `\r` or `\n`), and
/// paragraphs into words at every whitespace character. Consecutive whitespace
/// yields empty words, so joining a paragraph's words with single spaces gives the
/// paragraph back. A run boundary is also a word boundary. Empty lines after the
/// last line holding any text are dropped; leading and inner ones are kept.
///
/// There is always at least one paragraph holding at least one word.
pub(crate) fn split_words(runs: &[TextRun]) -> Vec<Vec<Word>> {
    // each paragraph with whether any of its lines had text, and the run it
    // started in
    let mut paragraphs: Vec<(Vec<Word>, bool, usize)> = vec![(Vec::new(), false, 0)];

    for (run, text_run) in runs.iter().enumerate() {
        let text = text_run.text.replace("\r\n", "\n").replace('\r', "\n");
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                paragraphs.push((Vec::new(), false, run));
            }
            if line.is_empty() {
                continue;
            }
            if let Some((words, has_text, _)) = paragraphs.last_mut() {
                *has_text = true;
                words.extend(line.split(char::is_whitespace).map(|word| Word {
                    text: word.to_string(),
                    run,
                }));
            }
        }
    }

    while paragraphs.len() > 1 && paragraphs.last().is_some_and(|(_, has_text, _)| !has_text) {
        paragraphs.pop();
    }

    paragraphs
        .into_iter()
        .map(|(mut words, _, run)| {
            if words.is_empty() {
                words.push(Word {
                    text: String::new(),
                    run,
                });
            }
            words
        })
        .collect()
}

/// One word per run, used by equally spaced cells which never break their runs
pub(crate) fn whole_runs(runs: &[TextRun]) -> Vec<Vec<Word>> {
    let words: Vec<Word> = runs
        .iter()
        .enumerate()
        .map(|(run, text_run)| Word {
            text: text_run.text.clone(),
            run,
        })
        .collect();
    vec![words]
}

/// Measures words in the font and size they are drawn with
pub(crate) struct Measure<'a> {
    pub metrics: &'a dyn FontMetrics,
    pub runs: &'a [TextRun],
    /// Font for runs that don't set one
    pub font: Id<Font>,
    /// Size for runs that don't set one
    pub size: Pt,
}

impl Measure<'_> {
    fn run(&self, word: &Word) -> Option<&TextRun> {
        self.runs.get(word.run)
    }

    pub fn font_of(&self, word: &Word) -> Id<Font> {
        self.run(word).map(|r| r.font_or(self.font)).unwrap_or(self.font)
    }

    pub fn size_of(&self, word: &Word) -> Pt {
        self.run(word).map(|r| r.size_or(self.size)).unwrap_or(self.size)
    }

    pub fn word_width(&self, word: &Word) -> Result<Pt, PDFError> {
        self.metrics
            .text_width(self.font_of(word), self.size_of(word), &word.text)
    }

    /// Width of the space separating `word` from the word before it
    pub fn space_width(&self, word: &Word) -> Result<Pt, PDFError> {
        self.metrics
            .text_width(self.font_of(word), self.size_of(word), " ")
    }

    /// Width of the words of a line, with one space between each pair
    pub fn line_width(&self, line: &[&Word]) -> Result<Pt, PDFError> {
        let mut width = Pt(0.0);
        for (i, word) in line.iter().enumerate() {
            if i > 0 {
                width += self.space_width(word)?;
            }
            width += self.word_width(word)?;
        }
        Ok(width)
    }

    /// Greedily pack each paragraph into lines no wider than `available`. Words are
    /// never split; a paragraph made of a single word is never broken even if it
    /// overflows.
    pub fn break_lines<'w>(
        &self,
        paragraphs: &'w [Vec<Word>],
        available: Pt,
    ) -> Result<Vec<Vec<&'w Word>>, PDFError> {
        let mut lines: Vec<Vec<&'w Word>> = Vec::new();
        for paragraph in paragraphs.iter() {
            let Some((first, rest)) = paragraph.split_first() else {
                lines.push(Vec::new());
                continue;
            };

            let mut line: Vec<&'w Word> = vec![first];
            let mut line_width = self.word_width(first)?;
            for word in rest {
                let word_width = self.word_width(word)?;
                let space_width = self.space_width(word)?;
                if (line_width + word_width + space_width).0 <= available.0 + FIT_TOLERANCE {
                    line.push(word);
                    line_width += word_width + space_width;
                } else {
                    lines.push(std::mem::replace(&mut line, vec![word]));
                    line_width = word_width;
                }
            }
            lines.push(line);
        }
        Ok(lines)
    }
}

/// Height of a block of `lines` lines at `size`: every line is as tall as the
/// font's ascent to descent, and lines are separated by a tenth of the size
pub(crate) fn block_height(metrics: &VerticalMetrics, size: Pt, lines: usize) -> Pt {
    let gaps = lines.saturating_sub(1);
    metrics.line_height_at(size) * lines as f32 + size / 10.0 * gaps as f32
}

/// Find a large font size in `[min, max]` for which `fits` holds.
///
/// `max` is tried first. Otherwise the search bisects from the middle of the range,
/// starting with a step of a quarter of the range and halving it until it drops
/// below a hundredth of a point. The result is the largest size found to fit along
/// the way, or `min` if none did.
pub(crate) fn fit_font_size<F>(min: Pt, max: Pt, mut fits: F) -> Result<Pt, PDFError>
where
    F: FnMut(Pt) -> Result<bool, PDFError>,
{
    if fits(max)? {
        return Ok(max);
    }

    let mut best = min;
    let mut size = (min + max) / 2.0;
    let mut step = (max - min) / 4.0;
    while step.0 >= SEARCH_RESOLUTION {
        if fits(size)? {
            best = size;
            size += step;
        } else {
            size -= step;
        }
        step = step / 2.0;
    }
    log::trace!("fitted font size {best} in [{min}, {max}]");
    Ok(best)
}
