//! Content stream generation for pages.

use crate::colour::Colour;
use crate::font::Font;
use crate::page::{PageContents, SpanFont, SpanLayout};
use id_arena::Arena;
use std::io::Write;

/// Renders page contents to a PDF content stream, converting high-level content
/// items into low-level PDF operators in painting order.
#[allow(clippy::write_with_newline)]
pub(crate) fn render_contents(
    contents: &[PageContents],
    fonts: &Arena<Font>,
) -> Result<Vec<u8>, std::io::Error> {
    let mut content: Vec<u8> = Vec::default();

    for page_content in contents.iter() {
        match page_content {
            PageContents::Text(spans) => {
                render_text_spans(&mut content, spans, fonts)?;
            }
            PageContents::Image(image) => {
                write!(&mut content, "q\n")?;
                write!(
                    &mut content,
                    "{} 0 0 {} {} {} cm\n",
                    image.position.width(),
                    image.position.height(),
                    image.position.x1,
                    image.position.y1
                )?;
                write!(&mut content, "/I{} Do\n", image.image_id.index())?;
                write!(&mut content, "Q\n")?;
            }
            PageContents::Fill { rect, colour } => {
                write!(&mut content, "q\n{}\n", colour.fill_operator())?;
                write!(
                    &mut content,
                    "{} {} {} {} re f\n",
                    rect.x1,
                    rect.y1,
                    rect.width(),
                    rect.height()
                )?;
                write!(&mut content, "Q\n")?;
            }
            PageContents::Line {
                from,
                to,
                width,
                colour,
            } => {
                write!(&mut content, "q\n{}\n{} w\n", colour.stroke_operator(), width)?;
                write!(
                    &mut content,
                    "{} {} m {} {} l S\n",
                    from.0, from.1, to.0, to.1
                )?;
                write!(&mut content, "Q\n")?;
            }
        }
    }

    Ok(content)
}

#[allow(clippy::write_with_newline)]
fn render_text_spans(
    content: &mut Vec<u8>,
    spans: &[SpanLayout],
    fonts: &Arena<Font>,
) -> Result<(), std::io::Error> {
    let Some(first) = spans.first() else {
        return Ok(());
    };

    write!(content, "q\n")?;

    let mut current_font: SpanFont = first.font;
    let mut current_colour: Colour = first.colour;

    write!(
        content,
        "/F{} {} Tf\n",
        current_font.id.index(),
        current_font.size
    )?;
    write!(content, "{}\n", current_colour.fill_operator())?;

    for span in spans.iter() {
        if span.font != current_font {
            current_font = span.font;
            write!(
                content,
                "/F{} {} Tf\n",
                current_font.id.index(),
                current_font.size
            )?;
        }
        if span.colour != current_colour {
            current_colour = span.colour;
            write!(content, "{}\n", current_colour.fill_operator())?;
        }

        write!(content, "BT\n")?;
        write!(content, "{} {} Td\n", span.coords.0, span.coords.1)?;
        write!(content, "<")?;
        // glyphs missing from the font fall back to U+FFFD, then to .notdef
        let font = fonts.get(current_font.id);
        for ch in span.text.chars() {
            let gid = font
                .and_then(|f| f.glyph_id(ch).or_else(|| f.replacement_glyph_id()))
                .unwrap_or(0);
            write!(content, "{gid:04x}")?;
        }
        write!(content, "> Tj\n")?;
        write!(content, "ET\n")?;
    }

    write!(content, "Q\n")?;
    Ok(())
}
