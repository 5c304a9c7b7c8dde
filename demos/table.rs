use pdf_tables::layout::{
    Cell, Column, EventType, HAlign, Margins, Placement, RowStripe, Sides, Table, TextCell,
    TextRun, VAlign,
};
use pdf_tables::{colours, pagesize, Colour, Document, Font, Info, Page, PDFError, Pt};

fn main() -> Result<(), PDFError> {
    env_logger::init();

    let mut doc = Document::default();
    doc.set_info(
        Info::new()
            .with_title("Inventory")
            .with_author("pdf-tables"),
    );
    let font = doc.add_font(Font::load(
        include_bytes!("../assets/DejaVuSansMono.ttf").to_vec(),
    )?);

    let page_size = pagesize::A4;
    let margins = Margins::all(Pt(48.0));
    doc.add_page(Page::new(page_size, Some(margins.clone())));

    let mut table = Table::new(vec![
        Column::fixed(Pt(36.0), font, Pt(9.0), HAlign::Right),
        Column::new(Pt(90.0), Pt(160.0), font, Pt(7.0), Pt(11.0), HAlign::Left),
        Column::new(Pt(60.0), Pt(500.0), font, Pt(6.0), Pt(9.0), HAlign::Left)
            .with_valign(VAlign::Top),
        Column::fixed(Pt(60.0), font, Pt(9.0), HAlign::Right),
    ])
    .with_header_rows(2)
    .with_filler(RowStripe::new(colours::LIGHT_GREY).inverted(true));

    let heading = Colour::new_rgb_bytes(40, 60, 120);
    table.add_row([Cell::from(
        TextCell::default()
            .with_run(TextRun::new("Warehouse ").with_colour(heading))
            .with_run(TextRun::new("inventory").with_underline(true))
            .with_font_sizes(Pt(14.0), Pt(14.0)),
    )
    .with_col_span(4)
    .with_halign(HAlign::Center)
    .with_padding(Sides::all(Pt(4.0)))]);
    table.add_row(
        ["#", "Item", "Notes", "Count"]
            .map(|title| Cell::text(title).with_background(colours::WHITE)),
    );

    for i in 1..=80 {
        let notes = match i % 9 {
            0 => Cell::text(format!("Discontinued\n{}", lipsum::lipsum_words(6)))
                .with_background(Colour::new_rgb(1.0, 0.9, 0.9)),
            4 => Cell::from(TextCell::new("A B C D").equally_spaced(true)),
            _ => Cell::text(lipsum::lipsum_words(4 + i % 13)),
        };
        table.add_row([
            Cell::text(i),
            Cell::text(format!("Item {:03}", i * 7)),
            notes,
            Cell::text(i * 13 % 97),
        ]);
    }

    table.on(EventType::BeginPage, move |canvas, event| {
        canvas.draw_text(
            (Pt(48.0), event.bounds.top - Pt(30.0)),
            "Inventory (continued)",
            pdf_tables::SpanFont { id: font, size: Pt(8.0) },
            colours::BLACK,
        )
    });

    let placement = Placement::new(
        page_size.0 - margins.left - margins.right,
        margins.left,
        page_size.1 - margins.top,
    )
    .with_margins(margins);
    let bottom = table.render(&mut doc, &placement)?;
    log::info!("table ends at {bottom} on page {}", doc.page_order.len());

    let out = std::fs::File::create("table.pdf")?;
    doc.write(std::io::BufWriter::new(out))?;
    Ok(())
}
