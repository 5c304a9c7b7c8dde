use crate::backend::VerticalMetrics;
use crate::refs::{ObjectReferences, RefType};
use crate::PDFError;
use id_arena::Id;
use owned_ttf_parser::{AsFaceRef, Face, GlyphId, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Ref, Str,
};
use std::collections::HashMap;

/// A parsed TrueType / OpenType font. Fonts are embedded in their entirety in the
/// generated PDF, so large fonts can noticeably increase the size of the output.
///
/// Fonts are referred to throughout the layout engine by their [Id] within a
/// [Document](crate::Document), never by reference.
pub struct Font {
    pub face: OwnedFace,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

impl Font {
    /// Load a font from raw bytes, returning an error if the font could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, PDFError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font { face })
    }

    fn face(&self) -> &Face<'_> {
        self.face.as_face_ref()
    }

    fn lookup_name(&self, name_id: u16) -> Option<String> {
        self.face()
            .names()
            .into_iter()
            .find(|name| name.name_id == name_id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// The full name of the font, if the font carries one
    pub fn name(&self) -> Option<String> {
        self.lookup_name(owned_ttf_parser::name_id::FULL_NAME)
    }

    /// The family name of the font, if the font carries one
    pub fn family(&self) -> Option<String> {
        self.lookup_name(owned_ttf_parser::name_id::FAMILY)
    }

    /// Scale factor from font units to 1000-units-per-em
    fn scaling(&self) -> f32 {
        1000.0 / self.face().units_per_em() as f32
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face().glyph_index(ch).map(|i| i.0)
    }

    pub fn replacement_glyph_id(&self) -> Option<u16> {
        self.face().glyph_index('\u{FFFD}').map(|i| i.0)
    }

    /// The advance width of `text` in 1000-units-per-em. Characters the font cannot
    /// map are measured with the glyph they will be drawn with.
    pub fn string_width(&self, text: &str) -> f32 {
        let face = self.face();
        let advance: u32 = text
            .chars()
            .map(|ch| {
                let gid = face
                    .glyph_index(ch)
                    .or_else(|| face.glyph_index('\u{FFFD}'))
                    .unwrap_or(GlyphId(0));
                face.glyph_hor_advance(gid).unwrap_or_default() as u32
            })
            .sum();
        advance as f32 * self.scaling()
    }

    /// Ascent, descent and x-height in 1000-units-per-em
    pub fn vertical_metrics(&self) -> VerticalMetrics {
        let face = self.face();
        let scaling = self.scaling();
        VerticalMetrics {
            ascent: face.ascender() as f32 * scaling,
            descent: face.descender() as f32 * scaling,
            x_height: face
                .x_height()
                .or_else(|| face.capital_height())
                .unwrap_or_default() as f32
                * scaling,
        }
    }

    /// Obtain the weight of the font, 400 being normal and 700 bold
    pub fn weight(&self) -> u16 {
        self.face().weight().to_number()
    }

    /// Every glyph the font maps a unicode codepoint to, with that codepoint
    fn glyph_chars(&self) -> HashMap<u16, char> {
        let mut map: HashMap<u16, char> = HashMap::new();
        let subtables = self
            .face()
            .tables()
            .cmap
            .into_iter()
            .flat_map(|cmap| cmap.subtables.into_iter())
            .filter(|table| table.is_unicode());
        for subtable in subtables {
            subtable.codepoints(|codepoint: u32| {
                let Ok(ch) = char::try_from(codepoint) else {
                    return;
                };
                if let Some(index) = subtable.glyph_index(codepoint).filter(|index| index.0 > 0) {
                    map.entry(index.0).or_insert(ch);
                }
            });
        }
        map
    }

    /// Advance widths in 1000-units-per-em, sorted by glyph id
    fn glyph_widths(&self, glyphs: &HashMap<u16, char>) -> Vec<(u16, f32)> {
        let scaling = self.scaling();
        let mut widths: Vec<(u16, f32)> = glyphs
            .keys()
            .filter_map(|&gid| {
                self.face()
                    .glyph_hor_advance(GlyphId(gid))
                    .map(|advance| (gid, advance as f32 * scaling))
            })
            .collect();
        widths.sort_by_key(|(gid, _)| *gid);
        widths
    }

    fn write_cid(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        glyphs: &HashMap<u16, char>,
        writer: &mut Pdf,
    ) -> Ref {
        let widths = self.glyph_widths(glyphs);
        let descriptor_id = self.write_descriptor(refs, font_index, &widths, writer);
        let id = refs.gen(RefType::CidFont(font_index));

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(descriptor_id);

        // the most frequent advance becomes the default width
        let mut counts: HashMap<u32, usize> = HashMap::new();
        for (_, width) in widths.iter() {
            *counts.entry(width.to_bits()).or_insert(0) += 1;
        }
        let default_width = counts
            .into_iter()
            .max_by_key(|&(_, count)| count)
            .map(|(bits, _)| f32::from_bits(bits))
            .unwrap_or(1000.0);

        // runs of consecutive glyph ids share one widths entry
        let mut pdf_widths = cid_font.widths();
        let mut run_start: Option<u16> = None;
        let mut run: Vec<f32> = Vec::new();
        for &(gid, width) in widths.iter() {
            match run_start {
                Some(start) if (gid - start) as usize == run.len() => {}
                Some(start) => {
                    pdf_widths.consecutive(start, run.drain(..));
                    run_start = Some(gid);
                }
                None => run_start = Some(gid),
            }
            run.push(width);
        }
        if let Some(start) = run_start {
            pdf_widths.consecutive(start, run.drain(..));
        }
        pdf_widths.finish();

        cid_font.default_width(default_width);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        id
    }

    fn write_descriptor(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        widths: &[(u16, f32)],
        writer: &mut Pdf,
    ) -> Ref {
        let data_id = refs.gen(RefType::FontData(font_index));
        writer
            .stream(data_id, self.face.as_slice())
            .pair(Name(b"Length1"), self.face.as_slice().len() as i32);

        let face = self.face();
        let scaling = self.scaling();
        let metrics = self.vertical_metrics();
        let max_width = widths.iter().map(|&(_, w)| w).fold(0.0, f32::max);
        let avg_width = if widths.is_empty() {
            0.0
        } else {
            widths.iter().map(|&(_, w)| w).sum::<f32>() / widths.len() as f32
        };
        let bbox = face.global_bounding_box();

        let id = refs.gen(RefType::FontDescriptor(font_index));
        let name = self.name().unwrap_or_else(|| format!("F{font_index}"));
        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(name.as_bytes()));
        if let Some(family) = self.family() {
            descriptor.family(Str(family.as_bytes()));
        }
        descriptor.weight(self.weight());

        let mut flags = FontFlags::NON_SYMBOLIC;
        if face.is_monospaced() {
            flags.insert(FontFlags::FIXED_PITCH);
        }
        if face.is_italic() {
            flags.insert(FontFlags::ITALIC);
        }
        descriptor.flags(flags);

        descriptor.bbox(pdf_writer::Rect {
            x1: bbox.x_min as f32 * scaling,
            y1: bbox.y_min as f32 * scaling,
            x2: bbox.x_max as f32 * scaling,
            y2: bbox.y_max as f32 * scaling,
        });
        descriptor.italic_angle(0.0);
        descriptor.ascent(metrics.ascent);
        descriptor.descent(metrics.descent);
        descriptor.leading(face.line_gap() as f32 * scaling);
        descriptor.cap_height(
            face.capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(metrics.ascent),
        );
        descriptor.x_height(metrics.x_height);
        descriptor.stem_v(80.0);
        descriptor.avg_width(avg_width);
        descriptor.max_width(max_width);
        descriptor.missing_width(max_width);
        descriptor.font_file2(data_id);

        id
    }

    fn write_to_unicode(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        glyphs: &HashMap<u16, char>,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::ToUnicode(font_index));

        let mut map = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo\n\
             << /Registry (Adobe)\n\
             /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n\
             <0000> <FFFF>\n\
             endcodespacerange\n",
        );

        let mut sorted: Vec<(u16, char)> = glyphs.iter().map(|(&g, &c)| (g, c)).collect();
        sorted.sort_by_key(|&(gid, _)| gid);

        // bfchar blocks hold at most 100 entries
        for block in sorted.chunks(100) {
            map.push_str(&format!("{} beginbfchar\n", block.len()));
            for &(gid, ch) in block {
                let mut utf16 = [0u16; 2];
                let units: String = ch
                    .encode_utf16(&mut utf16)
                    .iter()
                    .map(|u| format!("{u:04x}"))
                    .collect();
                map.push_str(&format!("<{gid:04x}> <{units}>\n"));
            }
            map.push_str("endbfchar\n");
        }
        map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            map.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultLevel as u8,
        );
        writer
            .stream(id, compressed.as_slice())
            .filter(Filter::FlateDecode);

        id
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, id: Id<Font>, writer: &mut Pdf) {
        let font_index = id.index();
        let font_id = refs.gen(RefType::Font(font_index));
        let glyphs = self.glyph_chars();
        let cid_font_id = self.write_cid(refs, font_index, &glyphs, writer);
        let to_unicode_id = self.write_to_unicode(refs, font_index, &glyphs, writer);

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{font_index}").as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
    }
}
