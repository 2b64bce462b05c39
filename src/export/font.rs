//! Embedded TrueType fonts for the PDF export
//!
//! Text is written with `Identity-H` encoding: every character becomes its
//! two-byte glyph id in the embedded font, and a `ToUnicode` CMap maps the
//! glyph ids back to the characters so the text can be extracted unchanged.

use super::ExportError;
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};
use std::collections::BTreeMap;
use ttf_parser::{Face, GlyphId};

const DEJAVU_SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const DEJAVU_SANS_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

// bfchar sections may hold at most 100 mappings
const CMAP_SECTION_LEN: usize = 100;

/// A parsed font plus the glyphs written with it so far
pub struct EmbeddedFont {
    base_name: &'static str,
    data: &'static [u8],
    face: Face<'static>,
    used: BTreeMap<u16, char>,
}

impl EmbeddedFont {
    pub fn regular() -> Result<Self, ExportError> {
        Self::parse("DejaVuSans", DEJAVU_SANS)
    }

    pub fn bold() -> Result<Self, ExportError> {
        Self::parse("DejaVuSans-Bold", DEJAVU_SANS_BOLD)
    }

    fn parse(base_name: &'static str, data: &'static [u8]) -> Result<Self, ExportError> {
        let face = Face::parse(data, 0).map_err(|e| ExportError::Font {
            name: base_name,
            message: e.to_string(),
        })?;
        Ok(Self {
            base_name,
            data,
            face,
            used: BTreeMap::new(),
        })
    }

    /// Glyph for `c`, or `.notdef` when the font has none
    fn glyph(&self, c: char) -> GlyphId {
        self.face.glyph_index(c).unwrap_or(GlyphId(0))
    }

    /// Font units to PDF glyph space (1000 per em)
    fn to_glyph_space(&self, units: f32) -> f32 {
        units * 1000.0 / f32::from(self.face.units_per_em())
    }

    fn advance(&self, glyph: GlyphId) -> f32 {
        f32::from(self.face.glyph_hor_advance(glyph).unwrap_or(0))
    }

    /// Printed width of `text` in points at font size `size`
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: f32 = text.chars().map(|c| self.advance(self.glyph(c))).sum();
        self.to_glyph_space(units) * size / 1000.0
    }

    /// Encode `text` as a glyph-id string, recording each glyph for `ToUnicode`
    pub fn encode(&mut self, text: &str) -> Object {
        let mut bytes = Vec::with_capacity(text.len() * 2);
        for c in text.chars() {
            let glyph = self.glyph(c);
            if glyph.0 != 0 {
                self.used.entry(glyph.0).or_insert(c);
            }
            bytes.extend_from_slice(&glyph.0.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Hexadecimal)
    }

    /// `W` array entries for the glyphs in use
    fn widths(&self) -> Vec<Object> {
        let mut widths = Vec::with_capacity(self.used.len() * 2);
        for &glyph in self.used.keys() {
            let width = self.to_glyph_space(self.advance(GlyphId(glyph))).round() as i64;
            widths.push(Object::Integer(i64::from(glyph)));
            widths.push(Object::Array(vec![Object::Integer(width)]));
        }
        widths
    }

    /// `ToUnicode` CMap program for the glyphs in use
    fn to_unicode_cmap(&self) -> Vec<u8> {
        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n\
             <0000> <FFFF>\n\
             endcodespacerange\n",
        );

        let mappings: Vec<(&u16, &char)> = self.used.iter().collect();
        for section in mappings.chunks(CMAP_SECTION_LEN) {
            cmap.push_str(&format!("{} beginbfchar\n", section.len()));
            for (glyph, c) in section {
                let mut units = [0u16; 2];
                let target: String = c
                    .encode_utf16(&mut units)
                    .iter()
                    .map(|unit| format!("{:04X}", unit))
                    .collect();
                cmap.push_str(&format!("<{:04X}> <{}>\n", glyph, target));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str(
            "endcmap\n\
             CMapName currentdict /CMap defineresource pop\n\
             end\n\
             end\n",
        );
        cmap.into_bytes()
    }

    /// Write the font program and its dictionaries into `doc`
    ///
    /// Returns the id of the composite (`Type0`) font to reference from
    /// page resources. Call after all text has been encoded.
    pub fn embed(&self, doc: &mut Document) -> Result<ObjectId, ExportError> {
        let mut font_file = Stream::new(
            dictionary! { "Length1" => Object::Integer(self.data.len() as i64) },
            self.data.to_vec(),
        );
        font_file.compress()?;
        let font_file_id = doc.add_object(font_file);

        let bbox = self.face.global_bounding_box();
        let ascent = self.to_glyph_space(f32::from(self.face.ascender()));
        let descent = self.to_glyph_space(f32::from(self.face.descender()));
        let cap_height = self
            .face
            .capital_height()
            .map(|height| self.to_glyph_space(f32::from(height)))
            .unwrap_or(ascent);

        let descriptor_id = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => Object::Name(self.base_name.as_bytes().to_vec()),
            "Flags" => Object::Integer(32),
            "FontBBox" => vec![
                Object::Real(self.to_glyph_space(f32::from(bbox.x_min))),
                Object::Real(self.to_glyph_space(f32::from(bbox.y_min))),
                Object::Real(self.to_glyph_space(f32::from(bbox.x_max))),
                Object::Real(self.to_glyph_space(f32::from(bbox.y_max))),
            ],
            "ItalicAngle" => Object::Integer(0),
            "Ascent" => Object::Real(ascent),
            "Descent" => Object::Real(descent),
            "CapHeight" => Object::Real(cap_height),
            "StemV" => Object::Integer(80),
            "FontFile2" => font_file_id,
        });

        let descendant_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => Object::Name(self.base_name.as_bytes().to_vec()),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => Object::Integer(0),
            },
            "FontDescriptor" => descriptor_id,
            "CIDToGIDMap" => "Identity",
            "DW" => Object::Integer(self.to_glyph_space(self.advance(GlyphId(0))).round() as i64),
            "W" => self.widths(),
        });

        let to_unicode_id = doc.add_object(Stream::new(dictionary! {}, self.to_unicode_cmap()));

        Ok(doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => Object::Name(self.base_name.as_bytes().to_vec()),
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(descendant_id)],
            "ToUnicode" => to_unicode_id,
        }))
    }
}
