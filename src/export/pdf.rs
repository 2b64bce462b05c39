//! Document export of the catalog
//!
//! The catalog is first turned into a [`CatalogDocument`] (a title plus one
//! entry per collection), laid out into lines and pages, and then written as
//! a PDF with embedded DejaVu Sans fonts. Characters are kept in logical
//! order and mapped back through `ToUnicode`, so extracted text equals the
//! catalog values. Glyphs are not shaped.

use super::font::EmbeddedFont;
use super::{Disposition, ExportArtifact, ExportError, ExportRow};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

pub const PDF_FILENAME: &str = "collections.pdf";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const DOCUMENT_TITLE: &str = "Hadith Collections";

// A4 in points
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 56.0;

const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 11.0;
const LEADING: f32 = 15.0;
const ENTRY_GAP: f32 = 4.0;
const CONTINUATION_INDENT: f32 = 12.0;

const BULLET: &str = "- ";

/// Structured document rendered by the PDF export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogDocument {
    pub title: String,
    pub entries: Vec<DocumentEntry>,
}

/// One list entry: a collection name and its description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub name: String,
    pub description: String,
}

impl DocumentEntry {
    /// Entry text as printed, before wrapping
    pub fn text(&self) -> String {
        format!("{}: {}", self.name, self.description)
    }
}

impl CatalogDocument {
    /// Build the document from export rows, keeping their order
    pub fn from_rows(rows: &[ExportRow]) -> Self {
        Self {
            title: DOCUMENT_TITLE.to_string(),
            entries: rows
                .iter()
                .map(|row| DocumentEntry {
                    name: row.name.clone(),
                    description: row.description.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FontFace {
    Title,
    Body,
}

impl FontFace {
    fn resource_name(self) -> &'static str {
        match self {
            FontFace::Title => "F2",
            FontFace::Body => "F1",
        }
    }

    fn size(self) -> f32 {
        match self {
            FontFace::Title => TITLE_SIZE,
            FontFace::Body => BODY_SIZE,
        }
    }
}

/// The two faces a catalog document is printed with
struct Fonts {
    title: EmbeddedFont,
    body: EmbeddedFont,
}

impl Fonts {
    fn load() -> Result<Self, ExportError> {
        Ok(Self {
            title: EmbeddedFont::bold()?,
            body: EmbeddedFont::regular()?,
        })
    }

    fn get(&self, face: FontFace) -> &EmbeddedFont {
        match face {
            FontFace::Title => &self.title,
            FontFace::Body => &self.body,
        }
    }

    fn get_mut(&mut self, face: FontFace) -> &mut EmbeddedFont {
        match face {
            FontFace::Title => &mut self.title,
            FontFace::Body => &mut self.body,
        }
    }

    fn width(&self, face: FontFace, text: &str) -> f32 {
        self.get(face).text_width(text, face.size())
    }
}

/// A positioned line of text
#[derive(Debug, Clone, PartialEq)]
struct Line {
    face: FontFace,
    x: f32,
    y: f32,
    text: String,
}

/// Greedy word wrap against a measured width
///
/// Words wider than a line are split.
fn wrap(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        while measure(&word) > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(split_point(&word, max_width, &measure));
            lines.push(word);
            word = rest;
        }

        if current.is_empty() {
            current = word;
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if measure(&candidate) > max_width {
            lines.push(std::mem::replace(&mut current, word));
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Byte length of the longest prefix of `word` that fits; at least one character
fn split_point(word: &str, max_width: f32, measure: &impl Fn(&str) -> f32) -> usize {
    let mut end = 0;
    for (index, c) in word.char_indices() {
        let next = index + c.len_utf8();
        if end > 0 && measure(&word[..next]) > max_width {
            break;
        }
        end = next;
    }
    end
}

/// Lay the document out into pages of positioned lines
fn layout(document: &CatalogDocument, fonts: &Fonts) -> Vec<Vec<Line>> {
    let mut pages: Vec<Vec<Line>> = vec![Vec::new()];
    let mut y = PAGE_HEIGHT - MARGIN - TITLE_SIZE;

    let title_width = PAGE_WIDTH - 2.0 * MARGIN;
    for text in wrap(&document.title, title_width, |s| fonts.width(FontFace::Title, s)) {
        pages[0].push(Line {
            face: FontFace::Title,
            x: MARGIN,
            y,
            text,
        });
        y -= TITLE_SIZE + 6.0;
    }
    y -= LEADING - BODY_SIZE;

    let body_width = PAGE_WIDTH - 2.0 * MARGIN - CONTINUATION_INDENT;
    for entry in &document.entries {
        // description line breaks start a new wrapped paragraph
        let mut lines = Vec::new();
        for (index, paragraph) in entry.text().split('\n').enumerate() {
            let wrapped = wrap(paragraph, body_width, |s| fonts.width(FontFace::Body, s));
            for (line_index, text) in wrapped.into_iter().enumerate() {
                let first = index == 0 && line_index == 0;
                lines.push((first, text));
            }
        }

        for (first, text) in lines {
            if y < MARGIN {
                pages.push(Vec::new());
                y = PAGE_HEIGHT - MARGIN - BODY_SIZE;
            }
            let (x, text) = if first {
                (MARGIN, format!("{}{}", BULLET, text))
            } else {
                (MARGIN + CONTINUATION_INDENT, text)
            };
            if let Some(page) = pages.last_mut() {
                page.push(Line {
                    face: FontFace::Body,
                    x,
                    y,
                    text,
                });
            }
            y -= LEADING;
        }
        y -= ENTRY_GAP;
    }

    pages
}

fn page_content(lines: &[Line], fonts: &mut Fonts) -> Content {
    let mut operations = Vec::with_capacity(lines.len() * 5);
    for line in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![
                Object::Name(line.face.resource_name().as_bytes().to_vec()),
                Object::Real(line.face.size()),
            ],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Real(line.x), Object::Real(line.y)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![fonts.get_mut(line.face).encode(&line.text)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    Content { operations }
}

/// Render the document as PDF bytes
pub fn render_document(document: &CatalogDocument) -> Result<Vec<u8>, ExportError> {
    let mut fonts = Fonts::load()?;
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let laid_out = layout(document, &fonts);
    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(laid_out.len());
    for lines in laid_out {
        let content = page_content(&lines, &mut fonts).encode()?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    // fonts are embedded last so their ToUnicode maps cover every encoded glyph
    let body_font = fonts.body.embed(&mut doc)?;
    let title_font = fonts.title.embed(&mut doc)?;
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => body_font,
            "F2" => title_font,
        },
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<Object>>(),
        "Count" => Object::Integer(page_ids.len() as i64),
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(PAGE_WIDTH),
            Object::Real(PAGE_HEIGHT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Render the catalog rows as an inline PDF artifact
pub fn render_pdf(rows: &[ExportRow]) -> Result<ExportArtifact, ExportError> {
    let document = CatalogDocument::from_rows(rows);
    let bytes = render_document(&document)?;

    Ok(ExportArtifact {
        filename: PDF_FILENAME,
        content_type: PDF_CONTENT_TYPE,
        disposition: Disposition::Inline,
        bytes,
    })
}
