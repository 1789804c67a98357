//! Page canvas that assembles a PDF document with `lopdf`.
//!
//! The canvas keeps one operation list per page and defers object creation to [`Canvas::finish`],
//! which writes the page tree, the shared font resource, image XObjects and link annotations
//! and serializes the result.  Coordinates are PDF user space: points, origin at the bottom-left.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::elements::JpegImage;
use crate::error::RenderError;
use crate::fonts::{self, TimesRoman};
use crate::links::{self, real, LinkStyle};
use crate::model::LinkRegion;
use crate::richtext::Color;

const PDF_VERSION: &str = "1.7";
const PRODUCER: &str = concat!("movie_reports ", env!("CARGO_PKG_VERSION"));

#[derive(Default)]
struct PageState {
    operations: Vec<Operation>,
    annotations: Vec<Dictionary>,
    images: Vec<(String, ObjectId)>,
}

/// A document under construction whose pages all share the same size and font.
pub struct Canvas {
    document: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    width: f32,
    height: f32,
    title: Option<String>,
    pages: Vec<PageState>,
    image_count: usize,
}

impl Canvas {
    /// Creates a document with one empty page of `width` × `height` points.
    pub fn new(width: f32, height: f32) -> Self {
        let mut document = Document::with_version(PDF_VERSION);
        let pages_id = document.new_object_id();

        let mut font = Dictionary::new();
        font.set("Type", Object::Name("Font".into()));
        font.set("Subtype", Object::Name("Type1".into()));
        font.set("BaseFont", Object::Name(TimesRoman.name().into()));
        font.set("Encoding", Object::Name(fonts::FONT_ENCODING.into()));
        let font_id = document.add_object(font);

        Self {
            document,
            pages_id,
            font_id,
            width,
            height,
            title: None,
            pages: vec![PageState::default()],
            image_count: 0,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Sets the title recorded in the document information dictionary.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Starts a new page; subsequent drawing lands on it.
    pub fn add_page(&mut self) {
        self.pages.push(PageState::default());
    }

    fn current_page(&mut self) -> &mut PageState {
        if self.pages.is_empty() {
            self.pages.push(PageState::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Draws `text` with its baseline starting at (`x`, `y`).
    pub fn draw_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, color: Color) {
        let [r, g, b] = color.components();
        let encoded = fonts::encode_win_ansi(text);
        let operations = &mut self.current_page().operations;
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![
                Object::Name(fonts::FONT_RESOURCE_NAME.into()),
                real(font_size),
            ],
        ));
        operations.push(Operation::new("rg", vec![real(r), real(g), real(b)]));
        operations.push(Operation::new("Td", vec![real(x), real(y)]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(encoded)]));
        operations.push(Operation::new("ET", vec![]));
    }

    /// Draws `image` with its lower-left corner at (`x`, `y`), stretched to `width` × `height`.
    pub fn draw_image(&mut self, image: &JpegImage, x: f32, y: f32, width: f32, height: f32) {
        let image_id = self.document.add_object(image.to_xobject());
        self.image_count += 1;
        let name = format!("Im{}", self.image_count);

        let page = self.current_page();
        page.images.push((name.clone(), image_id));
        page.operations.push(Operation::new("q", vec![]));
        page.operations.push(Operation::new(
            "cm",
            vec![real(width), real(0.0), real(0.0), real(height), real(x), real(y)],
        ));
        page.operations
            .push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        page.operations.push(Operation::new("Q", vec![]));
    }

    /// Attaches a clickable region to the current page.
    pub fn add_link(&mut self, region: &LinkRegion, style: &LinkStyle) {
        let annotation = links::link_annotation(region, style);
        self.current_page().annotations.push(annotation);
    }

    /// Writes the page tree and serializes the document.
    pub fn finish(mut self) -> Result<Vec<u8>, RenderError> {
        let pages = std::mem::take(&mut self.pages);
        let mut kids = Vec::with_capacity(pages.len());
        for page in pages {
            let page_id = self.write_page(page)?;
            kids.push(Object::Reference(page_id));
        }

        let mut page_tree = Dictionary::new();
        page_tree.set("Type", Object::Name("Pages".into()));
        page_tree.set("Count", Object::Integer(kids.len() as i64));
        page_tree.set("Kids", Object::Array(kids));
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(page_tree));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name("Catalog".into()));
        catalog.set("Pages", Object::Reference(self.pages_id));
        let catalog_id = self.document.add_object(catalog);

        let mut info = Dictionary::new();
        if let Some(title) = &self.title {
            info.set("Title", text_string(title));
        }
        info.set("Producer", Object::string_literal(PRODUCER));
        let info_id = self.document.add_object(info);

        self.document.trailer.set("Root", Object::Reference(catalog_id));
        self.document.trailer.set("Info", Object::Reference(info_id));

        let mut buffer = Vec::new();
        self.document.save_to(&mut buffer)?;
        Ok(buffer)
    }

    fn write_page(&mut self, page: PageState) -> Result<ObjectId, RenderError> {
        let content = Content {
            operations: page.operations,
        };
        let content_id = self
            .document
            .add_object(lopdf::Stream::new(Dictionary::new(), content.encode()?));

        let mut font_resources = Dictionary::new();
        font_resources.set(fonts::FONT_RESOURCE_NAME, Object::Reference(self.font_id));
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(font_resources));
        if !page.images.is_empty() {
            let mut xobjects = Dictionary::new();
            for (name, image_id) in page.images {
                xobjects.set(name, Object::Reference(image_id));
            }
            resources.set("XObject", Object::Dictionary(xobjects));
        }

        let mut dictionary = Dictionary::new();
        dictionary.set("Type", Object::Name("Page".into()));
        dictionary.set("Parent", Object::Reference(self.pages_id));
        dictionary.set(
            "MediaBox",
            Object::Array(vec![real(0.0), real(0.0), real(self.width), real(self.height)]),
        );
        dictionary.set("Contents", Object::Reference(content_id));
        dictionary.set("Resources", Object::Dictionary(resources));

        if !page.annotations.is_empty() {
            let annotations = page
                .annotations
                .into_iter()
                .map(|annotation| Object::Reference(self.document.add_object(annotation)))
                .collect();
            dictionary.set("Annots", Object::Array(annotations));
        }

        Ok(self.document.add_object(dictionary))
    }
}

/// Encodes `text` as a PDF text string: a literal when it is ASCII, UTF-16BE otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, lopdf::StringFormat::Hexadecimal)
}
