//! Paged PDF document backend.
//!
//! Wraps a `lopdf::Document` loaded from disk and supports the one editing
//! operation the renderer needs: drawing a line of text at a given position of
//! a given page. The loaded file is never written back; callers save the
//! edited document under a new path.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use super::layout::TextPlacement;

/// Resource name under which the overlay font is registered on a page.
const FONT_RESOURCE: &str = "FCert";
const FONT_BASE: &str = "Helvetica";

/// A4 portrait, used when no MediaBox can be found.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 595.0, 842.0];

/// Page tree depth after which inherited attribute lookup gives up.
const MAX_TREE_DEPTH: usize = 64;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("page index {0} is out of range")]
    MissingPage(usize),
    #[error(transparent)]
    Pdf(#[from] lopdf::Error),
}

pub struct PdfDocument {
    doc: Document,
    pages: Vec<ObjectId>,
    font_id: Option<ObjectId>,
    /// Pages whose original content has already been wrapped in `q`/`Q`.
    wrapped: HashSet<ObjectId>,
}

impl PdfDocument {
    /// Load a document from `path`.
    pub fn open(path: &Path) -> Result<Self, lopdf::Error> {
        let doc = Document::load(path)?;
        let pages = doc.get_pages().into_values().collect();
        Ok(Self {
            doc,
            pages,
            font_id: None,
            wrapped: HashSet::new(),
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Draw `text` on the zero-based `page` at `placement`, filled with `rgb`.
    pub fn insert_text(
        &mut self,
        page: usize,
        placement: &TextPlacement,
        text: &str,
        rgb: [f32; 3],
    ) -> Result<(), PdfError> {
        let page_id = *self.pages.get(page).ok_or(PdfError::MissingPage(page))?;

        self.register_font(page_id)?;

        let [left, _, _, top] = self.media_box(page_id);
        let operations = vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(FONT_RESOURCE.as_bytes().to_vec()),
                    Object::Integer(i64::from(placement.font_size)),
                ],
            ),
            Operation::new("rg", rgb.iter().map(|c| (*c).into()).collect()),
            Operation::new(
                "Td",
                vec![(left + placement.x).into(), (top - placement.y).into()],
            ),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ];

        self.append_content(page_id, operations)
    }

    /// Write the document to `path`.
    pub fn save(&mut self, path: &Path) -> std::io::Result<()> {
        self.doc.save(path).map(|_| ())
    }

    /// Look up a page attribute, following the page tree upwards.
    fn inherited(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut node = self.doc.get_object(page_id).ok()?.as_dict().ok()?;
        for _ in 0..MAX_TREE_DEPTH {
            if let Ok(value) = node.get(key) {
                return Some(value);
            }
            let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
            node = self.doc.get_object(parent).ok()?.as_dict().ok()?;
        }
        None
    }

    fn resolve<'a>(&'a self, object: &'a Object) -> &'a Object {
        match object {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(object),
            _ => object,
        }
    }

    /// Normalised `[left, bottom, right, top]` of the page.
    fn media_box(&self, page_id: ObjectId) -> [f32; 4] {
        let values: Option<Vec<f32>> = self
            .inherited(page_id, b"MediaBox")
            .map(|object| self.resolve(object))
            .and_then(|object| object.as_array().ok())
            .and_then(|items| {
                items
                    .iter()
                    .map(|item| number(self.resolve(item)))
                    .collect()
            });

        match values.as_deref() {
            Some([x0, y0, x1, y1]) => [x0.min(*x1), y0.min(*y1), x0.max(*x1), y0.max(*y1)],
            _ => DEFAULT_MEDIA_BOX,
        }
    }

    /// Make the overlay font available as `/FCert` in the page resources.
    fn register_font(&mut self, page_id: ObjectId) -> Result<(), PdfError> {
        let font_id = match self.font_id {
            Some(id) => id,
            None => {
                let id = self.doc.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => FONT_BASE,
                    "Encoding" => "WinAnsiEncoding",
                });
                self.font_id = Some(id);
                id
            }
        };

        // Resources may be inherited from the page tree; copy them down so the
        // page can be given its own font entry.
        let has_own = self.doc.get_object(page_id)?.as_dict()?.has(b"Resources");
        if !has_own {
            let inherited = self
                .inherited(page_id, b"Resources")
                .cloned()
                .unwrap_or_else(|| Object::Dictionary(Dictionary::new()));
            self.doc
                .get_object_mut(page_id)?
                .as_dict_mut()?
                .set("Resources", inherited);
        }

        let resources_id = match self.doc.get_object(page_id)?.as_dict()?.get(b"Resources")? {
            Object::Reference(id) => Some(*id),
            _ => None,
        };

        let fonts = self.resources(page_id, resources_id)?.get(b"Font").ok().cloned();
        match fonts {
            Some(Object::Reference(fonts_id)) => {
                self.doc
                    .get_object_mut(fonts_id)?
                    .as_dict_mut()?
                    .set(FONT_RESOURCE, Object::Reference(font_id));
            }
            other => {
                let mut fonts = match other {
                    Some(Object::Dictionary(existing)) => existing,
                    _ => Dictionary::new(),
                };
                fonts.set(FONT_RESOURCE, Object::Reference(font_id));
                self.resources_mut(page_id, resources_id)?
                    .set("Font", Object::Dictionary(fonts));
            }
        }

        Ok(())
    }

    fn resources(
        &self,
        page_id: ObjectId,
        resources_id: Option<ObjectId>,
    ) -> Result<&Dictionary, lopdf::Error> {
        match resources_id {
            Some(id) => self.doc.get_object(id)?.as_dict(),
            None => self
                .doc
                .get_object(page_id)?
                .as_dict()?
                .get(b"Resources")?
                .as_dict(),
        }
    }

    fn resources_mut(
        &mut self,
        page_id: ObjectId,
        resources_id: Option<ObjectId>,
    ) -> Result<&mut Dictionary, lopdf::Error> {
        match resources_id {
            Some(id) => self.doc.get_object_mut(id)?.as_dict_mut(),
            None => self
                .doc
                .get_object_mut(page_id)?
                .as_dict_mut()?
                .get_mut(b"Resources")?
                .as_dict_mut(),
        }
    }

    /// Current content streams of a page as a flat list of references.
    fn page_contents(&self, page_id: ObjectId) -> Result<Vec<Object>, lopdf::Error> {
        let page = self.doc.get_object(page_id)?.as_dict()?;
        let contents = match page.get(b"Contents") {
            Ok(Object::Array(items)) => items.clone(),
            Ok(Object::Reference(id)) => match self.doc.get_object(*id) {
                Ok(Object::Array(items)) => items.clone(),
                _ => vec![Object::Reference(*id)],
            },
            Ok(other) => vec![other.clone()],
            Err(_) => Vec::new(),
        };
        Ok(contents)
    }

    /// Append drawing operations to a page, isolating them from the graphics
    /// state left behind by the page's own content.
    fn append_content(
        &mut self,
        page_id: ObjectId,
        operations: Vec<Operation>,
    ) -> Result<(), PdfError> {
        let mut contents = self.page_contents(page_id)?;
        let first_overlay = self.wrapped.insert(page_id);

        let mut overlay = Vec::with_capacity(operations.len() + 1);
        if first_overlay {
            let save_state = Content {
                operations: vec![Operation::new("q", vec![])],
            }
            .encode()?;
            let save_id = self.doc.add_object(Stream::new(dictionary! {}, save_state));
            contents.insert(0, Object::Reference(save_id));
            overlay.push(Operation::new("Q", vec![]));
        }
        overlay.extend(operations);

        let overlay = Content {
            operations: overlay,
        }
        .encode()?;
        let overlay_id = self.doc.add_object(Stream::new(dictionary! {}, overlay));
        contents.push(Object::Reference(overlay_id));

        self.doc
            .get_object_mut(page_id)?
            .as_dict_mut()?
            .set("Contents", Object::Array(contents));
        Ok(())
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}
