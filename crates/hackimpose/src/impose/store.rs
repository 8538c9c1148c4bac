//! Output document under construction
//!
//! Sheets start as copies of a template (the same content stream is shared
//! by every sheet) and receive source pages as Form XObjects drawn with
//! their placement matrix. [`SheetStore::finish`] builds the page tree.

use crate::layout::PageTransform;
use crate::render::create_page_xobject;
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Handle on a template content stream stored in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template(ObjectId);

#[derive(Debug, Default)]
struct Sheet {
    template: Option<ObjectId>,
    xobjects: Dictionary,
    ops: String,
    placed: usize,
}

/// Output document being assembled sheet by sheet.
///
/// Objects copied from a source document are cached across merges, so one
/// store must only be fed pages from a single source document.
pub struct SheetStore {
    document: Document,
    pages_id: ObjectId,
    sheet_size: PageSize,
    sheets: Vec<Sheet>,
    object_cache: HashMap<ObjectId, ObjectId>,
    page_cache: HashMap<ObjectId, ObjectId>,
    info: Option<Dictionary>,
}

impl SheetStore {
    pub fn new(sheet_size: PageSize) -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        Self {
            document,
            pages_id,
            sheet_size,
            sheets: Vec::new(),
            object_cache: HashMap::new(),
            page_cache: HashMap::new(),
            info: None,
        }
    }

    pub fn sheet_size(&self) -> PageSize {
        self.sheet_size
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Store a template content stream, to be shared by blank sheets
    pub fn add_template(&mut self, content: Vec<u8>) -> Template {
        Template(
            self.document
                .add_object(Stream::new(Dictionary::new(), content)),
        )
    }

    /// Append a sheet showing `template`, returning its index
    pub fn add_blank_sheet(&mut self, template: &Template) -> usize {
        self.sheets.push(Sheet {
            template: Some(template.0),
            ..Default::default()
        });
        self.sheets.len() - 1
    }

    /// Draw source page `page_id` on sheet `sheet` with `transform`.
    ///
    /// A source page placed several times is copied into the output once.
    pub fn merge(
        &mut self,
        sheet: usize,
        source: &Document,
        page_id: ObjectId,
        transform: &PageTransform,
    ) -> Result<()> {
        let sheet_count = self.sheets.len();
        let target = self.sheets.get_mut(sheet).ok_or_else(|| {
            ImposeError::PlanConsistency(format!(
                "merge into sheet {} but only {} sheets exist",
                sheet, sheet_count
            ))
        })?;

        let xobject_id = match self.page_cache.get(&page_id) {
            Some(&id) => id,
            None => {
                let id = create_page_xobject(
                    &mut self.document,
                    source,
                    page_id,
                    &mut self.object_cache,
                )?;
                self.page_cache.insert(page_id, id);
                id
            }
        };

        let name = format!("P{}", target.placed);
        target
            .xobjects
            .set(name.as_bytes(), Object::Reference(xobject_id));

        let [a, b, c, d, e, f] = transform.matrix();
        target.ops.push_str(&format!(
            "q {} {} {} {} {} {} cm /{} Do Q\n",
            a, b, c, d, e, f, name
        ));
        target.placed += 1;
        Ok(())
    }

    /// Set the document information dictionary
    pub fn set_metadata(&mut self, title: &str, creator: &str) {
        self.info = Some(Dictionary::from_iter(vec![
            ("Title", Object::string_literal(title)),
            ("Creator", Object::string_literal(creator)),
            ("Producer", Object::string_literal(creator)),
        ]));
    }

    /// Build the page tree and catalog and hand over the document
    pub fn finish(mut self) -> Document {
        let media_box = Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(self.sheet_size.width),
            Object::Real(self.sheet_size.height),
        ]);

        let mut page_refs = Vec::with_capacity(self.sheets.len());
        for sheet in std::mem::take(&mut self.sheets) {
            let mut contents = Vec::new();
            if let Some(template) = sheet.template {
                contents.push(Object::Reference(template));
            }
            if !sheet.ops.is_empty() {
                let content_id = self.document.add_object(Stream::new(
                    Dictionary::new(),
                    sheet.ops.into_bytes(),
                ));
                contents.push(Object::Reference(content_id));
            }

            let mut resources = Dictionary::new();
            if !sheet.xobjects.is_empty() {
                resources.set("XObject", Object::Dictionary(sheet.xobjects));
            }

            let page_id = self.document.add_object(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(self.pages_id)),
                ("MediaBox", media_box.clone()),
                ("Resources", Object::Dictionary(resources)),
                ("Contents", Object::Array(contents)),
            ]));
            page_refs.push(Object::Reference(page_id));
        }

        finalize_document(&mut self.document, self.pages_id, page_refs);

        if let Some(info) = self.info.take() {
            let info_id = self.document.add_object(info);
            self.document.trailer.set("Info", Object::Reference(info_id));
        }

        self.document
    }
}

fn finalize_document(output: &mut Document, pages_tree_id: ObjectId, page_refs: Vec<Object>) {
    let count = page_refs.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(count)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));

    output.trailer.set("Root", catalog_id);
}
