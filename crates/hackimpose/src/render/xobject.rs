//! XObject creation for imposition
//!
//! Source pages are wrapped as Form XObjects in the output document, which
//! the sheets then draw with a placement matrix.

use crate::types::{ImposeError, PageSize, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Bound on parent lookups, for malformed (cyclic) page trees
const MAX_PAGE_TREE_DEPTH: usize = 32;

// =============================================================================
// XObject Creation
// =============================================================================

/// Create an XObject from a source page.
///
/// The form's matrix moves the MediaBox origin to (0, 0), so placing it at
/// a slot origin puts the page's lower-left corner there whatever its box.
/// Objects copied from the source are cached, so pages sharing fonts or
/// images share them in the output too.
///
/// # Arguments
/// * `output` - The output document to add the XObject to
/// * `source` - The source document containing the page
/// * `page_id` - The object ID of the source page
/// * `cache` - Source to output object ids already copied
pub fn create_page_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    let page_dict = source.get_dictionary(page_id)?;

    let [x0, y0, x1, y1] = media_box(source, page_id).ok_or(ImposeError::InvalidPage(page_id))?;

    let content_data = get_page_content(source, page_dict)?;

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set("FormType", Object::Integer(1));
    xobject_dict.set(
        "BBox",
        Object::Array(vec![
            Object::Real(x0),
            Object::Real(y0),
            Object::Real(x1),
            Object::Real(y1),
        ]),
    );
    xobject_dict.set(
        "Matrix",
        Object::Array(vec![
            Object::Integer(1),
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(1),
            Object::Real(-x0),
            Object::Real(-y0),
        ]),
    );

    if let Some(resources) = inherited_attribute(source, page_id, b"Resources") {
        xobject_dict.set(
            "Resources",
            copy_object_deep(output, source, resources, cache)?,
        );
    }

    Ok(output.add_object(Stream::new(xobject_dict, content_data)))
}

// =============================================================================
// Page Content Extraction
// =============================================================================

/// Get the content stream data from a page.
fn get_page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()), // No content = blank page
    };

    match contents {
        Object::Reference(id) => get_single_content_stream(doc, *id),
        Object::Array(arr) => get_concatenated_content_streams(doc, arr),
        _ => Ok(Vec::new()),
    }
}

/// Get content from a single content stream reference
fn get_single_content_stream(doc: &Document, id: ObjectId) -> Result<Vec<u8>> {
    match doc.get_object(id)? {
        Object::Stream(stream) => Ok(stream_bytes(stream)),
        Object::Array(arr) => get_concatenated_content_streams(doc, arr),
        _ => Ok(Vec::new()),
    }
}

/// Concatenate multiple content streams
fn get_concatenated_content_streams(doc: &Document, refs: &[Object]) -> Result<Vec<u8>> {
    let mut result = Vec::new();

    for obj in refs {
        if let Object::Reference(id) = obj {
            if let Ok(stream) = doc.get_object(*id)?.as_stream() {
                result.extend_from_slice(&stream_bytes(stream));
                result.push(b'\n');
            }
        }
    }

    Ok(result)
}

fn stream_bytes(stream: &Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

// =============================================================================
// Deep Copy
// =============================================================================

/// Deep copy an object from source to output document, following references.
///
/// Uses a cache to avoid copying the same object multiple times.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            // Reserve the id first so reference cycles resolve to it
            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            let referenced = source.get_object(*id)?;
            let copied = copy_object_deep(output, source, referenced, cache)?;
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => Ok(Object::Stream(Stream {
            dict: copy_dictionary(output, source, &stream.dict, cache)?,
            content: stream.content.clone(),
            allows_compression: stream.allows_compression,
            start_position: None,
        })),
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        // Back-references into the source page tree are not needed by a form
        if key.as_slice() == b"Parent" {
            continue;
        }
        new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(new_dict)
}

// =============================================================================
// Page Dimensions
// =============================================================================

/// Source page dimensions from its MediaBox, inherited boxes included.
///
/// `None` when the page has no readable MediaBox.
pub fn get_page_dimensions(doc: &Document, page_id: ObjectId) -> Option<PageSize> {
    media_box(doc, page_id).map(|[x0, y0, x1, y1]| PageSize::new(x1 - x0, y1 - y0))
}

/// Normalised `[x0, y0, x1, y1]` MediaBox of a page
fn media_box(doc: &Document, page_id: ObjectId) -> Option<[f32; 4]> {
    let array = match inherited_attribute(doc, page_id, b"MediaBox")? {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok()?,
        obj => obj.as_array().ok()?,
    };
    if array.len() != 4 {
        return None;
    }

    let mut values = [0.0f32; 4];
    for (slot, obj) in values.iter_mut().zip(array) {
        *slot = extract_number(obj)?;
    }
    let [ax, ay, bx, by] = values;
    Some([ax.min(bx), ay.min(by), ax.max(bx), ay.max(by)])
}

/// Look up `key` on the page, then on its ancestors
fn inherited_attribute<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Ok(value) = current.get(key) {
            return Some(value);
        }
        let parent = current.get(b"Parent").and_then(Object::as_reference).ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media_box_object(values: [i64; 4]) -> Object {
        Object::Array(values.iter().map(|v| Object::Integer(*v)).collect())
    }

    /// One page under a Pages node; `page_box` on the page, `parent_box` on the node
    fn document_with_page(
        page_box: Option<[i64; 4]>,
        parent_box: Option<[i64; 4]>,
    ) -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
        ]);
        if let Some(values) = page_box {
            page.set("MediaBox", media_box_object(values));
        }
        let page_id = doc.add_object(page);

        let mut pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(vec![Object::Reference(page_id)])),
            ("Count", Object::Integer(1)),
        ]);
        if let Some(values) = parent_box {
            pages.set("MediaBox", media_box_object(values));
        }
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        (doc, page_id)
    }

    #[test]
    fn test_dimensions_from_own_media_box() {
        let (doc, page_id) = document_with_page(Some([0, 0, 420, 595]), None);
        assert_eq!(
            get_page_dimensions(&doc, page_id),
            Some(PageSize::new(420.0, 595.0))
        );
    }

    #[test]
    fn test_dimensions_inherited_from_parent() {
        let (doc, page_id) = document_with_page(None, Some([10, 20, 110, 220]));
        assert_eq!(
            get_page_dimensions(&doc, page_id),
            Some(PageSize::new(100.0, 200.0))
        );
    }

    #[test]
    fn test_missing_media_box() {
        let (doc, page_id) = document_with_page(None, None);
        assert_eq!(get_page_dimensions(&doc, page_id), None);

        let mut output = Document::with_version("1.5");
        let result = create_page_xobject(&mut output, &doc, page_id, &mut HashMap::new());
        assert!(matches!(result, Err(ImposeError::InvalidPage(id)) if id == page_id));
    }

    #[test]
    fn test_xobject_moves_box_origin() {
        let (source, page_id) = document_with_page(Some([10, 20, 110, 220]), None);
        let mut output = Document::with_version("1.5");
        let mut cache = HashMap::new();
        let id = create_page_xobject(&mut output, &source, page_id, &mut cache).unwrap();

        let stream = output.get_object(id).unwrap().as_stream().unwrap();
        let matrix = stream.dict.get(b"Matrix").unwrap().as_array().unwrap();
        assert_eq!(matrix[4].as_float().unwrap(), -10.0);
        assert_eq!(matrix[5].as_float().unwrap(), -20.0);
        assert!(stream.content.is_empty());
    }

    #[test]
    fn test_shared_resources_are_copied_once() {
        let mut source = Document::with_version("1.5");
        let font_id = source.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ]));
        let resources = Object::Dictionary(Dictionary::from_iter(vec![(
            "Font",
            Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
        )]));

        let mut output = Document::with_version("1.5");
        let mut cache = HashMap::new();
        let first = copy_object_deep(&mut output, &source, &resources, &mut cache).unwrap();
        let second = copy_object_deep(&mut output, &source, &resources, &mut cache).unwrap();

        assert_eq!(output.objects.len(), 1);
        let font_ref = |obj: &Object| {
            obj.as_dict()
                .unwrap()
                .get(b"Font")
                .unwrap()
                .as_dict()
                .unwrap()
                .get(b"F1")
                .unwrap()
                .as_reference()
                .unwrap()
        };
        assert_eq!(font_ref(&first), font_ref(&second));
    }
}
