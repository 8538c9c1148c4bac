//! Document I/O operations for imposition

use crate::constants::SIZE_TOLERANCE_PT;
use crate::render::get_page_dimensions;
use crate::types::*;
use lopdf::Document;
use std::path::{Path, PathBuf};

/// What the imposition needs to know about a source document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceInfo {
    pub page_count: usize,
    /// Size of the first page, taken as the size of every page
    pub page_size: PageSize,
}

/// Load a single PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| source_error(&path, e))?;
    let parsed = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await?;
    parsed.map_err(|e| source_error(&path, e))
}

/// Page count and page size of a loaded source
pub fn inspect(doc: &Document, path: &Path) -> Result<SourceInfo> {
    let pages = doc.get_pages();
    let Some(&first) = pages.values().next() else {
        return Err(ImposeError::NoPages);
    };

    let page_size = get_page_dimensions(doc, first)
        .filter(|size| size.is_usable())
        .ok_or_else(|| source_error(path, "first page has no usable MediaBox"))?;

    Ok(SourceInfo {
        page_count: pages.len(),
        page_size,
    })
}

/// Save the imposed document.
///
/// The bytes go to a sibling `.part` file first, which is renamed over the
/// target once complete, so a failed run never leaves a truncated PDF.
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, ImposeError>(writer)
    })
    .await??;

    let partial = partial_path(&path);
    if let Err(e) = tokio::fs::write(&partial, bytes).await {
        return Err(output_error(&path, e));
    }
    if let Err(e) = tokio::fs::rename(&partial, &path).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(output_error(&path, e));
    }
    Ok(())
}

/// Re-open a written output and check its sheet count and sheet size
pub async fn verify_output(
    path: impl AsRef<Path>,
    expected_sheets: usize,
    expected_size: PageSize,
) -> Result<()> {
    let path = path.as_ref();
    let doc = load_pdf(path)
        .await
        .map_err(|e| output_error(path, e))?;

    let pages = doc.get_pages();
    if pages.len() != expected_sheets {
        return Err(output_error(
            path,
            format!(
                "expected {} sheets, found {}",
                expected_sheets,
                pages.len()
            ),
        ));
    }

    for (number, page_id) in &pages {
        let size = get_page_dimensions(&doc, *page_id);
        if !size.is_some_and(|size| size.approx_eq(expected_size, SIZE_TOLERANCE_PT)) {
            return Err(output_error(
                path,
                format!(
                    "sheet {} is {:?}, expected {}",
                    number, size, expected_size
                ),
            ));
        }
    }

    log::debug!("Verified {}: {} sheets", path.display(), expected_sheets);
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

fn source_error(path: &Path, reason: impl ToString) -> ImposeError {
    ImposeError::SourceRead {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn output_error(path: &Path, reason: impl ToString) -> ImposeError {
    ImposeError::OutputWrite {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
