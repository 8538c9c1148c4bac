//! PDF imposition - arranging pages onto folded signatures
//!
//! This module orchestrates the imposition process:
//! 1. Inspect the source and fit its pages onto the sheet grid
//! 2. Build the logical page sequence and the folding plan
//! 3. Render the template sheet with its crop marks
//! 4. Merge every source page onto its sheet, then write and verify

mod io;
mod store;

pub use io::{SourceInfo, inspect, load_pdf, save_pdf, verify_output};
pub use store::{SheetStore, Template};

use crate::constants::PRODUCER;
use crate::layout::{
    ImpositionPlan, LayoutGeometry, PageSequence, PageTransform, cell_transform, compute_layout,
    plan,
};
use crate::marks::render_template;
use crate::options::{ImpositionOptions, SheetConfig};
use crate::stats::summarize;
use crate::types::*;
use lopdf::{Document, ObjectId};
use std::path::{Path, PathBuf};

/// Result of imposing a document, before it is written anywhere
#[derive(Debug)]
pub struct Imposition {
    /// The imposed document
    pub document: Document,
    pub config: SheetConfig,
    pub source: SourceInfo,
    pub geometry: LayoutGeometry,
    pub sequence: PageSequence,
    pub plan: ImpositionPlan,
    /// Content stream of the template every sheet starts from
    pub template: Vec<u8>,
}

impl Imposition {
    pub fn statistics(&self) -> ImpositionStatistics {
        summarize(
            self.source.page_count,
            &self.sequence,
            &self.plan,
            &self.geometry,
            self.config.grid(),
        )
    }

    /// The template alone, as a one-page document
    pub fn template_document(&self) -> Document {
        let mut store = SheetStore::new(self.config.sheet_size());
        let template = store.add_template(self.template.clone());
        store.add_blank_sheet(&template);
        store.set_metadata("template.pdf", PRODUCER);
        store.finish()
    }
}

/// Summary of a completed file-to-file run
#[derive(Debug, Clone)]
pub struct ImpositionReport {
    pub output: PathBuf,
    pub template_output: Option<PathBuf>,
    pub statistics: ImpositionStatistics,
}

/// Main imposition function
pub async fn impose(source: &Document, options: &ImpositionOptions) -> Result<Imposition> {
    impose_owned(source.clone(), options).await
}

async fn impose_owned(source: Document, options: &ImpositionOptions) -> Result<Imposition> {
    let config = options.validate()?;
    let options = options.clone();

    tokio::task::spawn_blocking(move || impose_sync(&source, &options, config)).await?
}

/// Read `options.input`, impose it and write the result (and the template
/// when requested)
pub async fn impose_file(options: &ImpositionOptions) -> Result<ImpositionReport> {
    options.validate()?;

    log::info!("Reading {}", options.input.display());
    let source = load_pdf(&options.input).await?;

    let imposition = impose_owned(source, options).await?;
    let statistics = imposition.statistics();
    let sheet_count = imposition.plan.out_sheet_count();
    let sheet_size = imposition.config.sheet_size();
    let template = options
        .template_output
        .as_ref()
        .map(|path| (path.clone(), imposition.template_document()));

    let output = options.output_path();
    log::info!("Writing {} sheets to {}", sheet_count, output.display());
    save_pdf(imposition.document, &output).await?;
    verify_output(&output, sheet_count, sheet_size).await?;

    let template_output = match template {
        Some((path, document)) => {
            log::info!("Writing template to {}", path.display());
            save_pdf(document, &path).await?;
            Some(path)
        }
        None => None,
    };

    Ok(ImpositionReport {
        output,
        template_output,
        statistics,
    })
}

fn impose_sync(
    source: &Document,
    options: &ImpositionOptions,
    config: SheetConfig,
) -> Result<Imposition> {
    config.log();

    let info = inspect(source, &options.input)?;
    log::info!("Source: {} pages of {}", info.page_count, info.page_size);

    let geometry = compute_layout(info.page_size, &config)?;
    let sequence = PageSequence::build(info.page_count, options.keep_last)?;
    let plan = plan(sequence.len(), config.grid(), options.folding)?;
    log::info!(
        "Layout: scale {}, {} logical pages on {} sheets",
        geometry.scale,
        sequence.len(),
        plan.out_sheet_count()
    );

    let template_content = render_template(&geometry, &config);

    let mut store = SheetStore::new(config.sheet_size());
    let template = store.add_template(template_content.clone());
    for _ in 0..plan.out_sheet_count() {
        store.add_blank_sheet(&template);
    }

    let page_ids: Vec<ObjectId> = source.get_pages().values().copied().collect();
    for (logical, source_page) in sequence.pages() {
        let placement = plan.placement(logical);
        let cell = cell_transform(placement.column, placement.row, &geometry);
        let transform = PageTransform::new(cell, info.page_size, placement.rotated);

        log::debug!(
            "Page {} -> sheet {} column {} row {} rotation {}",
            source_page + 1,
            placement.sheet_index,
            placement.column,
            placement.row,
            placement.rotation_degrees()
        );

        let page_id = page_ids.get(source_page).copied().ok_or_else(|| {
            ImposeError::PlanConsistency(format!(
                "logical page {} refers to missing source page {}",
                logical, source_page
            ))
        })?;
        store.merge(placement.sheet_index, source, page_id, &transform)?;
    }

    store.set_metadata(&imposed_title(&options.input), PRODUCER);

    Ok(Imposition {
        document: store.finish(),
        config,
        source: info,
        geometry,
        sequence,
        plan,
        template: template_content,
    })
}

/// `<input file name>.imposed.pdf`
fn imposed_title(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}.imposed.pdf", name)
}
