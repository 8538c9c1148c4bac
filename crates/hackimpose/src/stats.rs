use crate::constants::SHEETS_PER_SIGNATURE;
use crate::impose::inspect;
use crate::layout::{ImpositionPlan, LayoutGeometry, PageSequence, compute_layout, plan};
use crate::options::ImpositionOptions;
use crate::types::*;
use lopdf::Document;

/// Calculate statistics for the imposition without building it
pub fn calculate_statistics(
    source: &Document,
    options: &ImpositionOptions,
) -> Result<ImpositionStatistics> {
    let config = options.validate()?;
    let info = inspect(source, &options.input)?;

    let geometry = compute_layout(info.page_size, &config)?;
    let sequence = PageSequence::build(info.page_count, options.keep_last)?;
    let plan = plan(sequence.len(), config.grid(), options.folding)?;

    Ok(summarize(
        info.page_count,
        &sequence,
        &plan,
        &geometry,
        config.grid(),
    ))
}

pub(crate) fn summarize(
    source_pages: usize,
    sequence: &PageSequence,
    plan: &ImpositionPlan,
    geometry: &LayoutGeometry,
    grid: Grid,
) -> ImpositionStatistics {
    let output_sheets = plan.out_sheet_count();
    let slots = output_sheets * grid.pages_per_sheet();
    let placed = sequence.len() - sequence.blank_count();

    ImpositionStatistics {
        source_pages,
        logical_pages: sequence.len(),
        blank_pages_added: sequence.blank_count(),
        signatures: output_sheets / SHEETS_PER_SIGNATURE,
        output_sheets,
        empty_slots: slots.saturating_sub(placed),
        scale: geometry.scale,
    }
}
