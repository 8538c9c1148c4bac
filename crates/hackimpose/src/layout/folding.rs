//! Signature folding
//!
//! Maps logical pages onto sheets for 16-page signatures printed as two
//! sheets of 2×2 page-pairs. Pages are consumed from both ends of the
//! document at once: the first half reads the folding table forward, the
//! second half reads it backward starting from the last page, so that the
//! nested signatures come out in reading order once folded and cut.
//!
//! The tables are golden fixtures; they are not derived from a fold model.

use std::collections::HashSet;

use crate::constants::{HALF_SIGNATURE, PAGES_PER_SIGNATURE, SHEETS_PER_SIGNATURE};
use crate::types::{Grid, ImposeError, Result};

/// Position of one page within a signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FoldingEntry {
    /// Which of the two sheets of the signature (0 or 1)
    pub sheet_parity: usize,
    /// Page column on the sheet (0..4)
    pub column: usize,
    /// Row on the sheet (0 or 1); row 1 is printed upside down
    pub row: usize,
}

const fn entry(sheet_parity: usize, column: usize, row: usize) -> FoldingEntry {
    FoldingEntry {
        sheet_parity,
        column,
        row,
    }
}

/// Folding table in natural reading order
pub static NATURAL_ORDER_TABLE: [FoldingEntry; PAGES_PER_SIGNATURE] = [
    entry(0, 1, 1),
    entry(1, 2, 1),
    entry(0, 3, 1),
    entry(1, 0, 1),
    entry(0, 1, 0),
    entry(1, 2, 0),
    entry(0, 3, 0),
    entry(1, 0, 0),
    entry(1, 1, 0),
    entry(0, 2, 0),
    entry(1, 3, 0),
    entry(0, 0, 0),
    entry(1, 1, 1),
    entry(0, 2, 1),
    entry(1, 3, 1),
    entry(0, 0, 1),
];

/// Second folding table kept for binderies using the other convention
pub static ALTERNATE_TABLE: [FoldingEntry; PAGES_PER_SIGNATURE] = [
    entry(0, 3, 0),
    entry(1, 0, 0),
    entry(1, 3, 0),
    entry(0, 0, 0),
    entry(0, 0, 1),
    entry(1, 3, 1),
    entry(1, 0, 1),
    entry(0, 3, 1),
    entry(0, 2, 1),
    entry(1, 1, 1),
    entry(1, 2, 1),
    entry(0, 1, 1),
    entry(0, 1, 0),
    entry(1, 2, 0),
    entry(1, 1, 0),
    entry(0, 2, 0),
];

/// Which folding table to impose with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FoldingScheme {
    /// Natural reading order
    #[default]
    NaturalOrder,
    /// The alternate convention
    Alternate,
}

impl FoldingScheme {
    pub fn table(self) -> &'static [FoldingEntry; PAGES_PER_SIGNATURE] {
        match self {
            FoldingScheme::NaturalOrder => &NATURAL_ORDER_TABLE,
            FoldingScheme::Alternate => &ALTERNATE_TABLE,
        }
    }
}

/// Where a logical page lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub sheet_index: usize,
    pub column: usize,
    pub row: usize,
    /// Printed upside down
    pub rotated: bool,
}

impl Placement {
    pub fn rotation_degrees(&self) -> f32 {
        if self.rotated { 180.0 } else { 0.0 }
    }
}

/// Placement of every logical page of a document
#[derive(Debug, Clone, PartialEq)]
pub struct ImpositionPlan {
    out_sheet_count: usize,
    placements: Vec<Placement>,
}

impl ImpositionPlan {
    pub fn in_page_count(&self) -> usize {
        self.placements.len()
    }

    pub fn out_sheet_count(&self) -> usize {
        self.out_sheet_count
    }

    /// Placement of logical page `index`.
    ///
    /// # Panics
    /// If `index` is not below [`in_page_count`](Self::in_page_count).
    pub fn placement(&self, index: usize) -> Placement {
        assert!(
            index < self.placements.len(),
            "logical page {} out of range (document has {})",
            index,
            self.placements.len()
        );
        self.placements[index]
    }

    pub fn get(&self, index: usize) -> Option<Placement> {
        self.placements.get(index).copied()
    }

    /// All placements in logical page order
    pub fn iter(&self) -> impl Iterator<Item = Placement> + '_ {
        self.placements.iter().copied()
    }

    /// Logical pages landing on `sheet_index`, with their placements
    pub fn pages_on_sheet(&self, sheet_index: usize) -> Vec<(usize, Placement)> {
        self.placements
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, p)| p.sheet_index == sheet_index)
            .collect()
    }
}

/// Sheets needed for `in_page_count` logical pages: two per started signature
pub fn out_sheet_count(in_page_count: usize) -> usize {
    let full = in_page_count / PAGES_PER_SIGNATURE;
    let partial = if in_page_count % PAGES_PER_SIGNATURE > 0 {
        1
    } else {
        0
    };
    (full + partial) * SHEETS_PER_SIGNATURE
}

/// Build the imposition plan for `in_page_count` logical pages.
///
/// The grid must be the signature grid (2 page-pairs × 2 rows). The plan is
/// checked on construction: every page lands on an existing sheet and no two
/// pages share a slot.
pub fn plan(in_page_count: usize, grid: Grid, scheme: FoldingScheme) -> Result<ImpositionPlan> {
    if grid != Grid::SIGNATURE {
        return Err(ImposeError::Config(format!(
            "Signature folding needs a {}x{} grid, got {}x{}",
            Grid::SIGNATURE.columns,
            Grid::SIGNATURE.rows,
            grid.columns,
            grid.rows
        )));
    }

    let sheets = out_sheet_count(in_page_count);
    let table = scheme.table();

    let placements: Vec<Placement> = (0..in_page_count)
        .map(|index| locate(index, in_page_count, table))
        .collect();

    let mut used = HashSet::with_capacity(in_page_count);
    for (index, placement) in placements.iter().enumerate() {
        if placement.sheet_index >= sheets {
            return Err(ImposeError::PlanConsistency(format!(
                "page {} lands on sheet {} but only {} sheets exist",
                index, placement.sheet_index, sheets
            )));
        }
        if !used.insert((placement.sheet_index, placement.column, placement.row)) {
            return Err(ImposeError::PlanConsistency(format!(
                "page {} shares sheet {} column {} row {} with another page",
                index, placement.sheet_index, placement.column, placement.row
            )));
        }
    }

    log::debug!(
        "Plan: {} logical pages on {} sheets ({:?})",
        in_page_count,
        sheets,
        scheme
    );

    Ok(ImpositionPlan {
        out_sheet_count: sheets,
        placements,
    })
}

fn locate(
    index: usize,
    page_count: usize,
    table: &[FoldingEntry; PAGES_PER_SIGNATURE],
) -> Placement {
    let in_first_half = index < page_count / 2;
    let norm = if in_first_half {
        index
    } else {
        page_count - index - 1
    };

    let row_index = if in_first_half {
        norm % HALF_SIGNATURE
    } else {
        PAGES_PER_SIGNATURE - 1 - norm % HALF_SIGNATURE
    };

    let FoldingEntry {
        sheet_parity,
        column,
        row,
    } = table[row_index];

    Placement {
        sheet_index: (norm / HALF_SIGNATURE) * SHEETS_PER_SIGNATURE + sheet_parity,
        column,
        row,
        rotated: row == 1,
    }
}
