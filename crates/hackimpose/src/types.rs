use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImposeError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Cannot read source {path}: {reason}")]
    SourceRead { path: PathBuf, reason: String },
    #[error("No pages to impose")]
    NoPages,
    #[error("Source page {0:?} has no usable MediaBox")]
    InvalidPage(lopdf::ObjectId),
    #[error("Imposition plan is inconsistent: {0}")]
    PlanConsistency(String),
    #[error("Cannot write output {path}: {reason}")]
    OutputWrite { path: PathBuf, reason: String },
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ImposeError>;

/// An RGB colour with 0..=255 components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const OLIVE: Rgb = Rgb(126, 126, 0);

    /// Components scaled to the 0.0..=1.0 range used by PDF colour operators
    pub fn unit(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0, self.1, self.2)
    }
}

impl FromStr for Rgb {
    type Err = ImposeError;

    /// Parse `R,G,B` with each component in 0..=255
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(ImposeError::Config(format!(
                "Colour must be R,G,B, got '{}'",
                s
            )));
        }
        let mut components = [0u8; 3];
        for (slot, part) in components.iter_mut().zip(parts) {
            *slot = part.parse().map_err(|_| {
                ImposeError::Config(format!("Colour component '{}' is not in 0..=255", part))
            })?;
        }
        Ok(Rgb(components[0], components[1], components[2]))
    }
}

/// Grid of page-pair cells on a sheet
///
/// `columns` counts page-pairs, so a sheet holds `columns * 2 * rows` pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    pub columns: usize,
    pub rows: usize,
}

impl Grid {
    /// The only grid a 16-page signature folds into: 2 page-pairs × 2 rows
    pub const SIGNATURE: Grid = Grid {
        columns: 2,
        rows: 2,
    };

    pub fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }

    /// Page slots (single source pages) per column of page-pairs
    pub fn page_columns(self) -> usize {
        self.columns * 2
    }

    /// Source pages per sheet side
    pub fn pages_per_sheet(self) -> usize {
        self.page_columns() * self.rows
    }
}

/// Size of a page in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are finite and strictly positive
    pub fn is_usable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Compare against another size within `tolerance` points
    pub fn approx_eq(self, other: PageSize, tolerance: f32) -> bool {
        (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} pt", self.width, self.height)
    }
}

/// Statistics about the imposition
#[derive(Debug, Clone, PartialEq)]
pub struct ImpositionStatistics {
    /// Pages in the source document
    pub source_pages: usize,
    /// Logical pages handed to the folding plan (source pages plus inserted blanks)
    pub logical_pages: usize,
    /// Blank logical pages inserted to keep the last pages in place
    pub blank_pages_added: usize,
    /// Signatures used (each one 16 pages on 2 sheets)
    pub signatures: usize,
    /// Output sheets
    pub output_sheets: usize,
    /// Page slots on the output sheets left without content
    pub empty_slots: usize,
    /// Uniform scale applied to source pages
    pub scale: f32,
}
