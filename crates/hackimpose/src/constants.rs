//! Shared constants for imposition
//!
//! Default sheet configuration, unit conversion and the fixed parameters of
//! the crop marks and debug guides drawn on the template sheet.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

// =============================================================================
// Default Sheet Configuration
// =============================================================================

/// Default output sheet width in points (A3 landscape)
pub const DEFAULT_SHEET_WIDTH_PT: f32 = 1190.7;

/// Default output sheet height in points (A3 landscape)
pub const DEFAULT_SHEET_HEIGHT_PT: f32 = 842.0;

/// Default internal margin around each page-pair, in millimeters
pub const DEFAULT_INT_MARGIN_MM: f32 = 5.0;

/// Default external margin at the sheet edge, in millimeters
pub const DEFAULT_EXT_MARGIN_MM: f32 = 3.0;

/// Default width of the crop-mark band, in millimeters
pub const DEFAULT_DEC_MARGIN_MM: f32 = 5.0;

/// Default fraction of a crop mark left blank at each end
pub const DEFAULT_DEC_LINE_COEF: f32 = 0.8;

/// Default grid: page-pair columns per sheet
pub const DEFAULT_GRID_COLUMNS: usize = 2;

/// Default grid: rows per sheet
pub const DEFAULT_GRID_ROWS: usize = 2;

// =============================================================================
// Signatures
// =============================================================================

/// Logical pages consumed by one signature
pub const PAGES_PER_SIGNATURE: usize = 16;

/// Physical sheets produced by one signature
pub const SHEETS_PER_SIGNATURE: usize = 2;

/// Half a signature: the folding table is read forward for this many
/// positions, then backward from the other end of the document
pub const HALF_SIGNATURE: usize = PAGES_PER_SIGNATURE / 2;

// =============================================================================
// Template Marks
// =============================================================================

/// Line width for crop marks and debug guides (points)
pub const CROP_MARK_WIDTH: f32 = 0.25;

/// Dash period of the debug guide lines (points)
pub const GUIDE_DASH_PERIOD: f32 = 10.0;

/// Dash ratio of the main debug guides
pub const GUIDE_DASH_RATIO: f32 = 0.8;

/// Dash ratio of the internal-margin debug guides
pub const GUIDE_DASH_RATIO_SPARSE: f32 = 0.2;

// =============================================================================
// Bezier Curve Constants
// =============================================================================

/// Control point factor for approximating circles with Bezier curves.
/// This magic number comes from: 4 * (sqrt(2) - 1) / 3 ≈ 0.552284749831
pub const BEZIER_CIRCLE_FACTOR: f32 = 0.552284749831;

// =============================================================================
// Output
// =============================================================================

/// Name written to the Creator and Producer entries of the output
pub const PRODUCER: &str = "hackimposition";

/// Tolerance used when comparing page sizes read back from a PDF (points)
pub const SIZE_TOLERANCE_PT: f32 = 0.01;
