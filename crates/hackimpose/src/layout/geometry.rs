//! Sheet geometry
//!
//! Fits page-pairs into the grid of the output sheet and derives where each
//! cell sits. A cell, along one axis, is laid out as:
//!
//! ```text
//! | EXT | DEC | slack | INT |   P..   |   P..   | INT | slack | DEC | slack | INT | ...
//!                           ^ cell origin (content)
//! ```
//!
//! `DEC` bands are shared between neighbouring cells, so there are
//! `cells + 1` of them per axis. All lengths are in points, in PDF user space
//! (origin at the bottom-left corner of the sheet).

use crate::options::SheetConfig;
use crate::types::{ImposeError, PageSize, Result};

/// Layout derived from a sheet configuration and the source page size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutGeometry {
    /// Uniform scale applied to every source page
    pub scale: f32,
    /// Scaled width of a page-pair (two source pages side by side)
    pub cell_content_w: f32,
    /// Scaled height of a page-pair
    pub cell_content_h: f32,
    /// X of the first cell's content origin
    pub cell_margin_x: f32,
    /// Y of the first cell's content origin
    pub cell_margin_y: f32,
    /// Distance between consecutive cell origins along x
    pub cell_stride_x: f32,
    /// Distance between consecutive cell origins along y
    pub cell_stride_y: f32,
    /// Unused width per cell edge after fitting
    pub slack_x: f32,
    /// Unused height per cell edge after fitting
    pub slack_y: f32,
}

impl LayoutGeometry {
    /// Scaled size of a single source page
    pub fn scaled_page_size(&self) -> PageSize {
        PageSize::new(self.cell_content_w / 2.0, self.cell_content_h)
    }

    /// Margin between a cell's content and its crop marks
    pub fn effective_margins(&self, config: &SheetConfig) -> (f32, f32) {
        if config.dec_keep_overflow() {
            (
                config.int_margin() + self.slack_x,
                config.int_margin() + self.slack_y,
            )
        } else {
            (config.int_margin(), config.int_margin())
        }
    }
}

/// Scale and translation placing one source page in its slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellTransform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

/// Compute the sheet layout for pages of `source_size`.
///
/// Fails with [`ImposeError::Config`] when the pages cannot fit: the
/// margins alone exceed the sheet, so the fitted scale is not positive.
pub fn compute_layout(source_size: PageSize, config: &SheetConfig) -> Result<LayoutGeometry> {
    if !source_size.is_usable() {
        return Err(ImposeError::Config(format!(
            "Source page size must be positive, got {}",
            source_size
        )));
    }

    let nb_w = config.nb_w() as f32;
    let nb_h = config.nb_h() as f32;
    let int_margin = config.int_margin();
    let ext_margin = config.ext_margin();
    let dec_margin = config.dec_margin();

    // Crop-mark bands between cells and on both outer edges
    let total_dec_w = dec_margin * (nb_w + 1.0);
    let total_dec_h = dec_margin * (nb_h + 1.0);

    let total_ext = ext_margin * 2.0;

    let max_cell_w = (config.global_w() - total_dec_w - total_ext) / nb_w;
    let max_cell_h = (config.global_h() - total_dec_h - total_ext) / nb_h;

    let scale_w = (max_cell_w - 2.0 * int_margin) / (source_size.width * 2.0);
    let scale_h = (max_cell_h - 2.0 * int_margin) / source_size.height;
    let scale = scale_w.min(scale_h);

    if !scale.is_finite() || scale <= 0.0 {
        return Err(ImposeError::Config(format!(
            "Source page too large for configured sheet/margins/grid: {} on {} gives scale {}",
            source_size,
            config.sheet_size(),
            scale
        )));
    }

    let cell_content_w = source_size.width * 2.0 * scale;
    let cell_content_h = source_size.height * scale;

    let final_w = cell_content_w + int_margin * 2.0;
    let final_h = cell_content_h + int_margin * 2.0;

    let slack_x = (config.global_w() - final_w * nb_w - total_ext - total_dec_w) / (nb_w * 2.0);
    let slack_y = (config.global_h() - final_h * nb_h - total_ext - total_dec_h) / (nb_h * 2.0);

    let geometry = LayoutGeometry {
        scale,
        cell_content_w,
        cell_content_h,
        cell_margin_x: ext_margin + int_margin + dec_margin + slack_x,
        cell_margin_y: ext_margin + int_margin + dec_margin + slack_y,
        cell_stride_x: final_w + dec_margin + slack_x * 2.0,
        cell_stride_y: final_h + dec_margin + slack_y * 2.0,
        slack_x,
        slack_y,
    };

    if scale != 1.0 {
        let scaled = geometry.scaled_page_size();
        log::warn!(
            "Pages scaled by {}: {} -> {}x{} pt",
            scale,
            source_size,
            scaled.width,
            scaled.height
        );
    }

    Ok(geometry)
}

/// Transform for the page slot at (`column`, `row`).
///
/// `column` addresses single pages: `column / 2` is the page-pair cell and
/// odd columns take the right half of the pair.
pub fn cell_transform(column: usize, row: usize, geometry: &LayoutGeometry) -> CellTransform {
    let pair = (column / 2) as f32;
    let half_offset = if column % 2 != 0 {
        geometry.cell_content_w / 2.0
    } else {
        0.0
    };

    CellTransform {
        scale: geometry.scale,
        translate_x: pair * geometry.cell_stride_x + half_offset + geometry.cell_margin_x,
        translate_y: row as f32 * geometry.cell_stride_y + geometry.cell_margin_y,
    }
}

/// Full placement of a source page: its slot transform plus the rotation
/// the folding plan asks for.
///
/// A rotated page is turned 180° about its slot, so it covers the same
/// rectangle as an upright page would.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTransform {
    pub cell: CellTransform,
    /// Unscaled source page size
    pub page: PageSize,
    pub rotated: bool,
}

impl PageTransform {
    pub fn new(cell: CellTransform, page: PageSize, rotated: bool) -> Self {
        Self {
            cell,
            page,
            rotated,
        }
    }

    /// PDF matrix `[a b c d e f]` mapping page space onto the sheet
    pub fn matrix(&self) -> [f32; 6] {
        let CellTransform {
            scale: s,
            translate_x: tx,
            translate_y: ty,
        } = self.cell;

        if self.rotated {
            [
                -s,
                0.0,
                0.0,
                -s,
                tx + self.page.width * s,
                ty + self.page.height * s,
            ]
        } else {
            [s, 0.0, 0.0, s, tx, ty]
        }
    }

    /// Sheet rectangle `(x, y, width, height)` covered by the page
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        let s = self.cell.scale;
        (
            self.cell.translate_x,
            self.cell.translate_y,
            self.page.width * s,
            self.page.height * s,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SheetSettings;

    fn config(settings: SheetSettings) -> SheetConfig {
        settings.validate().unwrap()
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_zero_margins_fill_the_sheet() {
        let config = config(SheetSettings {
            global_w: 400.0,
            global_h: 200.0,
            int_margin: 0.0,
            ext_margin: 0.0,
            dec_margin: 0.0,
            ..Default::default()
        });

        // Four pages of 100x100 across, two rows of 100
        let geometry = compute_layout(PageSize::new(100.0, 100.0), &config).unwrap();
        assert!(approx(geometry.scale, 1.0));
        assert!(approx(geometry.cell_content_w, 200.0));
        assert!(approx(geometry.cell_content_h, 100.0));
        assert!(approx(geometry.slack_x, 0.0));
        assert!(approx(geometry.slack_y, 0.0));
        assert!(approx(geometry.cell_margin_x, 0.0));
        assert!(approx(geometry.cell_stride_x, 200.0));
        assert!(approx(geometry.cell_stride_y, 100.0));
    }

    #[test]
    fn test_tighter_axis_governs() {
        let config = config(SheetSettings {
            global_w: 800.0,
            global_h: 200.0,
            int_margin: 0.0,
            ext_margin: 0.0,
            dec_margin: 0.0,
            ..Default::default()
        });

        // Height allows scale 1, width would allow 2
        let geometry = compute_layout(PageSize::new(100.0, 100.0), &config).unwrap();
        assert!(approx(geometry.scale, 1.0));
        // 800 - 2*200 = 400 spare, spread over 4 cell edges
        assert!(approx(geometry.slack_x, 100.0));
        assert!(approx(geometry.slack_y, 0.0));
        assert!(approx(geometry.cell_margin_x, 100.0));
        assert!(approx(geometry.cell_stride_x, 400.0));
    }

    #[test]
    fn test_margins_are_reserved() {
        let config = config(SheetSettings {
            global_w: 460.0,
            global_h: 250.0,
            int_margin: 5.0,
            ext_margin: 10.0,
            dec_margin: 10.0,
            ..Default::default()
        });

        // width: 460 - 30 (dec) - 20 (ext) = 410 -> 205 per cell -> 195 content -> 0.975
        // height: 250 - 30 - 20 = 200 -> 100 per cell -> 90 content -> 0.9
        let geometry = compute_layout(PageSize::new(100.0, 100.0), &config).unwrap();
        assert!(approx(geometry.scale, 0.9));
        assert!(approx(geometry.cell_content_h, 90.0));
        assert!(approx(geometry.slack_y, 0.0));
        assert!(approx(geometry.cell_margin_y, 25.0));
        assert!(approx(geometry.cell_stride_y, 110.0));
        // (460 - 190*2 - 20 - 30) / 4
        assert!(approx(geometry.slack_x, 7.5));
    }

    #[test]
    fn test_cell_transform_right_half() {
        let config = config(SheetSettings {
            global_w: 400.0,
            global_h: 200.0,
            int_margin: 0.0,
            ext_margin: 0.0,
            dec_margin: 0.0,
            ..Default::default()
        });
        let geometry = compute_layout(PageSize::new(100.0, 100.0), &config).unwrap();

        let left = cell_transform(2, 1, &geometry);
        let right = cell_transform(3, 1, &geometry);
        assert!(approx(left.translate_x, 200.0));
        assert!(approx(right.translate_x, 300.0));
        assert!(approx(left.translate_y, 100.0));
        assert_eq!(left.scale, geometry.scale);
    }

    #[test]
    fn test_rotated_transform_covers_the_same_slot() {
        let cell = CellTransform {
            scale: 0.5,
            translate_x: 100.0,
            translate_y: 40.0,
        };
        let page = PageSize::new(200.0, 300.0);

        let upright = PageTransform::new(cell, page, false);
        assert_eq!(upright.matrix(), [0.5, 0.0, 0.0, 0.5, 100.0, 40.0]);

        let rotated = PageTransform::new(cell, page, true);
        let [a, _, _, d, e, f] = rotated.matrix();
        // Page corner (w, h) lands on the slot origin, (0, 0) on the far corner
        assert!(approx(a * 200.0 + e, 100.0));
        assert!(approx(d * 300.0 + f, 40.0));
        assert!(approx(e, 200.0));
        assert!(approx(f, 190.0));
        assert_eq!(rotated.bounds(), upright.bounds());
    }

    #[test]
    fn test_page_too_large_is_config_error() {
        let config = config(SheetSettings {
            global_w: 50.0,
            global_h: 50.0,
            ..Default::default()
        });
        let result = compute_layout(PageSize::new(612.0, 792.0), &config);
        assert!(matches!(result, Err(ImposeError::Config(_))));
    }
}
