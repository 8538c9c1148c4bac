//! Printer's marks for the sheet template
//!
//! Every output sheet starts as a copy of one template holding the crop
//! marks ("hirondelles") around each page-pair cell and, in debug mode,
//! guide lines showing the margins the layout reserved.

use crate::constants::{
    CROP_MARK_WIDTH, GUIDE_DASH_PERIOD, GUIDE_DASH_RATIO, GUIDE_DASH_RATIO_SPARSE,
};
use crate::layout::{LayoutGeometry, cell_transform};
use crate::options::SheetConfig;
use crate::render::{ContentStreamSurface, DrawingSurface};
use crate::types::Rgb;

/// A crop mark at a cell corner.
///
/// `extent_x` and `extent_y` are signed: they point away from the cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropMark {
    pub x: f32,
    pub y: f32,
    pub extent_x: f32,
    pub extent_y: f32,
}

impl CropMark {
    /// Draw the two strokes and the alignment circle.
    ///
    /// Each stroke covers `coef..1 - coef` of the extent; with `coef` above
    /// one half it is drawn backwards over the same span.
    pub fn draw(&self, surface: &mut impl DrawingSurface, coef: f32) {
        let Self {
            x,
            y,
            extent_x: lx,
            extent_y: ly,
        } = *self;

        surface.line(x, y + coef * ly, x, y + ly - coef * ly);
        surface.line(x + coef * lx, y, x + lx - coef * lx, y);

        let diameter = lx.abs() / 2.0;
        surface.ellipse(
            x + lx / 2.0 - diameter / 2.0,
            y + ly / 2.0 - diameter / 2.0,
            diameter,
            diameter,
        );
    }
}

/// Crop marks for every page-pair cell, four per cell
pub fn crop_marks(geometry: &LayoutGeometry, config: &SheetConfig) -> Vec<CropMark> {
    let (margin_x, margin_y) = geometry.effective_margins(config);
    let len = config.dec_margin();

    let mut marks = Vec::with_capacity(config.nb_w() * config.nb_h() * 4);
    for ix in 0..config.nb_w() {
        for iy in 0..config.nb_h() {
            let origin = cell_transform(ix * 2, iy, geometry);
            let lx = origin.translate_x - margin_x;
            let hx = origin.translate_x + geometry.cell_content_w + margin_x;
            let ly = origin.translate_y - margin_y;
            let hy = origin.translate_y + geometry.cell_content_h + margin_y;

            for (x, y, extent_x, extent_y) in [
                (lx, ly, -len, -len),
                (lx, hy, -len, len),
                (hx, ly, len, -len),
                (hx, hy, len, len),
            ] {
                marks.push(CropMark {
                    x,
                    y,
                    extent_x,
                    extent_y,
                });
            }
        }
    }
    marks
}

/// Kind of debug guide line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuideStyle {
    /// External margin outline (solid red)
    Boundary,
    /// Where the sheet gets cut (solid blue)
    Cut,
    /// Dashed indicator; `ratio` of each dash period is inked
    Indicator { ratio: f32 },
}

impl GuideStyle {
    fn color(self) -> Rgb {
        match self {
            GuideStyle::Boundary => Rgb::RED,
            GuideStyle::Cut => Rgb::BLUE,
            GuideStyle::Indicator { .. } => Rgb::OLIVE,
        }
    }
}

/// A guide line spanning the whole sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Guide {
    /// Vertical line at this x
    Vertical(f32, GuideStyle),
    /// Horizontal line at this y
    Horizontal(f32, GuideStyle),
}

impl Guide {
    pub fn style(&self) -> GuideStyle {
        match *self {
            Guide::Vertical(_, style) | Guide::Horizontal(_, style) => style,
        }
    }

    fn draw(&self, surface: &mut impl DrawingSurface, config: &SheetConfig) {
        let (x1, y1, x2, y2) = match *self {
            Guide::Vertical(x, _) => (x, 0.0, x, config.global_h()),
            Guide::Horizontal(y, _) => (0.0, y, config.global_w(), y),
        };

        let style = self.style();
        surface.set_color(style.color());
        match style {
            GuideStyle::Indicator { ratio } => surface.dashed_line(
                x1,
                y1,
                x2,
                y2,
                GUIDE_DASH_PERIOD * ratio,
                GUIDE_DASH_PERIOD * (1.0 - ratio),
            ),
            GuideStyle::Boundary | GuideStyle::Cut => surface.line(x1, y1, x2, y2),
        }
    }
}

/// Guide lines along one axis for a cell starting at `origin`
fn axis_guides(
    origin: f32,
    content: f32,
    slack: f32,
    config: &SheetConfig,
    make: fn(f32, GuideStyle) -> Guide,
) -> Vec<Guide> {
    let int = config.int_margin();
    let dec = config.dec_margin();
    let dense = GuideStyle::Indicator {
        ratio: GUIDE_DASH_RATIO,
    };
    let sparse = GuideStyle::Indicator {
        ratio: GUIDE_DASH_RATIO_SPARSE,
    };

    vec![
        make(origin - slack - int - dec, dense),
        make(origin - slack - int, GuideStyle::Cut),
        make(origin - int, sparse),
        make(origin, dense),
        make(origin + content, dense),
        make(origin + content + int, sparse),
        make(origin + content + slack + int, GuideStyle::Cut),
        make(origin + content + slack + int + dec, dense),
    ]
}

/// Debug guides: external margin outline, then per-column and per-row guides
pub fn debug_guides(geometry: &LayoutGeometry, config: &SheetConfig) -> Vec<Guide> {
    let ext = config.ext_margin();
    let mut guides = vec![
        Guide::Horizontal(ext, GuideStyle::Boundary),
        Guide::Horizontal(config.global_h() - ext, GuideStyle::Boundary),
        Guide::Vertical(ext, GuideStyle::Boundary),
        Guide::Vertical(config.global_w() - ext, GuideStyle::Boundary),
    ];

    for ix in 0..config.nb_w() {
        let x = cell_transform(ix * 2, 0, geometry).translate_x;
        guides.extend(axis_guides(
            x,
            geometry.cell_content_w,
            geometry.slack_x,
            config,
            Guide::Vertical,
        ));
        // Fold between the two pages of the pair
        guides.push(Guide::Vertical(
            x + geometry.cell_content_w / 2.0,
            GuideStyle::Indicator {
                ratio: GUIDE_DASH_RATIO,
            },
        ));
    }

    for iy in 0..config.nb_h() {
        let y = cell_transform(0, iy, geometry).translate_y;
        guides.extend(axis_guides(
            y,
            geometry.cell_content_h,
            geometry.slack_y,
            config,
            Guide::Horizontal,
        ));
    }

    guides
}

/// Draw the whole template: debug guides when enabled, then crop marks
pub fn draw_template(
    surface: &mut impl DrawingSurface,
    geometry: &LayoutGeometry,
    config: &SheetConfig,
) {
    if config.debug() {
        for guide in debug_guides(geometry, config) {
            guide.draw(surface, config);
        }
    }

    surface.set_color(config.dec_color());
    for mark in crop_marks(geometry, config) {
        mark.draw(surface, config.dec_line_coef());
    }
}

/// Render the template as a PDF content stream
pub fn render_template(geometry: &LayoutGeometry, config: &SheetConfig) -> Vec<u8> {
    let mut surface = ContentStreamSurface::new(CROP_MARK_WIDTH);
    draw_template(&mut surface, geometry, config);
    surface.finish()
}
