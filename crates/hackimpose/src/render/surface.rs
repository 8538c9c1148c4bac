//! Drawing surface for template marks
//!
//! The marks module describes crop marks and guides as lines and ellipses;
//! a [`DrawingSurface`] turns them into output. [`ContentStreamSurface`]
//! writes PDF content stream operators.

use crate::constants::BEZIER_CIRCLE_FACTOR;
use crate::types::Rgb;

/// Minimal vector drawing interface, in PDF user space
pub trait DrawingSurface {
    /// Stroke colour for the following operations
    fn set_color(&mut self, color: Rgb);

    /// Solid line from (x1, y1) to (x2, y2)
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);

    /// Dashed line with `dash` long strokes separated by `gap`
    fn dashed_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, dash: f32, gap: f32);

    /// Ellipse inscribed in the box whose lower-left corner is (x, y)
    fn ellipse(&mut self, x: f32, y: f32, width: f32, height: f32);
}

/// Surface producing a PDF content stream
#[derive(Debug, Clone)]
pub struct ContentStreamSurface {
    ops: String,
    color: Option<Rgb>,
}

impl ContentStreamSurface {
    /// Start a surface stroking lines `line_width` points wide
    pub fn new(line_width: f32) -> Self {
        let mut ops = String::new();
        // Save graphics state
        ops.push_str("q\n");
        ops.push_str(&format!("{} w\n", line_width));
        Self { ops, color: None }
    }

    /// Finish drawing and return the content stream bytes
    pub fn finish(mut self) -> Vec<u8> {
        // Restore graphics state
        self.ops.push_str("Q\n");
        self.ops.into_bytes()
    }

    /// Operators written so far
    pub fn ops(&self) -> &str {
        &self.ops
    }
}

impl DrawingSurface for ContentStreamSurface {
    fn set_color(&mut self, color: Rgb) {
        if self.color == Some(color) {
            return;
        }
        let (r, g, b) = color.unit();
        self.ops.push_str(&format!("{} {} {} RG\n", r, g, b));
        self.color = Some(color);
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.ops.push_str(&format!("{} {} m {} {} l S\n", x1, y1, x2, y2));
    }

    fn dashed_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, dash: f32, gap: f32) {
        self.ops.push_str(&format!("[{} {}] 0 d\n", dash, gap));
        self.line(x1, y1, x2, y2);
        // Reset to solid line
        self.ops.push_str("[] 0 d\n");
    }

    fn ellipse(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let rx = width / 2.0;
        let ry = height / 2.0;
        let cx = x + rx;
        let cy = y + ry;
        let kx = rx * BEZIER_CIRCLE_FACTOR;
        let ky = ry * BEZIER_CIRCLE_FACTOR;

        self.ops.push_str(&format!("{} {} m\n", cx + rx, cy));
        self.ops.push_str(&format!(
            "{} {} {} {} {} {} c\n",
            cx + rx,
            cy + ky,
            cx + kx,
            cy + ry,
            cx,
            cy + ry
        ));
        self.ops.push_str(&format!(
            "{} {} {} {} {} {} c\n",
            cx - kx,
            cy + ry,
            cx - rx,
            cy + ky,
            cx - rx,
            cy
        ));
        self.ops.push_str(&format!(
            "{} {} {} {} {} {} c\n",
            cx - rx,
            cy - ky,
            cx - kx,
            cy - ry,
            cx,
            cy - ry
        ));
        self.ops.push_str(&format!(
            "{} {} {} {} {} {} c\n",
            cx + kx,
            cy - ry,
            cx + rx,
            cy - ky,
            cx + rx,
            cy
        ));
        self.ops.push_str("S\n");
    }
}
