//! Layout calculation modules for imposition
//!
//! This module handles all the pure calculations of an imposition:
//! - Sheet geometry (scale, cell positions, page transforms)
//! - Signature folding (which sheet, slot and rotation each page gets)
//! - The logical page sequence handed to the folding plan

mod folding;
mod geometry;
mod sequence;

pub use folding::*;
pub use geometry::*;
pub use sequence::*;
