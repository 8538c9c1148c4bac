pub mod constants;
pub mod impose;
pub mod layout;
pub mod marks;
mod options;
pub mod render;
mod stats;
mod types;

pub use impose::{
    Imposition, ImpositionReport, impose, impose_file, inspect, load_pdf, save_pdf, verify_output,
};
pub use layout::{
    FoldingScheme, ImpositionPlan, LayoutGeometry, PageSequence, Placement, compute_layout, plan,
};
pub use options::*;
pub use stats::calculate_statistics;
pub use types::*;
