//! PDF rendering modules for imposition
//!
//! This module handles all PDF-specific drawing:
//! - Creating XObjects from source pages
//! - Deep copying PDF objects
//! - Turning template marks into content stream operators

mod surface;
mod xobject;

pub use surface::{ContentStreamSurface, DrawingSurface};
pub use xobject::{copy_object_deep, create_page_xobject, get_page_dimensions};
