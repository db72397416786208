//! Turning comparison inputs into square RGBA rasters.
//!
//! Both sides of a comparison are rendered at the same `size x size`:
//! - reference glyph images (GIF, JPEG, PNG) are decoded and stretched to the
//!   canvas, as a browser `drawImage` into a square canvas does;
//! - user drawings arrive as SVG markup and are rendered onto a transparent
//!   canvas, scaled so the document fills it.
//!
//! [`RasterSource`] abstracts over both so callers can hand the comparison
//! either ready-made pixels or something that still has to be rendered.

mod error;
mod reference;
mod source;
mod svg;

pub use error::RasterError;
pub use reference::{ReferenceGlyph, decode_reference};
pub use source::RasterSource;
pub use svg::{SvgDrawing, render_svg};
