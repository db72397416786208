//! Umbrella crate for the `hanzi-trace` workspace.
//!
//! Re-exports the whole tracing pipeline: ink binarization and thinning,
//! skeleton tracing, bidirectional point matching, input rasterization and the
//! asynchronous comparator that drives on-screen feedback.

pub use ht_compare::*;
pub use ht_core::*;
pub use ht_match::*;
pub use ht_morph::*;
pub use ht_raster::*;
pub use ht_skeleton::*;
