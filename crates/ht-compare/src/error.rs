use ht_raster::RasterError;

use crate::annotation::Side;

#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("no user drawing to compare")]
    MissingInput,
    #[error("no reference glyph loaded")]
    NoReference,
    #[error("rendering {side} input: {source}")]
    Render {
        side: Side,
        #[source]
        source: RasterError,
    },
    #[error("{side} extraction task failed: {message}")]
    Join { side: Side, message: String },
}
