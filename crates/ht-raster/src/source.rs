use ht_core::{Image, Rgba8};

use crate::error::RasterError;

/// Something that can produce a `size x size` RGBA raster on demand.
///
/// Implementations must be callable from a worker thread; the comparison
/// renders its two inputs concurrently.
pub trait RasterSource: Send + Sync {
    fn render(&self, size: usize) -> Result<Image<Rgba8>, RasterError>;
}

/// Already rendered pixels; the raster must match the requested canvas.
impl RasterSource for Image<Rgba8> {
    fn render(&self, size: usize) -> Result<Image<Rgba8>, RasterError> {
        if size == 0 {
            return Err(RasterError::ZeroSize);
        }
        if self.width() != size || self.height() != size {
            return Err(RasterError::SizeMismatch {
                expected: size,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(self.clone())
    }
}
