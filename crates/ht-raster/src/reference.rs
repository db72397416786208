use std::sync::Arc;

use ht_core::{Image, Rgba8};
use image::imageops::{self, FilterType};
use log::debug;

use crate::error::RasterError;
use crate::source::RasterSource;

/// Decodes a reference glyph and stretches it onto a `size x size` canvas.
pub fn decode_reference(bytes: &[u8], size: usize) -> Result<Image<Rgba8>, RasterError> {
    if size == 0 {
        return Err(RasterError::ZeroSize);
    }

    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (w, h) = rgba.dimensions();
    let side = u32::try_from(size).map_err(|_| RasterError::TooLarge(size))?;
    let scaled = if (w, h) == (side, side) {
        rgba
    } else {
        imageops::resize(&rgba, side, side, FilterType::Triangle)
    };
    debug!("decoded {w}x{h} reference glyph onto {size}x{size} canvas");

    Ok(Image::from_rgba_bytes(size, size, scaled.as_raw())?)
}

/// Encoded glyph image together with the address it was fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceGlyph {
    source: String,
    bytes: Arc<[u8]>,
}

impl ReferenceGlyph {
    pub fn new(source: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            source: source.into(),
            bytes: bytes.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl RasterSource for ReferenceGlyph {
    fn render(&self, size: usize) -> Result<Image<Rgba8>, RasterError> {
        decode_reference(&self.bytes, size)
    }
}
