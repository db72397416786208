use ht_core::{Image, Rgba8};
use log::debug;

use crate::mask::BinaryMask;

/// Darkness limit for ink detection.
///
/// A pixel is ink iff every colour channel is `<= max_channel` and the pixel
/// is not fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkThreshold {
    pub max_channel: u8,
}

impl Default for InkThreshold {
    fn default() -> Self {
        Self { max_channel: 10 }
    }
}

#[inline]
pub fn is_ink(px: Rgba8, threshold: InkThreshold) -> bool {
    px.a > 0 && px.max_rgb() <= threshold.max_channel
}

/// Rewrites ink to opaque white and everything else to opaque black.
pub fn binarize_rgba_in_place(img: &mut Image<Rgba8>, threshold: InkThreshold) {
    for px in img.data_mut() {
        *px = if is_ink(*px, threshold) {
            Rgba8::WHITE
        } else {
            Rgba8::BLACK
        };
    }
}

pub fn preprocess(img: Image<Rgba8>) -> BinaryMask {
    preprocess_with(img, InkThreshold::default())
}

pub fn preprocess_with(mut img: Image<Rgba8>, threshold: InkThreshold) -> BinaryMask {
    binarize_rgba_in_place(&mut img, threshold);
    let mask = BinaryMask::from_rgba_mask(&img);
    debug!(
        "binarized {}x{} raster: {} ink pixels",
        mask.width(),
        mask.height(),
        mask.count_foreground()
    );
    mask
}
