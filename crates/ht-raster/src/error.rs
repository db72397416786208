#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("canvas size must be non-zero")]
    ZeroSize,
    #[error("canvas size {0} is too large")]
    TooLarge(usize),
    #[error("raster is {width}x{height}, expected {expected}x{expected}")]
    SizeMismatch {
        expected: usize,
        width: usize,
        height: usize,
    },
    #[error("decoding reference image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("parsing svg drawing: {0}")]
    Svg(#[from] resvg::usvg::Error),
    #[error("svg document has an empty viewport")]
    EmptyViewport,
    #[error(transparent)]
    Image(#[from] ht_core::Error),
}
