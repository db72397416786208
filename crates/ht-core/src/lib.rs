//! Foundational primitives for stroke comparison.
//!
//! ## Images
//! [`Image`] is an owned, row-major buffer with no row padding. Colour rasters
//! use [`Rgba8`] pixels with straight alpha.
//!
//! ## Coordinates
//! Points use pixel-center coordinates: the pixel at column `x`, row `y` maps
//! to [`Point2f`] `(x, y)`. Skeleton branches are [`Polyline2f`]s and the
//! branches of one image form a [`PolylineSet`].

mod error;
mod geom;
mod image;
mod pixel;

pub use error::Error;
pub use geom::{Point2f, Polyline2f, PolylineSet, Vec2f};
pub use image::Image;
pub use pixel::Rgba8;
