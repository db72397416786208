//! Binary mask construction and thinning.
//!
//! Masks are `u8` images holding exactly `0` (background) or `255`
//! (foreground). [`preprocess`] turns dark ink on a light or transparent
//! canvas into a white-on-black mask; [`thin_zhang_suen`] reduces the
//! foreground to a one-pixel-wide skeleton.

mod binarize;
mod mask;
mod thin;

pub use binarize::{InkThreshold, binarize_rgba_in_place, is_ink, preprocess, preprocess_with};
pub use mask::BinaryMask;
pub use thin::{ThinConfig, thin_zhang_suen};
