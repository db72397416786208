//! Junction-aware skeleton tracing for binary stroke masks.
//!
//! [`extract`] thins the mask foreground (Zhang-Suen) and traces the
//! one-pixel skeleton on the integer grid:
//! - Pixels link to their 8 neighbours, except across a diagonal whose
//!   corner is already filled by one of the two side pixels.
//! - Node pixels are those with other than two links.
//! - Two-link pixels are walked between nodes; every walk becomes one
//!   polyline that includes both of its node pixels.
//! - Closed strokes with no nodes get a `LoopAnchor` node at their first
//!   pixel in row-major order and a polyline that starts and ends there.
//! - Isolated pixels become single-point polylines.
//!
//! Nodes are visited in row-major order and links clockwise from north, so
//! identical masks always decompose into identical polylines.

mod graph;
mod grid;
mod trace;

pub use graph::{Branch, NodeId, NodeKind, SkeletonGraph, SkeletonNode};
pub use trace::{SkeletonConfig, extract, trace_skeleton};
