//! Spatial agreement between two skeleton polyline sets.
//!
//! Every point of one set is matched to its nearest point in the other set by
//! exhaustive scan; a point is matched iff that distance is strictly below the
//! threshold. Running the scan in both directions catches strokes the user
//! missed as well as strokes the user added.

mod nearest;
mod report;

pub use nearest::{MatchResult, nearest_neighbor};
pub use report::{
    DEFAULT_MATCH_THRESHOLD, MatchConfig, MatchReport, SetComparison, compare_sets, match_points,
};
