//! Comparison of a user's tracing against a reference glyph.
//!
//! [`Comparator::compare`] renders both inputs, binarizes and skeletonizes
//! them on two concurrent blocking tasks, joins, then matches the skeletons
//! in both directions. Feedback is pushed through an [`AnnotationRenderer`]:
//! one mismatch marker per unmatched point and, on success, a single success
//! marker. Markers are removed by tasks on a [`Scheduler`]; the verdict is
//! returned only after a further delay so the markers are seen first.
//!
//! A missing user drawing fails with [`CompareError::MissingInput`] before any
//! work starts. Render failures on either side reject the whole comparison.

mod annotation;
mod comparator;
mod config;
mod error;
mod schedule;
mod session;

pub use annotation::{
    Annotation, AnnotationEvent, AnnotationId, AnnotationRenderer, RecordingRenderer, Side,
};
pub use comparator::{Comparator, ComparisonOutcome};
pub use config::CompareConfig;
pub use error::CompareError;
pub use schedule::{Action, Scheduler, TaskHandle, TokioScheduler};
pub use session::PracticeSession;
