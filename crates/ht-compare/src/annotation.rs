use std::fmt;
use std::time::Duration;

use ht_core::Point2f;
use parking_lot::Mutex;
use tokio::time::Instant;

/// Which skeleton a point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Reference,
    User,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::User => write!(f, "user"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Annotation {
    /// A skeleton point with no counterpart within the threshold.
    Mismatch { at: Point2f, side: Side },
    /// The whole drawing matched.
    Success,
}

/// Drawing surface for comparison feedback.
///
/// Removing an id that is not currently shown must be a no-op.
pub trait AnnotationRenderer: Send + Sync {
    fn add(&self, id: AnnotationId, annotation: &Annotation);
    fn remove(&self, id: AnnotationId);
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationEvent {
    Added {
        id: AnnotationId,
        annotation: Annotation,
        at: Duration,
    },
    Removed {
        id: AnnotationId,
        at: Duration,
    },
}

impl AnnotationEvent {
    pub fn id(&self) -> AnnotationId {
        match self {
            Self::Added { id, .. } | Self::Removed { id, .. } => *id,
        }
    }

    pub fn at(&self) -> Duration {
        match self {
            Self::Added { at, .. } | Self::Removed { at, .. } => *at,
        }
    }
}

/// Renderer that only records what it was asked to do, stamped with the time
/// elapsed since it was created.
#[derive(Debug)]
pub struct RecordingRenderer {
    start: Instant,
    state: Mutex<RecorderState>,
}

#[derive(Debug, Default)]
struct RecorderState {
    events: Vec<AnnotationEvent>,
    live: Vec<(AnnotationId, Annotation)>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            state: Mutex::new(RecorderState::default()),
        }
    }

    pub fn events(&self) -> Vec<AnnotationEvent> {
        self.state.lock().events.clone()
    }

    /// Annotations currently shown, in the order they were added.
    pub fn live(&self) -> Vec<(AnnotationId, Annotation)> {
        self.state.lock().live.clone()
    }
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationRenderer for RecordingRenderer {
    fn add(&self, id: AnnotationId, annotation: &Annotation) {
        let at = self.start.elapsed();
        let mut state = self.state.lock();
        state.live.push((id, *annotation));
        state.events.push(AnnotationEvent::Added {
            id,
            annotation: *annotation,
            at,
        });
    }

    fn remove(&self, id: AnnotationId) {
        let at = self.start.elapsed();
        let mut state = self.state.lock();
        let before = state.live.len();
        state.live.retain(|(live_id, _)| *live_id != id);
        if state.live.len() != before {
            state.events.push(AnnotationEvent::Removed { id, at });
        }
    }
}
