use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ht_core::{Image, PolylineSet, Rgba8};
use ht_match::{SetComparison, compare_sets};
use ht_morph::{InkThreshold, preprocess_with};
use ht_raster::{RasterError, RasterSource};
use ht_skeleton::{SkeletonConfig, extract};
use log::{debug, info, warn};
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::annotation::{Annotation, AnnotationId, AnnotationRenderer, Side};
use crate::config::CompareConfig;
use crate::error::CompareError;
use crate::schedule::{Scheduler, TaskHandle, TokioScheduler};

type PendingRemovals = BTreeMap<AnnotationId, Box<dyn TaskHandle>>;

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonOutcome {
    pub verdict: bool,
    pub comparison: SetComparison,
    pub user_polylines: PolylineSet,
    pub reference_polylines: PolylineSet,
    /// Annotations shown for this comparison, in display order.
    pub annotations: Vec<(AnnotationId, Annotation)>,
}

pub struct Comparator {
    cfg: CompareConfig,
    renderer: Arc<dyn AnnotationRenderer>,
    scheduler: Arc<dyn Scheduler>,
    next_id: AtomicU64,
    pending: Arc<Mutex<PendingRemovals>>,
}

impl Comparator {
    pub fn new(
        cfg: CompareConfig,
        renderer: Arc<dyn AnnotationRenderer>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            cfg,
            renderer,
            scheduler,
            next_id: AtomicU64::new(0),
            pending: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Comparator whose marker removals run on the calling Tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside of a Tokio runtime.
    pub fn with_tokio(cfg: CompareConfig, renderer: Arc<dyn AnnotationRenderer>) -> Self {
        Self::new(cfg, renderer, Arc::new(TokioScheduler::current()))
    }

    pub fn config(&self) -> &CompareConfig {
        &self.cfg
    }

    /// Renders both inputs at `canvas_size` and compares them.
    pub async fn compare(
        &self,
        reference: Arc<dyn RasterSource>,
        user: Option<Arc<dyn RasterSource>>,
    ) -> Result<ComparisonOutcome, CompareError> {
        self.compare_at(self.cfg.canvas_size, reference, user).await
    }

    /// Compares two ready rasters on a canvas the size of the reference.
    pub async fn compare_rasters(
        &self,
        reference: Image<Rgba8>,
        user: Option<Image<Rgba8>>,
    ) -> Result<ComparisonOutcome, CompareError> {
        let size = reference.width();
        let user = user.map(|u| Arc::new(u) as Arc<dyn RasterSource>);
        self.compare_at(size, Arc::new(reference), user).await
    }

    async fn compare_at(
        &self,
        size: usize,
        reference: Arc<dyn RasterSource>,
        user: Option<Arc<dyn RasterSource>>,
    ) -> Result<ComparisonOutcome, CompareError> {
        let Some(user) = user else {
            warn!("comparison requested without a user drawing");
            return Err(CompareError::MissingInput);
        };

        if self.cfg.clear_previous {
            self.clear_annotations();
        }

        let ink = self.cfg.ink_threshold();
        let skel = self.cfg.skeleton_config();
        let reference_task = spawn_extraction(reference, size, ink, skel.clone());
        let user_task = spawn_extraction(user, size, ink, skel);
        let (reference_res, user_res) = tokio::join!(reference_task, user_task);

        let reference_polylines = join_extraction(Side::Reference, reference_res)?;
        let user_polylines = join_extraction(Side::User, user_res)?;
        debug!(
            "extracted skeletons: reference {} points, user {} points",
            reference_polylines.num_points(),
            user_polylines.num_points()
        );

        let comparison = compare_sets(
            &user_polylines,
            &reference_polylines,
            &self.cfg.match_config(),
        );
        let verdict = comparison.verdict();
        let annotations = self.annotate(&comparison, verdict);

        tokio::time::sleep(self.cfg.verdict_delay()).await;
        info!(
            "comparison verdict: {} ({} unmatched points)",
            if verdict { "pass" } else { "fail" },
            comparison.num_unmatched()
        );

        Ok(ComparisonOutcome {
            verdict,
            comparison,
            user_polylines,
            reference_polylines,
            annotations,
        })
    }

    /// Cancels pending marker removals and removes those markers now.
    pub fn clear_annotations(&self) {
        let drained = std::mem::take(&mut *self.pending.lock());
        if !drained.is_empty() {
            debug!("clearing {} pending annotations", drained.len());
        }
        for (id, task) in drained {
            task.cancel();
            self.renderer.remove(id);
        }
    }

    fn annotate(
        &self,
        comparison: &SetComparison,
        verdict: bool,
    ) -> Vec<(AnnotationId, Annotation)> {
        let mut shown = Vec::new();

        let mismatches = comparison
            .user
            .unmatched
            .iter()
            .map(|m| (Side::User, m.query))
            .chain(
                comparison
                    .reference
                    .unmatched
                    .iter()
                    .map(|m| (Side::Reference, m.query)),
            );
        for (side, at) in mismatches {
            let annotation = Annotation::Mismatch { at, side };
            let id = self.show(annotation, self.cfg.mismatch_marker_lifetime());
            shown.push((id, annotation));
        }

        if verdict {
            let id = self.show(Annotation::Success, self.cfg.success_marker_lifetime());
            shown.push((id, Annotation::Success));
        }

        shown
    }

    fn show(&self, annotation: Annotation, lifetime: std::time::Duration) -> AnnotationId {
        let id = AnnotationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.renderer.add(id, &annotation);

        let renderer = Arc::clone(&self.renderer);
        let pending = Arc::clone(&self.pending);
        let task = self.scheduler.schedule(
            lifetime,
            Box::new(move || {
                pending.lock().remove(&id);
                renderer.remove(id);
            }),
        );

        let mut pending = self.pending.lock();
        pending.retain(|_, t| !t.is_finished());
        if !task.is_finished() {
            pending.insert(id, task);
        }
        id
    }
}

fn spawn_extraction(
    source: Arc<dyn RasterSource>,
    size: usize,
    ink: InkThreshold,
    skel: SkeletonConfig,
) -> JoinHandle<Result<PolylineSet, RasterError>> {
    tokio::task::spawn_blocking(move || {
        let raster = source.render(size)?;
        let mask = preprocess_with(raster, ink);
        Ok(extract(&mask, &skel))
    })
}

fn join_extraction(
    side: Side,
    res: Result<Result<PolylineSet, RasterError>, tokio::task::JoinError>,
) -> Result<PolylineSet, CompareError> {
    match res {
        Ok(Ok(set)) => Ok(set),
        Ok(Err(source)) => {
            warn!("rendering {side} input failed: {source}");
            Err(CompareError::Render { side, source })
        }
        Err(e) => Err(CompareError::Join {
            side,
            message: e.to_string(),
        }),
    }
}
