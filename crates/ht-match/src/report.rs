use ht_core::PolylineSet;
use log::debug;

use crate::nearest::{MatchResult, nearest_neighbor};

/// Distance, in raster units, at which a point stops counting as matched.
pub const DEFAULT_MATCH_THRESHOLD: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    /// Points whose nearest-neighbor distance is `>= threshold` are
    /// unmatched.
    pub threshold: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

/// Per-point classification of one query set against one target set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchReport {
    pub matched: Vec<MatchResult>,
    pub unmatched: Vec<MatchResult>,
}

impl MatchReport {
    pub fn num_points(&self) -> usize {
        self.matched.len() + self.unmatched.len()
    }

    pub fn all_matched(&self) -> bool {
        self.unmatched.is_empty()
    }

    /// Largest nearest-neighbor distance seen, `0` for an empty query set.
    pub fn max_distance(&self) -> f32 {
        self.matched
            .iter()
            .chain(&self.unmatched)
            .map(|m| m.distance)
            .fold(0.0, f32::max)
    }
}

pub fn match_points(query: &PolylineSet, target: &PolylineSet, cfg: &MatchConfig) -> MatchReport {
    let mut report = MatchReport::default();
    for p in query.iter_points() {
        let m = nearest_neighbor(target, p);
        if m.is_matched(cfg.threshold) {
            report.matched.push(m);
        } else {
            report.unmatched.push(m);
        }
    }
    report
}

/// Both directions of a user/reference comparison.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SetComparison {
    /// User points matched against the reference skeleton.
    pub user: MatchReport,
    /// Reference points matched against the user skeleton.
    pub reference: MatchReport,
}

impl SetComparison {
    pub fn verdict(&self) -> bool {
        self.user.all_matched() && self.reference.all_matched()
    }

    pub fn num_unmatched(&self) -> usize {
        self.user.unmatched.len() + self.reference.unmatched.len()
    }

    /// Unmatched points of both directions, user side first.
    pub fn iter_unmatched(&self) -> impl Iterator<Item = &MatchResult> {
        self.user.unmatched.iter().chain(&self.reference.unmatched)
    }
}

pub fn compare_sets(
    user: &PolylineSet,
    reference: &PolylineSet,
    cfg: &MatchConfig,
) -> SetComparison {
    let cmp = SetComparison {
        user: match_points(user, reference, cfg),
        reference: match_points(reference, user, cfg),
    };
    debug!(
        "matched sets at threshold {}: user {}/{} unmatched, reference {}/{} unmatched",
        cfg.threshold,
        cmp.user.unmatched.len(),
        cmp.user.num_points(),
        cmp.reference.unmatched.len(),
        cmp.reference.num_points()
    );
    cmp
}

#[cfg(test)]
mod tests {
    use ht_core::{Point2f, Polyline2f, PolylineSet};

    use super::{MatchConfig, compare_sets, match_points};

    fn line(pts: &[(f32, f32)]) -> Polyline2f {
        Polyline2f::new(pts.iter().map(|&(x, y)| Point2f::new(x, y)).collect())
    }

    fn dense_horizontal(y: f32, x0: usize, x1: usize) -> Polyline2f {
        Polyline2f::new((x0..=x1).map(|x| Point2f::new(x as f32, y)).collect())
    }

    #[test]
    fn identical_strokes_pass() {
        let reference = PolylineSet::new(vec![line(&[(0.0, 10.0), (50.0, 10.0)])]);
        let user = reference.clone();

        let cmp = compare_sets(&user, &reference, &MatchConfig::default());
        assert!(cmp.verdict());
        assert_eq!(cmp.user.matched.len(), 2);
        assert_eq!(cmp.reference.matched.len(), 2);
        assert!(cmp.user.matched.iter().all(|m| m.distance == 0.0));
    }

    #[test]
    fn offset_equal_to_threshold_fails() {
        let reference = PolylineSet::new(vec![line(&[(0.0, 10.0), (50.0, 10.0)])]);
        let user = PolylineSet::new(vec![line(&[(0.0, 30.0), (50.0, 30.0)])]);

        let cmp = compare_sets(&user, &reference, &MatchConfig::default());
        assert!(!cmp.verdict());
        assert_eq!(cmp.num_unmatched(), 4);
        assert!(cmp.iter_unmatched().all(|m| m.distance == 20.0));

        let looser = compare_sets(&user, &reference, &MatchConfig { threshold: 20.5 });
        assert!(looser.verdict());
    }

    #[test]
    fn search_spans_every_component() {
        let reference = PolylineSet::new(vec![
            dense_horizontal(10.0, 0, 40),
            dense_horizontal(80.0, 0, 40),
        ]);
        let user = PolylineSet::new(vec![
            dense_horizontal(82.0, 2, 38),
            dense_horizontal(12.0, 1, 41),
        ]);

        let cmp = compare_sets(&user, &reference, &MatchConfig::default());
        assert!(cmp.verdict());
        assert!(cmp.user.max_distance() < 5.0);
    }

    #[test]
    fn missing_stroke_is_reported_from_reference_side() {
        let reference = PolylineSet::new(vec![
            dense_horizontal(10.0, 0, 40),
            dense_horizontal(80.0, 0, 40),
        ]);
        let user = PolylineSet::new(vec![dense_horizontal(10.0, 0, 40)]);

        let cmp = compare_sets(&user, &reference, &MatchConfig::default());
        assert!(cmp.user.all_matched());
        assert_eq!(cmp.reference.unmatched.len(), 41);
        assert!(!cmp.verdict());
    }

    #[test]
    fn both_empty_is_vacuously_true() {
        let cmp = compare_sets(
            &PolylineSet::default(),
            &PolylineSet::default(),
            &MatchConfig::default(),
        );
        assert!(cmp.verdict());
        assert_eq!(cmp.user.num_points(), 0);
        assert_eq!(cmp.user.max_distance(), 0.0);
    }

    #[test]
    fn empty_reference_rejects_every_user_point() {
        let user = PolylineSet::new(vec![dense_horizontal(5.0, 0, 9)]);
        let cmp = compare_sets(&user, &PolylineSet::default(), &MatchConfig::default());

        assert!(!cmp.verdict());
        assert_eq!(cmp.user.unmatched.len(), 10);
        assert!(cmp.user.unmatched.iter().all(|m| m.distance.is_infinite()));
        assert!(cmp.reference.all_matched());
    }

    #[test]
    fn matched_count_is_monotonic_in_threshold() {
        let target = PolylineSet::new(vec![dense_horizontal(0.0, 0, 20)]);
        let query = PolylineSet::new(vec![Polyline2f::new(
            (0..30).map(|i| Point2f::new(i as f32, i as f32 * 1.5)).collect(),
        )]);

        let mut prev = 0;
        for t in [0.0_f32, 0.5, 1.0, 3.0, 7.5, 12.0, 20.0, 33.0, 60.0] {
            let report = match_points(&query, &target, &MatchConfig { threshold: t });
            assert!(report.matched.len() >= prev, "threshold {t} lost matches");
            assert_eq!(report.num_points(), 30);
            prev = report.matched.len();
        }
        assert_eq!(prev, 30);
    }
}
