use ht_core::{Point2f, PolylineSet};

/// Nearest target point for one query point.
///
/// `nearest` is `None` and `distance` is `+inf` when the target set has no
/// points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    pub query: Point2f,
    pub nearest: Option<Point2f>,
    pub distance: f32,
}

impl MatchResult {
    pub fn is_matched(&self, threshold: f32) -> bool {
        self.distance < threshold
    }
}

/// Exhaustive nearest-neighbor scan over every point of every polyline.
///
/// Ties keep the first point in enumeration order.
pub fn nearest_neighbor(target: &PolylineSet, query: Point2f) -> MatchResult {
    let mut best = None;
    let mut best_d2 = f32::INFINITY;

    for p in target.iter_points() {
        let dx = p.x - query.x;
        let dy = p.y - query.y;
        let d2 = dx * dx + dy * dy;
        if d2 < best_d2 {
            best_d2 = d2;
            best = Some(p);
        }
    }

    MatchResult {
        query,
        nearest: best,
        distance: best_d2.sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use ht_core::{Point2f, Polyline2f, PolylineSet};

    use super::nearest_neighbor;

    fn set(lines: &[&[(f32, f32)]]) -> PolylineSet {
        lines
            .iter()
            .map(|pts| Polyline2f::new(pts.iter().map(|&(x, y)| Point2f::new(x, y)).collect()))
            .collect()
    }

    #[test]
    fn finds_closest_point_across_polylines() {
        let target = set(&[&[(0.0, 0.0), (10.0, 0.0)], &[(100.0, 100.0), (103.0, 104.0)]]);

        let m = nearest_neighbor(&target, Point2f::new(100.0, 104.0));
        assert_eq!(m.nearest, Some(Point2f::new(103.0, 104.0)));
        assert!((m.distance - 3.0).abs() < 1e-6);
        assert!(m.is_matched(20.0));
    }

    #[test]
    fn ties_keep_first_enumerated_point() {
        let target = set(&[&[(-5.0, 0.0)], &[(5.0, 0.0), (0.0, 5.0)]]);

        let m = nearest_neighbor(&target, Point2f::new(0.0, 0.0));
        assert_eq!(m.nearest, Some(Point2f::new(-5.0, 0.0)));
        assert!((m.distance - 5.0).abs() < 1e-6);
    }

    #[test]
    fn empty_target_is_infinitely_far() {
        let m = nearest_neighbor(&PolylineSet::default(), Point2f::new(1.0, 2.0));
        assert_eq!(m.nearest, None);
        assert!(m.distance.is_infinite());
        assert!(!m.is_matched(f32::MAX));
    }
}
