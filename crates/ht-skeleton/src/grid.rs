use ht_morph::BinaryMask;

/// Neighbour offsets, clockwise from north.
const RING: [(isize, isize); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Skeleton pixels with their link structure.
///
/// Two set pixels are linked when they touch horizontally or vertically, or
/// diagonally with neither of the two shared side pixels set. A diagonal
/// that an axis-aligned detour already covers is not a link, so a one-pixel
/// staircase has exactly two links per inner pixel.
pub(crate) struct SkeletonGrid {
    width: usize,
    height: usize,
    on: Vec<bool>,
}

impl SkeletonGrid {
    pub fn from_mask(mask: &BinaryMask) -> Self {
        let on = mask.image().data().iter().map(|&v| v != 0).collect();
        Self {
            width: mask.width(),
            height: mask.height(),
            on,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.on.len()
    }

    pub fn is_on(&self, p: usize) -> bool {
        self.on[p]
    }

    pub fn coords(&self, p: usize) -> (usize, usize) {
        (p % self.width, p / self.width)
    }

    /// Linked neighbours of `p`, in clockwise order from north.
    pub fn links(&self, p: usize) -> impl Iterator<Item = usize> + '_ {
        let (x, y) = self.coords(p);
        RING.iter().filter_map(move |&(dx, dy)| {
            let q = self.offset(x, y, dx, dy)?;
            if !self.on[q] {
                return None;
            }
            if dx != 0 && dy != 0 {
                let side_x = self.offset(x, y, dx, 0).is_some_and(|s| self.on[s]);
                let side_y = self.offset(x, y, 0, dy).is_some_and(|s| self.on[s]);
                if side_x || side_y {
                    return None;
                }
            }
            Some(q)
        })
    }

    pub fn degree(&self, p: usize) -> usize {
        self.links(p).count()
    }

    /// Clears every linked component with fewer than `min_size` pixels.
    pub fn drop_small_components(&mut self, min_size: usize) {
        if min_size <= 1 {
            return;
        }

        let mut label = vec![false; self.on.len()];
        let mut stack = Vec::new();
        let mut component = Vec::new();
        for seed in 0..self.on.len() {
            if !self.on[seed] || label[seed] {
                continue;
            }

            label[seed] = true;
            stack.push(seed);
            component.clear();
            while let Some(p) = stack.pop() {
                component.push(p);
                for q in self.links(p) {
                    if !label[q] {
                        label[q] = true;
                        stack.push(q);
                    }
                }
            }

            if component.len() < min_size {
                for &p in &component {
                    self.on[p] = false;
                }
            }
        }
    }

    fn offset(&self, x: usize, y: usize, dx: isize, dy: isize) -> Option<usize> {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < self.width && ny < self.height).then(|| ny * self.width + nx)
    }
}

#[cfg(test)]
mod tests {
    use ht_morph::BinaryMask;

    use super::SkeletonGrid;

    fn grid(w: usize, h: usize, pixels: &[(usize, usize)]) -> SkeletonGrid {
        let mut mask = BinaryMask::new_empty(w, h);
        for &(x, y) in pixels {
            mask.set(x, y, true);
        }
        SkeletonGrid::from_mask(&mask)
    }

    #[test]
    fn covered_diagonals_are_not_links() {
        // L corner: the diagonal between the two arms is bridged by the corner.
        let g = grid(4, 4, &[(1, 1), (2, 1), (1, 2)]);
        assert_eq!(g.degree(5), 2);
        assert_eq!(g.degree(6), 1);
        assert_eq!(g.degree(9), 1);

        // Bare diagonal step links both ways.
        let g = grid(4, 4, &[(1, 1), (2, 2)]);
        assert_eq!(g.links(5).collect::<Vec<_>>(), vec![10]);
        assert_eq!(g.links(10).collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn links_are_clockwise_from_north_and_clipped_at_borders() {
        let g = grid(3, 3, &[(1, 0), (2, 1), (1, 2), (0, 1), (1, 1)]);
        assert_eq!(g.links(4).collect::<Vec<_>>(), vec![1, 5, 7, 3]);

        let corner = grid(2, 2, &[(0, 0), (1, 0)]);
        assert_eq!(corner.links(0).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn small_components_are_cleared() {
        let mut g = grid(8, 4, &[(0, 0), (4, 1), (5, 1), (6, 1)]);
        g.drop_small_components(2);
        assert!(!g.is_on(0));
        assert!(g.is_on(8 + 4) && g.is_on(8 + 5) && g.is_on(8 + 6));
    }
}
