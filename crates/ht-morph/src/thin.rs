use log::debug;

use crate::mask::BinaryMask;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThinConfig {
    /// Upper bound on full (two sub-pass) iterations.
    pub max_iterations: usize,
}

impl Default for ThinConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1024,
        }
    }
}

/// Zhang-Suen thinning of the mask foreground.
///
/// Pixels outside the image are background. Iterates until no pixel is
/// removed or `max_iterations` is reached.
pub fn thin_zhang_suen(mask: &BinaryMask, cfg: &ThinConfig) -> BinaryMask {
    let width = mask.width();
    let height = mask.height();
    if width == 0 || height == 0 {
        return mask.clone();
    }

    let mut on: Vec<u8> = mask
        .image()
        .data()
        .iter()
        .map(|&v| u8::from(v != 0))
        .collect();
    let mut to_clear = Vec::new();

    let mut iterations = 0usize;
    while iterations < cfg.max_iterations {
        iterations += 1;

        let removed_a = sub_pass(&mut on, width, height, SubPass::First, &mut to_clear);
        let removed_b = sub_pass(&mut on, width, height, SubPass::Second, &mut to_clear);
        if removed_a + removed_b == 0 {
            break;
        }
    }

    debug!("zhang-suen thinning on {width}x{height} converged after {iterations} iterations");

    let mut out = BinaryMask::new_empty(width, height);
    for (i, &v) in on.iter().enumerate() {
        if v != 0 {
            out.set(i % width, i / width, true);
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubPass {
    First,
    Second,
}

fn sub_pass(
    on: &mut [u8],
    width: usize,
    height: usize,
    pass: SubPass,
    to_clear: &mut Vec<usize>,
) -> usize {
    to_clear.clear();

    for y in 0..height {
        for x in 0..width {
            let p = y * width + x;
            if on[p] == 0 {
                continue;
            }

            let n = neighbors(on, x, y, width, height);
            let b: u8 = n.iter().sum();
            if !(2..=6).contains(&b) {
                continue;
            }
            if transitions(&n) != 1 {
                continue;
            }

            // n = [P2, P3, P4, P5, P6, P7, P8, P9]
            let (p2, p4, p6, p8) = (n[0], n[2], n[4], n[6]);
            let removable = match pass {
                SubPass::First => p2 * p4 * p6 == 0 && p4 * p6 * p8 == 0,
                SubPass::Second => p2 * p4 * p8 == 0 && p2 * p6 * p8 == 0,
            };
            if removable {
                to_clear.push(p);
            }
        }
    }

    for &p in to_clear.iter() {
        on[p] = 0;
    }
    to_clear.len()
}

/// Clockwise neighbourhood starting north: P2 (N), P3 (NE) ... P9 (NW).
#[inline]
fn neighbors(on: &[u8], x: usize, y: usize, width: usize, height: usize) -> [u8; 8] {
    const OFFSETS: [(isize, isize); 8] = [
        (0, -1),
        (1, -1),
        (1, 0),
        (1, 1),
        (0, 1),
        (-1, 1),
        (-1, 0),
        (-1, -1),
    ];

    let mut out = [0u8; 8];
    for (slot, (dx, dy)) in out.iter_mut().zip(OFFSETS) {
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
            continue;
        }
        *slot = on[ny as usize * width + nx as usize];
    }
    out
}

/// Number of 0 -> 1 transitions in the cyclic sequence P2..P9, P2.
#[inline]
fn transitions(n: &[u8; 8]) -> usize {
    (0..8).filter(|&i| n[i] == 0 && n[(i + 1) % 8] == 1).count()
}

#[cfg(test)]
mod tests {
    use super::{ThinConfig, thin_zhang_suen, transitions};
    use crate::BinaryMask;

    fn filled_rect(w: usize, h: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> BinaryMask {
        let mut mask = BinaryMask::new_empty(w, h);
        for y in y0..=y1 {
            for x in x0..=x1 {
                mask.set(x, y, true);
            }
        }
        mask
    }

    fn column_count(mask: &BinaryMask, x: usize) -> usize {
        (0..mask.height()).filter(|&y| mask.is_set(x, y)).count()
    }

    #[test]
    fn transitions_counts_cyclic_rises() {
        assert_eq!(transitions(&[0, 0, 1, 0, 0, 0, 1, 0]), 2);
        assert_eq!(transitions(&[1, 1, 1, 0, 0, 0, 0, 0]), 1);
        assert_eq!(transitions(&[0; 8]), 0);
        assert_eq!(transitions(&[1; 8]), 0);
    }

    #[test]
    fn thick_bar_collapses_to_single_pixel_rows() {
        let mask = filled_rect(40, 15, 5, 5, 34, 9);
        let thin = thin_zhang_suen(&mask, &ThinConfig::default());

        assert!(thin.count_foreground() > 0);
        for x in 10..=29 {
            assert_eq!(column_count(&thin, x), 1, "column {x} should be one pixel");
        }
        for y in 0..thin.height() {
            for x in 0..thin.width() {
                if thin.is_set(x, y) {
                    assert!(mask.is_set(x, y), "skeleton must stay inside the stroke");
                }
            }
        }
    }

    #[test]
    fn one_pixel_line_is_a_fixed_point() {
        let mask = filled_rect(20, 5, 2, 2, 17, 2);
        let thin = thin_zhang_suen(&mask, &ThinConfig::default());
        assert_eq!(thin, mask);
    }

    #[test]
    fn separate_strokes_stay_separate() {
        let mut mask = filled_rect(40, 30, 3, 3, 36, 7);
        for y in 18..=22 {
            for x in 3..=36 {
                mask.set(x, y, true);
            }
        }

        let thin = thin_zhang_suen(&mask, &ThinConfig::default());
        let top = (0..=12)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .filter(|&(x, y)| thin.is_set(x, y))
            .count();
        let bottom = (13..30)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .filter(|&(x, y)| thin.is_set(x, y))
            .count();
        assert!(top > 0);
        assert!(bottom > 0);
    }

    #[test]
    fn empty_and_zero_sized_masks() {
        let empty = BinaryMask::new_empty(8, 8);
        assert_eq!(thin_zhang_suen(&empty, &ThinConfig::default()), empty);

        let zero = BinaryMask::new_empty(0, 0);
        assert_eq!(thin_zhang_suen(&zero, &ThinConfig::default()), zero);
    }

    #[test]
    fn iteration_cap_is_respected() {
        let mask = filled_rect(30, 30, 2, 2, 27, 27);
        let capped = thin_zhang_suen(&mask, &ThinConfig { max_iterations: 1 });
        let full = thin_zhang_suen(&mask, &ThinConfig::default());
        assert!(capped.count_foreground() > full.count_foreground());
    }
}
