use ht_core::{Point2f, Polyline2f, PolylineSet};
use ht_morph::{BinaryMask, ThinConfig, thin_zhang_suen};
use log::debug;

use crate::graph::{Branch, NodeId, NodeKind, SkeletonGraph, SkeletonNode};
use crate::grid::SkeletonGrid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonConfig {
    /// Skeleton components with fewer pixels are dropped before tracing.
    pub min_component_size: usize,
    pub thin: ThinConfig,
}

impl Default for SkeletonConfig {
    fn default() -> Self {
        Self {
            min_component_size: 1,
            thin: ThinConfig::default(),
        }
    }
}

/// Thins the mask foreground and traces the skeleton into polylines.
pub fn extract(mask: &BinaryMask, cfg: &SkeletonConfig) -> PolylineSet {
    let skeleton = thin_zhang_suen(mask, &cfg.thin);
    let graph = trace_skeleton(&skeleton, cfg);
    let set = graph.to_polyline_set();
    debug!(
        "skeleton: {} nodes ({} junctions, {} ends), {} polylines, {} points",
        graph.nodes.len(),
        graph.num_junctions(),
        graph.num_ends(),
        set.num_polylines(),
        set.num_points()
    );
    set
}

/// Splits an already one-pixel-wide skeleton into branches.
///
/// Pixels with other than two links are nodes. Every run of two-link pixels
/// leaving a node is walked until the next node and becomes one branch, so
/// branches meeting at a junction share its pixel. Closed strokes without
/// nodes get a [`NodeKind::LoopAnchor`] at their first row-major pixel and a
/// branch that starts and ends there.
pub fn trace_skeleton(skeleton: &BinaryMask, cfg: &SkeletonConfig) -> SkeletonGraph {
    let mut grid = SkeletonGrid::from_mask(skeleton);
    grid.drop_small_components(cfg.min_component_size);
    Tracer::new(&grid).run()
}

struct Tracer<'a> {
    grid: &'a SkeletonGrid,
    node_at: Vec<Option<NodeId>>,
    /// Two-link pixels already part of a branch.
    walked: Vec<bool>,
    nodes: Vec<SkeletonNode>,
    branches: Vec<Branch>,
}

impl<'a> Tracer<'a> {
    fn new(grid: &'a SkeletonGrid) -> Self {
        let mut tracer = Self {
            grid,
            node_at: vec![None; grid.len()],
            walked: vec![false; grid.len()],
            nodes: Vec::new(),
            branches: Vec::new(),
        };

        for p in 0..grid.len() {
            if !grid.is_on(p) {
                continue;
            }
            let kind = match grid.degree(p) {
                0 => NodeKind::Isolated,
                1 => NodeKind::End,
                2 => continue,
                _ => NodeKind::Junction,
            };
            tracer.add_node(p, kind);
        }
        tracer
    }

    fn run(mut self) -> SkeletonGraph {
        let grid = self.grid;

        for id in 0..self.nodes.len() {
            let (x, y) = self.nodes[id].pixel;
            let start = y * grid.width() + x;

            for next in grid.links(start) {
                match self.node_at[next] {
                    // Adjacent nodes: one two-pixel branch, emitted from the
                    // lower id.
                    Some(other) if other > id => self.add_branch(id, other, vec![start, next]),
                    Some(_) => {}
                    None if self.walked[next] => {}
                    None => {
                        let (pixels, end) = self.walk(start, next);
                        self.add_branch(id, end, pixels);
                    }
                }
            }
        }

        for p in 0..grid.len() {
            if !grid.is_on(p) || self.node_at[p].is_some() || self.walked[p] {
                continue;
            }
            let anchor = self.add_node(p, NodeKind::LoopAnchor);
            if let Some(next) = grid.links(p).next() {
                let (pixels, end) = self.walk(p, next);
                self.add_branch(anchor, end, pixels);
            }
        }

        SkeletonGraph {
            width: grid.width(),
            height: grid.height(),
            nodes: self.nodes,
            branches: self.branches,
        }
    }

    /// Follows two-link pixels from node pixel `start` through `next` up to
    /// and including the next node pixel.
    fn walk(&mut self, start: usize, next: usize) -> (Vec<usize>, NodeId) {
        let grid = self.grid;
        let mut pixels = vec![start];
        let (mut prev, mut cur) = (start, next);

        loop {
            pixels.push(cur);
            if let Some(id) = self.node_at[cur] {
                return (pixels, id);
            }
            self.walked[cur] = true;

            let Some(step) = grid.links(cur).find(|&q| q != prev) else {
                break;
            };
            prev = cur;
            cur = step;
        }

        // Only reachable on a malformed grid; close the branch at `cur`.
        let end = self.add_node(cur, NodeKind::End);
        (pixels, end)
    }

    fn add_node(&mut self, p: usize, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        self.node_at[p] = Some(id);
        self.nodes.push(SkeletonNode {
            kind,
            pixel: self.grid.coords(p),
            degree: self.grid.degree(p),
        });
        id
    }

    fn add_branch(&mut self, from: NodeId, to: NodeId, pixels: Vec<usize>) {
        let points = pixels
            .into_iter()
            .map(|p| {
                let (x, y) = self.grid.coords(p);
                Point2f::from_pixel(x, y)
            })
            .collect();
        self.branches.push(Branch {
            from,
            to,
            polyline: Polyline2f::new(points),
        });
    }
}
