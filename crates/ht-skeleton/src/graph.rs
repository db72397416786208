use ht_core::{Point2f, Polyline2f, PolylineSet};

pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Stroke tip, one link.
    End,
    /// Three or more links.
    Junction,
    /// A lone pixel.
    Isolated,
    /// First pixel, in row-major order, of a closed stroke with no tips or
    /// junctions.
    LoopAnchor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonNode {
    pub kind: NodeKind,
    /// Pixel column and row.
    pub pixel: (usize, usize),
    pub degree: usize,
}

impl SkeletonNode {
    pub fn point(&self) -> Point2f {
        Point2f::from_pixel(self.pixel.0, self.pixel.1)
    }
}

/// Run of skeleton pixels between two nodes, both node pixels included.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub from: NodeId,
    pub to: NodeId,
    pub polyline: Polyline2f,
}

impl Branch {
    pub fn is_closed(&self) -> bool {
        self.from == self.to
    }
}

/// Nodes in row-major order of their pixels (loop anchors last), branches in
/// the order they were walked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkeletonGraph {
    pub width: usize,
    pub height: usize,
    pub nodes: Vec<SkeletonNode>,
    pub branches: Vec<Branch>,
}

impl SkeletonGraph {
    pub fn num_junctions(&self) -> usize {
        self.count_kind(NodeKind::Junction)
    }

    pub fn num_ends(&self) -> usize {
        self.count_kind(NodeKind::End)
    }

    /// Branch polylines in walk order, then one single-point polyline per
    /// isolated pixel.
    pub fn to_polyline_set(&self) -> PolylineSet {
        let lines = self.branches.iter().map(|b| b.polyline.clone());
        let dots = self
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Isolated)
            .map(|n| Polyline2f::new(vec![n.point()]));

        lines.chain(dots).collect()
    }

    fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }
}
