use core::ops::Sub;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2f {
    pub x: f32,
    pub y: f32,
}

impl Point2f {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Center of the integer pixel `(x, y)`.
    pub fn from_pixel(x: usize, y: usize) -> Self {
        Self {
            x: x as f32,
            y: y as f32,
        }
    }

    pub fn distance(self, other: Self) -> f32 {
        (self - other).norm()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2f {
    pub x: f32,
    pub y: f32,
}

impl Vec2f {
    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    pub fn norm(self) -> f32 {
        self.dot(self).sqrt()
    }
}

impl Sub<Point2f> for Point2f {
    type Output = Vec2f;

    fn sub(self, rhs: Point2f) -> Self::Output {
        Vec2f {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline2f {
    pub points: Vec<Point2f>,
}

impl Polyline2f {
    pub fn new(points: Vec<Point2f>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn arc_length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

impl From<Vec<Point2f>> for Polyline2f {
    fn from(points: Vec<Point2f>) -> Self {
        Self { points }
    }
}

/// Unordered collection of skeleton branches extracted from one image.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolylineSet {
    pub polylines: Vec<Polyline2f>,
}

impl PolylineSet {
    pub fn new(polylines: Vec<Polyline2f>) -> Self {
        Self { polylines }
    }

    pub fn num_polylines(&self) -> usize {
        self.polylines.len()
    }

    pub fn num_points(&self) -> usize {
        self.polylines.iter().map(Polyline2f::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.num_points() == 0
    }

    /// Every point of every polyline, polylines in order, points in order.
    pub fn iter_points(&self) -> impl Iterator<Item = Point2f> + '_ {
        self.polylines.iter().flat_map(|p| p.points.iter().copied())
    }

    pub fn push(&mut self, polyline: Polyline2f) {
        self.polylines.push(polyline);
    }
}

impl FromIterator<Polyline2f> for PolylineSet {
    fn from_iter<I: IntoIterator<Item = Polyline2f>>(iter: I) -> Self {
        Self {
            polylines: iter.into_iter().collect(),
        }
    }
}
