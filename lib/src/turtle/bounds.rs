use lyon_geom::{Box2D, CubicBezierSegment, Point};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Turtle;
use crate::arc::ResolvedArc;

/// Axis-aligned extent of a path in its own (unscaled) units
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Smallest box containing both
    pub fn union(&self, other: &Self) -> Self {
        Self::from_edges(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }
}

impl From<Box2D<f64>> for BoundingBox {
    fn from(b: Box2D<f64>) -> Self {
        Self::from_edges(b.min.x, b.min.y, b.max.x, b.max.y)
    }
}

/// Wrapper turtle that records the extent of what is drawn through it
///
/// Curves only contribute their endpoints, not their control points or the
/// extrema between them. Arcs contribute the extrema they actually pass.
#[derive(Debug, Default)]
pub struct BoundsTurtle<T: Turtle> {
    pub bounds: Option<Box2D<f64>>,
    pub inner: T,
}

impl<T: Turtle> BoundsTurtle<T> {
    pub fn new(inner: T) -> Self {
        Self {
            bounds: None,
            inner,
        }
    }

    /// Grows by corner points, since a single point is an empty [Box2D] that `union` would skip
    fn include(&mut self, other: Box2D<f64>) {
        self.bounds = Some(match self.bounds {
            Some(bounds) => Box2D::from_points([bounds.min, bounds.max, other.min, other.max]),
            None => other,
        });
    }

    fn include_point(&mut self, p: Point<f64>) {
        self.include(Box2D::new(p, p));
    }

    /// The all-zero box when nothing was drawn
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds.map(BoundingBox::from).unwrap_or_default()
    }
}

impl<T: Turtle> Turtle for BoundsTurtle<T> {
    fn move_to(&mut self, to: Point<f64>) {
        self.include_point(to);
        self.inner.move_to(to)
    }

    fn line_to(&mut self, to: Point<f64>) {
        self.include_point(to);
        self.inner.line_to(to)
    }

    fn cubic_bezier(&mut self, cbs: CubicBezierSegment<f64>) {
        self.include_point(cbs.to);
        self.inner.cubic_bezier(cbs)
    }

    fn arc(&mut self, arc: ResolvedArc) {
        self.include(arc.bounds);
        self.inner.arc(arc)
    }

    fn close(&mut self) {
        self.inner.close()
    }
}
