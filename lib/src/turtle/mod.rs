use std::fmt::Debug;

use euclid::Angle;
use log::warn;
use lyon_geom::{ArcFlags, CubicBezierSegment, Point, SvgArc, Vector, point};

use crate::arc::{self, ResolvedArc};

mod bounds;
mod vml;
pub use self::bounds::{BoundingBox, BoundsTurtle};
pub use self::vml::{VmlConfig, VmlTurtle};

/// Abstraction based on [Turtle graphics](https://en.wikipedia.org/wiki/Turtle_graphics)
///
/// All points are absolute. Quadratic curves arrive already promoted to cubics.
pub trait Turtle: Debug {
    fn move_to(&mut self, to: Point<f64>);
    fn line_to(&mut self, to: Point<f64>);
    fn cubic_bezier(&mut self, cbs: CubicBezierSegment<f64>);
    fn arc(&mut self, arc: ResolvedArc);
    fn close(&mut self);
}

/// Wrapper for [Turtle] that tracks the current point, subpath start and
/// reflected control points. See <https://www.w3.org/TR/SVG/paths.html>
#[derive(Debug)]
pub struct Terrarium<T: Turtle> {
    pub turtle: T,
    current_position: Point<f64>,
    /// Where a close jumps back to, unset until the subpath draws or moves
    initial_position: Option<Point<f64>>,
    previous_quadratic_control: Option<Point<f64>>,
    previous_cubic_control: Option<Point<f64>>,
}

impl<T: Turtle> Terrarium<T> {
    /// Create a turtle at the origin
    pub fn new(turtle: T) -> Self {
        Self {
            turtle,
            current_position: Point::zero(),
            initial_position: None,
            previous_quadratic_control: None,
            previous_cubic_control: None,
        }
    }

    pub fn current_position(&self) -> Point<f64> {
        self.current_position
    }

    /// Resolves absolute/relative coordinates against the current position.
    /// A missing coordinate stays where the turtle is.
    fn resolve<X, Y>(&self, abs: bool, x: X, y: Y) -> Point<f64>
    where
        X: Into<Option<f64>>,
        Y: Into<Option<f64>>,
    {
        let current = self.current_position;
        let x = x
            .into()
            .map(|x| if abs { x } else { current.x + x })
            .unwrap_or(current.x);
        let y = y
            .into()
            .map(|y| if abs { y } else { current.y + y })
            .unwrap_or(current.y);
        point(x, y)
    }

    fn resolve_point(&self, abs: bool, p: Point<f64>) -> Point<f64> {
        self.resolve(abs, p.x, p.y)
    }

    /// Drawing without a preceding move opens an implicit subpath here
    fn begin_subpath(&mut self) {
        if self.initial_position.is_none() {
            self.initial_position = Some(self.current_position);
        }
    }

    /// See <https://www.w3.org/TR/SVG/paths.html#ReflectedControlPoints>
    fn reflect(&self, ctrl: Point<f64>) -> Point<f64> {
        point(
            2. * self.current_position.x - ctrl.x,
            2. * self.current_position.y - ctrl.y,
        )
    }

    /// Move the turtle to the given absolute/relative coordinates, starting a new subpath
    /// https://www.w3.org/TR/SVG/paths.html#PathDataMovetoCommands
    pub fn move_to(&mut self, abs: bool, x: f64, y: f64) {
        let to = self.resolve(abs, x, y);
        self.current_position = to;
        self.initial_position = Some(to);
        self.previous_quadratic_control = None;
        self.previous_cubic_control = None;
        self.turtle.move_to(to);
    }

    /// Close the subpath, cutting back to its initial position.
    /// A close with no open subpath opens and closes one at the current position.
    /// https://www.w3.org/TR/SVG/paths.html#PathDataClosePathCommand
    pub fn close(&mut self) {
        self.begin_subpath();
        self.turtle.close();
        if let Some(initial_position) = self.initial_position.take() {
            self.current_position = initial_position;
            self.turtle.move_to(initial_position);
        }
        self.previous_quadratic_control = None;
        self.previous_cubic_control = None;
    }

    /// Draw a line from the current position to the specified position
    /// https://www.w3.org/TR/SVG/paths.html#PathDataLinetoCommands
    pub fn line<X, Y>(&mut self, abs: bool, x: X, y: Y)
    where
        X: Into<Option<f64>>,
        Y: Into<Option<f64>>,
    {
        self.begin_subpath();
        let to = self.resolve(abs, x, y);
        self.current_position = to;
        self.previous_quadratic_control = None;
        self.previous_cubic_control = None;
        self.turtle.line_to(to);
    }

    fn draw_cubic(&mut self, ctrl1: Point<f64>, ctrl2: Point<f64>, to: Point<f64>) {
        let cbs = CubicBezierSegment {
            from: self.current_position,
            ctrl1,
            ctrl2,
            to,
        };
        self.current_position = to;
        self.turtle.cubic_bezier(cbs);
    }

    /// Draw a cubic curve from the current point to `to` with the given control points
    /// https://www.w3.org/TR/SVG/paths.html#PathDataCubicBezierCommands
    pub fn cubic_bezier(&mut self, abs: bool, ctrl1: Point<f64>, ctrl2: Point<f64>, to: Point<f64>) {
        self.begin_subpath();
        let ctrl1 = self.resolve_point(abs, ctrl1);
        let ctrl2 = self.resolve_point(abs, ctrl2);
        let to = self.resolve_point(abs, to);
        self.draw_cubic(ctrl1, ctrl2, to);

        self.previous_cubic_control = Some(self.reflect(ctrl2));
        self.previous_quadratic_control = None;
    }

    /// Draw a shorthand/smooth cubic curve, where the first control point is the
    /// reflection of the previous curve's second one, or the current point if
    /// the previous command was not a cubic curve
    pub fn smooth_cubic_bezier(&mut self, abs: bool, ctrl2: Point<f64>, to: Point<f64>) {
        self.begin_subpath();
        let ctrl1 = self
            .previous_cubic_control
            .unwrap_or(self.current_position);
        let ctrl2 = self.resolve_point(abs, ctrl2);
        let to = self.resolve_point(abs, to);
        self.draw_cubic(ctrl1, ctrl2, to);

        self.previous_cubic_control = Some(self.reflect(ctrl2));
        self.previous_quadratic_control = None;
    }

    /// Draw a quadratic curve as a cubic whose control points both sit on the
    /// quadratic control point
    /// https://www.w3.org/TR/SVG/paths.html#PathDataQuadraticBezierCommands
    pub fn quadratic_bezier(&mut self, abs: bool, ctrl: Point<f64>, to: Point<f64>) {
        self.begin_subpath();
        let ctrl = self.resolve_point(abs, ctrl);
        let to = self.resolve_point(abs, to);
        self.draw_cubic(ctrl, ctrl, to);

        self.previous_quadratic_control = Some(self.reflect(ctrl));
        self.previous_cubic_control = None;
    }

    /// Draw a shorthand/smooth quadratic curve, where the control point is reflected
    /// from the previous quadratic curve
    pub fn smooth_quadratic_bezier(&mut self, abs: bool, to: Point<f64>) {
        self.begin_subpath();
        let ctrl = self
            .previous_quadratic_control
            .unwrap_or(self.current_position);
        let to = self.resolve_point(abs, to);
        self.draw_cubic(ctrl, ctrl, to);

        self.previous_quadratic_control = Some(self.reflect(ctrl));
        self.previous_cubic_control = None;
    }

    /// Draw an elliptical arc segment, or a line when the arc is degenerate
    /// https://www.w3.org/TR/SVG/paths.html#PathDataEllipticalArcCommands
    pub fn elliptical(
        &mut self,
        abs: bool,
        radii: Vector<f64>,
        x_rotation: Angle<f64>,
        flags: ArcFlags,
        to: Point<f64>,
    ) {
        self.begin_subpath();
        let to = self.resolve_point(abs, to);
        if x_rotation.radians != 0. {
            warn!(
                "Arc x-axis rotation of {}° cannot be encoded, drawing it unrotated",
                x_rotation.to_degrees()
            );
        }
        let svg_arc = SvgArc {
            from: self.current_position,
            to,
            radii,
            x_rotation,
            flags,
        };

        self.current_position = to;
        self.previous_quadratic_control = None;
        self.previous_cubic_control = None;

        match arc::resolve(&svg_arc) {
            Some(resolved) => self.turtle.arc(resolved),
            None => self.turtle.line_to(to),
        }
    }
}
