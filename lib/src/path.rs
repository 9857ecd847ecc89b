use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use log::debug;

use crate::command::{self, Command};
use crate::extrapolate::{apply_path, extrapolate};
use crate::parse::{ParseError, parse};
use crate::turtle::{BoundingBox, Terrarium, Turtle, VmlConfig};

/// Output of one evaluation pass, tied to the precision it was computed with
#[derive(Debug, Clone, PartialEq)]
struct Extrapolated {
    config: VmlConfig,
    vml: String,
    bounding_box: BoundingBox,
}

/// An ordered list of drawing commands with lazily computed encodings.
///
/// Every mutation clears the memoized outputs; they are recomputed on the next read.
/// Built either by parsing path data or by chaining drawing calls:
///
/// ```
/// use svg2vml::Path;
///
/// let mut path = Path::new();
/// path.move_by(50., 0.)
///     .line(50., 100.)
///     .line(-100., 0.)
///     .line(50., -100.)
///     .close();
///
/// assert_eq!(path.to_svg(), "m 50 0 l 50 100 l -100 0 l 50 -100 z");
/// assert_eq!(path.measure(None).width, 100.);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Path {
    commands: Vec<Command>,
    svg: OnceLock<String>,
    extrapolated: OnceLock<Extrapolated>,
}

/// Radius defaults for the arc helpers: an unset or zero `rx` falls back to `x`,
/// an unset or zero `ry` to `rx` and then to `y`
fn arc_radii(x: f64, y: f64, rx: Option<f64>, ry: Option<f64>) -> (f64, f64) {
    let rx = rx.filter(|r| *r != 0.);
    let ry = ry.filter(|r| *r != 0.);
    (rx.unwrap_or(x).abs(), ry.or(rx).unwrap_or(y).abs())
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(data: &str) -> Result<Self, ParseError> {
        parse(data).map(Self::from_iter)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn invalidate(&mut self) {
        self.svg.take();
        self.extrapolated.take();
    }

    fn push(&mut self, command: Command) -> &mut Self {
        self.invalidate();
        self.commands.push(command);
        self
    }

    /// Clears every command
    pub fn reset(&mut self) -> &mut Self {
        self.invalidate();
        self.commands.clear();
        self
    }

    /// Starts a new subpath, relative to the current point
    pub fn move_by(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(Command::MoveTo { abs: false, x, y })
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(Command::MoveTo { abs: true, x, y })
    }

    pub fn line(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(Command::LineTo { abs: false, x, y })
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(Command::LineTo { abs: true, x, y })
    }

    /// Cubic curve with both control points and the end point relative to the current point
    pub fn bezier(
        &mut self,
        c1x: f64,
        c1y: f64,
        c2x: f64,
        c2y: f64,
        ex: f64,
        ey: f64,
    ) -> &mut Self {
        self.push(Command::CubicCurveTo {
            abs: false,
            x1: c1x,
            y1: c1y,
            x2: c2x,
            y2: c2y,
            x: ex,
            y: ey,
        })
    }

    pub fn bezier_to(
        &mut self,
        c1x: f64,
        c1y: f64,
        c2x: f64,
        c2y: f64,
        ex: f64,
        ey: f64,
    ) -> &mut Self {
        self.push(Command::CubicCurveTo {
            abs: true,
            x1: c1x,
            y1: c1y,
            x2: c2x,
            y2: c2y,
            x: ex,
            y: ey,
        })
    }

    pub fn quadratic(&mut self, cx: f64, cy: f64, ex: f64, ey: f64) -> &mut Self {
        self.push(Command::QuadraticCurveTo {
            abs: false,
            x1: cx,
            y1: cy,
            x: ex,
            y: ey,
        })
    }

    pub fn quadratic_to(&mut self, cx: f64, cy: f64, ex: f64, ey: f64) -> &mut Self {
        self.push(Command::QuadraticCurveTo {
            abs: true,
            x1: cx,
            y1: cy,
            x: ex,
            y: ey,
        })
    }

    /// Quadratic curve whose control point mirrors the previous one
    pub fn smooth_quadratic(&mut self, ex: f64, ey: f64) -> &mut Self {
        self.push(Command::SmoothQuadraticTo {
            abs: false,
            x: ex,
            y: ey,
        })
    }

    pub fn smooth_quadratic_to(&mut self, ex: f64, ey: f64) -> &mut Self {
        self.push(Command::SmoothQuadraticTo {
            abs: true,
            x: ex,
            y: ey,
        })
    }

    fn push_arc(
        &mut self,
        abs: bool,
        x: f64,
        y: f64,
        (rx, ry): (f64, f64),
        large_arc: bool,
        sweep: bool,
    ) -> &mut Self {
        self.push(Command::ArcTo {
            abs,
            rx,
            ry,
            x_axis_rotation: 0.,
            large_arc,
            sweep,
            x,
            y,
        })
    }

    /// Clockwise arc to a point relative to the current point
    pub fn arc<RX, RY>(&mut self, x: f64, y: f64, rx: RX, ry: RY, large: bool) -> &mut Self
    where
        RX: Into<Option<f64>>,
        RY: Into<Option<f64>>,
    {
        let radii = arc_radii(x, y, rx.into(), ry.into());
        self.push_arc(false, x, y, radii, large, true)
    }

    pub fn arc_to<RX, RY>(&mut self, x: f64, y: f64, rx: RX, ry: RY, large: bool) -> &mut Self
    where
        RX: Into<Option<f64>>,
        RY: Into<Option<f64>>,
    {
        let radii = arc_radii(x, y, rx.into(), ry.into());
        self.push_arc(true, x, y, radii, large, true)
    }

    /// Counter-clockwise arc to a point relative to the current point
    pub fn counter_arc<RX, RY>(
        &mut self,
        x: f64,
        y: f64,
        rx: RX,
        ry: RY,
        large: bool,
    ) -> &mut Self
    where
        RX: Into<Option<f64>>,
        RY: Into<Option<f64>>,
    {
        let radii = arc_radii(x, y, rx.into(), ry.into());
        self.push_arc(false, x, y, radii, large, false)
    }

    pub fn counter_arc_to<RX, RY>(
        &mut self,
        x: f64,
        y: f64,
        rx: RX,
        ry: RY,
        large: bool,
    ) -> &mut Self
    where
        RX: Into<Option<f64>>,
        RY: Into<Option<f64>>,
    {
        let radii = arc_radii(x, y, rx.into(), ry.into());
        self.push_arc(true, x, y, radii, large, false)
    }

    pub fn close(&mut self) -> &mut Self {
        self.push(Command::ClosePath { abs: false })
    }

    /// The commands in path-data syntax, without any evaluation
    pub fn to_svg(&self) -> &str {
        self.svg.get_or_init(|| command::encode(&self.commands))
    }

    fn extrapolated(&self, config: VmlConfig) -> &Extrapolated {
        self.extrapolated.get_or_init(|| {
            let (vml, bounding_box) = extrapolate(&self.commands, &config);
            Extrapolated {
                config,
                vml,
                bounding_box,
            }
        })
    }

    /// The commands re-encoded for VML, optionally scaled to integer coordinates.
    ///
    /// Only the encoding for the first precision asked for is memoized.
    pub fn to_vml(&self, precision: impl Into<Option<f64>>) -> Cow<'_, str> {
        let config = VmlConfig {
            precision: precision.into(),
        };
        let extrapolated = self.extrapolated(config.clone());
        if extrapolated.config == config {
            Cow::Borrowed(&extrapolated.vml)
        } else {
            debug!(
                "VML requested with {:?}, memoized with {:?}",
                config, extrapolated.config
            );
            Cow::Owned(extrapolate(&self.commands, &config).0)
        }
    }

    /// Exact bounding box of the path in its own units, whatever the precision.
    ///
    /// The precision only matters for the VML encoding memoized alongside.
    pub fn measure(&self, precision: impl Into<Option<f64>>) -> BoundingBox {
        let config = VmlConfig {
            precision: precision.into(),
        };
        self.extrapolated(config).bounding_box
    }

    /// Union of the bounding boxes of every non-empty path
    pub fn measure_all<'a>(paths: impl IntoIterator<Item = &'a Path>) -> BoundingBox {
        paths
            .into_iter()
            .filter(|path| !path.is_empty())
            .map(|path| path.measure(None))
            .reduce(|acc, bounding_box| acc.union(&bounding_box))
            .unwrap_or_default()
    }

    /// Drives a [Turtle] over the path, returning it when done
    pub fn visit<T: Turtle>(&self, turtle: T) -> T {
        let mut terrarium = Terrarium::new(turtle);
        apply_path(&mut terrarium, &self.commands);
        terrarium.turtle
    }
}

/// Paths are equal when their commands are
impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.commands == other.commands
    }
}

impl FromIterator<Command> for Path {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        Self {
            commands: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl FromStr for Path {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_svg())
    }
}
