use lyon_geom::{CubicBezierSegment, Point};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Turtle;
use crate::arc::ResolvedArc;

/// Output configuration for the VML encoding
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VmlConfig {
    /// Coordinates are multiplied by this and rounded to integers.
    ///
    /// VML only understands integer coordinates, so renderers scale the
    /// coordinate space up by the same factor to keep sub-unit detail.
    #[cfg_attr(feature = "serde", serde(default))]
    pub precision: Option<f64>,
}

/// Turtle graphics simulator for mapping path segments into VML path syntax
#[derive(Debug, Default)]
pub struct VmlTurtle {
    pub precision: Option<f64>,
    pub program: String,
}

impl VmlTurtle {
    pub fn new(config: &VmlConfig) -> Self {
        Self {
            precision: config.precision,
            program: String::new(),
        }
    }

    fn unit(&self, value: f64) -> f64 {
        match self.precision {
            // Halves round up, also for negatives. Adding zero turns -0 into 0
            Some(precision) => (value * precision + 0.5).floor() + 0.,
            None => value,
        }
    }

    fn push(&mut self, command: &str, values: impl IntoIterator<Item = f64>) {
        let values = values
            .into_iter()
            .map(|value| self.unit(value).to_string())
            .collect::<Vec<_>>();
        self.program.push_str(command);
        self.program.push_str(&values.join(","));
    }

    fn push_points(&mut self, command: &str, points: &[Point<f64>]) {
        self.push(command, points.iter().flat_map(|p| [p.x, p.y]));
    }
}

impl Turtle for VmlTurtle {
    fn move_to(&mut self, to: Point<f64>) {
        self.push_points("m", &[to]);
    }

    fn line_to(&mut self, to: Point<f64>) {
        self.push_points("l", &[to]);
    }

    fn cubic_bezier(&mut self, cbs: CubicBezierSegment<f64>) {
        self.push_points("c", &[cbs.ctrl1, cbs.ctrl2, cbs.to]);
    }

    /// `wa` (clockwise arc) and `at` (counter-clockwise arcto) take the ellipse's
    /// enclosing rectangle followed by the start and end points
    fn arc(&mut self, arc: ResolvedArc) {
        let ellipse = arc.ellipse;
        self.push(
            if arc.clockwise { "wa" } else { "at" },
            [
                ellipse.min.x,
                ellipse.min.y,
                ellipse.max.x,
                ellipse.max.y,
                arc.from.x,
                arc.from.y,
                arc.to.x,
                arc.to.y,
            ],
        );
    }

    fn close(&mut self) {
        self.program.push('x');
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use lyon_geom::point;
    use pretty_assertions::assert_eq;

    #[test]
    fn unscaled_coordinates_are_written_as_is() {
        let mut turtle = VmlTurtle::default();
        turtle.move_to(point(0.5, -2.));
        turtle.line_to(point(10., 10.25));
        turtle.cubic_bezier(CubicBezierSegment {
            from: point(10., 10.25),
            ctrl1: point(1., 2.),
            ctrl2: point(3., 4.),
            to: point(5., 6.),
        });
        turtle.close();
        assert_eq!(turtle.program, "m0.5,-2l10,10.25c1,2,3,4,5,6x");
    }

    #[test]
    fn precision_scales_and_rounds() {
        let mut turtle = VmlTurtle::new(&VmlConfig {
            precision: Some(10.),
        });
        turtle.move_to(point(0.125, -0.01));
        turtle.line_to(point(-1.06, 3.));
        assert_eq!(turtle.program, "m1,0l-11,30");
    }

    #[test]
    fn halves_round_towards_positive_infinity() {
        let mut turtle = VmlTurtle::new(&VmlConfig {
            precision: Some(10.),
        });
        turtle.move_to(point(-0.25, -0.05));
        turtle.line_to(point(0.25, 0.05));
        turtle.line_to(point(-1.5, -0.04));
        assert_eq!(turtle.program, "m-2,0l3,1l-15,0");
    }

    #[test]
    fn arc_direction_picks_the_command() {
        let arc = crate::arc::resolve(&lyon_geom::SvgArc {
            from: point(0., 0.),
            to: point(20., 0.),
            radii: lyon_geom::vector(10., 10.),
            x_rotation: euclid::Angle::zero(),
            flags: lyon_geom::ArcFlags {
                large_arc: false,
                sweep: true,
            },
        })
        .unwrap();

        let mut turtle = VmlTurtle::default();
        turtle.arc(arc);
        turtle.arc(ResolvedArc {
            clockwise: false,
            ..arc
        });
        assert_eq!(turtle.program, "wa0,-10,20,10,0,0,20,0at0,-10,20,10,0,0,20,0");
    }

    #[test]
    #[cfg(feature = "serde")]
    fn serde_vml_config_is_correct() {
        let default_struct = VmlConfig::default();
        let default_json = "{\"precision\":null}";
        assert_eq!(
            serde_json::to_string(&default_struct).unwrap(),
            default_json
        );
        assert_eq!(
            serde_json::from_str::<VmlConfig>("{}").unwrap(),
            default_struct
        );
        assert_eq!(
            serde_json::from_str::<VmlConfig>("{\"precision\":100.0}").unwrap(),
            VmlConfig {
                precision: Some(100.)
            }
        );
    }
}
