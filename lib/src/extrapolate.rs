use euclid::Angle;
use log::debug;
use lyon_geom::{ArcFlags, point, vector};

use crate::command::Command;
use crate::turtle::{BoundingBox, BoundsTurtle, Terrarium, Turtle, VmlConfig, VmlTurtle};

/// Maps [Command]s into concrete operations on the [Terrarium]
pub fn apply_path<'a, T: Turtle>(
    terrarium: &mut Terrarium<T>,
    commands: impl IntoIterator<Item = &'a Command>,
) {
    use Command::*;

    commands.into_iter().for_each(|command| {
        debug!("Drawing {:?}", command);
        match *command {
            MoveTo { abs, x, y } => terrarium.move_to(abs, x, y),
            ClosePath { abs: _ } => {
                // Ignore abs, should have identical effect: [9.3.4. The "closepath" command]("https://www.w3.org/TR/SVG/paths.html#PathDataClosePathCommand)
                terrarium.close()
            }
            LineTo { abs, x, y } => terrarium.line(abs, x, y),
            HorizontalLineTo { abs, x } => terrarium.line(abs, x, None),
            VerticalLineTo { abs, y } => terrarium.line(abs, None, y),
            CubicCurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => terrarium.cubic_bezier(abs, point(x1, y1), point(x2, y2), point(x, y)),
            SmoothCurveTo { abs, x2, y2, x, y } => {
                terrarium.smooth_cubic_bezier(abs, point(x2, y2), point(x, y))
            }
            QuadraticCurveTo { abs, x1, y1, x, y } => {
                terrarium.quadratic_bezier(abs, point(x1, y1), point(x, y))
            }
            SmoothQuadraticTo { abs, x, y } => {
                terrarium.smooth_quadratic_bezier(abs, point(x, y))
            }
            ArcTo {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => terrarium.elliptical(
                abs,
                vector(rx, ry),
                Angle::degrees(x_axis_rotation),
                ArcFlags { large_arc, sweep },
                point(x, y),
            ),
        }
    });
}

/// Walks the commands once, producing their VML encoding and bounding box.
///
/// The bounding box is always in unscaled units, whatever the precision.
pub fn extrapolate<'a>(
    commands: impl IntoIterator<Item = &'a Command>,
    config: &VmlConfig,
) -> (String, BoundingBox) {
    let mut terrarium = Terrarium::new(BoundsTurtle::new(VmlTurtle::new(config)));
    apply_path(&mut terrarium, commands);
    let turtle = terrarium.turtle;
    let bounding_box = turtle.bounding_box();
    (turtle.inner.program, bounding_box)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parse::parse;
    use pretty_assertions::assert_eq;

    fn vml(data: &str, precision: Option<f64>) -> (String, BoundingBox) {
        extrapolate(&parse(data).unwrap(), &VmlConfig { precision })
    }

    #[test]
    fn empty_path_is_empty() {
        assert_eq!(vml("", None), (String::new(), BoundingBox::default()));
    }

    #[test]
    fn horizontal_and_vertical_lines_keep_the_other_coordinate() {
        let (program, bounding_box) = vml("M5 5 H10 v-10 h-20", None);
        assert_eq!(program, "m5,5l10,5l10,-5l-10,-5");
        assert_eq!(bounding_box, BoundingBox::from_edges(-10., -5., 10., 5.));
    }

    #[test]
    fn smooth_curves_are_expanded_to_cubics() {
        let (program, _) = vml("M0 0 C0 10 8 12 10 10 S20 0 20 10", None);
        assert_eq!(program, "m0,0c0,10,8,12,10,10c12,8,20,0,20,10");

        let (program, _) = vml("M0 0 q5 10 10 0 t10 0", None);
        assert_eq!(program, "m0,0c5,10,5,10,10,0c15,-10,15,-10,20,0");
    }

    #[test]
    fn curve_control_points_do_not_widen_the_box() {
        let (_, bounding_box) = vml("M0 0 C-50 100 50 100 10 5", None);
        assert_eq!(bounding_box, BoundingBox::from_edges(0., 0., 10., 5.));
    }

    #[test]
    fn full_circle_from_two_semicircles() {
        let (program, bounding_box) = vml("M0 0 a10 10 0 0 1 20 0 a10 10 0 0 1 -20 0", None);
        assert_eq!(
            program,
            "m0,0wa0,-10,20,10,0,0,20,0wa0,-10,20,10,20,0,0,0"
        );
        assert_eq!(bounding_box, BoundingBox::from_edges(0., -10., 20., 10.));
    }

    #[test]
    fn degenerate_arcs_match_lines() {
        for data in ["M1 1 a0 5 0 0 1 10 10", "M1 1 a5 0 0 1 0 10 10"] {
            assert_eq!(vml(data, Some(10.)), vml("M1 1 l10 10", Some(10.)));
        }
        assert_eq!(vml("M1 1 a5 5 0 0 1 0 0", None), vml("M1 1 l0 0", None));
    }

    #[test]
    fn close_jumps_back_and_reopens() {
        let (program, bounding_box) = vml("M0 0 L10 0 L10 10 Z l5 5", None);
        assert_eq!(program, "m0,0l10,0l10,10xm0,0l5,5");
        assert_eq!(bounding_box, BoundingBox::from_edges(0., 0., 10., 10.));
    }

    #[test]
    fn repeated_close_reopens_at_the_current_point() {
        let (program, bounding_box) = vml("M0 0 L10 0 Z Z", None);
        assert_eq!(program, "m0,0l10,0xm0,0xm0,0");
        assert_eq!(bounding_box, BoundingBox::from_edges(0., 0., 10., 0.));

        assert_eq!(vml("m3 4 z z", None).0, "m3,4xm3,4xm3,4");
        assert_eq!(vml("z", None).0, "xm0,0");
    }

    #[test]
    fn negative_halves_round_up() {
        let (program, _) = vml("M-0.25 -0.05", Some(10.));
        assert_eq!(program, "m-2,0");
    }

    #[test]
    fn precision_scales_output_but_not_bounds() {
        let (program, bounding_box) = vml("M0.25 0.5 L1.126 -3", Some(100.));
        assert_eq!(program, "m25,50l113,-300");
        assert_eq!(bounding_box, BoundingBox::from_edges(0.25, -3., 1.126, 0.5));
    }
}
