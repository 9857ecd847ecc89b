use std::f64::consts::{FRAC_PI_2, PI, TAU};

use euclid::Angle;
use lyon_geom::{Box2D, Point, SvgArc, Vector, point, vector};

/// Center parameterization of an [SvgArc], along with everything needed to
/// encode and measure it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedArc {
    pub from: Point<f64>,
    pub to: Point<f64>,
    pub center: Point<f64>,
    /// Radii after scaling up any that are too small to span the chord
    pub radii: Vector<f64>,
    /// Start of the increasing-angle walk
    pub start_angle: Angle<f64>,
    /// End of the increasing-angle walk, always in `[start_angle, start_angle + 2π)`
    pub end_angle: Angle<f64>,
    /// Drawn in the positive-angle direction (clockwise on screen)
    pub clockwise: bool,
    /// Rectangle enclosing the full ellipse
    pub ellipse: Box2D<f64>,
    /// Rectangle enclosing only the traversed arc
    pub bounds: Box2D<f64>,
}

/// Cardinal extrema of an ellipse, by the angle at which each occurs
const EXTREMA: [(f64, f64, f64); 4] = [
    // (angle, x direction, y direction)
    (0., 1., 0.),
    (FRAC_PI_2, 0., 1.),
    (PI, -1., 0.),
    (3. * FRAC_PI_2, 0., -1.),
];

/// An arc is drawn as a straight line when either radius is zero or it ends where it starts
pub fn is_degenerate(svg_arc: &SvgArc<f64>) -> bool {
    svg_arc.radii.x == 0. || svg_arc.radii.y == 0. || svg_arc.from == svg_arc.to
}

/// Converts an endpoint-parameterized arc into its center parameterization.
///
/// Returns [None] for a [degenerate](is_degenerate) arc. The x-axis rotation is
/// not considered: the ellipse is always axis-aligned.
///
/// See <https://www.w3.org/TR/SVG/implnote.html#ArcConversionEndpointToCenter>
pub fn resolve(svg_arc: &SvgArc<f64>) -> Option<ResolvedArc> {
    if is_degenerate(svg_arc) {
        return None;
    }
    let SvgArc {
        from, to, flags, ..
    } = *svg_arc;
    let mut rx = svg_arc.radii.x.abs();
    let mut ry = svg_arc.radii.y.abs();

    // Everything below is relative to the start point
    let half = (to - from) / 2.;
    let rxry = rx * rx * ry * ry;
    let rycx = ry * ry * half.x * half.x;
    let rxcy = rx * rx * half.y * half.y;
    let a = rxry - rycx - rxcy;

    let mut center = half;
    if a < 0. {
        // Radii are too small for the chord, the center sits on the midpoint
        let scale = (1. - a / rxry).sqrt();
        rx *= scale;
        ry *= scale;
    } else {
        let mut k = (a / (rycx + rxcy)).sqrt();
        if flags.large_arc == flags.sweep {
            k = -k;
        }
        center += vector(-k * half.y * rx / ry, k * half.x * ry / rx);
    }

    let angle_to = |p: Vector<f64>| ((p.y - center.y) / ry).atan2((p.x - center.x) / rx);
    let mut start = angle_to(Vector::zero());
    let mut end = angle_to(half * 2.);
    if !flags.sweep {
        std::mem::swap(&mut start, &mut end);
    }
    if end < start {
        end += TAU;
    }
    let span = end - start;

    // Strictly inside the walk: an extremum at either end is already the endpoint
    let crosses = |angle: f64| {
        let offset = (angle - start).rem_euclid(TAU);
        offset > 0. && offset < span
    };

    let center = from + center;
    let radii = vector(rx, ry);
    let extrema = EXTREMA
        .iter()
        .filter(|(angle, ..)| crosses(*angle))
        .map(|(_, dx, dy)| point(center.x + dx * rx, center.y + dy * ry));

    Some(ResolvedArc {
        from,
        to,
        center,
        radii,
        start_angle: Angle::radians(start),
        end_angle: Angle::radians(end),
        clockwise: flags.sweep,
        ellipse: Box2D::new(center - radii, center + radii),
        bounds: Box2D::from_points([from, to].into_iter().chain(extrema)),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use lyon_geom::ArcFlags;

    const EPSILON: f64 = 1e-9;

    fn svg_arc(from: Point<f64>, to: Point<f64>, r: f64, large_arc: bool, sweep: bool) -> SvgArc<f64> {
        SvgArc {
            from,
            to,
            radii: vector(r, r),
            x_rotation: Angle::zero(),
            flags: ArcFlags { large_arc, sweep },
        }
    }

    fn assert_box_eq(actual: Box2D<f64>, expected: [f64; 4], tolerance: f64) {
        let actual = [actual.min.x, actual.min.y, actual.max.x, actual.max.y];
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!(
                (a - e).abs() < tolerance,
                "{actual:?} != {expected:?} (tolerance {tolerance})"
            );
        }
    }

    /// Point on the unit-radius circle around `center` at `degrees`
    fn on_circle(center: Point<f64>, r: f64, degrees: f64) -> Point<f64> {
        let radians = degrees.to_radians();
        point(center.x + r * radians.cos(), center.y + r * radians.sin())
    }

    #[test]
    fn zero_radius_or_zero_length_is_degenerate() {
        let mut arc = svg_arc(point(0., 0.), point(10., 0.), 5., false, true);
        arc.radii.x = 0.;
        assert!(resolve(&arc).is_none());

        let arc = svg_arc(point(0., 0.), point(10., 0.), 5., false, true);
        assert!(resolve(&SvgArc {
            radii: vector(5., 0.),
            ..arc
        })
        .is_none());
        assert!(resolve(&SvgArc {
            to: arc.from,
            ..arc
        })
        .is_none());
        assert!(resolve(&arc).is_some());
    }

    #[test]
    fn clockwise_semicircle_passes_over_the_top() {
        let resolved = resolve(&svg_arc(point(0., 0.), point(20., 0.), 10., false, true)).unwrap();
        assert!((resolved.center - point(10., 0.)).length() < EPSILON);
        assert!(resolved.clockwise);
        assert_box_eq(resolved.bounds, [0., -10., 20., 0.], EPSILON);
        assert_box_eq(resolved.ellipse, [0., -10., 20., 10.], EPSILON);
    }

    #[test]
    fn counter_clockwise_semicircle_passes_under_the_bottom() {
        let resolved = resolve(&svg_arc(point(0., 0.), point(20., 0.), 10., false, false)).unwrap();
        assert!(!resolved.clockwise);
        assert_box_eq(resolved.bounds, [0., 0., 20., 10.], EPSILON);
    }

    #[test]
    fn small_and_large_arcs_pick_different_centers() {
        let small = resolve(&svg_arc(point(0., 0.), point(10., 10.), 10., false, true)).unwrap();
        assert!((small.center - point(0., 10.)).length() < EPSILON);
        assert!((small.end_angle.radians - small.start_angle.radians - FRAC_PI_2).abs() < EPSILON);
        assert_box_eq(small.bounds, [0., 0., 10., 10.], EPSILON);

        let large = resolve(&svg_arc(point(0., 0.), point(10., 10.), 10., true, true)).unwrap();
        assert!((large.center - point(10., 0.)).length() < EPSILON);
        assert!(
            (large.end_angle.radians - large.start_angle.radians - 3. * FRAC_PI_2).abs() < EPSILON
        );
        assert_box_eq(large.bounds, [0., -10., 20., 10.], EPSILON);
    }

    #[test]
    fn radii_too_small_for_the_chord_are_scaled_up() {
        let resolved = resolve(&svg_arc(point(0., 0.), point(20., 0.), 1., false, true)).unwrap();
        assert!((resolved.radii.x - 10.).abs() < EPSILON);
        assert!((resolved.radii.y - 10.).abs() < EPSILON);
        assert!((resolved.center - point(10., 0.)).length() < EPSILON);
        assert_box_eq(resolved.bounds, [0., -10., 20., 0.], EPSILON);
    }

    #[test]
    fn elliptical_radii_scale_extrema_per_axis() {
        let resolved = resolve(&SvgArc {
            radii: vector(10., 5.),
            ..svg_arc(point(0., 0.), point(20., 0.), 0., false, false)
        })
        .unwrap();
        assert_box_eq(resolved.bounds, [0., 0., 20., 5.], EPSILON);
        assert_box_eq(resolved.ellipse, [0., -5., 20., 5.], EPSILON);
    }

    #[test]
    fn negative_radii_use_their_magnitude() {
        let resolved = resolve(&SvgArc {
            radii: vector(-10., -10.),
            ..svg_arc(point(0., 0.), point(20., 0.), 0., false, true)
        })
        .unwrap();
        assert_box_eq(resolved.bounds, [0., -10., 20., 0.], EPSILON);
    }

    /// Quarter arcs centered on each cardinal direction include that extremum and no other
    #[test]
    fn arcs_straddling_each_quadrant_boundary_include_its_extremum() {
        let center = point(0., 0.);
        let half = std::f64::consts::FRAC_1_SQRT_2;
        for (degrees, expected) in [
            (0., [half, -half, 1., half]),
            (90., [-half, half, half, 1.]),
            (180., [-1., -half, -half, half]),
            (270., [-half, -1., half, -half]),
        ] {
            let from = on_circle(center, 1., degrees - 45.);
            let to = on_circle(center, 1., degrees + 45.);
            let clockwise = resolve(&svg_arc(from, to, 1., false, true)).unwrap();
            assert_box_eq(clockwise.bounds, expected, EPSILON);

            // Same arc walked backwards
            let counter = resolve(&svg_arc(to, from, 1., false, false)).unwrap();
            assert_box_eq(counter.bounds, expected, EPSILON);
        }
    }

    /// Arcs that start or stop exactly on a cardinal angle only reach it at the endpoint
    #[test]
    fn arcs_ending_on_a_quadrant_boundary_stop_there() {
        let center = point(0., 0.);
        for degrees in [0., 90., 180., 270.] {
            let from = on_circle(center, 1., degrees);
            let to = on_circle(center, 1., degrees + 90.);
            let resolved = resolve(&svg_arc(from, to, 1., false, true)).unwrap();
            let expected = Box2D::from_points([from, to]);
            assert_box_eq(
                resolved.bounds,
                [expected.min.x, expected.min.y, expected.max.x, expected.max.y],
                EPSILON,
            );
        }
    }

    /// Compares against a dense sampling of the arc for many start angles and spans
    #[test]
    fn bounds_match_sampled_arcs() {
        let center = point(3., -2.);
        let r = 5.;
        for start in (0..24).map(|i| i as f64 * 15.) {
            for span in [30., 90., 150., 210., 270., 330.] {
                let from = on_circle(center, r, start);
                let to = on_circle(center, r, start + span);
                let large_arc = span > 180.;

                let sampled = Box2D::from_points(
                    (0..=2000).map(|i| on_circle(center, r, start + span * i as f64 / 2000.)),
                );
                let expected = [sampled.min.x, sampled.min.y, sampled.max.x, sampled.max.y];

                let clockwise = resolve(&svg_arc(from, to, r, large_arc, true)).unwrap();
                assert!((clockwise.center - center).length() < 1e-6);
                assert_box_eq(clockwise.bounds, expected, 1e-4);

                let counter = resolve(&svg_arc(to, from, r, large_arc, false)).unwrap();
                assert_box_eq(counter.bounds, expected, 1e-4);
            }
        }
    }
}
