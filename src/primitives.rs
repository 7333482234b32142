//! Path primitive generation: straight runs and circular arcs.
//!
//! Each primitive maps a start pose (point + heading) to an analytic end
//! point and an ordered point sequence sampled at a target spacing. The
//! start point itself is not emitted; sequences begin one step past it
//! and always terminate on the analytic end point, so chained primitives
//! never accumulate stepping drift.

use crate::error::{EngineError, Result};
use crate::types::Point2D;

/// Angular displacements below this are rejected. The chord formula
/// divides by the chord length, and `1 - cos(da)` underflows to zero
/// in f64 for |da| below roughly 1e-8, turning the quotient into NaN.
const MIN_ARC_ANGLE: f64 = 1e-7;

fn check_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EngineError::InvalidPrimitive(format!(
            "{name} must be finite and positive, got {value}"
        )));
    }
    Ok(())
}

/// End point of a straight run of `length` meters along `heading`.
pub fn straight_end(start: Point2D, heading: f64, length: f64) -> Point2D {
    start + Point2D::new(length * heading.cos(), length * heading.sin())
}

/// Discretize a straight run at `spacing` meters between points.
///
/// Produces `ceil(length / spacing)` points. Interior points are stepped
/// from the start; the final point is forced to the analytic end point.
pub fn straight_points(
    start: Point2D,
    heading: f64,
    length: f64,
    spacing: f64,
) -> Result<Vec<Point2D>> {
    check_positive("length", length)?;
    check_positive("spacing", spacing)?;

    let n = (length / spacing).ceil() as usize;
    let step = Point2D::new(spacing * heading.cos(), spacing * heading.sin());

    let mut points = Vec::with_capacity(n);
    let mut p = start;
    for _ in 0..n.saturating_sub(1) {
        p = p + step;
        points.push(p);
    }
    points.push(straight_end(start, heading, length));
    Ok(points)
}

fn check_arc_angle(da: f64) -> Result<()> {
    if !da.is_finite() || da.abs() < MIN_ARC_ANGLE {
        return Err(EngineError::InvalidPrimitive(format!(
            "arc angular displacement too small: {da}"
        )));
    }
    Ok(())
}

/// Chord formula, caller guarantees `da` is not degenerate.
fn chord_end(start: Point2D, heading: f64, da: f64, radius: f64) -> Point2D {
    let chord = radius * (2.0 * (1.0 - da.cos())).sqrt();
    let bearing = std::f64::consts::FRAC_PI_2 - heading + (radius * da.sin() / chord).asin();
    start + Point2D::new(-chord * bearing.cos(), chord * bearing.sin())
}

/// End point of a circular arc via the chord-length formula.
///
/// `da` is the signed angular displacement and `radius` the (signed)
/// arc radius. chord = r * sqrt(2 * (1 - cos da)); the bearing of the
/// chord is pi/2 - heading + asin(r * sin(da) / chord).
pub fn arc_end(start: Point2D, heading: f64, da: f64, radius: f64) -> Result<Point2D> {
    check_arc_angle(da)?;
    Ok(chord_end(start, heading, da, radius))
}

/// Discretize a circular arc of length `length` and angular displacement
/// `da` at `spacing` meters between points.
///
/// Produces `round(length / spacing)` points (at least one). Each point
/// is computed from the chord formula at a linearly interpolated
/// fraction of `da` rather than by stepping, so rounding error does not
/// compound; spacing is only approximately uniform for fractional arcs.
pub fn arc_points(
    start: Point2D,
    heading: f64,
    da: f64,
    length: f64,
    spacing: f64,
) -> Result<Vec<Point2D>> {
    check_positive("length", length)?;
    check_positive("spacing", spacing)?;
    check_arc_angle(da)?;

    let n = ((length / spacing).round() as usize).max(1);
    // The first interpolated fraction of da must itself stay clear of
    // the chord-formula underflow.
    check_arc_angle(da / n as f64)?;
    let radius = length / da;

    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let fraction = (i + 1) as f64 / n as f64;
        points.push(chord_end(start, heading, fraction * da, radius));
    }
    Ok(points)
}
