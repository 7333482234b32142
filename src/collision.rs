//! Self-intersection detection for procedurally built tracks.
//!
//! A candidate segment is always appended at the end of the existing
//! track, so its first points sit right on top of the newest track
//! points. Both detectors therefore scan the track newest-first and
//! skip the "contiguous tail": points that stay within the threshold
//! of the segment's first point. Once a point falls outside that
//! window, every remaining (older) track point is a genuine collision
//! candidate and is tested against the whole segment.
//!
//! The point that ends the contiguous tail is itself not collision
//! tested; testing resumes one point further back.

use crate::types::Point2D;

/// Chebyshev (L-infinity) variant: proximity means both axis-wise
/// distances are below the threshold independently.
pub fn collision_chebyshev(seg: &[Point2D], track: &[Point2D], threshold: f64) -> bool {
    let Some(&head) = seg.first() else {
        return false;
    };

    let mut contiguous = true;
    for p in track.iter().rev() {
        if contiguous {
            let dx = (head.x - p.x).abs();
            let dy = (head.y - p.y).abs();
            if dx > threshold || dy > threshold {
                contiguous = false;
            }
        } else {
            for q in seg {
                if (q.x - p.x).abs() < threshold && (q.y - p.y).abs() < threshold {
                    return true;
                }
            }
        }
    }
    false
}

/// Euclidean (L2) variant: distance-squared against threshold-squared,
/// gated by an axis-aligned bounding box around the candidate segment.
///
/// The box is the tight hull of the segment points, not expanded by the
/// threshold; track points just outside it are pruned before the
/// per-point distance test.
pub fn collision_euclidean(seg: &[Point2D], track: &[Point2D], threshold: f64) -> bool {
    let Some(&head) = seg.first() else {
        return false;
    };
    let dmin = threshold * threshold;

    let mut xmin = f64::INFINITY;
    let mut xmax = f64::NEG_INFINITY;
    let mut ymin = f64::INFINITY;
    let mut ymax = f64::NEG_INFINITY;
    for p in seg {
        xmin = xmin.min(p.x);
        xmax = xmax.max(p.x);
        ymin = ymin.min(p.y);
        ymax = ymax.max(p.y);
    }

    let mut contiguous = true;
    for p in track.iter().rev() {
        if contiguous {
            let d = (head.x - p.x).powi(2) + (head.y - p.y).powi(2);
            if d > dmin {
                contiguous = false;
            }
        } else if p.x >= xmin && p.x <= xmax && p.y >= ymin && p.y <= ymax {
            for q in seg {
                let d = (q.x - p.x).powi(2) + (q.y - p.y).powi(2);
                if d < dmin {
                    return true;
                }
            }
        }
    }
    false
}
