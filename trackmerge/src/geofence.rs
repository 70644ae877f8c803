//! Trailing geofence window over an ordered track.
//!
//! Restricted callers see only the run of points leading up to the
//! current position. Anchoring the window to the last point rather than a
//! fixed geography means the visible history slides forward as the
//! subject moves.

use crate::geo::haversine_km;
use crate::track::Waypoint;

/// Restrict a track to the longest trailing run of points all within
/// `radius_km` of its last point.
///
/// Scanning backward from the end, the nearest point farther than
/// `radius_km` from the last point cuts the window; everything after it is
/// retained. When every point lies within the radius the whole track is
/// retained. The result is always a contiguous suffix of the input, and
/// an empty track yields an empty suffix.
pub fn visible_suffix(track: &[Waypoint], radius_km: f64) -> &[Waypoint] {
    let Some(last) = track.last() else {
        return track;
    };

    let mut start = 0;
    for i in (0..track.len()).rev() {
        if haversine_km(last.coords, track[i].coords) > radius_km {
            start = i + 1;
            break;
        }
    }

    &track[start..]
}
