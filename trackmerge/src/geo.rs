//! Great-circle distance for GPS coordinates.
//!
//! Every distance-based decision in this crate (pruning thresholds,
//! geofence radii) is expressed in kilometres and built on the single
//! primitive below, so thresholds never cross units.

use crate::track::GpsCoords;

/// Spherical earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the great-circle distance between two coordinates using the
/// haversine formula.
///
/// Returns the distance in kilometres on a sphere of radius 6371 km.
/// The function is pure, total and symmetric; it returns exactly zero for
/// bitwise-equal inputs. Antipodal wraparound gets no special handling.
///
/// # Example
///
/// ```rust
/// use trackmerge::{haversine_km, GpsCoords};
///
/// let london = GpsCoords::new(51.5074, -0.1278);
/// let paris = GpsCoords::new(48.8566, 2.3522);
///
/// let distance = haversine_km(london, paris);
/// assert!((distance - 343.5).abs() < 1.0); // ~344 km
/// ```
#[inline]
pub fn haversine_km(a: GpsCoords, b: GpsCoords) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_for_identical_points() {
        let p = GpsCoords::new(40.7128, -74.0060);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = GpsCoords::new(51.5074, -0.1278);
        let b = GpsCoords::new(48.8566, 2.3522);
        assert_eq!(haversine_km(a, b), haversine_km(b, a));
    }

    #[test]
    fn test_known_distance_london_paris() {
        let london = GpsCoords::new(51.5074, -0.1278);
        let paris = GpsCoords::new(48.8566, 2.3522);
        let distance = haversine_km(london, paris);
        assert!((distance - 343.5).abs() < 1.0, "got {}", distance);
    }

    #[test]
    fn test_short_distance_precision() {
        // Roughly 20 m of longitude at 40.7°N.
        let a = GpsCoords::new(40.7128, -74.0060);
        let b = GpsCoords::new(40.7128, -74.00576);
        let meters = haversine_km(a, b) * 1000.0;
        assert!((meters - 20.0).abs() < 1.0, "got {} m", meters);
    }

    #[test]
    fn test_opaque_out_of_range_inputs() {
        // Out-of-range coordinates are accepted as opaque floats.
        let a = GpsCoords::new(123.0, 540.0);
        let b = GpsCoords::new(-123.0, -540.0);
        assert!(haversine_km(a, b).is_finite());
    }
}
