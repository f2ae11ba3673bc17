use super::PathFinderError;

/// mean earth radius in meters, as used by the rosetta-code haversine formula.
pub const APPROX_EARTH_RADIUS_M: f64 = 6_371_000.0;

/// great-circle distance between two WGS84 coordinates, in meters.
pub fn haversine_distance_meters(
    src_x: f64,
    src_y: f64,
    dst_x: f64,
    dst_y: f64,
) -> Result<f64, PathFinderError> {
    if !(-180.0..=180.0).contains(&src_x) || !(-180.0..=180.0).contains(&dst_x) {
        return Err(PathFinderError::InvalidCoordinate(src_x, src_y));
    }
    if !(-90.0..=90.0).contains(&src_y) || !(-90.0..=90.0).contains(&dst_y) {
        return Err(PathFinderError::InvalidCoordinate(dst_x, dst_y));
    }

    let lat1 = src_y.to_radians();
    let lat2 = dst_y.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (dst_x - src_x).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    let c = 2.0 * a.sqrt().asin();
    Ok(APPROX_EARTH_RADIUS_M * c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_distance_for_identical_points() {
        let d = haversine_distance_meters(-105.2, 39.7, -105.2, 39.7).unwrap();
        assert_relative_eq!(d, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(haversine_distance_meters(200.0, 0.0, 0.0, 0.0).is_err());
    }
}
