//! Thin wrapper around the WGS84 -> EPSG:3857 (Web Mercator) projection.
//!
//! Only the batch `transform` entry point is used by the pipeline: the tile
//! maker projects a whole chunk of points at once before feeding them to the
//! R-tree bulk loader.

use crate::constants::{EARTH_RADIUS, MAX_MERCATOR_LAT};

/// Clamps a latitude to the range representable in Web Mercator.
#[must_use]
pub fn clamp_lat(lat: f64) -> f64 {
	lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT)
}

/// Projects parallel arrays of longitude/latitude (degrees, WGS84) into
/// Web Mercator meters. Latitudes are clamped to `+-85.05113` before
/// projecting to avoid the asymptotic blowup near the poles.
///
/// # Panics
/// Panics if `lons.len() != lats.len()`.
#[must_use]
pub fn transform(lons: &[f64], lats: &[f64]) -> (Vec<f64>, Vec<f64>) {
	assert_eq!(lons.len(), lats.len(), "lon/lat arrays must have equal length");
	let xs = lons.iter().map(|lon| lon.to_radians() * EARTH_RADIUS).collect();
	let ys = lats
		.iter()
		.map(|lat| {
			let lat = clamp_lat(*lat).to_radians();
			EARTH_RADIUS * ((std::f64::consts::FRAC_PI_4 + lat / 2.0).tan()).ln()
		})
		.collect();
	(xs, ys)
}

/// Projects a single point; convenience wrapper around [`transform`].
#[must_use]
pub fn transform_point(lon: f64, lat: f64) -> (f64, f64) {
	let (xs, ys) = transform(&[lon], &[lat]);
	(xs[0], ys[0])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn origin_maps_to_origin() {
		let (x, y) = transform_point(0.0, 0.0);
		assert!(x.abs() < 1e-6);
		assert!(y.abs() < 1e-6);
	}

	#[test]
	fn clamps_polar_latitudes() {
		let (_, y_clamped) = transform_point(0.0, 89.9);
		let (_, y_max) = transform_point(0.0, MAX_MERCATOR_LAT);
		assert!((y_clamped - y_max).abs() < 1e-6);
	}

	#[test]
	fn longitude_is_linear() {
		let (x1, _) = transform_point(90.0, 0.0);
		let (x2, _) = transform_point(180.0, 0.0);
		assert!((x2 - 2.0 * x1).abs() < 1e-6);
	}
}
