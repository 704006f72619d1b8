//! Margin padding, the too-small predicate and axis-choosing split logic.
//! Shared verbatim between the scheduler's initial partition and the
//! downloader's overflow re-split — both must produce identical children
//! for the same rectangle.

use crate::global_bounds::GlobalBounds;
use flickr_core::PipelineConfig;
use flickr_store::SpatialBounds;

/// The three axes a job can be split on, in the stable tie-break order
/// used by [`select_split_axis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
	Lat,
	Lon,
	Date,
}

/// Widens `bounds` on any axis whose extent exceeds that axis's margin,
/// clamped to the global bounds. Only used for counting and for the API
/// query itself — the job's stored bounds are never mutated.
#[must_use]
pub fn pad_with_margin(bounds: SpatialBounds, config: &PipelineConfig, global: GlobalBounds) -> SpatialBounds {
	let mut padded = bounds;

	if bounds.max_lat - bounds.min_lat > config.margin_lat {
		padded.min_lat -= config.margin_lat;
		padded.max_lat += config.margin_lat;
	}
	if bounds.max_lon - bounds.min_lon > config.margin_lon {
		padded.min_lon -= config.margin_lon;
		padded.max_lon += config.margin_lon;
	}
	if bounds.max_date - bounds.min_date > config.margin_time {
		padded.min_date -= config.margin_time;
		padded.max_date += config.margin_time;
	}

	global.clamp(padded)
}

/// A job is indivisible once **all three** axes have shrunk below a
/// quarter of their margin. Deliberately `&&`, not `||`: see the scheduler
/// CLI's documentation for why a job vast on one axis but tiny on the
/// other two is still treated as a leaf.
#[must_use]
pub fn too_small(bounds: SpatialBounds, config: &PipelineConfig) -> bool {
	let lat_small = bounds.max_lat - bounds.min_lat < 0.25 * config.margin_lat;
	let lon_small = bounds.max_lon - bounds.min_lon < 0.25 * config.margin_lon;
	let date_small = (bounds.max_date - bounds.min_date) < (0.25 * config.margin_time as f64) as i64;
	lat_small && lon_small && date_small
}

/// Picks the axis with the largest `extent / margin` ratio. Ties broken
/// by the stable order `lat, lon, date`.
#[must_use]
pub fn select_split_axis(bounds: SpatialBounds, config: &PipelineConfig) -> Axis {
	let lat_ratio = (bounds.max_lat - bounds.min_lat) / config.margin_lat;
	let lon_ratio = (bounds.max_lon - bounds.min_lon) / config.margin_lon;
	let date_ratio = (bounds.max_date - bounds.min_date) as f64 / config.margin_time as f64;

	let mut best = Axis::Lat;
	let mut best_ratio = lat_ratio;
	if lon_ratio > best_ratio {
		best = Axis::Lon;
		best_ratio = lon_ratio;
	}
	if date_ratio > best_ratio {
		best = Axis::Date;
	}
	best
}

/// Splits `bounds` at the arithmetic midpoint of `axis`, returning the two
/// halves in low/high order. The date midpoint truncates to an integer;
/// geographic midpoints stay floating point.
#[must_use]
pub fn split_job(bounds: SpatialBounds, axis: Axis) -> (SpatialBounds, SpatialBounds) {
	match axis {
		Axis::Lat => {
			let mid = (bounds.min_lat + bounds.max_lat) / 2.0;
			(SpatialBounds { max_lat: mid, ..bounds }, SpatialBounds { min_lat: mid, ..bounds })
		}
		Axis::Lon => {
			let mid = (bounds.min_lon + bounds.max_lon) / 2.0;
			(SpatialBounds { max_lon: mid, ..bounds }, SpatialBounds { min_lon: mid, ..bounds })
		}
		Axis::Date => {
			let mid = (bounds.min_date + bounds.max_date) / 2;
			(SpatialBounds { max_date: mid, ..bounds }, SpatialBounds { min_date: mid, ..bounds })
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn config() -> PipelineConfig {
		PipelineConfig::default()
	}

	fn global() -> GlobalBounds {
		GlobalBounds { min_lat: -90.0, max_lat: 90.0, min_lon: -180.0, max_lon: 180.0, min_date: 0, max_date: 2_000_000_000 }
	}

	#[test]
	fn split_preserves_union_and_shrinks_chosen_axis() {
		let bounds = SpatialBounds { min_lat: -90.0, max_lat: 90.0, min_lon: -180.0, max_lon: 180.0, min_date: 0, max_date: 1_000_000_000 };
		let axis = select_split_axis(bounds, &config());
		let (a, b) = split_job(bounds, axis);

		match axis {
			Axis::Lat => {
				assert_eq!(a.max_lat, b.min_lat);
				assert!(a.max_lat - a.min_lat < bounds.max_lat - bounds.min_lat);
				assert!(b.max_lat - b.min_lat < bounds.max_lat - bounds.min_lat);
			}
			Axis::Lon => {
				assert_eq!(a.max_lon, b.min_lon);
				assert!(a.max_lon - a.min_lon < bounds.max_lon - bounds.min_lon);
			}
			Axis::Date => {
				assert_eq!(a.max_date, b.min_date);
				assert!(a.max_date - a.min_date < bounds.max_date - bounds.min_date);
			}
		}
	}

	#[test]
	fn widest_date_extent_wins_the_tie() {
		// lat-extent=180, lon-extent=360, date-extent=1e9s, default margins.
		let bounds = SpatialBounds { min_lat: -90.0, max_lat: 90.0, min_lon: -180.0, max_lon: 180.0, min_date: 0, max_date: 1_000_000_000 };
		assert_eq!(select_split_axis(bounds, &config()), Axis::Date);
	}

	#[test]
	fn lon_wins_once_date_extent_is_small() {
		let bounds = SpatialBounds { min_lat: -90.0, max_lat: 90.0, min_lon: -180.0, max_lon: 180.0, min_date: 0, max_date: 10 };
		assert_eq!(select_split_axis(bounds, &config()), Axis::Lon);
	}

	#[rstest]
	#[case(0.1, 0.1, 100, true)]
	#[case(1.0, 0.1, 100, false)]
	#[case(0.1, 1.0, 100, false)]
	#[case(0.1, 0.1, 10_000, false)]
	fn too_small_requires_all_three_axes(#[case] lat_extent: f64, #[case] lon_extent: f64, #[case] date_extent: i64, #[case] expected: bool) {
		let config = config();
		let bounds = SpatialBounds {
			min_lat: 0.0,
			max_lat: lat_extent * config.margin_lat,
			min_lon: 0.0,
			max_lon: lon_extent * config.margin_lon,
			min_date: 0,
			max_date: date_extent,
		};
		assert_eq!(too_small(bounds, &config), expected);
	}

	#[test]
	fn padding_widens_large_extents_and_clamps_to_global() {
		let config = config();
		let bounds = SpatialBounds { min_lat: 89.999, max_lat: 90.0, min_lon: -10.0, max_lon: 10.0, min_date: 0, max_date: 5000 };
		let padded = pad_with_margin(bounds, &config, global());
		assert_eq!(padded.max_lat, 90.0);
		assert!(padded.min_lon < bounds.min_lon);
		assert!(padded.max_lon > bounds.max_lon);
	}

	#[test]
	fn padding_leaves_small_extents_unchanged() {
		let config = config();
		let bounds = SpatialBounds { min_lat: 10.0, max_lat: 10.0001, min_lon: 10.0, max_lon: 10.0001, min_date: 0, max_date: 1 };
		let padded = pad_with_margin(bounds, &config, global());
		assert_eq!(padded, bounds);
	}
}
