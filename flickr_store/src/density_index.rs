//! The 3D density index: an ephemeral R-tree over `(lat, lon, upload_date)`
//! used only for counting during the scheduler's split search, never for
//! retrieval. Rebuilt fresh from a Morton-sorted stream at the start of
//! every scheduling run.

use rstar::{AABB, RTree, RTreeObject};

/// A single already-known photo, reduced to the three axes the scheduler
/// splits on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityPoint {
	pub lat: f64,
	pub lon: f64,
	pub upload_date: f64,
}

impl RTreeObject for DensityPoint {
	type Envelope = AABB<[f64; 3]>;

	fn envelope(&self) -> Self::Envelope {
		// Points are stored as zero-volume boxes; `locate_in_envelope`
		// then reduces to a `min <= x <= max` style containment test on
		// each axis, which is the behavior the counting query relies on.
		AABB::from_point([self.lat, self.lon, self.upload_date])
	}
}

/// A query rectangle, already margin-padded by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box3 {
	pub min_lat: f64,
	pub max_lat: f64,
	pub min_lon: f64,
	pub max_lon: f64,
	pub min_date: f64,
	pub max_date: f64,
}

impl Box3 {
	fn envelope(self) -> AABB<[f64; 3]> {
		AABB::from_corners([self.min_lat, self.min_lon, self.min_date], [self.max_lat, self.max_lon, self.max_date])
	}
}

/// The bulk-loaded, read-only counting index.
pub struct DensityIndex {
	tree: RTree<DensityPoint>,
}

impl DensityIndex {
	/// Bulk-loads the index from a pre-sorted stream of points. The caller
	/// is responsible for the Morton sort; skipping it degrades bulk-load
	/// locality and subsequent query performance but not correctness.
	#[must_use]
	pub fn build_from_sorted_stream(points: impl IntoIterator<Item = DensityPoint>) -> Self {
		DensityIndex { tree: RTree::bulk_load(points.into_iter().collect()) }
	}

	/// Counts points inside `bbox`, stopping as soon as `limit + 1` are
	/// found so the cost is `O(limit)` rather than `O(n)`.
	#[must_use]
	pub fn count_in_box_with_limit(&self, bbox: Box3, limit: usize) -> usize {
		self.tree.locate_in_envelope(&bbox.envelope()).take(limit + 1).count()
	}

	/// Returns every point inside `bbox`, without a cutoff. Used by tests
	/// and by callers that need the actual points rather than a count.
	#[must_use]
	pub fn scan_box(&self, bbox: Box3) -> Vec<DensityPoint> {
		self.tree.locate_in_envelope(&bbox.envelope()).copied().collect()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.tree.size()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.tree.size() == 0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn global_box() -> Box3 {
		Box3 { min_lat: -90.0, max_lat: 90.0, min_lon: -180.0, max_lon: 180.0, min_date: 0.0, max_date: 1e12 }
	}

	#[test]
	fn empty_index_counts_zero() {
		let index = DensityIndex::build_from_sorted_stream(vec![]);
		assert_eq!(index.count_in_box_with_limit(global_box(), 3500), 0);
		assert!(index.is_empty());
	}

	#[test]
	fn counts_points_inside_box_only() {
		let points = vec![
			DensityPoint { lat: 10.0, lon: 10.0, upload_date: 100.0 },
			DensityPoint { lat: 10.0, lon: 10.0, upload_date: 200.0 },
			DensityPoint { lat: -80.0, lon: -170.0, upload_date: 300.0 },
		];
		let index = DensityIndex::build_from_sorted_stream(points);
		let narrow = Box3 { min_lat: 0.0, max_lat: 20.0, min_lon: 0.0, max_lon: 20.0, min_date: 0.0, max_date: 1000.0 };
		assert_eq!(index.count_in_box_with_limit(narrow, 3500), 2);
		assert_eq!(index.len(), 3);
	}

	#[test]
	fn cutoff_stops_early() {
		let points: Vec<_> =
			(0..10).map(|i| DensityPoint { lat: 1.0, lon: 1.0, upload_date: f64::from(i) }).collect();
		let index = DensityIndex::build_from_sorted_stream(points);
		assert_eq!(index.count_in_box_with_limit(global_box(), 3), 4);
	}
}
