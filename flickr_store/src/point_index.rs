//! The 2D point index used by the tile maker: one entry per unique
//! `(x_mercator, y_mercator)` pixel among non-banned owners, deduplicated
//! the same way the upstream staging table does — `id = (x << 32) | y`.

use rstar::{AABB, RTree, RTreeObject};
use std::collections::HashSet;

/// A deduplicated Mercator-projected photo location, stored as 32-bit
/// integer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePoint {
	pub x: i32,
	pub y: i32,
}

impl TilePoint {
	fn dedup_key(self) -> i64 {
		(i64::from(self.x) << 32) | i64::from(self.y as u32)
	}
}

impl RTreeObject for TilePoint {
	type Envelope = AABB<[f64; 2]>;

	fn envelope(&self) -> Self::Envelope {
		AABB::from_point([f64::from(self.x), f64::from(self.y)])
	}
}

/// A query rectangle in integer Mercator-pixel space, already expanded by
/// the caller's symbol-radius margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box2 {
	pub min_x: i32,
	pub max_x: i32,
	pub min_y: i32,
	pub max_y: i32,
}

impl Box2 {
	fn envelope(self) -> AABB<[f64; 2]> {
		AABB::from_corners([f64::from(self.min_x), f64::from(self.min_y)], [f64::from(self.max_x), f64::from(self.max_y)])
	}
}

/// The bulk-loaded, read-only point index backing tile rendering.
pub struct PointIndex {
	tree: RTree<TilePoint>,
}

impl PointIndex {
	/// Bulk-loads the index from a Morton-sorted stream of points,
	/// dropping coincident `(x, y)` pairs. The dedup set is independent of
	/// the sort order; the sort exists purely for bulk-load locality.
	#[must_use]
	pub fn build_from_sorted_stream(points: impl IntoIterator<Item = TilePoint>) -> Self {
		let mut seen = HashSet::new();
		let deduped: Vec<TilePoint> = points.into_iter().filter(|p| seen.insert(p.dedup_key())).collect();
		PointIndex { tree: RTree::bulk_load(deduped) }
	}

	/// Returns every point inside `bbox`, capped at `limit + 1` so the tile
	/// maker can cheaply distinguish "normal" from "needs overview mode"
	/// without materializing the whole overflowing set.
	#[must_use]
	pub fn scan_box_with_limit(&self, bbox: Box2, limit: usize) -> Vec<TilePoint> {
		self.tree.locate_in_envelope(&bbox.envelope()).take(limit + 1).copied().collect()
	}

	/// Returns `true` if at least one point falls inside `bbox`. Used by
	/// the overview sampler's per-cell `EXISTS` check.
	#[must_use]
	pub fn any_in_box(&self, bbox: Box2) -> bool {
		self.tree.locate_in_envelope(&bbox.envelope()).next().is_some()
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
