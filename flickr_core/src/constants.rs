//! Geographic and Web Mercator constants shared across the pipeline.

/// WGS84 semi-major axis (equatorial radius) in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half the circumference of the Web Mercator square, in meters
/// (`PI * EARTH_RADIUS`). The projected plane spans `[-MAX_MERC, MAX_MERC]`
/// on both axes.
pub const MAX_MERC: f64 = 20_037_508.342_789_244;

/// Maximum latitude in degrees representable in Web Mercator (EPSG:3857).
/// Coordinates beyond this are clamped before projecting.
pub const MAX_MERCATOR_LAT: f64 = 85.051_13;

/// Upstream photo-search API hard result cap: queries reporting more than
/// this many total matches cannot be fully paginated and must be split.
pub const API_RESULT_CAP: u32 = 4000;

/// Maximum photos returned per API page.
pub const MAX_PHOTOS_PER_PAGE: u32 = 250;

/// Hard ceiling on pages fetched for an overflowing job whose overflow is
/// being tolerated (`ignore_overflow = true`, i.e. a too-small job).
pub const MAX_PAGES_WHEN_IGNORING_OVERFLOW: u32 = 20;
