//! Writes the rendered tile pyramid to an MBTiles SQLite archive.

use anyhow::Result;
use r2d2::Pool;
use r2d2_sqlite::rusqlite::params;
use r2d2_sqlite::SqliteConnectionManager;
use std::fs::remove_file;
use std::path::Path;

/// What kind of encoding a tile was rendered with. Recorded as metadata so
/// downstream viewers know whether `format` means PNG or the custom VPTT
/// vector format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileFormat {
	Png,
	Vptt,
}

impl TileFormat {
	fn as_str(self) -> &'static str {
		match self {
			TileFormat::Png => "png",
			TileFormat::Vptt => "vptt",
		}
	}
}

/// A pooled SQLite connection writing `tiles`/`metadata` tables in the
/// MBTiles schema.
pub struct MbtilesWriter {
	pool: Pool<SqliteConnectionManager>,
}

impl MbtilesWriter {
	/// Creates a fresh MBTiles file at `path`, overwriting any existing
	/// file.
	///
	/// # Errors
	/// Returns an error if the file cannot be removed, the connection
	/// cannot be opened, or the schema cannot be created.
	pub fn create(path: &Path) -> Result<Self> {
		if path.exists() {
			remove_file(path)?;
		}
		let manager = SqliteConnectionManager::file(path);
		let pool = Pool::builder().max_size(4).build(manager)?;

		pool.get()?.execute_batch(
			"CREATE TABLE metadata (name TEXT, value TEXT, UNIQUE (name));
			CREATE TABLE tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB, UNIQUE (zoom_level, tile_column, tile_row));
			CREATE UNIQUE INDEX tile_index on tiles (zoom_level, tile_column, tile_row);",
		)?;

		Ok(MbtilesWriter { pool })
	}

	/// Opens an in-memory MBTiles archive, for tests.
	///
	/// # Errors
	/// Returns an error if the schema cannot be created.
	pub fn open_in_memory() -> Result<Self> {
		let manager = SqliteConnectionManager::memory();
		let pool = Pool::builder().max_size(4).build(manager)?;
		pool.get()?.execute_batch(
			"CREATE TABLE metadata (name TEXT, value TEXT, UNIQUE (name));
			CREATE TABLE tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB, UNIQUE (zoom_level, tile_column, tile_row));
			CREATE UNIQUE INDEX tile_index on tiles (zoom_level, tile_column, tile_row);",
		)?;
		Ok(MbtilesWriter { pool })
	}

	/// Inserts a single rendered tile at its TMS-flipped row.
	///
	/// # Errors
	/// Returns an error if the insert fails.
	pub fn add_tile(&mut self, z: u8, x: i64, y: i64, data: &[u8]) -> Result<()> {
		self.pool.get()?.execute(
			"INSERT OR REPLACE INTO tiles (zoom_level, tile_column, tile_row, tile_data) VALUES (?1, ?2, ?3, ?4)",
			params![z, x, y, data],
		)?;
		Ok(())
	}

	/// Sets a metadata key/value pair.
	///
	/// # Errors
	/// Returns an error if the insert fails.
	pub fn set_metadata(&self, name: &str, value: &str) -> Result<()> {
		self.pool.get()?.execute("INSERT OR REPLACE INTO metadata (name, value) VALUES (?1, ?2)", params![name, value])?;
		Ok(())
	}

	/// Writes the standard MBTiles metadata header. `format` names the
	/// dominant tile encoding; individual tiles may still mix vector and
	/// raster blobs, matching the upstream archive's own per-tile choice.
	///
	/// # Errors
	/// Returns an error if any metadata insert fails.
	pub fn write_standard_metadata(&self, name: &str, format: TileFormat, min_zoom: u8, max_zoom: u8) -> Result<()> {
		self.set_metadata("name", name)?;
		self.set_metadata("format", format.as_str())?;
		self.set_metadata("type", "overlay")?;
		self.set_metadata("version", "1.0")?;
		self.set_metadata("minzoom", &min_zoom.to_string())?;
		self.set_metadata("maxzoom", &max_zoom.to_string())?;
		Ok(())
	}

	/// Returns the number of tiles currently stored, for tests.
	///
	/// # Errors
	/// Returns an error if the query fails.
	pub fn tile_count(&self) -> Result<u64> {
		let conn = self.pool.get()?;
		let count: i64 = conn.query_row("SELECT COUNT(*) FROM tiles", [], |row| row.get(0))?;
		Ok(count as u64)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn add_tile_and_count_roundtrip() {
		let mut writer = MbtilesWriter::open_in_memory().unwrap();
		writer.add_tile(0, 0, 0, b"abc").unwrap();
		writer.add_tile(1, 0, 0, b"def").unwrap();
		assert_eq!(writer.tile_count().unwrap(), 2);
	}

	#[test]
	fn metadata_header_is_queryable() {
		let writer = MbtilesWriter::open_in_memory().unwrap();
		writer.write_standard_metadata("photos", TileFormat::Png, 0, 14).unwrap();
		let conn = writer.pool.get().unwrap();
		let value: String = conn.query_row("SELECT value FROM metadata WHERE name = 'format'", [], |row| row.get(0)).unwrap();
		assert_eq!(value, "png");
	}
}
