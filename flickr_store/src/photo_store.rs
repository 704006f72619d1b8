//! The photo key/value store: one row per photo id, overwritten on re-fetch.

use anyhow::{Context, Result};
use r2d2::Pool;
use r2d2_sqlite::{SqliteConnectionManager, rusqlite::params};
use std::path::Path;

/// A single archived photo. Mirrors the upstream API's `geo,date_upload`
/// extras plus the fields needed for deduplication and bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoRecord {
	pub id: u64,
	pub lat_e7: i32,
	pub lon_e7: i32,
	pub accuracy: i32,
	pub fetch_ts: i64,
	pub upload_date: i64,
}

/// A pooled handle to the photo store's SQLite file. `owner` is stored
/// alongside the fixed-width columns above but kept out of `PhotoRecord`
/// itself, since only the tile maker's ban filter and the downloader's
/// writer ever need it.
pub struct PhotoStore {
	pool: Pool<SqliteConnectionManager>,
}

impl PhotoStore {
	/// Opens (creating if necessary) the photo store at `path`.
	///
	/// # Errors
	/// Returns an error if the connection pool or schema cannot be created.
	pub fn open(path: &Path) -> Result<Self> {
		let manager = SqliteConnectionManager::file(path);
		let pool = Pool::builder().max_size(4).build(manager).context("building photo store connection pool")?;

		pool.get()?.execute_batch(
			"CREATE TABLE IF NOT EXISTS photos (
				id INTEGER PRIMARY KEY,
				lat_e7 INTEGER NOT NULL,
				lon_e7 INTEGER NOT NULL,
				accuracy INTEGER NOT NULL,
				fetch_ts INTEGER NOT NULL,
				upload_date INTEGER NOT NULL,
				owner TEXT NOT NULL
			);",
		)?;

		Ok(PhotoStore { pool })
	}

	/// Opens an in-memory store, used by tests.
	///
	/// # Errors
	/// Returns an error if the schema cannot be created.
	pub fn open_in_memory() -> Result<Self> {
		let manager = SqliteConnectionManager::memory();
		let pool = Pool::builder().max_size(1).build(manager).context("building in-memory photo store")?;

		pool.get()?.execute_batch(
			"CREATE TABLE photos (
				id INTEGER PRIMARY KEY,
				lat_e7 INTEGER NOT NULL,
				lon_e7 INTEGER NOT NULL,
				accuracy INTEGER NOT NULL,
				fetch_ts INTEGER NOT NULL,
				upload_date INTEGER NOT NULL,
				owner TEXT NOT NULL
			);",
		)?;

		Ok(PhotoStore { pool })
	}

	/// Writes a batch of `(record, owner)` pairs in a single transaction.
	/// Re-fetched ids overwrite their previous row.
	///
	/// # Errors
	/// Returns an error if the transaction fails.
	pub fn put_batch(&self, photos: &[(PhotoRecord, String)]) -> Result<()> {
		let mut conn = self.pool.get()?;
		let tx = conn.transaction()?;
		for (photo, owner) in photos {
			tx.execute(
				"INSERT OR REPLACE INTO photos (id, lat_e7, lon_e7, accuracy, fetch_ts, upload_date, owner)
				VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
				params![
					photo.id as i64,
					photo.lat_e7,
					photo.lon_e7,
					photo.accuracy,
					photo.fetch_ts,
					photo.upload_date,
					owner
				],
			)?;
		}
		tx.commit()?;
		Ok(())
	}

	/// Total number of archived photos.
	///
	/// # Errors
	/// Returns an error on a storage failure.
	pub fn len(&self) -> Result<u64> {
		let conn = self.pool.get()?;
		let count: i64 = conn.query_row("SELECT COUNT(*) FROM photos", [], |row| row.get(0))?;
		Ok(count as u64)
	}

	/// Returns `true` if the store holds no photos.
	///
	/// # Errors
	/// Returns an error on a storage failure.
	pub fn is_empty(&self) -> Result<bool> {
		Ok(self.len()? == 0)
	}

	/// Streams every stored photo to `visit`, in primary-key order.
	/// Used by the scheduler to seed the density index and by the tile
	/// maker to seed the 2D point index.
	///
	/// # Errors
	/// Returns an error on a storage failure, or whatever `visit` returns.
	pub fn for_each(&self, mut visit: impl FnMut(PhotoRecord, &str) -> Result<()>) -> Result<()> {
		let conn = self.pool.get()?;
		let mut stmt = conn.prepare(
			"SELECT id, lat_e7, lon_e7, accuracy, fetch_ts, upload_date, owner FROM photos ORDER BY id",
		)?;
		let mut rows = stmt.query([])?;
		while let Some(row) = rows.next()? {
			let owner: String = row.get(6)?;
			let photo = PhotoRecord {
				id: row.get::<_, i64>(0)? as u64,
				lat_e7: row.get(1)?,
				lon_e7: row.get(2)?,
				accuracy: row.get(3)?,
				fetch_ts: row.get(4)?,
				upload_date: row.get(5)?,
			};
			visit(photo, &owner)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample(id: u64) -> (PhotoRecord, String) {
		(
			PhotoRecord { id, lat_e7: 500_000_000, lon_e7: 100_000_000, accuracy: 16, fetch_ts: 1000, upload_date: 900 },
			"alice".to_string(),
		)
	}

	#[test]
	fn put_and_count_roundtrip() {
		let store = PhotoStore::open_in_memory().unwrap();
		store.put_batch(&[sample(1), sample(2)]).unwrap();
		assert_eq!(store.len().unwrap(), 2);
	}

	#[test]
	fn re_fetch_overwrites_existing_row() {
		let store = PhotoStore::open_in_memory().unwrap();
		store.put_batch(&[sample(1)]).unwrap();
		let (mut updated, owner) = sample(1);
		updated.accuracy = 99;
		store.put_batch(&[(updated, owner)]).unwrap();

		assert_eq!(store.len().unwrap(), 1);
		let mut seen_accuracy = 0;
		store
			.for_each(|photo, _owner| {
				seen_accuracy = photo.accuracy;
				Ok(())
			})
			.unwrap();
		assert_eq!(seen_accuracy, 99);
	}

	#[test]
	fn for_each_visits_every_row() {
		let store = PhotoStore::open_in_memory().unwrap();
		store.put_batch(&[sample(1), sample(2), sample(3)]).unwrap();
		let mut count = 0;
		store
			.for_each(|_photo, _owner| {
				count += 1;
				Ok(())
			})
			.unwrap();
		assert_eq!(count, 3);
	}
}
