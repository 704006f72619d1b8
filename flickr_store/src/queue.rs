//! The durable job queue: a SQLite table ordered `(priority DESC, id DESC)`
//! so depth-first traversal falls out of plain insertion order.

use crate::job::{Job, JobId, NewJob, SpatialBounds};
use anyhow::{Context, Result};
use r2d2::Pool;
use r2d2_sqlite::{SqliteConnectionManager, rusqlite::Row, rusqlite::params};
use std::path::Path;

/// A persistent, pooled handle to the queue's SQLite file.
pub struct JobQueue {
	pool: Pool<SqliteConnectionManager>,
}

impl JobQueue {
	/// Opens (creating if necessary) the queue database at `path`.
	///
	/// # Errors
	/// Returns an error if the connection pool or schema cannot be created.
	pub fn open(path: &Path) -> Result<Self> {
		let manager = SqliteConnectionManager::file(path);
		let pool = Pool::builder().max_size(4).build(manager).context("building queue connection pool")?;

		pool.get()?.execute_batch(
			"CREATE TABLE IF NOT EXISTS queue (
				id INTEGER PRIMARY KEY AUTOINCREMENT,
				priority INTEGER NOT NULL,
				overflow_expected INTEGER NOT NULL DEFAULT 0,
				flag INTEGER NOT NULL DEFAULT 0,
				min_lat REAL, max_lat REAL,
				min_lon REAL, max_lon REAL,
				min_date INTEGER, max_date INTEGER
			);
			CREATE INDEX IF NOT EXISTS queue_priority_id ON queue (priority DESC, id DESC);",
		)?;

		Ok(JobQueue { pool })
	}

	/// Opens an in-memory queue, used by tests that don't need a file on disk.
	///
	/// # Errors
	/// Returns an error if the schema cannot be created.
	pub fn open_in_memory() -> Result<Self> {
		let manager = SqliteConnectionManager::memory();
		let pool = Pool::builder().max_size(1).build(manager).context("building in-memory queue pool")?;

		pool.get()?.execute_batch(
			"CREATE TABLE queue (
				id INTEGER PRIMARY KEY AUTOINCREMENT,
				priority INTEGER NOT NULL,
				overflow_expected INTEGER NOT NULL DEFAULT 0,
				flag INTEGER NOT NULL DEFAULT 0,
				min_lat REAL, max_lat REAL,
				min_lon REAL, max_lon REAL,
				min_date INTEGER, max_date INTEGER
			);
			CREATE INDEX queue_priority_id ON queue (priority DESC, id DESC);",
		)?;

		Ok(JobQueue { pool })
	}

	/// Returns the job with the maximum `(priority, id)`, or `None` if the
	/// queue is empty.
	///
	/// # Errors
	/// Returns an error on a storage failure.
	pub fn peek_next(&self) -> Result<Option<Job>> {
		let conn = self.pool.get()?;
		let mut stmt = conn.prepare(
			"SELECT id, priority, overflow_expected, flag, min_lat, max_lat, min_lon, max_lon, min_date, max_date
			FROM queue ORDER BY priority DESC, id DESC LIMIT 1",
		)?;
		let mut rows = stmt.query([])?;
		match rows.next()? {
			Some(row) => Ok(Some(row_to_job(row)?)),
			None => Ok(None),
		}
	}

	/// Removes the job with the given id. A no-op if it's already gone (the
	/// downloader loop treats delete as idempotent when recovering after a
	/// crash mid-commit).
	///
	/// # Errors
	/// Returns an error on a storage failure.
	pub fn delete(&self, id: JobId) -> Result<()> {
		self.pool.get()?.execute("DELETE FROM queue WHERE id = ?1", params![id])?;
		Ok(())
	}

	/// Inserts a new job, returning its assigned id.
	///
	/// # Errors
	/// Returns an error on a storage failure.
	pub fn insert(&self, job: &NewJob) -> Result<JobId> {
		let conn = self.pool.get()?;
		match job {
			NewJob::Spatial { priority, overflow_expected, bounds } => {
				conn.execute(
					"INSERT INTO queue (priority, overflow_expected, flag, min_lat, max_lat, min_lon, max_lon, min_date, max_date)
					VALUES (?1, ?2, 0, ?3, ?4, ?5, ?6, ?7, ?8)",
					params![
						priority,
						*overflow_expected as i64,
						bounds.min_lat,
						bounds.max_lat,
						bounds.min_lon,
						bounds.max_lon,
						bounds.min_date,
						bounds.max_date
					],
				)?;
			}
			NewJob::Sentinel { priority } => {
				conn.execute("INSERT INTO queue (priority, flag) VALUES (?1, 1)", params![priority])?;
			}
		}
		Ok(conn.last_insert_rowid())
	}

	/// Number of jobs currently queued, used for stats reporting.
	///
	/// # Errors
	/// Returns an error on a storage failure.
	pub fn len(&self) -> Result<u64> {
		let conn = self.pool.get()?;
		let count: i64 = conn.query_row("SELECT COUNT(*) FROM queue", [], |row| row.get(0))?;
		Ok(count as u64)
	}

	/// Returns `true` if the queue currently holds no jobs.
	///
	/// # Errors
	/// Returns an error on a storage failure.
	pub fn is_empty(&self) -> Result<bool> {
		Ok(self.len()? == 0)
	}
}

fn row_to_job(row: &Row) -> r2d2_sqlite::rusqlite::Result<Job> {
	let id: JobId = row.get(0)?;
	let priority: i32 = row.get(1)?;
	let flag: i64 = row.get(3)?;
	if flag != 0 {
		return Ok(Job::Sentinel { id, priority });
	}
	let overflow_expected: i64 = row.get(2)?;
	let bounds = SpatialBounds {
		min_lat: row.get(4)?,
		max_lat: row.get(5)?,
		min_lon: row.get(6)?,
		max_lon: row.get(7)?,
		min_date: row.get(8)?,
		max_date: row.get(9)?,
	};
	Ok(Job::Spatial { id, priority, overflow_expected: overflow_expected != 0, bounds })
}
