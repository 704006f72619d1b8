//! Durable and ephemeral storage for the photo archive pipeline.
//!
//! `photo_store` and `queue` are the two durable, SQLite-backed stores shared
//! across process runs. `density_index` and `point_index` are ephemeral
//! in-memory R-trees, rebuilt fresh at the start of each scheduling or
//! tile-rendering run from a Morton-sorted stream for bulk-load locality.

pub mod density_index;
pub mod job;
pub mod photo_store;
pub mod point_index;
pub mod queue;

pub use density_index::{Box3, DensityIndex, DensityPoint};
pub use job::{Job, JobId, NewJob, SpatialBounds};
pub use photo_store::{PhotoRecord, PhotoStore};
pub use point_index::{Box2, PointIndex, TilePoint};
pub use queue::JobQueue;
