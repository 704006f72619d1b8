pub mod build_queue;
pub mod download;
pub mod make_tiles;
