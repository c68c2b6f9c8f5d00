//! Storage layer for passvault
//!
//! Binary file storage with atomic writes and a single-writer lock.

pub mod file_io;
pub mod lock;

pub use file_io::{read_bytes, read_json, write_bytes_atomic};
pub use lock::VaultLock;
