//! Storyline Key-Value Store
//!
//! Flat byte-valued key-value storage used for per-caller state.
//! The durable backend speaks the PostgreSQL wire protocol (LumaDB);
//! an in-memory backend serves local runs and tests.

mod error;
mod memory;
mod pool;
mod store;

pub use error::{KvError, Result};
pub use memory::MemoryKvStore;
pub use pool::{KvPool, PoolConfig, PoolStats};
pub use store::{KvStore, LumaKvStore};
