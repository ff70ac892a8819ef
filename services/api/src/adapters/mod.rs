//! services/api/src/adapters/mod.rs
//!
//! Concrete implementations of the core `UserStore` port. The two adapters
//! are interchangeable; `bin/api.rs` picks one at startup based on config.

pub mod db;
pub mod memory;

pub use db::PgStore;
pub use memory::MemoryStore;
