//! In-process storage
//!
//! Keeps patients and events in memory for the lifetime of the process. Used
//! by `database_target = "memory"` and throughout the test suite.

pub mod adapter;

pub use adapter::MemoryStore;
