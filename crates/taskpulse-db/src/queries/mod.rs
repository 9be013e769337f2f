//! Database query implementations.

pub mod tasks;
