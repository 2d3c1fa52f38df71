// Rollbook - core/mod.rs
//
// Core business logic layer: pure derive functions over an immutable
// RecordSet snapshot.
// Must NOT depend on: app, platform, or any filesystem access.

pub mod counts;
pub mod date;
pub mod export;
pub mod fields;
pub mod filter;
pub mod model;
pub mod options;
pub mod search;
