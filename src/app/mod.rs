// Rollbook - app/mod.rs
//
// Application layer: ingestion and dashboard state management.
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod ingest;
pub mod state;
