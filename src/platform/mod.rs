// Rollbook - platform/mod.rs
//
// Platform abstraction layer: config/data directories and file output.
// Dependencies: util, directories, toml.
// Must NOT depend on: core, app.

pub mod config;
pub mod fs;
