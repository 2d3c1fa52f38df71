// Rollbook - lib.rs
//
// Library entry point. Everything except argument parsing lives here so
// the derive engine can be driven from tests or another front end.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
