// LogRecon - platform/mod.rs
//
// Platform layer: filesystem reads and configuration.
// Dependencies: standard library, directories, memmap2, core model types.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
