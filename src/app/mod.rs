// LogRecon - app/mod.rs
//
// Application layer: orchestration of a comparison run.
// Dependencies: core and platform layers.

pub mod compare;
