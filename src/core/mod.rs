// LogRecon - core/mod.rs
//
// Core business logic layer: extraction, collection building,
// reconciliation, and rendering.
// Must NOT depend on: platform, app, or read files directly.

pub mod collect;
pub mod export;
pub mod extract;
pub mod model;
pub mod reconcile;
pub mod report;
pub mod split;
