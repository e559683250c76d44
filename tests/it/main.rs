//! Single test binary entry point.
//!
//! All integration tests compile into one binary to keep linking cheap.
//!
//! Structure:
//! - helpers: `TestDiagramBuilder` and assertion helpers
//! - integration: Multi-step gesture and persistence workflows
//! - unit: Single-component tests against the public API

mod integration;
mod unit;
