//! Unit tests for mathgrid.

mod graph_tests;
mod hit_testing_tests;
mod perf_tests;
mod settings_tests;
