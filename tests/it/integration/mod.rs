//! Integration tests for mathgrid.
//!
//! These tests drive the controller the way a host would and check whole
//! workflows end-to-end.

mod persistence_tests;
