//! Unit tests for perf module.

use mathgrid::perf::{DEFAULT_THRESHOLD_MS, ScopedTimer};

#[test]
fn test_scoped_timer_creation() {
    // high threshold: dropping must not warn or panic
    let timer = ScopedTimer::new("test_op", 1000.0);
    assert_eq!(timer.name(), "test_op");
    assert!(timer.elapsed_ms() >= 0.0);
}

#[test]
fn test_profiling_timer_uses_default_threshold() {
    let timer = ScopedTimer::for_profiling("hit_test");
    assert!(timer.elapsed_ms() < DEFAULT_THRESHOLD_MS * 1000.0);
}
