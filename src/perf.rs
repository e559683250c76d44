//! Timing instrumentation for hot paths.
//!
//! Pointer handlers and hit tests run on every pointer event, so they carry
//! `profile_scope!` markers. The markers compile to nothing unless the
//! `profiling` feature is enabled:
//!
//! ```toml
//! [dependencies]
//! mathgrid = { features = ["profiling"] }
//! ```
//!
//! ```ignore
//! fn hit_test() {
//!     profile_scope!("hit_test");
//!     // ... work ...
//! }
//! ```

use std::time::Instant;
use tracing::warn;
#[cfg(feature = "profiling")]
use tracing::trace;

/// Budget for a single pointer event before a warning is logged
pub const DEFAULT_THRESHOLD_MS: f64 = 4.0;

/// Profile a scope with the given name. Zero-cost when profiling is disabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::for_profiling($name);
        #[cfg(not(feature = "profiling"))]
        let _ = $name;
    };
    ($name:expr, $threshold_ms:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, $threshold_ms);
        #[cfg(not(feature = "profiling"))]
        let _ = ($name, $threshold_ms);
    };
}

pub use crate::profile_scope;

/// RAII timer: logs on drop when the scope ran longer than its threshold.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
}

impl ScopedTimer {
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        Self {
            name,
            start: Instant::now(),
            threshold_ms,
        }
    }

    pub fn for_profiling(name: &'static str) -> Self {
        Self::new(name, DEFAULT_THRESHOLD_MS)
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed = self.elapsed_ms();
        #[cfg(feature = "profiling")]
        trace!(operation = self.name, elapsed_ms = format!("{:.3}", elapsed), "scope");
        if elapsed > self.threshold_ms {
            warn!(
                operation = self.name,
                elapsed_ms = format!("{:.2}", elapsed),
                threshold_ms = format!("{:.2}", self.threshold_ms),
                "Slow operation"
            );
        }
    }
}
