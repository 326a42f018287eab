//! Progress reporting and cooperative cancellation.

/// Receives progress once per destination scanline. Returning `false`
/// cancels the warp.
pub trait Progress {
    fn report(&mut self, fraction: f64, message: &str) -> bool;
}

impl<F> Progress for F
where
    F: FnMut(f64, &str) -> bool,
{
    fn report(&mut self, fraction: f64, message: &str) -> bool {
        self(fraction, message)
    }
}

/// Reporter that ignores progress and never cancels.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _fraction: f64, _message: &str) -> bool {
        true
    }
}

/// Maps local scan progress into a caller-defined `[base, base + scale]`
/// range so a chunk can report as part of a larger operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressRange {
    pub base: f64,
    pub scale: f64,
}

impl Default for ProgressRange {
    fn default() -> Self {
        Self {
            base: 0.0,
            scale: 1.0,
        }
    }
}

impl ProgressRange {
    pub fn new(base: f64, scale: f64) -> Self {
        Self { base, scale }
    }

    /// Global fraction after `done` of `total` rows.
    pub fn fraction(&self, done: usize, total: usize) -> f64 {
        if total == 0 {
            return self.base + self.scale;
        }
        self.base + self.scale * (done as f64 / total as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fraction_maps_into_range() {
        let range = ProgressRange::new(0.5, 0.25);
        assert_relative_eq!(range.fraction(0, 4), 0.5);
        assert_relative_eq!(range.fraction(2, 4), 0.625);
        assert_relative_eq!(range.fraction(4, 4), 0.75);
        assert_relative_eq!(range.fraction(0, 0), 0.75);
    }

    #[test]
    fn test_closure_reporter() {
        let mut seen = Vec::new();
        let mut reporter = |f: f64, _msg: &str| {
            seen.push(f);
            f < 0.5
        };
        assert!(reporter.report(0.25, ""));
        assert!(!reporter.report(0.5, ""));
        assert_eq!(seen, [0.25, 0.5]);
    }

    #[test]
    fn test_no_progress_continues() {
        assert!(NoProgress.report(1.0, "done"));
    }
}
