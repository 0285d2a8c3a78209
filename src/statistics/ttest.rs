//! Online Welch's t-test.
//!
//! Each class keeps a count, running mean and Welford's M2 (sum of squared
//! deviations from the current mean). No raw samples are retained, and the
//! update stays stable over millions of samples where a naive sum of squares
//! would cancel.

use crate::types::Class;

/// Running per-class statistics for one t-test.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TContext {
    mean: [f64; 2],
    m2: [f64; 2],
    n: [u64; 2],
}

impl TContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sample of the given class.
    #[inline]
    pub fn push(&mut self, x: f64, class: Class) {
        let c = class.index();
        self.n[c] += 1;
        let delta = x - self.mean[c];
        self.mean[c] += delta / self.n[c] as f64;
        self.m2[c] += delta * (x - self.mean[c]);
    }

    /// Samples seen for `class`.
    pub fn count(&self, class: Class) -> u64 {
        self.n[class.index()]
    }

    /// Samples seen across both classes.
    pub fn total(&self) -> u64 {
        self.n[0] + self.n[1]
    }

    /// Running mean for `class` (0 when empty).
    pub fn mean(&self, class: Class) -> f64 {
        self.mean[class.index()]
    }

    /// Sample variance for `class` (n-1 denominator, 0 below two samples).
    pub fn variance(&self, class: Class) -> f64 {
        let c = class.index();
        if self.n[c] < 2 {
            0.0
        } else {
            self.m2[c] / (self.n[c] - 1) as f64
        }
    }

    /// Welch's t-statistic, `(mean0 - mean1) / sqrt(var0/n0 + var1/n1)`.
    ///
    /// Returns 0 while either class has fewer than two samples, and for the
    /// degenerate 0/0 case. A mean difference over zero variance is ±∞.
    pub fn t_compute(&self) -> f64 {
        if self.n[0] < 2 || self.n[1] < 2 {
            return 0.0;
        }
        let num = self.mean[0] - self.mean[1];
        let den = (self.variance(Class::Fixed) / self.n[0] as f64
            + self.variance(Class::Random) / self.n[1] as f64)
            .sqrt();
        let t = num / den;
        if t.is_nan() {
            0.0
        } else {
            t
        }
    }
}
