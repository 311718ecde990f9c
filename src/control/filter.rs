// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Moving-average filter over a fixed ring of samples.

/// Ring buffer of the last `N` samples with a mean over the most recent `window` of them.
#[derive(Debug, Clone)]
pub struct MeanFilter<const N: usize> {
    buf: [f32; N],
    /// Slot the next sample is written to.
    next: usize,
    /// Number of valid samples, saturates at `N`.
    filled: usize,
    window: usize,
}

impl<const N: usize> MeanFilter<N> {
    /// Create a filter averaging the last `window` samples (clamped to `1..=N`).
    pub fn new(window: usize) -> Self {
        Self {
            buf: [0.0; N],
            next: 0,
            filled: 0,
            window: window.clamp(1, N),
        }
    }

    /// Push a sample and return the updated mean.
    pub fn update(&mut self, sample: f32) -> f32 {
        self.buf[self.next] = sample;
        self.next = (self.next + 1) % N;
        self.filled = (self.filled + 1).min(N);
        self.mean()
    }

    /// Mean of the most recent `window` samples, or of all of them while fewer have arrived.
    ///
    /// 0.0 before the first sample.
    pub fn mean(&self) -> f32 {
        let count = self.window.min(self.filled);
        if count == 0 {
            return 0.0;
        }

        let mut sum = 0.0;
        let mut idx = self.next;
        for _ in 0..count {
            idx = if idx == 0 { N - 1 } else { idx - 1 };
            sum += self.buf[idx];
        }
        sum / count as f32
    }

    #[inline]
    pub fn window(&self) -> usize {
        self.window
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.filled
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_filter_reads_zero() {
        let f = MeanFilter::<8>::new(4);
        assert!(f.is_empty());
        assert_eq!(f.mean(), 0.0);
    }

    #[test]
    fn averages_partial_window() {
        let mut f = MeanFilter::<8>::new(4);
        assert_relative_eq!(f.update(2.0), 2.0);
        assert_relative_eq!(f.update(4.0), 3.0);
        assert_eq!(f.len(), 2);
    }

    #[test]
    fn window_slides_across_wraparound() {
        let mut f = MeanFilter::<5>::new(3);
        for x in 1..=7 {
            f.update(x as f32);
        }
        // last three: 5, 6, 7
        assert_relative_eq!(f.mean(), 6.0);
        assert_eq!(f.len(), 5);
    }

    #[test]
    fn window_is_clamped_to_capacity() {
        assert_eq!(MeanFilter::<4>::new(0).window(), 1);
        assert_eq!(MeanFilter::<4>::new(16).window(), 4);
    }
}
