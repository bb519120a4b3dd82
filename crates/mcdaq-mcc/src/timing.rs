//! Acquisition start epoch.

/// Timestamp pair captured immediately before and after the driver's
/// background-scan start call.
///
/// `post_start` is the epoch all relative sample offsets are measured
/// from; `post_start - pre_start` bounds the timing uncertainty of that
/// epoch and is reported as the confidence interval on every derived
/// event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AcquisitionEpoch {
    pub pre_start: f64,
    pub post_start: f64,
}

impl AcquisitionEpoch {
    pub fn new(pre_start: f64, post_start: f64) -> Self {
        Self {
            pre_start,
            post_start,
        }
    }

    /// Maximum timing uncertainty of the epoch.
    pub fn confidence_interval(&self) -> f64 {
        self.post_start - self.pre_start
    }

    /// Reset to `(0.0, 0.0)`, e.g. when acquisition stops.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_cleared(&self) -> bool {
        self.pre_start == 0.0 && self.post_start == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_interval_is_capture_window() {
        let epoch = AcquisitionEpoch::new(99.998, 100.0);
        assert!((epoch.confidence_interval() - 0.002).abs() < 1e-12);
    }

    #[test]
    fn clear_resets_to_zero_pair() {
        let mut epoch = AcquisitionEpoch::new(1.0, 2.0);
        assert!(!epoch.is_cleared());
        epoch.clear();
        assert!(epoch.is_cleared());
        assert_eq!(epoch, AcquisitionEpoch::default());
    }
}
