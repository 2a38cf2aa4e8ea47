use std::time::Duration;

/// Shortest period a typing timer runs at. Zero would emit unboundedly many
/// characters per turn.
pub(crate) const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Fixed-period timer fed by externally measured elapsed time.
#[derive(Debug, Clone)]
pub(crate) struct IntervalTimer {
    period: Duration,
    elapsed: Duration,
}

impl IntervalTimer {
    #[must_use]
    pub(crate) fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            elapsed: Duration::ZERO,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    pub(crate) fn advance(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta);
    }

    /// Consume one elapsed period, if there is one.
    pub(crate) fn take_due(&mut self) -> bool {
        if self.elapsed >= self.period {
            self.elapsed -= self.period;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub(crate) fn period(&self) -> Duration {
        self.period
    }
}
