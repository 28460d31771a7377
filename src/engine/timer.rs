/// Repeating timer polled from the frame update instead of a host callback.
/// Cancelling is synchronous: once `cancel` returns nothing fires again.
#[derive(Debug, Clone)]
pub struct Interval {
    period_ms: f64,
    elapsed_ms: f64,
    cancelled: bool,
}

impl Interval {
    pub fn new(period_ms: f64) -> Self {
        Interval {
            period_ms: period_ms.max(1.0),
            elapsed_ms: 0.0,
            cancelled: false,
        }
    }

    /// Number of periods completed during this poll.
    pub fn poll(&mut self, dt_ms: f64) -> u32 {
        if self.cancelled {
            return 0;
        }
        self.elapsed_ms += dt_ms.max(0.0);
        let mut fired = 0;
        while self.elapsed_ms >= self.period_ms {
            self.elapsed_ms -= self.period_ms;
            fired += 1;
        }
        fired
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.elapsed_ms = 0.0;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// One-shot timer, re-armed explicitly.
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    remaining_ms: Option<f64>,
}

impl Countdown {
    pub fn armed(delay_ms: f64) -> Self {
        Countdown {
            remaining_ms: Some(delay_ms.max(0.0)),
        }
    }

    pub fn arm(&mut self, delay_ms: f64) {
        self.remaining_ms = Some(delay_ms.max(0.0));
    }

    /// True exactly once, on the poll that reaches zero.
    pub fn poll(&mut self, dt_ms: f64) -> bool {
        match self.remaining_ms {
            Some(remaining) if remaining - dt_ms.max(0.0) <= 0.0 => {
                self.remaining_ms = None;
                true
            }
            Some(remaining) => {
                self.remaining_ms = Some(remaining - dt_ms.max(0.0));
                false
            }
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        self.remaining_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining_ms.is_some()
    }
}
