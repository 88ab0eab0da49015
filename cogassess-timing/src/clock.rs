use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Nanoseconds since the clock's origin.
pub type Timestamp = u64;

/// Monotonic time source that every deadline in a session is measured against.
///
/// Sessions never sleep on a clock: they store a `Timestamp` anchor and compare
/// it with `now()` the next time they are observed.
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> Timestamp;

    fn elapsed(&self, ts: Timestamp) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }
}

#[derive(Debug, Clone)]
pub struct MonotonicClock {
    pub start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        self.start.elapsed().as_nanos() as u64
    }
}

/// Hand-driven clock. Clones share the same time, so a test can keep one handle
/// and advance the clock owned by a state machine.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, d: Duration) {
        self.now.fetch_add(d.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickStats {
    pub samples: usize,
    pub average_interval_ns: f64,
    pub jitter_ns: f64,
    pub min_interval_ns: f64,
    pub max_interval_ns: f64,
    pub effective_hz: f64,
}

/// Rolling window of observed tick intervals.
///
/// The worst observed interval is the effective bound on how late a timeout
/// or a time gate can be detected.
#[derive(Debug, Clone)]
pub struct TickRecorder {
    intervals: VecDeque<Duration>,
    max_samples: usize,
}

impl TickRecorder {
    pub fn new(max_samples: usize) -> Self {
        Self {
            intervals: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
        }
    }

    pub fn record(&mut self, d: Duration) {
        if self.intervals.len() >= self.max_samples {
            self.intervals.pop_front();
        }
        self.intervals.push_back(d);
    }

    pub fn stats(&self) -> TickStats {
        let times: Vec<f64> = self
            .intervals
            .iter()
            .map(|d| d.as_nanos() as f64)
            .collect();
        if times.is_empty() {
            return TickStats::default();
        }
        let avg = times.iter().sum::<f64>() / times.len() as f64;
        let var = times.iter().map(|x| (x - avg).powi(2)).sum::<f64>() / times.len() as f64;
        let min = times.iter().copied().fold(f64::INFINITY, f64::min);
        let max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        TickStats {
            samples: times.len(),
            average_interval_ns: avg,
            jitter_ns: var.sqrt(),
            min_interval_ns: min,
            max_interval_ns: max,
            effective_hz: if avg > 0.0 { 1e9 / avg } else { 0.0 },
        }
    }
}

impl Default for TickRecorder {
    fn default() -> Self {
        Self::new(1000)
    }
}
