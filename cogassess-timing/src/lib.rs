pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock, TickRecorder, TickStats, Timestamp};
