// src/common/std_timer.rs

use core::ops::{Add, Sub};
use std::thread;
use std::time::{Duration, Instant};

use super::hal_traits::Ld2410Timer;

/// Time elapsed since the owning [`StdTimer`] was created.
///
/// Arithmetic saturates, so `now + Duration::MAX` is a deadline that is
/// never reached rather than a panic.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StdInstant(Duration);

impl Add<Duration> for StdInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        StdInstant(self.0.saturating_add(rhs))
    }
}

impl Sub<StdInstant> for StdInstant {
    type Output = Duration;
    fn sub(self, rhs: StdInstant) -> Duration {
        self.0.saturating_sub(rhs.0)
    }
}

/// Host clock: `std::time::Instant` plus `thread::sleep`.
#[derive(Debug, Copy, Clone)]
pub struct StdTimer {
    origin: Instant,
}

impl StdTimer {
    pub fn new() -> Self {
        StdTimer {
            origin: Instant::now(),
        }
    }
}

impl Default for StdTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Ld2410Timer for StdTimer {
    type Instant = StdInstant;

    fn now(&self) -> StdInstant {
        StdInstant(self.origin.elapsed())
    }

    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(us as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(ms as u64));
    }
}
