// src/common/hal_adapter.rs

//! Timer adapter for embedded-hal 1.0 targets.

use core::ops::{Add, Sub};
use core::time::Duration;
use embedded_hal::delay::DelayNs;

use super::hal_traits::Ld2410Timer;

/// Microsecond tick count from a free-running monotonic counter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickInstant(pub u64);

impl Add<Duration> for TickInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        let micros = u64::try_from(rhs.as_micros()).unwrap_or(u64::MAX);
        TickInstant(self.0.saturating_add(micros))
    }
}

impl Sub<TickInstant> for TickInstant {
    type Output = Duration;
    fn sub(self, rhs: TickInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

/// Combines a HAL delay provider with a microsecond tick source
/// (e.g. a DWT cycle counter or a timer peripheral scaled to µs).
pub struct HalTimer<D, C> {
    delay: D,
    ticks_us: C,
}

impl<D, C> HalTimer<D, C>
where
    D: DelayNs,
    C: Fn() -> u64,
{
    pub fn new(delay: D, ticks_us: C) -> Self {
        HalTimer { delay, ticks_us }
    }

    pub fn release(self) -> (D, C) {
        (self.delay, self.ticks_us)
    }
}

impl<D, C> Ld2410Timer for HalTimer<D, C>
where
    D: DelayNs,
    C: Fn() -> u64,
{
    type Instant = TickInstant;

    fn now(&self) -> TickInstant {
        TickInstant((self.ticks_us)())
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
