// src/common/hal_traits.rs

use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// A monotonic point in time as produced by an [`Ld2410Timer`].
///
/// Blanket-implemented for anything that is ordered and supports
/// `Instant + Duration` and `Instant - Instant`, which covers
/// `std::time::Instant` as well as simple tick counters.
pub trait Ld2410Instant:
    Copy + Ord + Add<Duration, Output = Self> + Sub<Self, Output = Duration>
{
}

impl<T> Ld2410Instant for T where
    T: Copy + Ord + Add<Duration, Output = T> + Sub<T, Output = Duration>
{
}

/// Abstraction for the clock and delay operations the protocol needs.
pub trait Ld2410Timer {
    /// Monotonic instant type returned by [`now`](Ld2410Timer::now).
    type Instant: Ld2410Instant;

    /// Returns the current monotonic time.
    fn now(&self) -> Self::Instant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Abstraction for the sensor's UART link (256000 baud, 8N1).
pub trait Ld2410Serial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to write a single byte.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if the transmit buffer is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;

    /// Number of received bytes waiting to be read.
    fn bytes_available(&mut self) -> Result<usize, Self::Error>;

    /// Attempts to read a single received byte.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if nothing has arrived yet.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Discards every byte already received but not yet read.
    fn clear_input_buffer(&mut self) -> Result<(), Self::Error>;
}

/// Pairs a serial port with a separate timer so the two can drive a
/// [`SyncLd2410`](crate::driver::SyncLd2410) together.
#[derive(Debug)]
pub struct SerialWithTimer<S, T> {
    pub serial: S,
    pub timer: T,
}

impl<S, T> SerialWithTimer<S, T> {
    pub fn new(serial: S, timer: T) -> Self {
        SerialWithTimer { serial, timer }
    }

    /// Splits back into the serial port and the timer.
    pub fn release(self) -> (S, T) {
        (self.serial, self.timer)
    }
}

impl<S: Ld2410Serial, T> Ld2410Serial for SerialWithTimer<S, T> {
    type Error = S::Error;

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        self.serial.write_byte(byte)
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.serial.flush()
    }

    fn bytes_available(&mut self) -> Result<usize, Self::Error> {
        self.serial.bytes_available()
    }

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        self.serial.read_byte()
    }

    fn clear_input_buffer(&mut self) -> Result<(), Self::Error> {
        self.serial.clear_input_buffer()
    }
}

impl<S, T: Ld2410Timer> Ld2410Timer for SerialWithTimer<S, T> {
    type Instant = T::Instant;

    fn now(&self) -> Self::Instant {
        self.timer.now()
    }

    fn delay_us(&mut self, us: u32) {
        self.timer.delay_us(us)
    }

    fn delay_ms(&mut self, ms: u32) {
        self.timer.delay_ms(ms)
    }
}
