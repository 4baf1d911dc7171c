// src/driver/sync_driver/mock.rs

//! Scripted transport shared by the driver tests.

use core::time::Duration;
use heapless::{Deque, Vec};

use crate::common::hal_traits::{Ld2410Serial, Ld2410Timer};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct MockInstant(pub u64);
impl core::ops::Add<Duration> for MockInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        let micros = u64::try_from(rhs.as_micros()).unwrap_or(u64::MAX);
        MockInstant(self.0.saturating_add(micros))
    }
}
impl core::ops::Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct MockCommError;

/// Bytes the "sensor" sends. Each scripted burst is released into the
/// receive buffer when the driver clears it, i.e. right after the scan starts.
pub(crate) struct MockInterface {
    pub current_time_us: u64,
    pub rx: Deque<u8, 256>,
    pub bursts: Deque<Vec<u8, 128>, 8>,
    pub written: Vec<u8, 512>,
    pub clear_calls: u32,
    pub flush_calls: u32,
    pub fail_writes: bool,
    pub fail_reads: bool,
}

impl MockInterface {
    pub fn new() -> Self {
        MockInterface {
            current_time_us: 0,
            rx: Deque::new(),
            bursts: Deque::new(),
            written: Vec::new(),
            clear_calls: 0,
            flush_calls: 0,
            fail_writes: false,
            fail_reads: false,
        }
    }

    /// Bytes already waiting before the next scan; the scan must discard them.
    pub fn stage_stale(&mut self, data: &[u8]) {
        for byte in data {
            self.rx.push_back(*byte).unwrap();
        }
    }

    /// Bytes the sensor sends once the next scan has started.
    pub fn stage_burst(&mut self, data: &[u8]) {
        let burst = Vec::from_slice(data).unwrap();
        self.bursts.push_back(burst).unwrap();
    }

    pub fn advance_time(&mut self, us: u64) {
        self.current_time_us = self.current_time_us.saturating_add(us);
    }
}

impl Ld2410Timer for MockInterface {
    type Instant = MockInstant;
    fn now(&self) -> MockInstant {
        MockInstant(self.current_time_us)
    }
    fn delay_us(&mut self, us: u32) {
        self.advance_time(us as u64);
    }
    fn delay_ms(&mut self, ms: u32) {
        self.advance_time((ms as u64) * 1000);
    }
}

impl Ld2410Serial for MockInterface {
    type Error = MockCommError;

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), MockCommError> {
        if self.fail_writes {
            return Err(nb::Error::Other(MockCommError));
        }
        self.written.push(byte).map_err(|_| nb::Error::Other(MockCommError))
    }

    fn flush(&mut self) -> nb::Result<(), MockCommError> {
        self.flush_calls += 1;
        Ok(())
    }

    fn bytes_available(&mut self) -> Result<usize, MockCommError> {
        Ok(self.rx.len())
    }

    fn read_byte(&mut self) -> nb::Result<u8, MockCommError> {
        if self.fail_reads {
            return Err(nb::Error::Other(MockCommError));
        }
        self.rx.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn clear_input_buffer(&mut self) -> Result<(), MockCommError> {
        self.clear_calls += 1;
        self.rx.clear();
        if let Some(burst) = self.bursts.pop_front() {
            for byte in burst {
                self.rx.push_back(byte).map_err(|_| MockCommError)?;
            }
        }
        Ok(())
    }
}
