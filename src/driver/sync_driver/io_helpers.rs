// src/driver/sync_driver/io_helpers.rs

use super::SyncLd2410; // Access SyncLd2410 definition
use crate::common::{
    constants::POLL_INTERVAL_US,
    error::Ld2410Error,
    frame::{FrameBuffer, FrameFamily},
    hal_traits::{Ld2410Serial, Ld2410Timer},
};
use core::time::Duration;
use log::{debug, trace};
use nb::Result as NbResult;

// Implementation block for I/O related helpers
impl<IF> SyncLd2410<IF>
where
    IF: Ld2410Serial + Ld2410Timer,
{
    /// Executes a non-blocking I/O operation (`f`) repeatedly until it
    /// stops returning `WouldBlock`, returning the final result or a timeout error.
    pub(super) fn execute_blocking_io_with_timeout<FN, T>(
        &mut self,
        timeout: Duration,
        mut f: FN,
    ) -> Result<T, Ld2410Error<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
    {
        let deadline = self.interface.now() + timeout;

        loop {
            match f(&mut self.interface) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    if self.interface.now() >= deadline {
                        return Err(Ld2410Error::Timeout);
                    }
                    self.interface.delay_us(POLL_INTERVAL_US);
                }
                Err(nb::Error::Other(e)) => return Err(Ld2410Error::Io(e)),
            }
        }
    }

    /// Writes a complete frame and waits for the transmitter to drain.
    pub(super) fn send_frame_bytes(&mut self, frame: &[u8]) -> Result<(), Ld2410Error<IF::Error>> {
        let write_timeout = self.config.write_timeout;

        for byte in frame {
            self.execute_blocking_io_with_timeout(write_timeout, |iface| iface.write_byte(*byte))?;
        }
        self.execute_blocking_io_with_timeout(write_timeout, |iface| iface.flush())?;

        Ok(())
    }

    /// Frame scanner: accumulates received bytes until `family`'s header has
    /// been seen and the window ends with its trailer.
    ///
    /// The receive buffer is cleared first so a stale fragment cannot end
    /// the scan. The deadline is checked against the monotonic clock on
    /// every iteration. When the window is full the oldest byte is dropped.
    pub(super) fn scan_frame(
        &mut self,
        family: FrameFamily,
        timeout: Duration,
    ) -> Result<FrameBuffer, Ld2410Error<IF::Error>> {
        let deadline = self.interface.now() + timeout;
        self.interface
            .clear_input_buffer()
            .map_err(Ld2410Error::Io)?;

        let mut window = FrameBuffer::new();
        loop {
            let available = self
                .interface
                .bytes_available()
                .map_err(Ld2410Error::Io)?;

            if available > 0 {
                match self.interface.read_byte() {
                    Ok(byte) => {
                        if window.is_full() {
                            let dropped = window.remove(0);
                            trace!("Scan window full, dropping {:02X}", dropped);
                        }
                        window.push(byte);
                        if family.is_complete(&window) {
                            debug!("Scanned {:?} frame: {:02X?}", family, window.as_slice());
                            return Ok(window);
                        }
                    }
                    Err(nb::Error::WouldBlock) => {}
                    Err(nb::Error::Other(e)) => return Err(Ld2410Error::Io(e)),
                }
            }

            if self.interface.now() >= deadline {
                debug!(
                    "No {:?} frame before deadline, {} bytes buffered",
                    family,
                    window.len()
                );
                return Err(Ld2410Error::Timeout);
            }
            if available == 0 {
                self.interface.delay_us(POLL_INTERVAL_US);
            }
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{frame::encode_frame, Config, FrameDefect};
    use crate::driver::sync_driver::mock::{MockCommError, MockInterface, MockInstant};

    const ENTER_ACK: [u8; 14] = [
        0xFD, 0xFC, 0xFB, 0xFA, 0x04, 0x00, 0xFF, 0x01, 0x00, 0x00, 0x04, 0x03, 0x02, 0x01,
    ];

    fn driver(mock_if: MockInterface) -> SyncLd2410<MockInterface> {
        SyncLd2410::new(mock_if, Config::default())
    }

    #[test]
    fn test_execute_blocking_io_with_timeout() {
        let mut ld = driver(MockInterface::new());

        let mut calls = 0;
        let result_ok: Result<i32, _> =
            ld.execute_blocking_io_with_timeout(Duration::from_millis(10), |iface| {
                calls += 1;
                iface.advance_time(1_000);
                if calls < 4 {
                    Err(nb::Error::WouldBlock)
                } else {
                    Ok(123)
                }
            });
        assert!(matches!(result_ok, Ok(123)));
        assert_eq!(calls, 4);

        ld.interface.current_time_us = 0;
        let result_timeout: Result<(), _> =
            ld.execute_blocking_io_with_timeout(Duration::from_millis(5), |iface| {
                iface.advance_time(2_000);
                Err(nb::Error::WouldBlock)
            });
        assert!(matches!(result_timeout, Err(Ld2410Error::Timeout)));
        assert!(ld.interface.current_time_us >= 5_000);

        let result_io_err: Result<(), _> =
            ld.execute_blocking_io_with_timeout(Duration::from_millis(10), |_| {
                Err(nb::Error::Other(MockCommError))
            });
        assert!(matches!(result_io_err, Err(Ld2410Error::Io(MockCommError))));
    }

    #[test]
    fn test_send_frame_bytes_success() {
        let mut ld = driver(MockInterface::new());
        let result = ld.send_frame_bytes(&[0xFD, 0xFC, 0xFB, 0xFA]);
        assert!(result.is_ok());
        assert_eq!(ld.interface.written.as_slice(), &[0xFD, 0xFC, 0xFB, 0xFA]);
        assert_eq!(ld.interface.flush_calls, 1);
    }

    #[test]
    fn test_send_frame_bytes_io_error() {
        let mut mock_if = MockInterface::new();
        mock_if.fail_writes = true;
        let mut ld = driver(mock_if);
        let result = ld.send_frame_bytes(&[0x01]);
        assert!(matches!(result, Err(Ld2410Error::Io(MockCommError))));
    }

    #[test]
    fn test_scan_frame_success() {
        let mut mock_if = MockInterface::new();
        mock_if.stage_burst(&ENTER_ACK);
        let mut ld = driver(mock_if);

        let frame = ld.scan_frame(FrameFamily::Command, Duration::from_millis(100)).unwrap();
        assert_eq!(frame.as_slice(), &ENTER_ACK);
        assert_eq!(ld.interface.clear_calls, 1);
    }

    #[test]
    fn test_unbounded_timeout_saturates() {
        let mut mock_if = MockInterface::new();
        mock_if.current_time_us = 1_000;
        mock_if.stage_burst(&ENTER_ACK);
        let mut ld = driver(mock_if);

        let frame = ld.scan_frame(FrameFamily::Command, Duration::MAX).unwrap();
        assert_eq!(frame.as_slice(), &ENTER_ACK);

        let mut polls = 0;
        let result: Result<u8, _> = ld.execute_blocking_io_with_timeout(Duration::MAX, |_| {
            polls += 1;
            if polls < 3 {
                Err(nb::Error::WouldBlock)
            } else {
                Ok(7)
            }
        });
        assert!(matches!(result, Ok(7)));
    }

    #[test]
    fn test_scan_frame_keeps_leading_garbage() {
        let mut mock_if = MockInterface::new();
        let mut burst = [0u8; 17];
        burst[..3].copy_from_slice(&[0x11, 0x22, 0x33]);
        burst[3..].copy_from_slice(&ENTER_ACK);
        mock_if.stage_burst(&burst);
        let mut ld = driver(mock_if);

        let frame = ld.scan_frame(FrameFamily::Command, Duration::from_millis(100)).unwrap();
        assert_eq!(frame.as_slice(), &burst);
        // the codec, not the scanner, rejects the leading bytes
        let parsed: Result<_, Ld2410Error> =
            crate::common::frame::Frame::parse(FrameFamily::Command, &frame);
        assert!(matches!(parsed, Err(Ld2410Error::MalformedFrame(FrameDefect::BadHeader))));
    }

    #[test]
    fn test_scan_frame_discards_stale_bytes() {
        let mut mock_if = MockInterface::new();
        mock_if.stage_stale(&ENTER_ACK);
        let mut ld = driver(mock_if);

        let result = ld.scan_frame(FrameFamily::Command, Duration::from_millis(10));
        assert!(matches!(result, Err(Ld2410Error::Timeout)));
    }

    #[test]
    fn test_scan_frame_times_out_at_or_after_deadline() {
        let mut ld = driver(MockInterface::new());
        let timeout = Duration::from_millis(25);
        let start = ld.interface.now();

        let result = ld.scan_frame(FrameFamily::Telemetry, timeout);
        assert!(matches!(result, Err(Ld2410Error::Timeout)));
        assert!(ld.interface.now() - start >= timeout);
        assert!(ld.interface.now() < MockInstant(start.0 + 26_000));
    }

    #[test]
    fn test_scan_frame_ignores_other_family() {
        let mut mock_if = MockInterface::new();
        mock_if.stage_burst(&ENTER_ACK);
        let mut ld = driver(mock_if);

        let result = ld.scan_frame(FrameFamily::Telemetry, Duration::from_millis(10));
        assert!(matches!(result, Err(Ld2410Error::Timeout)));
    }

    #[test]
    fn test_scan_frame_slides_past_long_garbage() {
        let mut mock_if = MockInterface::new();
        let report = encode_frame::<()>(
            FrameFamily::Telemetry,
            &[0x02, 0xAA, 0x00, 0, 0, 0, 0, 0, 0, 0, 0, 0x55, 0x00],
        )
        .unwrap();
        let mut burst: heapless::Vec<u8, 128> = heapless::Vec::new();
        burst.extend_from_slice(&[0x5A; 100]).unwrap();
        burst.extend_from_slice(&report).unwrap();
        mock_if.stage_burst(&burst);
        let mut ld = driver(mock_if);

        let frame = ld.scan_frame(FrameFamily::Telemetry, Duration::from_millis(100)).unwrap();
        assert!(frame.ends_with(&report));
        assert!(frame.is_full());
    }

    #[test]
    fn test_scan_frame_read_error() {
        let mut mock_if = MockInterface::new();
        mock_if.stage_burst(&ENTER_ACK);
        mock_if.fail_reads = true;
        let mut ld = driver(mock_if);

        let result = ld.scan_frame(FrameFamily::Command, Duration::from_millis(10));
        assert!(matches!(result, Err(Ld2410Error::Io(MockCommError))));
    }
}
