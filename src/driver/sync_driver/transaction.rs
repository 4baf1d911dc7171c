// src/driver/sync_driver/transaction.rs

use super::SyncLd2410;
use crate::common::{
    command::{parse_reply, CommandReply, CommandRequest},
    error::Ld2410Error,
    frame::FrameFamily,
    hal_traits::{Ld2410Serial, Ld2410Timer},
};
use core::time::Duration;
use log::{debug, error, warn};

impl<IF> SyncLd2410<IF>
where
    IF: Ld2410Serial + Ld2410Timer,
{
    /// One command exchange: send `request`, scan for an acknowledgement
    /// and validate it against the request.
    ///
    /// There are no retries. A timeout or a rejected reply is returned as is.
    pub(super) fn exchange(
        &mut self,
        request: &CommandRequest,
        timeout: Duration,
    ) -> Result<CommandReply, Ld2410Error<IF::Error>> {
        let frame = request.serialize::<IF::Error>()?;
        debug!("Sending command {:#06X}: {:02X?}", request.word(), frame.as_slice());

        self.send_frame_bytes(&frame)?;

        let raw = match self.scan_frame(FrameFamily::Command, timeout) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("No acknowledgement for command {:#06X}: {:?}", request.word(), e);
                return Err(e);
            }
        };

        let reply = parse_reply::<IF::Error>(&raw, request).map_err(|e| {
            match e {
                Ld2410Error::CommandFailed { status } => {
                    error!("Command {:#06X} failed with status {:#06X}", request.word(), status)
                }
                _ => warn!("Rejected acknowledgement for command {:#06X}: {:?}", request.word(), e),
            }
            e
        })?;
        debug!(
            "Command {:#06X} acknowledged with {:#06X}, {} result bytes",
            request.word(),
            reply.echoed(),
            reply.result_payload.len()
        );

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Config, FrameDefect};
    use crate::driver::sync_driver::mock::{MockCommError, MockInterface};
    use log::{Level, Log, Metadata, Record};
    use std::sync::Mutex;

    /// Keeps every record; tests share it, so assertions only look for their own lines.
    struct CaptureLogger {
        records: Mutex<Vec<(Level, String)>>,
    }

    impl Log for CaptureLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            if let Ok(mut records) = self.records.lock() {
                records.push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger {
        records: Mutex::new(Vec::new()),
    };

    fn capture_logs() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);
    }

    fn logged(level: Level, text: &str) -> bool {
        LOGGER
            .records
            .lock()
            .unwrap()
            .iter()
            .any(|(l, msg)| *l == level && msg.contains(text))
    }

    const ENTER_REQUEST: [u8; 14] = [
        0xFD, 0xFC, 0xFB, 0xFA, 0x04, 0x00, 0xFF, 0x00, 0x01, 0x00, 0x04, 0x03, 0x02, 0x01,
    ];

    fn driver_with_reply(reply: &[u8]) -> SyncLd2410<MockInterface> {
        let mut mock_if = MockInterface::new();
        mock_if.stage_burst(reply);
        SyncLd2410::new(mock_if, Config::default())
    }

    #[test]
    fn test_exchange_enter_command_mode() {
        let mut ld = driver_with_reply(&[
            0xFD, 0xFC, 0xFB, 0xFA, 0x08, 0x00, 0xFF, 0x01, 0x00, 0x00, 0x01, 0x00, 0x40, 0x00,
            0x04, 0x03, 0x02, 0x01,
        ]);

        let reply = ld
            .exchange(&CommandRequest::enter_command_mode(), Duration::from_millis(100))
            .unwrap();

        assert_eq!(ld.interface.written.as_slice(), &ENTER_REQUEST);
        assert_eq!(reply.echoed_word, [0xFF, 0x01]);
        assert_eq!(reply.status, 0);
        assert_eq!(reply.result_payload.as_slice(), &[0x01, 0x00, 0x40, 0x00]);
    }

    #[test]
    fn test_exchange_mismatched_reply() {
        // an acknowledgement for read-parameters arriving for enter-command-mode
        let mut ld = driver_with_reply(&[
            0xFD, 0xFC, 0xFB, 0xFA, 0x04, 0x00, 0x61, 0x01, 0x00, 0x00, 0x04, 0x03, 0x02, 0x01,
        ]);

        let result = ld.exchange(&CommandRequest::enter_command_mode(), Duration::from_millis(100));
        assert!(matches!(
            result,
            Err(Ld2410Error::CommandMismatch { expected: 0x100, received: 0x62 })
        ));
    }

    #[test]
    fn test_exchange_failed_status() {
        let mut ld = driver_with_reply(&[
            0xFD, 0xFC, 0xFB, 0xFA, 0x04, 0x00, 0xA2, 0x01, 0x01, 0x00, 0x04, 0x03, 0x02, 0x01,
        ]);

        let result = ld.exchange(&CommandRequest::factory_reset(), Duration::from_millis(100));
        assert!(matches!(result, Err(Ld2410Error::CommandFailed { status: 1 })));
    }

    #[test]
    fn test_failed_status_logged_as_error() {
        capture_logs();
        let mut ld = driver_with_reply(&[
            0xFD, 0xFC, 0xFB, 0xFA, 0x04, 0x00, 0xA3, 0x01, 0x02, 0x00, 0x04, 0x03, 0x02, 0x01,
        ]);

        let result = ld.exchange(&CommandRequest::reset(), Duration::from_millis(100));
        assert!(matches!(result, Err(Ld2410Error::CommandFailed { status: 2 })));
        assert!(logged(Level::Error, "Command 0x00A3 failed with status 0x0002"));
        assert!(!logged(Level::Warn, "Rejected acknowledgement for command 0x00A3: CommandFailed"));
    }

    #[test]
    fn test_mismatch_logged_as_warning() {
        capture_logs();
        let mut ld = driver_with_reply(&[
            0xFD, 0xFC, 0xFB, 0xFA, 0x04, 0x00, 0xAC, 0x01, 0x00, 0x00, 0x04, 0x03, 0x02, 0x01,
        ]);

        let result = ld.exchange(&CommandRequest::read_distance_unit(), Duration::from_millis(100));
        assert!(matches!(result, Err(Ld2410Error::CommandMismatch { .. })));
        assert!(logged(Level::Warn, "Rejected acknowledgement for command 0x00AB"));
    }

    #[test]
    fn test_exchange_malformed_reply() {
        // declared length 6, actual payload 4
        let mut ld = driver_with_reply(&[
            0xFD, 0xFC, 0xFB, 0xFA, 0x06, 0x00, 0xFF, 0x01, 0x00, 0x00, 0x04, 0x03, 0x02, 0x01,
        ]);

        let result = ld.exchange(&CommandRequest::enter_command_mode(), Duration::from_millis(100));
        assert!(matches!(
            result,
            Err(Ld2410Error::MalformedFrame(FrameDefect::LengthMismatch { declared: 6, .. }))
        ));
    }

    #[test]
    fn test_exchange_timeout_does_not_retry() {
        let mut ld = SyncLd2410::new(MockInterface::new(), Config::default());

        let result = ld.exchange(&CommandRequest::exit_command_mode(), Duration::from_millis(20));
        assert!(matches!(result, Err(Ld2410Error::Timeout)));
        assert_eq!(ld.interface.clear_calls, 1);
        assert_eq!(ld.interface.written.len(), 12);
    }

    #[test]
    fn test_exchange_write_failure_skips_scan() {
        let mut mock_if = MockInterface::new();
        mock_if.fail_writes = true;
        let mut ld = SyncLd2410::new(mock_if, Config::default());

        let result = ld.exchange(&CommandRequest::read_parameters(), Duration::from_millis(20));
        assert!(matches!(result, Err(Ld2410Error::Io(MockCommError))));
        assert_eq!(ld.interface.clear_calls, 0);
    }
}
