// src/common/config.rs

use core::time::Duration;

use super::constants::{
    DEFAULT_COMMAND_TIMEOUT, DEFAULT_TELEMETRY_TIMEOUT, DEFAULT_WRITE_TIMEOUT, RESET_SETTLE_TIME,
};

/// Timing settings for a [`SyncLd2410`](crate::driver::SyncLd2410).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// Deadline for an acknowledgement to arrive after a request is sent.
    pub command_timeout: Duration,
    /// Deadline used by `read_telemetry_default`.
    pub telemetry_timeout: Duration,
    /// Deadline for pushing one request frame into the transport.
    pub write_timeout: Duration,
    /// How long `reset` blocks after the sensor acknowledges a restart.
    pub reset_settle_time: Duration,
}

impl Config {
    /// Sets the command acknowledgement deadline.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Maximum wait for an acknowledgement frame.
    ///
    /// # Returns
    ///
    /// The updated `Config` instance.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Sets the default telemetry deadline.
    pub fn telemetry_timeout(mut self, timeout: Duration) -> Self {
        self.telemetry_timeout = timeout;
        self
    }

    /// Sets the transmit deadline.
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Sets the post-restart settle time. `Duration::ZERO` leaves the wait to the caller.
    pub fn reset_settle_time(mut self, settle: Duration) -> Self {
        self.reset_settle_time = settle;
        self
    }
}

/// Provides default configuration values for the LD2410B.
impl Default for Config {
    /// Five second command and telemetry deadlines, three second restart settle time.
    fn default() -> Config {
        Config {
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            telemetry_timeout: DEFAULT_TELEMETRY_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            reset_settle_time: RESET_SETTLE_TIME,
        }
    }
}
