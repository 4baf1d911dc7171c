// src/driver/sync_driver/mod.rs

use crate::common::{
    command::CommandRequest,
    config::Config,
    constants::{CMD_END_CONFIG, CMD_ENABLE_CONFIG},
    error::Ld2410Error,
    frame::FrameFamily,
    hal_traits::{Ld2410Serial, Ld2410Timer},
    telemetry::{parse_telemetry, TelemetryReading},
    types::{DistanceUnit, GateSelector, ParameterReport, Sensitivity},
};
use core::fmt::Debug;
use core::time::Duration;
use log::{debug, info, warn};

mod io_helpers;
mod transaction;

#[cfg(test)]
mod mock;

/// Blocking LD2410B driver over one exclusively owned transport.
///
/// Every call is a single request-then-wait exchange. Nothing is retried;
/// retry policy belongs to the caller.
#[derive(Debug)]
pub struct SyncLd2410<IF>
where
    IF: Ld2410Serial + Ld2410Timer,
{
    interface: IF,
    config: Config,
    in_command_mode: bool,
    latest: Option<TelemetryReading>,
}

impl<IF> SyncLd2410<IF>
where
    IF: Ld2410Serial + Ld2410Timer,
{
    pub fn new(interface: IF, config: Config) -> Self {
        SyncLd2410 {
            interface,
            config,
            in_command_mode: false,
            latest: None,
        }
    }

    /// Releases the transport.
    pub fn free(self) -> IF {
        self.interface
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Last mode acknowledged by the sensor. `false` until the first switch.
    pub fn in_command_mode(&self) -> bool {
        self.in_command_mode
    }

    /// Most recent successfully decoded report, if any.
    pub fn latest_reading(&self) -> Option<&TelemetryReading> {
        self.latest.as_ref()
    }

    // --- Command mode ---

    /// Enters (`true`) or leaves (`false`) command mode.
    ///
    /// The recorded state follows the acknowledgement's echoed word, not the
    /// request.
    pub fn set_command_mode(&mut self, enabled: bool) -> Result<(), Ld2410Error<IF::Error>> {
        let request = if enabled {
            CommandRequest::enter_command_mode()
        } else {
            CommandRequest::exit_command_mode()
        };
        let reply = self.exchange(&request, self.config.command_timeout)?;

        let [echo_low, _] = reply.echoed_word;
        let [enable_low, _] = CMD_ENABLE_CONFIG.to_le_bytes();
        let [end_low, _] = CMD_END_CONFIG.to_le_bytes();
        self.in_command_mode = match echo_low {
            low if low == enable_low => true,
            low if low == end_low => false,
            _ => {
                return Err(Ld2410Error::CommandMismatch {
                    expected: request.word() | 0x0100,
                    received: reply.echoed(),
                })
            }
        };

        info!("Command mode {}", if self.in_command_mode { "on" } else { "off" });
        Ok(())
    }

    // --- Configuration queries ---

    pub fn read_parameters(&mut self) -> Result<ParameterReport, Ld2410Error<IF::Error>> {
        let reply = self.exchange(&CommandRequest::read_parameters(), self.config.command_timeout)?;
        let report = ParameterReport::decode::<IF::Error>(&reply.result_payload)?;
        debug!("Parameters: {:?}", report);
        Ok(report)
    }

    pub fn get_distance_unit(&mut self) -> Result<DistanceUnit, Ld2410Error<IF::Error>> {
        let reply =
            self.exchange(&CommandRequest::read_distance_unit(), self.config.command_timeout)?;
        DistanceUnit::from_reply::<IF::Error>(&reply.result_payload)
    }

    pub fn set_distance_unit(&mut self, unit: DistanceUnit) -> Result<(), Ld2410Error<IF::Error>> {
        self.exchange(
            &CommandRequest::write_distance_unit(unit),
            self.config.command_timeout,
        )?;
        info!("Distance unit set to {}", unit);
        Ok(())
    }

    /// Sets movement and stable sensitivity (0..=100) of one gate or all gates.
    ///
    /// Gates above 8 and values above 100 fail with `InvalidArgument` before
    /// anything is sent.
    pub fn set_sensitivity(
        &mut self,
        gate: GateSelector,
        movement: u8,
        stable: u8,
    ) -> Result<(), Ld2410Error<IF::Error>> {
        let movement = Sensitivity::new(movement).map_err(invalid_argument)?;
        let stable = Sensitivity::new(stable).map_err(invalid_argument)?;
        let request = CommandRequest::set_sensitivity::<IF::Error>(gate, movement, stable)?;

        self.exchange(&request, self.config.command_timeout)?;
        info!(
            "Sensitivity of {:?} set to movement {}, stable {}",
            gate,
            movement.get(),
            stable.get()
        );
        Ok(())
    }

    // --- Maintenance ---

    pub fn factory_reset(&mut self) -> Result<(), Ld2410Error<IF::Error>> {
        self.exchange(&CommandRequest::factory_reset(), self.config.command_timeout)?;
        warn!("Factory settings restored");
        Ok(())
    }

    /// Restarts the sensor and blocks for `Config::reset_settle_time`.
    ///
    /// The sensor leaves command mode when it restarts.
    pub fn reset(&mut self) -> Result<(), Ld2410Error<IF::Error>> {
        self.exchange(&CommandRequest::reset(), self.config.command_timeout)?;
        self.in_command_mode = false;

        let settle = self.config.reset_settle_time;
        if !settle.is_zero() {
            info!("Restart acknowledged, waiting {} ms", settle.as_millis());
            let settle_ms = u32::try_from(settle.as_millis()).unwrap_or(u32::MAX);
            self.interface.delay_ms(settle_ms);
        }
        Ok(())
    }

    // --- Telemetry ---

    /// Waits up to `timeout` for the next report.
    ///
    /// The cached reading is replaced only when a report decodes cleanly.
    pub fn read_telemetry(
        &mut self,
        timeout: Duration,
    ) -> Result<TelemetryReading, Ld2410Error<IF::Error>> {
        let raw = self.scan_frame(FrameFamily::Telemetry, timeout)?;
        let reading = parse_telemetry::<IF::Error>(&raw).map_err(|e| {
            warn!("Discarding report: {:?}", e);
            e
        })?;

        self.latest = Some(reading);
        Ok(reading)
    }

    pub fn read_telemetry_default(&mut self) -> Result<TelemetryReading, Ld2410Error<IF::Error>> {
        let timeout = self.config.telemetry_timeout;
        self.read_telemetry(timeout)
    }
}

/// Re-types a validation error raised before the transport is involved.
fn invalid_argument<E: Debug>(err: Ld2410Error<()>) -> Ld2410Error<E> {
    match err {
        Ld2410Error::InvalidArgument(reason) => Ld2410Error::InvalidArgument(reason),
        _ => Ld2410Error::InvalidArgument("invalid argument"),
    }
}
