// src/common/constants.rs

//! Wire constants of the LD2410B UART protocol.

use core::time::Duration;

// === Frame envelopes ===

// COMMAND_HEADER opens every command frame (host -> sensor) and every acknowledgement.
pub const COMMAND_HEADER: [u8; 4] = [0xFD, 0xFC, 0xFB, 0xFA];

// COMMAND_TRAILER closes every command frame and every acknowledgement.
pub const COMMAND_TRAILER: [u8; 4] = [0x04, 0x03, 0x02, 0x01];

// TELEMETRY_HEADER opens the report frames the sensor streams outside command mode.
pub const TELEMETRY_HEADER: [u8; 4] = [0xF4, 0xF3, 0xF2, 0xF1];

// TELEMETRY_TRAILER closes every report frame.
pub const TELEMETRY_TRAILER: [u8; 4] = [0xF8, 0xF7, 0xF6, 0xF5];

/// Size of the little-endian length field following the header.
pub const LENGTH_FIELD_LEN: usize = 2;

/// Largest frame the scanner keeps in its window. Engineering reports are the
/// biggest frames the sensor sends and stay well under this.
pub const MAX_FRAME_LEN: usize = 96;

/// Largest argument block a command request may carry.
pub const MAX_COMMAND_ARGS: usize = 32;

// === Telemetry data block ===

// DATA_HEAD marks the start of the target block inside a report.
pub const DATA_HEAD: u8 = 0xAA;

// DATA_TAIL marks the end of the target block inside a report.
pub const DATA_TAIL: u8 = 0x55;

// DATA_CHECK is the reserved byte after DATA_TAIL, always zero.
pub const DATA_CHECK: u8 = 0x00;

/// A stable-target distance of this value is the sensor's "no valid reading".
pub const INVALID_STABLE_DISTANCE_CM: u16 = 8;

// === Command words (u16, sent little-endian) ===

pub const CMD_ENABLE_CONFIG: u16 = 0x00FF;
pub const CMD_END_CONFIG: u16 = 0x00FE;
pub const CMD_READ_PARAMETERS: u16 = 0x0061;
pub const CMD_SET_SENSITIVITY: u16 = 0x0064;
pub const CMD_FACTORY_RESET: u16 = 0x00A2;
pub const CMD_RESTART: u16 = 0x00A3;
pub const CMD_WRITE_DISTANCE_UNIT: u16 = 0x00AA;
pub const CMD_READ_DISTANCE_UNIT: u16 = 0x00AB;

/// Argument the enable-config command carries.
pub const ENABLE_CONFIG_VALUE: u16 = 0x0001;

// === Set-sensitivity sub-commands ===

pub const SUB_GATE: u16 = 0x0000;
pub const SUB_MOVEMENT_SENSITIVITY: u16 = 0x0001;
pub const SUB_STABLE_SENSITIVITY: u16 = 0x0002;

/// Gate value selecting every distance gate at once.
pub const ALL_GATES: u32 = 0xFFFF;

/// Highest distance gate index.
pub const MAX_GATE: u8 = 8;

/// Number of distance gates (0..=8).
pub const GATE_COUNT: usize = MAX_GATE as usize + 1;

/// Highest accepted sensitivity value.
pub const MAX_SENSITIVITY: u8 = 100;

// === Parameter report ===

// PARAMETERS_HEAD is the first result byte of a read-parameters acknowledgement.
pub const PARAMETERS_HEAD: u8 = 0xAA;

// === Timing ===

/// Default deadline for a command acknowledgement.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);
/// Default deadline for a telemetry frame.
pub const DEFAULT_TELEMETRY_TIMEOUT: Duration = Duration::from_secs(5);
/// Default deadline for pushing one request frame out.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_millis(50);
/// Time the sensor needs to come back after a restart.
pub const RESET_SETTLE_TIME: Duration = Duration::from_secs(3);
/// Sleep between polls while waiting on the transport.
pub const POLL_INTERVAL_US: u32 = 100;
