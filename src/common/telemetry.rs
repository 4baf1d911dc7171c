// src/common/telemetry.rs

//! Report frames streamed by the sensor outside command mode.
//!
//! ```text
//! F4 F3 F2 F1 | len(2) | mode AA target mdist(2) menergy sdist(2) senergy ddist(2) [eng...] 55 00 | F8 F7 F6 F5
//! ```

use core::fmt::Debug;

use super::constants::{DATA_CHECK, DATA_HEAD, DATA_TAIL, INVALID_STABLE_DISTANCE_CM};
use super::error::{FrameDefect, Ld2410Error};
use super::frame::{Frame, FrameFamily};

/// Smallest report payload: mode, head, target block (9), tail, check.
const MIN_PAYLOAD_LEN: usize = 13;

/// Report verbosity the sensor is configured for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WorkingMode {
    /// Target block only (type byte `0x02`).
    Basic,
    /// Target block followed by per-gate energies (type byte `0x01`).
    Engineering,
}

impl WorkingMode {
    pub fn from_byte<E: Debug>(byte: u8) -> Result<Self, Ld2410Error<E>> {
        match byte {
            0x02 => Ok(WorkingMode::Basic),
            0x01 => Ok(WorkingMode::Engineering),
            other => Err(Ld2410Error::UnknownMode(other)),
        }
    }
}

/// What the sensor currently sees.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Target {
    None,
    Moving,
    Stable,
    Both,
}

impl Target {
    pub fn from_byte<E: Debug>(byte: u8) -> Result<Self, Ld2410Error<E>> {
        match byte {
            0x00 => Ok(Target::None),
            0x01 => Ok(Target::Moving),
            0x02 => Ok(Target::Stable),
            0x03 => Ok(Target::Both),
            other => Err(Ld2410Error::UnknownTarget(other)),
        }
    }
}

/// One decoded report.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TelemetryReading {
    pub working_mode: WorkingMode,
    pub target: Target,
    pub moving_distance_cm: u16,
    /// 0..=100
    pub moving_energy: u8,
    pub stable_distance_cm: u16,
    /// 0..=100
    pub stable_energy: u8,
    pub detection_distance_cm: u16,
}

impl TelemetryReading {
    /// True whenever any target is reported.
    pub fn presence(&self) -> bool {
        self.target != Target::None
    }

    /// Distance to the target, picking one field according to the target state.
    ///
    /// - `Both`: the larger of moving and stable, ties go to moving.
    /// - `Moving`: moving distance.
    /// - `Stable`: stable distance, unless it reads 8 cm (the sensor's invalid
    ///   marker), in which case the moving distance is used.
    /// - `None`: nothing.
    pub fn target_distance(&self) -> Option<u16> {
        match self.target {
            Target::Both => {
                if self.moving_distance_cm >= self.stable_distance_cm {
                    Some(self.moving_distance_cm)
                } else {
                    Some(self.stable_distance_cm)
                }
            }
            Target::Moving => Some(self.moving_distance_cm),
            Target::Stable if self.stable_distance_cm == INVALID_STABLE_DISTANCE_CM => {
                Some(self.moving_distance_cm)
            }
            Target::Stable => Some(self.stable_distance_cm),
            Target::None => None,
        }
    }
}

#[inline]
fn le16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

/// Validates and decodes a complete report frame.
pub fn parse_telemetry<E: Debug>(buffer: &[u8]) -> Result<TelemetryReading, Ld2410Error<E>> {
    let frame = Frame::parse::<E>(FrameFamily::Telemetry, buffer)?;
    let data = frame.payload;
    if data.len() < MIN_PAYLOAD_LEN {
        return Err(FrameDefect::TooShort(buffer.len()).into());
    }

    if data[1] != DATA_HEAD {
        return Err(FrameDefect::BadDataHead(data[1]).into());
    }
    let tail = data[data.len() - 2];
    if tail != DATA_TAIL {
        return Err(FrameDefect::BadDataTail(tail).into());
    }
    let check = data[data.len() - 1];
    if check != DATA_CHECK {
        return Err(FrameDefect::BadCheckByte(check).into());
    }

    let working_mode = WorkingMode::from_byte::<E>(data[0])?;
    let target = Target::from_byte::<E>(data[2])?;

    Ok(TelemetryReading {
        working_mode,
        target,
        moving_distance_cm: le16(data, 3),
        moving_energy: data[5],
        stable_distance_cm: le16(data, 6),
        stable_energy: data[8],
        detection_distance_cm: le16(data, 9),
    })
}
