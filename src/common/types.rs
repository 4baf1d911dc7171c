// src/common/types.rs

use core::convert::TryFrom;
use core::fmt::{self, Debug};
use core::str::FromStr;

use super::constants::{ALL_GATES, GATE_COUNT, MAX_GATE, MAX_SENSITIVITY, PARAMETERS_HEAD};
use super::error::{FrameDefect, Ld2410Error};

// --- Distance Unit ---

/// Spacing between the sensor's distance gates.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DistanceUnit {
    /// 0.75 m per gate (factory default).
    Cm75,
    /// 0.2 m per gate.
    Cm20,
}

impl DistanceUnit {
    /// Gate spacing in centimetres.
    pub const fn gate_size_cm(&self) -> u16 {
        match self {
            DistanceUnit::Cm75 => 75,
            DistanceUnit::Cm20 => 20,
        }
    }

    /// Argument word of the write-unit command.
    pub(crate) const fn to_wire(self) -> [u8; 2] {
        match self {
            DistanceUnit::Cm75 => [0x00, 0x00],
            DistanceUnit::Cm20 => [0x01, 0x00],
        }
    }

    /// Decodes the trailing word of a read-unit acknowledgement.
    pub fn from_reply<E: Debug>(result: &[u8]) -> Result<Self, Ld2410Error<E>> {
        let (low, high) = match result {
            [.., low, high] => (*low, *high),
            _ => {
                return Err(FrameDefect::Truncated {
                    needed: 2,
                    got: result.len(),
                }
                .into())
            }
        };
        match (low, high) {
            (0x00, 0x00) => Ok(DistanceUnit::Cm75),
            (0x01, 0x00) => Ok(DistanceUnit::Cm20),
            _ => Err(Ld2410Error::InvalidUnitValue { low, high }),
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceUnit::Cm75 => f.write_str("0.75m"),
            DistanceUnit::Cm20 => f.write_str("0.2m"),
        }
    }
}

impl TryFrom<&str> for DistanceUnit {
    type Error = Ld2410Error<()>;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "0.75m" => Ok(DistanceUnit::Cm75),
            "0.2m" => Ok(DistanceUnit::Cm20),
            _ => Err(Ld2410Error::InvalidArgument("distance unit must be 0.75m or 0.2m")),
        }
    }
}

// --- Gate Selector ---

/// Which distance gate a sensitivity change applies to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GateSelector {
    /// A single gate, 0..=8.
    Gate(u8),
    /// Every gate at once (sent as `0xFFFF`).
    All,
}

impl GateSelector {
    /// Creates a selector for one gate. Fails for gates above 8.
    pub fn new(gate: u8) -> Result<Self, Ld2410Error<()>> {
        if gate <= MAX_GATE {
            Ok(GateSelector::Gate(gate))
        } else {
            Err(Ld2410Error::InvalidArgument("gate must be 0..=8 or all"))
        }
    }

    /// Value of the gate sub-command field.
    pub(crate) fn to_wire(self) -> u32 {
        match self {
            GateSelector::Gate(gate) => gate as u32,
            GateSelector::All => ALL_GATES,
        }
    }
}

impl TryFrom<&str> for GateSelector {
    type Error = Ld2410Error<()>;

    /// Accepts `"all"` or a decimal gate number.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value == "all" {
            return Ok(GateSelector::All);
        }
        let gate = u8::from_str(value)
            .map_err(|_| Ld2410Error::<()>::InvalidArgument("gate must be 0..=8 or all"))?;
        GateSelector::new(gate)
    }
}

// --- Sensitivity ---

/// Detection sensitivity, 0..=100.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct Sensitivity(u8);

impl Sensitivity {
    pub fn new(value: u8) -> Result<Self, Ld2410Error<()>> {
        if value <= MAX_SENSITIVITY {
            Ok(Sensitivity(value))
        } else {
            Err(Ld2410Error::InvalidArgument("sensitivity must be 0..=100"))
        }
    }

    #[inline]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Sensitivity {
    type Error = Ld2410Error<()>;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Sensitivity::new(value)
    }
}

// --- Parameter Report ---

/// Configuration read back with the read-parameters command.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ParameterReport {
    /// Farthest gate the sensor can report.
    pub max_range_gate: u8,
    /// Farthest gate used for moving targets.
    pub max_movement_gate: u8,
    /// Farthest gate used for stable targets.
    pub max_stable_gate: u8,
    /// Moving-target sensitivity per gate.
    pub movement_sensitivity: [u8; GATE_COUNT],
    /// Stable-target sensitivity per gate.
    pub stable_sensitivity: [u8; GATE_COUNT],
    /// Seconds the sensor keeps reporting presence after the target is gone.
    pub no_target_duration_s: u16,
}

impl ParameterReport {
    /// Marker + three range bytes + two sensitivity tables + duration word.
    pub const ENCODED_LEN: usize = 1 + 3 + 2 * GATE_COUNT + 2;

    /// Decodes the result data of a read-parameters acknowledgement
    /// (everything after the status word).
    pub fn decode<E: Debug>(result: &[u8]) -> Result<Self, Ld2410Error<E>> {
        match result.first() {
            Some(&PARAMETERS_HEAD) => {}
            Some(&other) => {
                return Err(Ld2410Error::CommandMismatch {
                    expected: PARAMETERS_HEAD as u16,
                    received: other as u16,
                })
            }
            None => {
                return Err(FrameDefect::Truncated {
                    needed: Self::ENCODED_LEN,
                    got: 0,
                }
                .into())
            }
        }
        if result.len() < Self::ENCODED_LEN {
            return Err(FrameDefect::Truncated {
                needed: Self::ENCODED_LEN,
                got: result.len(),
            }
            .into());
        }

        let movement_start = 4;
        let stable_start = movement_start + GATE_COUNT;
        let mut movement_sensitivity = [0u8; GATE_COUNT];
        let mut stable_sensitivity = [0u8; GATE_COUNT];
        movement_sensitivity.copy_from_slice(&result[movement_start..stable_start]);
        stable_sensitivity.copy_from_slice(&result[stable_start..stable_start + GATE_COUNT]);

        // Hold duration is always the final word, whatever trails the tables.
        let tail = result.len() - 2;
        let no_target_duration_s = u16::from_le_bytes([result[tail], result[tail + 1]]);

        Ok(ParameterReport {
            max_range_gate: result[1],
            max_movement_gate: result[2],
            max_stable_gate: result[3],
            movement_sensitivity,
            stable_sensitivity,
            no_target_duration_s,
        })
    }

    pub fn movement_sensitivity(&self, gate: u8) -> Option<u8> {
        self.movement_sensitivity.get(gate as usize).copied()
    }

    pub fn stable_sensitivity(&self, gate: u8) -> Option<u8> {
        self.stable_sensitivity.get(gate as usize).copied()
    }
}

impl fmt::Display for ParameterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Maximum Detection Range: {}", self.max_range_gate)?;
        writeln!(f, "Maximum Detection Movement Range: {}", self.max_movement_gate)?;
        writeln!(f, "Maximum Detection Stable Range: {}", self.max_stable_gate)?;
        for gate in 0..GATE_COUNT {
            writeln!(
                f,
                "Gate {}: movement {}, stable {}",
                gate, self.movement_sensitivity[gate], self.stable_sensitivity[gate]
            )?;
        }
        write!(f, "Waiting Time: {}", self.no_target_duration_s)
    }
}
