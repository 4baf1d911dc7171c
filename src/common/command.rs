//! LD2410B command requests and acknowledgements.
//!
//! Request payload: `command_word(2, LE) | arguments...`.
//! Acknowledgement payload: `echoed_word(2) | status(2, LE) | result...`.

use arrayvec::ArrayVec;
use core::fmt::Debug;

use super::constants::{
    CMD_ENABLE_CONFIG, CMD_END_CONFIG, CMD_FACTORY_RESET, CMD_READ_DISTANCE_UNIT,
    CMD_READ_PARAMETERS, CMD_RESTART, CMD_SET_SENSITIVITY, CMD_WRITE_DISTANCE_UNIT,
    ENABLE_CONFIG_VALUE, MAX_COMMAND_ARGS, MAX_FRAME_LEN, MAX_GATE, SUB_GATE,
    SUB_MOVEMENT_SENSITIVITY, SUB_STABLE_SENSITIVITY,
};
use super::error::{FrameDefect, Ld2410Error};
use super::frame::{encode_frame, Frame, FrameBuffer, FrameFamily};
use super::types::{DistanceUnit, GateSelector, Sensitivity};

/// A command to send to the sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    word: u16,
    arguments: ArrayVec<u8, MAX_COMMAND_ARGS>,
}

impl CommandRequest {
    /// Builds a request from a raw command word and argument bytes.
    pub fn new<E: Debug>(word: u16, arguments: &[u8]) -> Result<Self, Ld2410Error<E>> {
        let mut args = ArrayVec::new();
        args.try_extend_from_slice(arguments)
            .map_err(|_| Ld2410Error::<E>::BufferOverflow {
                needed: arguments.len(),
                got: MAX_COMMAND_ARGS,
            })?;
        Ok(CommandRequest {
            word,
            arguments: args,
        })
    }

    // Fixed-size argument blocks below are far under MAX_COMMAND_ARGS.
    fn fixed<const N: usize>(word: u16, arguments: [u8; N]) -> Self {
        let mut args = ArrayVec::new();
        args.extend(arguments);
        CommandRequest {
            word,
            arguments: args,
        }
    }

    /// Enables command (configuration) mode.
    pub fn enter_command_mode() -> Self {
        Self::fixed(CMD_ENABLE_CONFIG, ENABLE_CONFIG_VALUE.to_le_bytes())
    }

    /// Leaves command mode; telemetry resumes.
    pub fn exit_command_mode() -> Self {
        Self::fixed(CMD_END_CONFIG, [])
    }

    pub fn read_parameters() -> Self {
        Self::fixed(CMD_READ_PARAMETERS, [])
    }

    pub fn factory_reset() -> Self {
        Self::fixed(CMD_FACTORY_RESET, [])
    }

    pub fn reset() -> Self {
        Self::fixed(CMD_RESTART, [])
    }

    pub fn read_distance_unit() -> Self {
        Self::fixed(CMD_READ_DISTANCE_UNIT, [])
    }

    pub fn write_distance_unit(unit: DistanceUnit) -> Self {
        Self::fixed(CMD_WRITE_DISTANCE_UNIT, unit.to_wire())
    }

    /// Sets movement and stable sensitivity of one gate (or all gates).
    ///
    /// Three `sub_command(2) | value(4)` fields: gate, movement, stable.
    /// Fails with `InvalidArgument` for a gate above 8.
    pub fn set_sensitivity<E: Debug>(
        gate: GateSelector,
        movement: Sensitivity,
        stable: Sensitivity,
    ) -> Result<Self, Ld2410Error<E>> {
        if let GateSelector::Gate(index) = gate {
            if index > MAX_GATE {
                return Err(Ld2410Error::InvalidArgument("gate must be 0..=8 or all"));
            }
        }

        let mut args = [0u8; 18];
        let fields = [
            (SUB_GATE, gate.to_wire()),
            (SUB_MOVEMENT_SENSITIVITY, movement.get() as u32),
            (SUB_STABLE_SENSITIVITY, stable.get() as u32),
        ];
        for (chunk, (sub, value)) in args.chunks_exact_mut(6).zip(fields) {
            chunk[..2].copy_from_slice(&sub.to_le_bytes());
            chunk[2..].copy_from_slice(&value.to_le_bytes());
        }
        Ok(Self::fixed(CMD_SET_SENSITIVITY, args))
    }

    #[inline]
    pub fn word(&self) -> u16 {
        self.word
    }

    #[inline]
    pub fn word_bytes(&self) -> [u8; 2] {
        self.word.to_le_bytes()
    }

    #[inline]
    pub fn arguments(&self) -> &[u8] {
        &self.arguments
    }

    /// Full wire frame: header, length `2 + args`, word, args, trailer.
    pub fn serialize<E: Debug>(&self) -> Result<FrameBuffer, Ld2410Error<E>> {
        let mut payload = ArrayVec::<u8, MAX_FRAME_LEN>::new();
        payload.extend(self.word_bytes());
        payload.extend(self.arguments.iter().copied());
        encode_frame(FrameFamily::Command, &payload)
    }

    /// Byte sum an acknowledgement's echoed word must carry.
    pub fn expected_echo_sum(&self) -> u16 {
        byte_sum(self.word_bytes()) + 1
    }
}

/// A validated acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub echoed_word: [u8; 2],
    /// Zero on success.
    pub status: u16,
    pub result_payload: ArrayVec<u8, MAX_FRAME_LEN>,
}

impl CommandReply {
    /// Echoed word read little-endian, e.g. `0x01FF` for enter-command-mode.
    pub fn echoed(&self) -> u16 {
        u16::from_le_bytes(self.echoed_word)
    }
}

fn byte_sum(bytes: [u8; 2]) -> u16 {
    bytes[0] as u16 + bytes[1] as u16
}

/// Parses `buffer` as an acknowledgement of `request`.
///
/// The sensor answers word `w` with `w | 0x0100`. Matching compares byte
/// sums (`echo[0] + echo[1] == req[0] + req[1] + 1`), which is what the
/// sensor's replies are known to satisfy.
pub fn parse_reply<E: Debug>(
    buffer: &[u8],
    request: &CommandRequest,
) -> Result<CommandReply, Ld2410Error<E>> {
    let frame = Frame::parse::<E>(FrameFamily::Command, buffer)?;
    let payload = frame.payload;
    if payload.len() < 4 {
        return Err(FrameDefect::Truncated {
            needed: 4,
            got: payload.len(),
        }
        .into());
    }

    let echoed_word = [payload[0], payload[1]];
    let received = byte_sum(echoed_word);
    let expected = request.expected_echo_sum();
    if received != expected {
        return Err(Ld2410Error::CommandMismatch { expected, received });
    }

    let status = u16::from_le_bytes([payload[2], payload[3]]);
    if status != 0 {
        return Err(Ld2410Error::CommandFailed { status });
    }

    let mut result_payload = ArrayVec::new();
    result_payload
        .try_extend_from_slice(&payload[4..])
        .map_err(|_| Ld2410Error::<E>::BufferOverflow {
            needed: payload.len() - 4,
            got: MAX_FRAME_LEN,
        })?;

    Ok(CommandReply {
        echoed_word,
        status,
        result_payload,
    })
}
