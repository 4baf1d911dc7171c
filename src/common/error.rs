// src/common/error.rs

use core::fmt::Debug;

/// Structural check a frame failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum FrameDefect {
    /// Fewer bytes than the smallest frame of the family.
    #[error("frame too short ({0} bytes)")]
    TooShort(usize),

    /// The first four bytes are not the family header.
    #[error("bad frame header")]
    BadHeader,

    /// The last four bytes are not the family trailer.
    #[error("bad frame trailer")]
    BadTrailer,

    /// The length field disagrees with the bytes actually enclosed.
    #[error("length field says {declared}, frame carries {actual}")]
    LengthMismatch { declared: u16, actual: usize },

    /// Telemetry data block does not start with 0xAA.
    #[error("bad data block head: {0:#04x}")]
    BadDataHead(u8),

    /// Telemetry data block does not end with 0x55.
    #[error("bad data block tail: {0:#04x}")]
    BadDataTail(u8),

    /// Reserved byte after the data block tail is not zero.
    #[error("bad check byte: {0:#04x}")]
    BadCheckByte(u8),

    /// Payload is shorter than the fields it must carry.
    #[error("payload truncated: needed {needed}, got {got}")]
    Truncated { needed: usize, got: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Ld2410Error<E = ()>
where
    E: Debug, // Needed for the generic Io error
{
    /// Underlying I/O error from the transport.
    #[error("I/O error: {0:?}")] // Format string requires Debug on E
    Io(E),

    /// No complete frame arrived before the deadline.
    #[error("Operation timed out")]
    Timeout,

    /// Frame failed a structural check.
    #[error("Malformed frame: {0}")]
    MalformedFrame(FrameDefect),

    /// Acknowledgement does not answer the request that was sent.
    /// Values are the byte sums compared, or the marker byte for parameter reports.
    #[error("Command mismatch: expected {expected:#06x}, received {received:#06x}")]
    CommandMismatch { expected: u16, received: u16 },

    /// Sensor answered with a nonzero status.
    #[error("Command failed with status {status:#06x}")]
    CommandFailed { status: u16 },

    /// Working mode byte outside the documented set.
    #[error("Unknown working mode: {0:#04x}")]
    UnknownMode(u8),

    /// Target state byte outside the documented set.
    #[error("Unknown target state: {0:#04x}")]
    UnknownTarget(u8),

    /// Distance unit reply is neither 0.75m nor 0.2m.
    #[error("Invalid distance unit value: low {low:#04x}, high {high:#04x}")]
    InvalidUnitValue { low: u8, high: u8 },

    /// Caller supplied an out-of-range argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Request does not fit the fixed-capacity frame buffer.
    #[error("Buffer overflow: needed {needed}, got {got}")]
    BufferOverflow { needed: usize, got: usize },
}

impl<E: Debug> From<FrameDefect> for Ld2410Error<E> {
    fn from(defect: FrameDefect) -> Self {
        Ld2410Error::MalformedFrame(defect)
    }
}

impl<E: Debug> Ld2410Error<E> {
    /// True for errors a caller can clear by rescanning or retrying the exchange.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Ld2410Error::Timeout
                | Ld2410Error::MalformedFrame(_)
                | Ld2410Error::CommandMismatch { .. }
                | Ld2410Error::CommandFailed { .. }
        )
    }
}
