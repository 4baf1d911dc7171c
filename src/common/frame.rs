// src/common/frame.rs

//! Frame envelope shared by both frame families.
//!
//! ```text
//! header(4) | len_lo len_hi | payload(len) | trailer(4)
//! ```

use arrayvec::ArrayVec;
use core::fmt::Debug;

use super::constants::{
    COMMAND_HEADER, COMMAND_TRAILER, LENGTH_FIELD_LEN, MAX_FRAME_LEN, TELEMETRY_HEADER,
    TELEMETRY_TRAILER,
};
use super::error::{FrameDefect, Ld2410Error};

/// Fixed-capacity byte buffer holding one frame.
pub type FrameBuffer = ArrayVec<u8, MAX_FRAME_LEN>;

/// The two envelope formats spoken by the sensor.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameFamily {
    /// Command requests and their acknowledgements (`FD FC FB FA` .. `04 03 02 01`).
    Command,
    /// Continuous reports streamed outside command mode (`F4 F3 F2 F1` .. `F8 F7 F6 F5`).
    Telemetry,
}

impl FrameFamily {
    pub const fn header(&self) -> &'static [u8; 4] {
        match self {
            FrameFamily::Command => &COMMAND_HEADER,
            FrameFamily::Telemetry => &TELEMETRY_HEADER,
        }
    }

    pub const fn trailer(&self) -> &'static [u8; 4] {
        match self {
            FrameFamily::Command => &COMMAND_TRAILER,
            FrameFamily::Telemetry => &TELEMETRY_TRAILER,
        }
    }

    /// Bytes a frame of this family spends outside its payload.
    pub fn overhead(&self) -> usize {
        self.header().len() + LENGTH_FIELD_LEN + self.trailer().len()
    }

    /// Scanner termination test: the header appears anywhere in `window`
    /// and `window` ends with the trailer.
    ///
    /// Leading garbage is tolerated. Two concatenated frames also satisfy
    /// this and are left for the codec to reject.
    pub fn is_complete(&self, window: &[u8]) -> bool {
        window.ends_with(self.trailer())
            && window.windows(4).any(|w| w == self.header())
    }
}

/// Validated view over one frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Frame<'a> {
    pub family: FrameFamily,
    /// Bytes between the length field and the trailer.
    pub payload: &'a [u8],
    /// Value of the little-endian length field.
    pub declared_length: u16,
}

impl<'a> Frame<'a> {
    /// Checks header, trailer and length field of `buffer` for `family`.
    pub fn parse<E: Debug>(family: FrameFamily, buffer: &'a [u8]) -> Result<Self, Ld2410Error<E>> {
        if buffer.len() < family.overhead() {
            return Err(FrameDefect::TooShort(buffer.len()).into());
        }
        if !buffer.starts_with(family.header()) {
            return Err(FrameDefect::BadHeader.into());
        }
        if !buffer.ends_with(family.trailer()) {
            return Err(FrameDefect::BadTrailer.into());
        }

        let declared_length = u16::from_le_bytes([buffer[4], buffer[5]]);
        let payload_start = family.header().len() + LENGTH_FIELD_LEN;
        let payload_end = buffer.len() - family.trailer().len();
        let payload = &buffer[payload_start..payload_end];

        if declared_length as usize != payload.len() {
            return Err(FrameDefect::LengthMismatch {
                declared: declared_length,
                actual: payload.len(),
            }
            .into());
        }

        Ok(Frame {
            family,
            payload,
            declared_length,
        })
    }

    /// Actual payload byte count.
    pub fn raw_length(&self) -> usize {
        self.payload.len()
    }
}

/// Wraps `payload` into a complete frame of `family`.
pub fn encode_frame<E: Debug>(
    family: FrameFamily,
    payload: &[u8],
) -> Result<FrameBuffer, Ld2410Error<E>> {
    let needed = family.overhead() + payload.len();
    let mut frame = FrameBuffer::new();
    if needed > frame.capacity() {
        return Err(Ld2410Error::BufferOverflow {
            needed,
            got: frame.capacity(),
        });
    }

    frame.extend(family.header().iter().copied());
    frame.extend((payload.len() as u16).to_le_bytes());
    frame.extend(payload.iter().copied());
    frame.extend(family.trailer().iter().copied());
    Ok(frame)
}
