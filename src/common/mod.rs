// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod command;
pub mod config;
pub mod constants;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod telemetry;
pub mod types;

#[cfg(feature = "std")]
pub mod std_timer;

#[cfg(feature = "impl-native")]
pub mod hal_adapter;

// --- Re-export key types/traits/functions for easier access ---

// From command.rs
pub use command::{parse_reply, CommandReply, CommandRequest};

// From config.rs
pub use config::Config;

// From error.rs
pub use error::{FrameDefect, Ld2410Error};

// From frame.rs
pub use frame::{Frame, FrameFamily, FrameBuffer};

// From hal_traits.rs
pub use hal_traits::{Ld2410Instant, Ld2410Serial, Ld2410Timer, SerialWithTimer}; // Core sync traits

// From telemetry.rs
pub use telemetry::{parse_telemetry, Target, TelemetryReading, WorkingMode};

// From types.rs
pub use types::{DistanceUnit, GateSelector, ParameterReport, Sensitivity};

// --- Feature-gated re-exports ---

#[cfg(feature = "std")]
pub use std_timer::{StdInstant, StdTimer};

#[cfg(feature = "impl-native")]
pub use hal_adapter::{HalTimer, TickInstant};
