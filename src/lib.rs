// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)] // no_std unless testing or std is requested

pub mod common;
pub mod driver;

// Re-export key types for convenience
pub use common::{Config, Ld2410Error};
pub use driver::SyncLd2410;
