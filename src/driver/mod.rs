// src/driver/mod.rs

// Declare the sub-module
pub mod sync_driver;

// Re-export the public SyncLd2410 struct
pub use sync_driver::SyncLd2410;
