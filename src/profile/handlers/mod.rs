// src/profile/handlers/mod.rs

pub mod jobseekers;
pub mod profile;
pub mod register;

// Re-export handler functions
pub use jobseekers::*;
pub use profile::*;
pub use register::*;
