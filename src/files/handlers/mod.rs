// src/files/handlers/mod.rs

pub mod debug;
pub mod serve;
pub mod upload;

pub use serve::*;
pub use upload::*;
