//! # Files Module
//!
//! Resume and photo uploads and the public routes that serve them back.
//! Storage itself lives in `services::file_storage`.

pub mod handlers;
pub mod models;
pub mod routes;

#[cfg(test)]
mod tests;

pub use routes::files_routes;
