//! # Profile Module
//!
//! Job seeker profiles and the education details they own:
//! - Registration of a job seeker together with the initial profile
//! - Reading and replacing the caller's profile
//! - Clearing resume/photo references (the stored file is deleted too)
//! - Listing all profiles

pub mod handlers;
pub mod mapping;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


pub use routes::profile_routes;
