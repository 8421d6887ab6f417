//! # Auth Module
//!
//! Identity is established by an external service that issues HS256 bearer
//! tokens whose `sub` claim is the username. This module only verifies those
//! tokens:
//! - AuthedUser extractor for protected routes
//! - User database model

pub mod extractors;
pub mod models;


pub use extractors::AuthedUser;
pub use models::User;
