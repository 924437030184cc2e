//! # tickethub-core
//!
//! Core crate for the TicketHub client SDK. Contains configuration schemas,
//! pagination/filter types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other TicketHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
