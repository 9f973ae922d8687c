//! # hirepulse-core
//!
//! Core crate for HirePulse. Contains configuration schemas, typed
//! identifiers, pagination and response envelope types, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other HirePulse crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
