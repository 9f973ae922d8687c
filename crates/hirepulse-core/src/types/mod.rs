//! Core type definitions used across the HirePulse workspace.

pub mod id;
pub mod pagination;
pub mod response;

pub use id::*;
pub use pagination::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, PageRequest, PageResponse};
pub use response::{ApiErrorResponse, ApiResponse};
