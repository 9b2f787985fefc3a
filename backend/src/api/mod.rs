//! REST API module.
//!
//! Contains all API routes and handlers following the frontend contract.

mod checkout;
mod credits;
mod stories;

pub use checkout::*;
pub use credits::*;
pub use stories::*;

use axum::Json;

/// Handler result: a JSON body on success, the error envelope otherwise.
pub type ApiResult<T> = Result<Json<T>, crate::errors::AppError>;
