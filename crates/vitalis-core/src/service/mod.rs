//! Service layer: application rules on top of the stores.
//!
//! Services validate input, orchestrate multi-store operations (patient +
//! history registration, cascading delete) and otherwise pass reads through
//! unchanged.

mod histories;
mod patients;

pub use histories::*;
pub use patients::*;

use thiserror::Error;

/// Service errors.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Db(#[from] crate::db::DbError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Reject blank required fields.
fn require(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{field} is required")));
    }
    Ok(())
}
