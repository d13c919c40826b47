//! Vitalis Core Library
//!
//! Patient record and clinical history management for a single-desk clinic.
//!
//! # Architecture
//!
//! ```text
//! Menu (vitalis-cli)
//!       │
//!       ▼
//! Service layer (validation, patient + history orchestration)
//!       │
//!       ▼
//! Database layer (parameterized SQL, soft-delete filtering, eager join)
//!       │
//!       ▼
//! SQLite (single shared connection)
//! ```
//!
//! # Core Principles
//!
//! - **Soft delete everywhere.** Rows are flagged `deleted = 1`, never
//!   physically removed; every default read path filters them out.
//! - **Eager history load.** Patient reads hydrate the active clinical
//!   history in the same query via a left join.
//! - **One connection, one statement per call.** Each store call runs exactly
//!   one blocking query against the shared connection.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer (schema, per-entity store operations)
//! - [`models`]: Domain types (Patient, ClinicalHistory, BloodType)
//! - [`service`]: Application rules on top of the stores

pub mod db;
pub mod models;
pub mod service;

// Re-export commonly used types
pub use db::{Database, DbError, DbResult};
pub use models::{BloodType, ClinicalHistory, ParseBloodTypeError, Patient};
pub use service::{HistoryService, PatientService, ServiceError, ServiceResult};
