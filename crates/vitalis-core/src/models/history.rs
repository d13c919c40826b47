//! Clinical history model and blood type codes.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error for an unrecognized blood type code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized blood type code: {0:?}")]
pub struct ParseBloodTypeError(pub String);

/// ABO/Rh blood group, stored as its textual code ("A+" .. "O-").
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    /// All eight groups, in display order.
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    /// The textual code persisted in the database.
    pub fn as_code(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }

    /// Parse a user- or database-supplied code.
    ///
    /// Blank input means "unset" and maps to `Ok(None)`; anything non-blank
    /// must be one of the eight codes.
    pub fn from_code(code: &str) -> Result<Option<Self>, ParseBloodTypeError> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(None);
        }
        code.parse().map(Some)
    }
}

impl FromStr for BloodType {
    type Err = ParseBloodTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A+" => Ok(BloodType::APositive),
            "A-" => Ok(BloodType::ANegative),
            "B+" => Ok(BloodType::BPositive),
            "B-" => Ok(BloodType::BNegative),
            "AB+" => Ok(BloodType::AbPositive),
            "AB-" => Ok(BloodType::AbNegative),
            "O+" => Ok(BloodType::OPositive),
            "O-" => Ok(BloodType::ONegative),
            other => Err(ParseBloodTypeError(other.to_string())),
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// A patient's clinical history.
///
/// Owned by exactly one patient via `patient_id`; a history without an owner
/// is rejected by the store. At most one active history exists per patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicalHistory {
    /// Surrogate identifier, assigned by the store on creation
    pub id: Option<i64>,
    /// Soft-delete flag
    pub deleted: bool,
    /// Identifier of the physical/legacy record (e.g. "HC-001")
    pub history_number: String,
    /// Blood group, if known
    pub blood_type: Option<BloodType>,
    /// Relevant medical history
    pub medical_history: Option<String>,
    /// Current medication
    pub current_medication: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Date the history was opened
    pub opened_date: NaiveDate,
    /// Owning patient; set by the service before the history is persisted
    pub patient_id: Option<i64>,
}

impl ClinicalHistory {
    /// Create a new transient clinical history, opened today.
    pub fn new(history_number: impl Into<String>) -> Self {
        Self {
            id: None,
            deleted: false,
            history_number: history_number.into(),
            blood_type: None,
            medical_history: None,
            current_medication: None,
            notes: None,
            opened_date: chrono::Local::now().date_naive(),
            patient_id: None,
        }
    }
}
