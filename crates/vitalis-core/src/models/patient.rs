//! Patient model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ClinicalHistory;

/// A patient record.
///
/// `id` is `None` until the store persists the record and assigns the
/// generated rowid; it never changes afterwards. `history` is populated only
/// by the eager-join read paths and stays `None` on a transient value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Surrogate identifier, assigned by the store on creation
    pub id: Option<i64>,
    /// Soft-delete flag
    pub deleted: bool,
    /// National identity document number (natural key, unique per active patient)
    pub dni: String,
    /// Given name(s)
    pub first_name: String,
    /// Family name(s)
    pub last_name: String,
    /// Date of birth
    pub birth_date: Option<NaiveDate>,
    /// Active clinical history, hydrated by joined reads
    pub history: Option<ClinicalHistory>,
}

impl Patient {
    /// Create a new transient patient (not yet persisted).
    pub fn new(
        dni: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birth_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: None,
            deleted: false,
            dni: dni.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_date,
            history: None,
        }
    }

    /// Full display name, "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_patient_is_transient() {
        let patient = Patient::new("30111222", "Ana", "Gomez", None);
        assert_eq!(patient.id, None);
        assert!(!patient.deleted);
        assert!(patient.history.is_none());
    }

    #[test]
    fn test_full_name() {
        let patient = Patient::new("30111222", "Ana", "Gomez", None);
        assert_eq!(patient.full_name(), "Ana Gomez");
    }
}
