//! Clinical history service.

use tracing::info;

use super::{require, ServiceError, ServiceResult};
use crate::db::Database;
use crate::models::ClinicalHistory;

/// Application-level operations over clinical histories.
pub struct HistoryService<'a> {
    db: &'a Database,
}

impl<'a> HistoryService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// The active history owned by a patient.
    pub fn find_by_patient(&self, patient_id: i64) -> ServiceResult<Option<ClinicalHistory>> {
        Ok(self.db.find_history_by_patient(patient_id)?)
    }

    /// All active clinical histories.
    pub fn get_all(&self) -> ServiceResult<Vec<ClinicalHistory>> {
        Ok(self.db.list_histories()?)
    }

    /// Update a history's medical fields. The owning patient never changes.
    pub fn update(&self, history: &ClinicalHistory) -> ServiceResult<()> {
        require("history number", &history.history_number)?;

        if !self.db.update_history(history)? {
            return Err(ServiceError::Validation(format!(
                "no clinical history with id {:?} to update",
                history.id
            )));
        }
        info!(id = history.id, "updated clinical history");
        Ok(())
    }
}
