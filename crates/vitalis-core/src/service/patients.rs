//! Patient service.

use tracing::{debug, info};

use super::{require, ServiceError, ServiceResult};
use crate::db::Database;
use crate::models::{ClinicalHistory, Patient};

/// Application-level operations over patients.
pub struct PatientService<'a> {
    db: &'a Database,
}

impl<'a> PatientService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Register a new patient together with its (mandatory) clinical history.
    ///
    /// The two inserts are one logical unit: the patient is persisted first,
    /// its generated id becomes the history's owner, then the history is
    /// persisted. The writes are independent statements; if the second one
    /// fails the error is surfaced as-is and the patient row remains.
    pub fn register(
        &self,
        patient: Patient,
        mut history: ClinicalHistory,
    ) -> ServiceResult<Patient> {
        require("dni", &patient.dni)?;
        require("first name", &patient.first_name)?;
        require("last name", &patient.last_name)?;
        require("history number", &history.history_number)?;

        let mut created = self.db.create_patient(&patient)?;
        history.patient_id = created.id;
        let history = self.db.create_history(&history)?;
        created.history = Some(history);

        info!(
            id = created.id,
            dni = %created.dni,
            "registered patient with clinical history"
        );
        Ok(created)
    }

    /// All active patients, histories eagerly loaded.
    pub fn get_all(&self) -> ServiceResult<Vec<Patient>> {
        Ok(self.db.list_patients()?)
    }

    /// Look up an active patient by id.
    pub fn find_by_id(&self, id: i64) -> ServiceResult<Option<Patient>> {
        Ok(self.db.find_patient(id)?)
    }

    /// Look up an active patient by DNI.
    pub fn find_by_dni(&self, dni: &str) -> ServiceResult<Option<Patient>> {
        require("dni", dni)?;
        let found = self.db.find_patient_by_dni(dni.trim())?;
        debug!(dni, found = found.is_some(), "patient lookup by dni");
        Ok(found)
    }

    /// Update a patient's own fields (not its history).
    pub fn update(&self, patient: &Patient) -> ServiceResult<()> {
        require("dni", &patient.dni)?;
        require("first name", &patient.first_name)?;
        require("last name", &patient.last_name)?;

        if !self.db.update_patient(patient)? {
            return Err(ServiceError::Validation(format!(
                "no patient with id {:?} to update",
                patient.id
            )));
        }
        info!(id = patient.id, "updated patient");
        Ok(())
    }

    /// Soft-delete a patient and cascade to its owned clinical history.
    ///
    /// The store performs no automatic cascading; the cascade lives here.
    pub fn remove(&self, id: i64) -> ServiceResult<()> {
        self.db.delete_history_by_patient(id)?;
        self.db.delete_patient(id)?;
        info!(id, "soft-deleted patient and clinical history");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BloodType;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn ana() -> Patient {
        Patient::new("30111222", "Ana", "Gomez", None)
    }

    fn history() -> ClinicalHistory {
        let mut hc = ClinicalHistory::new("HC-001");
        hc.blood_type = Some(BloodType::OPositive);
        hc
    }

    #[test]
    fn test_register_links_history_to_patient() {
        let db = setup_db();
        let service = PatientService::new(&db);

        let created = service.register(ana(), history()).unwrap();
        let id = created.id.expect("id assigned");

        let nested = created.history.expect("history attached");
        assert_eq!(nested.patient_id, Some(id));
        assert!(nested.id.is_some());

        let found = db.find_history_by_patient(id).unwrap().unwrap();
        assert_eq!(found.id, nested.id);
    }

    #[test]
    fn test_register_rejects_blank_fields() {
        let db = setup_db();
        let service = PatientService::new(&db);

        let mut patient = ana();
        patient.first_name = "  ".into();
        let err = service.register(patient, history()).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let mut hc = history();
        hc.history_number = "".into();
        let err = service.register(ana(), hc).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        // Nothing was persisted by the rejected attempts
        assert!(db.list_patients().unwrap().is_empty());
    }

    #[test]
    fn test_remove_cascades_to_history() {
        let db = setup_db();
        let service = PatientService::new(&db);

        let created = service.register(ana(), history()).unwrap();
        let id = created.id.unwrap();

        service.remove(id).unwrap();

        assert!(service.find_by_dni("30111222").unwrap().is_none());
        assert!(db.find_history_by_patient(id).unwrap().is_none());
    }

    #[test]
    fn test_update_missing_patient_is_an_error() {
        let db = setup_db();
        let service = PatientService::new(&db);

        let mut ghost = ana();
        ghost.id = Some(4242);
        let err = service.update(&ghost).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
