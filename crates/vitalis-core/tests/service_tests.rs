//! End-to-end service layer tests.

use chrono::NaiveDate;
use vitalis_core::db::Database;
use vitalis_core::models::{BloodType, ClinicalHistory, Patient};
use vitalis_core::service::{HistoryService, PatientService};

fn make_patient() -> Patient {
    Patient::new(
        "30111222",
        "Ana",
        "Gomez",
        NaiveDate::from_ymd_opt(1990, 5, 1),
    )
}

fn make_history() -> ClinicalHistory {
    let mut hc = ClinicalHistory::new("HC-001");
    hc.blood_type = Some(BloodType::OPositive);
    hc
}

#[test]
fn test_register_then_lookup_then_delete() {
    let db = Database::open_in_memory().unwrap();
    let patients = PatientService::new(&db);

    // Register: both rows persist, the history owned by the new patient
    let created = patients.register(make_patient(), make_history()).unwrap();
    assert!(created.id.is_some());

    // Lookup by DNI returns the patient with its nested history
    let found = patients.find_by_dni("30111222").unwrap().unwrap();
    assert_eq!(found.full_name(), "Ana Gomez");
    assert_eq!(found.birth_date, NaiveDate::from_ymd_opt(1990, 5, 1));

    let hc = found.history.expect("nested history");
    assert_eq!(hc.history_number, "HC-001");
    assert_eq!(hc.blood_type, Some(BloodType::OPositive));

    // Delete the patient, then the same lookup comes back empty
    patients.remove(created.id.unwrap()).unwrap();
    assert!(patients.find_by_dni("30111222").unwrap().is_none());

    // ... and the cascaded history is unreachable too
    let histories = HistoryService::new(&db);
    assert!(histories
        .find_by_patient(created.id.unwrap())
        .unwrap()
        .is_none());
}

#[test]
fn test_dni_reusable_after_delete() {
    let db = Database::open_in_memory().unwrap();
    let patients = PatientService::new(&db);

    let first = patients.register(make_patient(), make_history()).unwrap();

    // Active duplicate is rejected by the store
    assert!(patients
        .register(make_patient(), ClinicalHistory::new("HC-002"))
        .is_err());

    // After the soft delete the DNI registers again
    patients.remove(first.id.unwrap()).unwrap();
    let second = patients
        .register(make_patient(), ClinicalHistory::new("HC-002"))
        .unwrap();
    assert_ne!(first.id, second.id);

    let found = patients.find_by_dni("30111222").unwrap().unwrap();
    assert_eq!(found.id, second.id);
    assert_eq!(
        found.history.map(|hc| hc.history_number),
        Some("HC-002".into())
    );
}

#[test]
fn test_update_flows_keep_identity() {
    let db = Database::open_in_memory().unwrap();
    let patients = PatientService::new(&db);
    let histories = HistoryService::new(&db);

    let mut created = patients.register(make_patient(), make_history()).unwrap();
    let patient_id = created.id;

    created.first_name = "Ana Maria".into();
    patients.update(&created).unwrap();

    let mut hc = histories.find_by_patient(patient_id.unwrap()).unwrap().unwrap();
    let hc_id = hc.id;
    hc.notes = Some("allergy review pending".into());
    histories.update(&hc).unwrap();

    let found = patients.find_by_dni("30111222").unwrap().unwrap();
    assert_eq!(found.id, patient_id);
    assert_eq!(found.first_name, "Ana Maria");

    let hc = found.history.expect("nested history");
    assert_eq!(hc.id, hc_id);
    assert_eq!(hc.patient_id, patient_id);
    assert_eq!(hc.notes, Some("allergy review pending".into()));
}
