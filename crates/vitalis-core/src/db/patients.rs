//! Patient database operations.
//!
//! All read paths filter soft-deleted rows and eager-load the active
//! clinical history through a left join on `clinical_history`.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{BloodType, ClinicalHistory, Patient};

/// Joined projection shared by every patient read.
const PATIENT_SELECT: &str = r#"
    SELECT p.id, p.deleted, p.national_id, p.first_name, p.last_name, p.birth_date,
           hc.id, hc.deleted, hc.history_number, hc.blood_type,
           hc.medical_history, hc.current_medication, hc.notes,
           hc.opened_date, hc.patient_id
    FROM patient p
    LEFT JOIN clinical_history hc
           ON hc.patient_id = p.id AND hc.deleted = 0
"#;

impl Database {
    /// Insert a new patient and return it with its generated id.
    ///
    /// The attached `history`, if any, is NOT persisted here; the service
    /// layer creates it separately once the patient id is known.
    pub fn create_patient(&self, patient: &Patient) -> DbResult<Patient> {
        self.conn.execute(
            r#"
            INSERT INTO patient (deleted, national_id, first_name, last_name, birth_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                patient.deleted,
                patient.dni,
                patient.first_name,
                patient.last_name,
                patient.birth_date,
            ],
        )?;

        let mut created = patient.clone();
        created.id = Some(self.conn.last_insert_rowid());
        Ok(created)
    }

    /// Get an active patient by id, history eagerly loaded.
    pub fn find_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        let sql = format!("{PATIENT_SELECT} WHERE p.id = ?1 AND p.deleted = 0");
        self.conn
            .query_row(&sql, [id], map_patient_row)
            .optional()?
            .map(TryInto::try_into)
            .transpose()
    }

    /// Get an active patient by DNI, history eagerly loaded.
    pub fn find_patient_by_dni(&self, dni: &str) -> DbResult<Option<Patient>> {
        let sql = format!("{PATIENT_SELECT} WHERE p.national_id = ?1 AND p.deleted = 0");
        self.conn
            .query_row(&sql, [dni], map_patient_row)
            .optional()?
            .map(TryInto::try_into)
            .transpose()
    }

    /// List all active patients, histories eagerly loaded.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let sql = format!("{PATIENT_SELECT} WHERE p.deleted = 0 ORDER BY p.last_name, p.first_name");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], map_patient_row)?;

        let mut patients = Vec::new();
        for row in rows {
            patients.push(row?.try_into()?);
        }
        Ok(patients)
    }

    /// Overwrite the mutable columns of an existing patient.
    ///
    /// The id never changes; the associated history is untouched.
    pub fn update_patient(&self, patient: &Patient) -> DbResult<bool> {
        let id = patient
            .id
            .ok_or_else(|| DbError::Constraint("cannot update a patient without an id".into()))?;

        let rows_affected = self.conn.execute(
            r#"
            UPDATE patient SET
                deleted = ?2,
                national_id = ?3,
                first_name = ?4,
                last_name = ?5,
                birth_date = ?6
            WHERE id = ?1
            "#,
            params![
                id,
                patient.deleted,
                patient.dni,
                patient.first_name,
                patient.last_name,
                patient.birth_date,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Soft-delete a patient. Idempotent; unknown ids are a no-op.
    pub fn delete_patient(&self, id: i64) -> DbResult<()> {
        self.conn
            .execute("UPDATE patient SET deleted = 1 WHERE id = ?", [id])?;
        Ok(())
    }
}

/// Intermediate row struct for the joined patient projection.
///
/// The history columns are all nullable: a NULL joined `hc.id` means the
/// patient has no active clinical history.
struct PatientRow {
    id: i64,
    deleted: bool,
    dni: String,
    first_name: String,
    last_name: String,
    birth_date: Option<chrono::NaiveDate>,
    hc_id: Option<i64>,
    hc_deleted: Option<bool>,
    hc_history_number: Option<String>,
    hc_blood_type: Option<String>,
    hc_medical_history: Option<String>,
    hc_current_medication: Option<String>,
    hc_notes: Option<String>,
    hc_opened_date: Option<chrono::NaiveDate>,
    hc_patient_id: Option<i64>,
}

fn map_patient_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok(PatientRow {
        id: row.get(0)?,
        deleted: row.get(1)?,
        dni: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        birth_date: row.get(5)?,
        hc_id: row.get(6)?,
        hc_deleted: row.get(7)?,
        hc_history_number: row.get(8)?,
        hc_blood_type: row.get(9)?,
        hc_medical_history: row.get(10)?,
        hc_current_medication: row.get(11)?,
        hc_notes: row.get(12)?,
        hc_opened_date: row.get(13)?,
        hc_patient_id: row.get(14)?,
    })
}

impl TryFrom<PatientRow> for Patient {
    type Error = DbError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        // NULL joined id means no active history for this patient
        let history = match row.hc_id {
            None => None,
            Some(hc_id) => {
                let blood_type = match row.hc_blood_type.as_deref() {
                    Some(code) => Some(
                        code.parse::<BloodType>()
                            .map_err(|e| DbError::Constraint(e.to_string()))?,
                    ),
                    None => None,
                };
                Some(ClinicalHistory {
                    id: Some(hc_id),
                    deleted: row.hc_deleted.unwrap_or(false),
                    history_number: row.hc_history_number.unwrap_or_default(),
                    blood_type,
                    medical_history: row.hc_medical_history,
                    current_medication: row.hc_current_medication,
                    notes: row.hc_notes,
                    opened_date: row.hc_opened_date.ok_or_else(|| {
                        DbError::Constraint(format!("clinical history {hc_id} has no opened date"))
                    })?,
                    patient_id: row.hc_patient_id,
                })
            }
        };

        Ok(Patient {
            id: Some(row.id),
            deleted: row.deleted,
            dni: row.dni,
            first_name: row.first_name,
            last_name: row.last_name,
            birth_date: row.birth_date,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn ana() -> Patient {
        Patient::new(
            "30111222",
            "Ana",
            "Gomez",
            NaiveDate::from_ymd_opt(1990, 5, 1),
        )
    }

    #[test]
    fn test_create_assigns_id_and_keeps_fields() {
        let db = setup_db();

        let created = db.create_patient(&ana()).unwrap();
        assert!(created.id.is_some());
        assert_eq!(created.dni, "30111222");
        assert_eq!(created.first_name, "Ana");
        assert_eq!(created.last_name, "Gomez");
        assert_eq!(created.birth_date, NaiveDate::from_ymd_opt(1990, 5, 1));
    }

    #[test]
    fn test_find_missing_is_none() {
        let db = setup_db();
        assert!(db.find_patient(9999).unwrap().is_none());
        assert!(db.find_patient_by_dni("00000000").unwrap().is_none());
    }

    #[test]
    fn test_find_without_history_leaves_it_unset() {
        let db = setup_db();
        let created = db.create_patient(&ana()).unwrap();

        let found = db.find_patient(created.id.unwrap()).unwrap().unwrap();
        assert_eq!(found.dni, "30111222");
        assert!(found.history.is_none());
    }

    #[test]
    fn test_find_by_dni_hydrates_active_history() {
        let db = setup_db();
        let created = db.create_patient(&ana()).unwrap();

        let mut hc = ClinicalHistory::new("HC-001");
        hc.blood_type = Some(BloodType::OPositive);
        hc.patient_id = created.id;
        let hc = db.create_history(&hc).unwrap();

        let found = db.find_patient_by_dni("30111222").unwrap().unwrap();
        let nested = found.history.expect("history should be hydrated");
        assert_eq!(nested.id, hc.id);
        assert_eq!(nested.history_number, "HC-001");
        assert_eq!(nested.blood_type, Some(BloodType::OPositive));
        assert_eq!(nested.patient_id, created.id);

        // Once the history is soft-deleted the join no longer hydrates it
        db.delete_history(hc.id.unwrap()).unwrap();
        let found = db.find_patient_by_dni("30111222").unwrap().unwrap();
        assert!(found.history.is_none());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let db = setup_db();
        let created = db.create_patient(&ana()).unwrap();
        let id = created.id.unwrap();

        db.delete_patient(id).unwrap();
        assert!(db.find_patient(id).unwrap().is_none());

        // Deleting again (or deleting nonsense) is a no-op, not an error
        db.delete_patient(id).unwrap();
        db.delete_patient(424242).unwrap();
        assert!(db.find_patient(id).unwrap().is_none());
    }

    #[test]
    fn test_list_excludes_deleted() {
        let db = setup_db();
        let p1 = db.create_patient(&ana()).unwrap();
        db.create_patient(&Patient::new("28999000", "Bruno", "Diaz", None))
            .unwrap();

        db.delete_patient(p1.id.unwrap()).unwrap();

        let all = db.list_patients().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].dni, "28999000");
    }

    #[test]
    fn test_update_preserves_id() {
        let db = setup_db();
        let mut created = db.create_patient(&ana()).unwrap();
        let id = created.id;

        created.last_name = "Gomez de Perez".into();
        assert!(db.update_patient(&created).unwrap());

        let found = db.find_patient(id.unwrap()).unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.last_name, "Gomez de Perez");
    }

    #[test]
    fn test_update_transient_patient_fails() {
        let db = setup_db();
        let err = db.update_patient(&ana()).unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
    }

    #[test]
    fn test_duplicate_active_dni_rejected() {
        let db = setup_db();
        db.create_patient(&ana()).unwrap();

        let dup = db.create_patient(&ana());
        assert!(dup.is_err());
    }
}
