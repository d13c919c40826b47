//! Clinical history database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{BloodType, ClinicalHistory};

const HISTORY_SELECT: &str = r#"
    SELECT id, deleted, history_number, blood_type, medical_history,
           current_medication, notes, opened_date, patient_id
    FROM clinical_history
"#;

impl Database {
    /// Insert a new clinical history and return it with its generated id.
    ///
    /// The owning `patient_id` must already be set; a history without an
    /// owner is invalid.
    pub fn create_history(&self, history: &ClinicalHistory) -> DbResult<ClinicalHistory> {
        let patient_id = history.patient_id.ok_or_else(|| {
            DbError::Constraint("cannot create a clinical history without an owning patient".into())
        })?;

        self.conn.execute(
            r#"
            INSERT INTO clinical_history (
                deleted, history_number, blood_type, medical_history,
                current_medication, notes, opened_date, patient_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                history.deleted,
                history.history_number,
                history.blood_type.map(|bt| bt.as_code()),
                history.medical_history,
                history.current_medication,
                history.notes,
                history.opened_date,
                patient_id,
            ],
        )?;

        let mut created = history.clone();
        created.id = Some(self.conn.last_insert_rowid());
        Ok(created)
    }

    /// Get an active clinical history by id.
    pub fn find_history(&self, id: i64) -> DbResult<Option<ClinicalHistory>> {
        let sql = format!("{HISTORY_SELECT} WHERE id = ?1 AND deleted = 0");
        self.conn
            .query_row(&sql, [id], map_history_row)
            .optional()?
            .map(TryInto::try_into)
            .transpose()
    }

    /// Get the active clinical history owned by a patient.
    pub fn find_history_by_patient(&self, patient_id: i64) -> DbResult<Option<ClinicalHistory>> {
        let sql = format!("{HISTORY_SELECT} WHERE patient_id = ?1 AND deleted = 0");
        self.conn
            .query_row(&sql, [patient_id], map_history_row)
            .optional()?
            .map(TryInto::try_into)
            .transpose()
    }

    /// List all active clinical histories.
    pub fn list_histories(&self) -> DbResult<Vec<ClinicalHistory>> {
        let sql = format!("{HISTORY_SELECT} WHERE deleted = 0 ORDER BY history_number");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], map_history_row)?;

        let mut histories = Vec::new();
        for row in rows {
            histories.push(row?.try_into()?);
        }
        Ok(histories)
    }

    /// Overwrite the mutable columns of an existing clinical history.
    ///
    /// `patient_id` is deliberately absent from the statement: the owning
    /// patient is immutable once set.
    pub fn update_history(&self, history: &ClinicalHistory) -> DbResult<bool> {
        let id = history.id.ok_or_else(|| {
            DbError::Constraint("cannot update a clinical history without an id".into())
        })?;

        let rows_affected = self.conn.execute(
            r#"
            UPDATE clinical_history SET
                deleted = ?2,
                history_number = ?3,
                blood_type = ?4,
                medical_history = ?5,
                current_medication = ?6,
                notes = ?7,
                opened_date = ?8
            WHERE id = ?1
            "#,
            params![
                id,
                history.deleted,
                history.history_number,
                history.blood_type.map(|bt| bt.as_code()),
                history.medical_history,
                history.current_medication,
                history.notes,
                history.opened_date,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Soft-delete a clinical history by its own id. Idempotent.
    pub fn delete_history(&self, id: i64) -> DbResult<()> {
        self.conn
            .execute("UPDATE clinical_history SET deleted = 1 WHERE id = ?", [id])?;
        Ok(())
    }

    /// Soft-delete the history owned by a patient.
    ///
    /// Cascade hook: the service layer calls this when its owning patient is
    /// deleted. Idempotent.
    pub fn delete_history_by_patient(&self, patient_id: i64) -> DbResult<()> {
        self.conn.execute(
            "UPDATE clinical_history SET deleted = 1 WHERE patient_id = ?",
            [patient_id],
        )?;
        Ok(())
    }
}

/// Intermediate row struct for database mapping.
struct HistoryRow {
    id: i64,
    deleted: bool,
    history_number: String,
    blood_type: Option<String>,
    medical_history: Option<String>,
    current_medication: Option<String>,
    notes: Option<String>,
    opened_date: chrono::NaiveDate,
    patient_id: i64,
}

fn map_history_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<HistoryRow> {
    Ok(HistoryRow {
        id: row.get(0)?,
        deleted: row.get(1)?,
        history_number: row.get(2)?,
        blood_type: row.get(3)?,
        medical_history: row.get(4)?,
        current_medication: row.get(5)?,
        notes: row.get(6)?,
        opened_date: row.get(7)?,
        patient_id: row.get(8)?,
    })
}

impl TryFrom<HistoryRow> for ClinicalHistory {
    type Error = DbError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        let blood_type = match row.blood_type.as_deref() {
            Some(code) => Some(
                code.parse::<BloodType>()
                    .map_err(|e| DbError::Constraint(e.to_string()))?,
            ),
            None => None,
        };

        Ok(ClinicalHistory {
            id: Some(row.id),
            deleted: row.deleted,
            history_number: row.history_number,
            blood_type,
            medical_history: row.medical_history,
            current_medication: row.current_medication,
            notes: row.notes,
            opened_date: row.opened_date,
            patient_id: Some(row.patient_id),
        })
    }
}
