//! SQLite schema definition.

/// Complete database schema for Vitalis.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patient (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    deleted INTEGER NOT NULL DEFAULT 0,
    national_id TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    birth_date TEXT
);

-- Unique per ACTIVE patient: a soft-deleted row frees its DNI for reuse
CREATE UNIQUE INDEX IF NOT EXISTS idx_patient_active_dni
    ON patient(national_id) WHERE deleted = 0;

-- ============================================================================
-- Clinical Histories
-- ============================================================================

CREATE TABLE IF NOT EXISTS clinical_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    deleted INTEGER NOT NULL DEFAULT 0,
    history_number TEXT NOT NULL,
    blood_type TEXT,                             -- one of A+ A- B+ B- AB+ AB- O+ O-, or NULL
    medical_history TEXT,
    current_medication TEXT,
    notes TEXT,
    opened_date TEXT NOT NULL,
    patient_id INTEGER NOT NULL REFERENCES patient(id)
);

CREATE INDEX IF NOT EXISTS idx_history_patient ON clinical_history(patient_id);
"#;
