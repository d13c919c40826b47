//! Interactive numbered menu over the service contract.
//!
//! Every action catches and prints its own error, then control returns to
//! the menu; a failed operation never terminates the process.

use std::io::{self, Write};

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use vitalis_core::{
    BloodType, ClinicalHistory, Database, HistoryService, Patient, PatientService,
};

pub struct Menu {
    db: Database,
}

impl Menu {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Main loop: display, dispatch, repeat until option 0.
    pub fn run(&mut self) -> Result<()> {
        loop {
            print_main_menu();
            let choice = prompt("Option: ")?;

            let result = match choice.as_str() {
                "1" => self.create_patient(),
                "2" => self.list_patients(),
                "3" => self.find_patient_by_dni(),
                "4" => self.update_patient(),
                "5" => self.update_history(),
                "6" => self.list_histories(),
                "7" => self.delete_patient(),
                "0" => {
                    println!("Goodbye.");
                    return Ok(());
                }
                _ => {
                    println!("! Invalid option, try again.");
                    Ok(())
                }
            };

            if let Err(e) = result {
                println!("! {e}");
            }
        }
    }

    fn create_patient(&self) -> Result<()> {
        println!("== NEW PATIENT ==");
        let first_name = prompt("First name: ")?;
        let last_name = prompt("Last name: ")?;
        let dni = prompt("DNI: ")?;
        let birth_date = read_optional_date("Birth date (YYYY-MM-DD, blank if unknown): ")?;

        println!("== CLINICAL HISTORY (mandatory) ==");
        let history_number = prompt("History number: ")?;
        let blood_type = read_blood_type("Blood type (A+,A-,B+,B-,AB+,AB-,O+,O- or blank): ")?;
        let medical_history = optional(prompt("Medical history (optional): ")?);
        let current_medication = optional(prompt("Current medication (optional): ")?);
        let notes = optional(prompt("Notes (optional): ")?);

        let patient = Patient::new(dni, first_name, last_name, birth_date);

        let mut history = ClinicalHistory::new(history_number);
        history.blood_type = blood_type;
        history.medical_history = medical_history;
        history.current_medication = current_medication;
        history.notes = notes;

        let created = PatientService::new(&self.db).register(patient, history)?;
        println!(
            "* Patient {} saved with id {}",
            created.full_name(),
            created.id.unwrap_or_default()
        );
        Ok(())
    }

    fn list_patients(&self) -> Result<()> {
        let patients = PatientService::new(&self.db).get_all()?;
        if patients.is_empty() {
            println!("! No patients registered.");
            return Ok(());
        }

        let line = "+------+------------+-----------------+-----------------+--------------+-------+";
        println!("\n=== PATIENTS ===");
        println!("{line}");
        println!(
            "| {:<4} | {:<10} | {:<15} | {:<15} | {:<12} | {:<5} |",
            "ID", "DNI", "FIRST NAME", "LAST NAME", "HISTORY", "BLOOD"
        );
        println!("{line}");

        for p in &patients {
            let number = p
                .history
                .as_ref()
                .map(|hc| hc.history_number.clone())
                .unwrap_or_else(|| "n/a".into());
            let blood = p
                .history
                .as_ref()
                .and_then(|hc| hc.blood_type)
                .map(|bt| bt.to_string())
                .unwrap_or_else(|| "-".into());

            println!(
                "| {:<4} | {:<10} | {:<15} | {:<15} | {:<12} | {:<5} |",
                p.id.unwrap_or_default(),
                p.dni,
                p.first_name,
                p.last_name,
                number,
                blood
            );
        }
        println!("{line}");
        Ok(())
    }

    fn find_patient_by_dni(&self) -> Result<()> {
        let dni = prompt("DNI to look up: ")?;
        match PatientService::new(&self.db).find_by_dni(&dni)? {
            Some(patient) => print_patient_card(&patient),
            None => println!("! No patient found with DNI {dni}"),
        }
        Ok(())
    }

    fn update_patient(&self) -> Result<()> {
        let service = PatientService::new(&self.db);
        let dni = prompt("DNI of the patient to update: ")?;
        let Some(mut patient) = service.find_by_dni(&dni)? else {
            println!("! No patient found with DNI {dni}");
            return Ok(());
        };

        println!("Blank keeps the current value.");
        patient.first_name = keep_or(
            prompt(&format!("First name [{}]: ", patient.first_name))?,
            patient.first_name,
        );
        patient.last_name = keep_or(
            prompt(&format!("Last name [{}]: ", patient.last_name))?,
            patient.last_name,
        );
        if let Some(date) = read_optional_date("Birth date (YYYY-MM-DD, blank keeps): ")? {
            patient.birth_date = Some(date);
        }

        service.update(&patient)?;
        println!("* Patient updated.");
        Ok(())
    }

    fn update_history(&self) -> Result<()> {
        let dni = prompt("DNI of the patient whose history to update: ")?;
        let Some(patient) = PatientService::new(&self.db).find_by_dni(&dni)? else {
            println!("! No patient found with DNI {dni}");
            return Ok(());
        };
        let Some(mut hc) = patient.history else {
            println!("! Patient has no active clinical history.");
            return Ok(());
        };

        println!("Blank keeps the current value.");
        hc.history_number = keep_or(
            prompt(&format!("History number [{}]: ", hc.history_number))?,
            hc.history_number,
        );
        let current_blood = hc
            .blood_type
            .map(|bt| bt.to_string())
            .unwrap_or_else(|| "-".into());
        if let Some(bt) = read_blood_type(&format!("Blood type [{current_blood}], blank keeps: "))? {
            hc.blood_type = Some(bt);
        }
        if let Some(text) = optional(prompt("Medical history (blank keeps): ")?) {
            hc.medical_history = Some(text);
        }
        if let Some(text) = optional(prompt("Current medication (blank keeps): ")?) {
            hc.current_medication = Some(text);
        }
        if let Some(text) = optional(prompt("Notes (blank keeps): ")?) {
            hc.notes = Some(text);
        }

        HistoryService::new(&self.db).update(&hc)?;
        println!("* Clinical history updated.");
        Ok(())
    }

    fn list_histories(&self) -> Result<()> {
        let histories = HistoryService::new(&self.db).get_all()?;
        if histories.is_empty() {
            println!("! No clinical histories registered.");
            return Ok(());
        }

        let line = "+------+--------------+-------+--------------+------------+";
        println!("\n=== CLINICAL HISTORIES ===");
        println!("{line}");
        println!(
            "| {:<4} | {:<12} | {:<5} | {:<12} | {:<10} |",
            "ID", "NUMBER", "BLOOD", "OPENED", "PATIENT ID"
        );
        println!("{line}");

        for hc in &histories {
            let blood = hc
                .blood_type
                .map(|bt| bt.to_string())
                .unwrap_or_else(|| "-".into());
            println!(
                "| {:<4} | {:<12} | {:<5} | {:<12} | {:<10} |",
                hc.id.unwrap_or_default(),
                hc.history_number,
                blood,
                hc.opened_date,
                hc.patient_id.unwrap_or_default()
            );
        }
        println!("{line}");
        Ok(())
    }

    fn delete_patient(&self) -> Result<()> {
        let service = PatientService::new(&self.db);
        let dni = prompt("DNI of the patient to delete: ")?;
        let Some(patient) = service.find_by_dni(&dni)? else {
            println!("! No patient found with DNI {dni}");
            return Ok(());
        };
        let Some(id) = patient.id else {
            return Ok(());
        };

        let confirm = prompt(&format!(
            "Delete {} (DNI {}) and their clinical history? [y/N]: ",
            patient.full_name(),
            patient.dni
        ))?;
        if !confirm.eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }

        service.remove(id)?;
        println!("* Patient deleted.");
        Ok(())
    }
}

fn print_main_menu() {
    println!("\n===== VITALIS =====");
    println!("1. Register patient");
    println!("2. List patients");
    println!("3. Find patient by DNI");
    println!("4. Update patient");
    println!("5. Update clinical history");
    println!("6. List clinical histories");
    println!("7. Delete patient");
    println!("0. Quit");
}

fn print_patient_card(patient: &Patient) {
    println!("\n============ PATIENT RECORD ============");
    println!(" {:<18}: {}", "Full name", patient.full_name());
    println!(" {:<18}: {}", "DNI", patient.dni);
    let birth = patient
        .birth_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "not recorded".into());
    println!(" {:<18}: {}", "Birth date", birth);

    println!("------------ CLINICAL DATA -------------");
    match &patient.history {
        Some(hc) => {
            let blood = hc
                .blood_type
                .map(|bt| bt.to_string())
                .unwrap_or_else(|| "-".into());
            println!(" {:<18}: {}", "History number", hc.history_number);
            println!(" {:<18}: {}", "Blood type", blood);
            println!(" {:<18}: {}", "Opened", hc.opened_date);
            println!(" {:<18}: {}", "Notes", hc.notes.as_deref().unwrap_or("-"));
        }
        None => println!(" ! Patient has no active clinical history."),
    }
    println!("========================================");
}

/// Print a label and read one trimmed line from stdin.
fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf.trim().to_string())
}

/// Blank input becomes `None`.
fn optional(input: String) -> Option<String> {
    if input.is_empty() {
        None
    } else {
        Some(input)
    }
}

/// Blank input keeps the current value.
fn keep_or(input: String, current: String) -> String {
    if input.is_empty() {
        current
    } else {
        input
    }
}

fn read_optional_date(label: &str) -> Result<Option<NaiveDate>> {
    let text = prompt(label)?;
    if text.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .map_err(|_| anyhow!("invalid date {text:?}, expected YYYY-MM-DD (e.g. 1990-12-31)"))?;
    Ok(Some(date))
}

fn read_blood_type(label: &str) -> Result<Option<BloodType>> {
    let text = prompt(label)?;
    Ok(BloodType::from_code(&text)?)
}
