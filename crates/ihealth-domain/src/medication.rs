//! Structured medication payloads.
//!
//! Prescriptions persist their medication list as a JSON column. The payload is
//! validated against this schema at the API boundary instead of being stored as
//! a loosely-typed blob.

use serde::{Deserialize, Serialize};

/// One medication line on a prescription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MedicationEntry {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Parse and validate a medications JSON value.
///
/// Rejects empty lists, entries with unknown fields, and entries with an empty
/// name — the rest is free text chosen by the prescribing doctor.
pub fn parse_medications(value: &serde_json::Value) -> Result<Vec<MedicationEntry>, String> {
    let entries: Vec<MedicationEntry> = serde::Deserialize::deserialize(value)
        .map_err(|e| format!("liste de médicaments invalide : {e}"))?;
    if entries.is_empty() {
        return Err("au moins un médicament est requis".to_owned());
    }
    if entries.iter().any(|m| m.name.trim().is_empty()) {
        return Err("chaque médicament doit avoir un nom".to_owned());
    }
    Ok(entries)
}
