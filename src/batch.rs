use crate::{card, creditor_id, iban};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One input row: an identifier kind tag and the raw value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRecord {
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub kind: String,
    pub value: String,
    pub valid: bool,
    pub detail: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub unknown_kind: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RepairSummary {
    pub total_records: usize,
    pub repaired_records: usize,
    pub ibans_repaired: usize,
    pub creditor_ids_repaired: usize,
}

pub const KINDS: &[&str] = &["iban", "creditor-id", "card", "bic"];

pub fn validate_records(records: &[BatchRecord]) -> Vec<BatchOutcome> {
    records.iter().map(validate_record).collect()
}

fn validate_record(record: &BatchRecord) -> BatchOutcome {
    let kind = record.kind.trim().to_lowercase();
    let (valid, detail) = match kind.as_str() {
        "iban" => match iban::check(&record.value) {
            Ok(()) => (true, String::new()),
            Err(err) => (false, err.to_string()),
        },
        "creditor-id" => {
            if creditor_id::validate(&record.value) {
                (true, String::new())
            } else {
                (false, "creditor identifier failed validation".to_string())
            }
        }
        "card" => {
            if card::is_valid_number(&record.value) {
                (true, format!("type: {}", card::classify(&record.value)))
            } else {
                (false, "card number failed the Luhn check".to_string())
            }
        }
        "bic" => {
            if iban::is_bic(&record.value) {
                (true, String::new())
            } else {
                (false, "not a valid BIC format".to_string())
            }
        }
        _ => (
            false,
            format!(
                "unknown identifier kind: {} (expected one of {})",
                record.kind,
                KINDS.join(", ")
            ),
        ),
    };
    BatchOutcome {
        kind,
        value: record.value.clone(),
        valid,
        detail,
    }
}

pub fn summarize(outcomes: &[BatchOutcome]) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for outcome in outcomes {
        summary.total += 1;
        if outcome.valid {
            summary.valid += 1;
        } else {
            summary.invalid += 1;
        }
        if outcome.detail.starts_with("unknown identifier kind") {
            summary.unknown_kind += 1;
        }
    }
    summary
}

/// Validates a CSV of `kind,value` rows, optionally writing the outcomes
/// next to it.
pub fn validate_csv(input: &Path, output: Option<&Path>) -> Result<BatchSummary, String> {
    let records = read_records(input)?;
    let outcomes = validate_records(&records);
    if let Some(path) = output {
        write_outcomes(path, &outcomes)?;
    }
    Ok(summarize(&outcomes))
}

/// Recomputes check digits for IBAN and creditor-id rows that are
/// structurally sound but fail the checksum. Other kinds pass through
/// untouched.
pub fn repair_records(records: &mut [BatchRecord]) -> RepairSummary {
    let mut summary = RepairSummary::default();
    for record in records.iter_mut() {
        summary.total_records += 1;
        match record.kind.trim().to_lowercase().as_str() {
            "iban" => {
                if iban::validate(&record.value) {
                    continue;
                }
                if let Some(fixed) = repair_iban(&record.value) {
                    record.value = fixed;
                    summary.ibans_repaired += 1;
                    summary.repaired_records += 1;
                }
            }
            "creditor-id" => {
                if creditor_id::validate(&record.value) {
                    continue;
                }
                if let Some(fixed) = repair_creditor_id(&record.value) {
                    record.value = fixed;
                    summary.creditor_ids_repaired += 1;
                    summary.repaired_records += 1;
                }
            }
            _ => {}
        }
    }
    summary
}

fn repair_iban(value: &str) -> Option<String> {
    let cleaned: String = value
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| ch.to_ascii_uppercase())
        .collect();
    let country = cleaned.get(..2)?;
    let bban = cleaned.get(4..)?;
    iban::generate(country, bban).ok()
}

fn repair_creditor_id(value: &str) -> Option<String> {
    let parts = creditor_id::decompose(value)?;
    creditor_id::generate(&parts.country, &parts.business_area, &parts.national_id).ok()
}

pub fn repair_csv(input: &Path, output: &Path) -> Result<RepairSummary, String> {
    let mut records = read_records(input)?;
    let summary = repair_records(&mut records);
    let mut writer = csv::Writer::from_path(output).map_err(|err| err.to_string())?;
    for record in &records {
        writer.serialize(record).map_err(|err| err.to_string())?;
    }
    writer.flush().map_err(|err| err.to_string())?;
    Ok(summary)
}

fn read_records(input: &Path) -> Result<Vec<BatchRecord>, String> {
    let mut reader = csv::Reader::from_path(input).map_err(|err| err.to_string())?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: BatchRecord = result.map_err(|err| err.to_string())?;
        records.push(record);
    }
    Ok(records)
}

pub fn write_outcomes(path: &Path, outcomes: &[BatchOutcome]) -> Result<(), String> {
    let mut writer = csv::Writer::from_path(path).map_err(|err| err.to_string())?;
    for outcome in outcomes {
        writer.serialize(outcome).map_err(|err| err.to_string())?;
    }
    writer.flush().map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str, value: &str) -> BatchRecord {
        BatchRecord {
            kind: kind.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn mixed_batch_outcomes() {
        let records = vec![
            record("iban", "DE89370400440532013000"),
            record("iban", "DE88370400440532013000"),
            record("creditor-id", "DE98ZZZ09999999999"),
            record("card", "4111111111111111"),
            record("bic", "MARKDEFF"),
            record("passport", "X123"),
        ];
        let outcomes = validate_records(&records);
        assert_eq!(
            outcomes.iter().map(|o| o.valid).collect::<Vec<_>>(),
            vec![true, false, true, true, true, false]
        );
        assert_eq!(outcomes[1].detail, "check digits do not match");
        assert_eq!(outcomes[3].detail, "type: Visa");

        let summary = summarize(&outcomes);
        assert_eq!(summary.total, 6);
        assert_eq!(summary.valid, 4);
        assert_eq!(summary.invalid, 2);
        assert_eq!(summary.unknown_kind, 1);
    }

    #[test]
    fn repair_recomputes_check_digits() {
        let mut records = vec![
            record("iban", "DE00370400440532013000"),
            record("iban", "DE89370400440532013000"),
            record("creditor-id", "DE00ZZZ09999999999"),
            record("card", "4111111111111112"),
        ];
        let summary = repair_records(&mut records);
        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.repaired_records, 2);
        assert_eq!(summary.ibans_repaired, 1);
        assert_eq!(summary.creditor_ids_repaired, 1);
        assert_eq!(records[0].value, "DE89370400440532013000");
        assert_eq!(records[2].value, "DE98ZZZ09999999999");
        // Cards have no derivable check digits to restore in place.
        assert_eq!(records[3].value, "4111111111111112");
    }

    #[test]
    fn repair_leaves_hopeless_rows_alone() {
        let mut records = vec![record("iban", "ZZ00370400440532013000")];
        let summary = repair_records(&mut records);
        assert_eq!(summary.repaired_records, 0);
        assert_eq!(records[0].value, "ZZ00370400440532013000");
    }
}
