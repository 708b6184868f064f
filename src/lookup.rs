use serde::Deserialize;
use std::path::Path;

/// Read-only bank reference lookups, backed by an externally refreshed
/// dataset. The engines only ever query by key; loading and refreshing the
/// data is the caller's business.
pub trait BankDirectory {
    fn resolve_bic_by_bank_code(&self, bank_code: &str) -> Option<String>;
    fn resolve_bank_name_by_bic(&self, bic: &str) -> Option<String>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct BankEntry {
    pub bank_code: String,
    pub bic: String,
    pub name: String,
}

/// In-memory directory over a fixed entry list.
#[derive(Debug, Default)]
pub struct StaticBankDirectory {
    entries: Vec<BankEntry>,
}

impl StaticBankDirectory {
    pub fn new(entries: Vec<BankEntry>) -> Self {
        Self { entries }
    }

    /// Loads entries from a CSV file with `bank_code,bic,name` columns.
    pub fn from_csv_path(path: &Path) -> Result<Self, String> {
        let mut reader = csv::Reader::from_path(path).map_err(|err| err.to_string())?;
        let mut entries = Vec::new();
        for result in reader.deserialize() {
            let entry: BankEntry = result.map_err(|err| err.to_string())?;
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BankDirectory for StaticBankDirectory {
    fn resolve_bic_by_bank_code(&self, bank_code: &str) -> Option<String> {
        let code = bank_code.trim();
        self.entries
            .iter()
            .find(|entry| entry.bank_code == code)
            .map(|entry| entry.bic.clone())
    }

    fn resolve_bank_name_by_bic(&self, bic: &str) -> Option<String> {
        let bic = bic.trim().to_uppercase();
        self.entries
            .iter()
            .find(|entry| entry.bic == bic)
            .map(|entry| entry.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> StaticBankDirectory {
        StaticBankDirectory::new(vec![
            BankEntry {
                bank_code: "37040044".to_string(),
                bic: "COBADEFFXXX".to_string(),
                name: "Commerzbank".to_string(),
            },
            BankEntry {
                bank_code: "43060967".to_string(),
                bic: "GENODEM1GLS".to_string(),
                name: "GLS Gemeinschaftsbank".to_string(),
            },
        ])
    }

    #[test]
    fn resolves_bic_by_bank_code() {
        let dir = directory();
        assert_eq!(
            dir.resolve_bic_by_bank_code("37040044").as_deref(),
            Some("COBADEFFXXX")
        );
        assert_eq!(dir.resolve_bic_by_bank_code("00000000"), None);
    }

    #[test]
    fn resolves_bank_name_by_bic() {
        let dir = directory();
        assert_eq!(
            dir.resolve_bank_name_by_bic("genodem1gls").as_deref(),
            Some("GLS Gemeinschaftsbank")
        );
        assert_eq!(dir.resolve_bank_name_by_bic("NOTAREAL11"), None);
    }
}
