use crate::checksum::{check_digits, is_checksum_valid};
use crate::error::IdentifierError;
use crate::reference::iban_length;

/// Fixed-offset decomposition of a DE-shaped IBAN. The offsets (bank code
/// in chars 4..12, account number in chars 12..22) are the German BBAN
/// layout and do not generalize to other countries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbanParts {
    pub bank_code: String,
    pub account_number: String,
}

fn strip_spaces(input: &str) -> String {
    input.chars().filter(|ch| *ch != ' ').collect()
}

/// Structural check: two uppercase letters followed by uppercase
/// alphanumerics, total length 15..=34, with no run of five or more
/// literal 'X' characters (those mark a redacted IBAN).
pub fn is_well_formed(input: &str) -> bool {
    let iban = strip_spaces(input);
    if iban.contains("XXXXX") {
        return false;
    }
    if !(15..=34).contains(&iban.len()) {
        return false;
    }
    let mut chars = iban.chars();
    let country_ok = chars.by_ref().take(2).all(|ch| ch.is_ascii_uppercase());
    country_ok && chars.all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit())
}

/// The masking shape used when an IBAN has been redacted for display:
/// two letters, "XX", eleven digits, "XXXX", three digits.
pub fn is_anonymized(input: &str) -> bool {
    let iban = strip_spaces(input);
    if !iban.is_ascii() || iban.len() != 22 {
        return false;
    }
    let b = iban.as_bytes();
    b[..2].iter().all(|c| c.is_ascii_uppercase())
        && &iban[2..4] == "XX"
        && b[4..15].iter().all(|c| c.is_ascii_digit())
        && &iban[15..19] == "XXXX"
        && b[19..22].iter().all(|c| c.is_ascii_digit())
}

/// Full validation pipeline, reporting which stage failed. `validate` is
/// the boolean collapse of this.
pub fn check(input: &str) -> Result<(), IdentifierError> {
    let iban = strip_spaces(input);
    // Redacted IBANs are never checksum-validated.
    if is_anonymized(&iban) {
        return Err(IdentifierError::MalformedInput);
    }
    if !is_well_formed(&iban) {
        return Err(IdentifierError::MalformedInput);
    }
    let country = &iban[..2];
    let expected = iban_length(country)
        .ok_or_else(|| IdentifierError::UnknownCountry(country.to_string()))?;
    if iban.len() != expected {
        return Err(IdentifierError::LengthMismatch {
            expected,
            actual: iban.len(),
        });
    }
    let rearranged = format!("{}{}", &iban[4..], &iban[..4]);
    if is_checksum_valid(&rearranged)? {
        Ok(())
    } else {
        Err(IdentifierError::BadChecksum)
    }
}

pub fn validate(input: &str) -> bool {
    check(input).is_ok()
}

/// Builds the IBAN for a national account part (BBAN), deriving the two
/// check digits. The payload length must match the registry length for the
/// country minus the four-character prefix.
pub fn generate(country: &str, bban: &str) -> Result<String, IdentifierError> {
    let country = country.trim().to_uppercase();
    let total = iban_length(&country)
        .ok_or_else(|| IdentifierError::UnknownCountry(country.clone()))?;
    let bban = bban.trim().to_uppercase();
    let expected = total - 4;
    if bban.len() != expected {
        return Err(IdentifierError::LengthMismatch {
            expected,
            actual: bban.len(),
        });
    }
    let digits = check_digits(&bban, &country)?;
    Ok(format!("{}{}{}", country, digits, bban))
}

/// Fixed-offset split into bank code and account number. `None` below the
/// 22-character minimum. See `IbanParts` for the layout caveat.
pub fn split(input: &str) -> Option<IbanParts> {
    let iban = strip_spaces(input);
    if !iban.is_ascii() || iban.len() < 22 {
        return None;
    }
    Some(IbanParts {
        bank_code: iban[4..12].to_string(),
        account_number: iban[12..22].to_string(),
    })
}

/// BIC format check: four bank letters, two country letters, a location
/// pair (first char 2-9 or A-Z, second anything alphanumeric except 'O'),
/// and an optional three-character branch code. No checksum exists for
/// BICs.
pub fn is_bic(input: &str) -> bool {
    let bic = input.trim();
    if bic.len() != 8 && bic.len() != 11 {
        return false;
    }
    let b = bic.as_bytes();
    if !b[..6].iter().all(|c| c.is_ascii_uppercase()) {
        return false;
    }
    let loc1_ok = matches!(b[6], b'2'..=b'9') || b[6].is_ascii_uppercase();
    let loc2_ok = (b[7].is_ascii_digit() || b[7].is_ascii_uppercase()) && b[7] != b'O';
    if !loc1_ok || !loc2_ok {
        return false;
    }
    b[8..]
        .iter()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}
