use crate::checksum::{check_digits, is_checksum_valid};
use crate::error::IdentifierError;
use crate::reference::is_sepa_country;

/// Decomposed creditor identifier: country(2) + check digits(2) +
/// business area(3) + national identifier (rest).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditorIdParts {
    pub country: String,
    pub check_digits: String,
    pub business_area: String,
    pub national_id: String,
}

/// Strips all whitespace and uppercases; every accessor and the validator
/// operate on this form.
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| ch.to_ascii_uppercase())
        .collect()
}

/// Structural check on the normalized form: two letters, two digits, then
/// at least three alphanumerics, with a total length of at least eight.
pub fn is_well_formed(input: &str) -> bool {
    well_formed_normalized(&normalize(input))
}

fn well_formed_normalized(ci: &str) -> bool {
    if ci.len() < 8 {
        return false;
    }
    let b = ci.as_bytes();
    b[..2].iter().all(|c| c.is_ascii_uppercase())
        && b[2..4].iter().all(|c| c.is_ascii_digit())
        && b[4..]
            .iter()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// MOD 97-10 validation. The business area (chars 4..7) is excluded from
/// the check string; only national id + country + check digits count.
pub fn validate(input: &str) -> bool {
    let ci = normalize(input);
    if !well_formed_normalized(&ci) {
        return false;
    }
    let country = &ci[..2];
    let digits = &ci[2..4];
    let national_id = &ci[7..];
    let rearranged = format!("{}{}{}", national_id, country, digits);
    matches!(is_checksum_valid(&rearranged), Ok(true))
}

/// Builds a creditor identifier, deriving the check digits from the
/// national identifier and country alone. The business area is
/// zero-left-padded to three characters and truncated to three.
pub fn generate(
    country: &str,
    business_area: &str,
    national_id: &str,
) -> Result<String, IdentifierError> {
    let country = country.trim().to_uppercase();
    if !is_sepa_country(&country) {
        return Err(IdentifierError::UnknownCountry(country));
    }
    let national_id = national_id.trim().to_uppercase();
    if national_id.is_empty() {
        return Err(IdentifierError::MalformedInput);
    }
    let area = pad_business_area(business_area)?;
    let digits = check_digits(&national_id, &country)?;
    Ok(format!("{}{}{}{}", country, digits, area, national_id))
}

fn pad_business_area(input: &str) -> Result<String, IdentifierError> {
    let area = input.trim().to_uppercase();
    for ch in area.chars() {
        if !ch.is_ascii_alphanumeric() {
            return Err(IdentifierError::InvalidCharacter(ch));
        }
    }
    let padded = format!("{:0>3}", area);
    Ok(padded.chars().take(3).collect())
}

/// Country code field, `None` when the input is shorter than two
/// characters. Total over arbitrary input, like the other accessors.
pub fn country_of(input: &str) -> Option<String> {
    let ci = normalize(input);
    ci.get(..2).map(str::to_string)
}

pub fn check_digits_of(input: &str) -> Option<String> {
    let ci = normalize(input);
    ci.get(2..4).map(str::to_string)
}

pub fn business_area_of(input: &str) -> Option<String> {
    let ci = normalize(input);
    ci.get(4..7).map(str::to_string)
}

pub fn national_id_of(input: &str) -> Option<String> {
    let ci = normalize(input);
    match ci.get(7..) {
        Some(id) if !id.is_empty() => Some(id.to_string()),
        _ => None,
    }
}

pub fn decompose(input: &str) -> Option<CreditorIdParts> {
    let ci = normalize(input);
    let national_id = match ci.get(7..) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => return None,
    };
    Some(CreditorIdParts {
        country: ci.get(..2)?.to_string(),
        check_digits: ci.get(2..4)?.to_string(),
        business_area: ci.get(4..7)?.to_string(),
        national_id,
    })
}

/// German creditor identifiers have a fixed shape: 18 characters, DE
/// prefix, alphanumeric business area and an 11-digit national id.
pub fn is_german(input: &str) -> bool {
    let ci = normalize(input);
    if ci.len() != 18 || !ci.starts_with("DE") {
        return false;
    }
    let b = ci.as_bytes();
    let area_ok = b[4..7]
        .iter()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    let id_ok = b[7..].iter().all(|c| c.is_ascii_digit());
    area_ok && id_ok && validate(&ci)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Bundesbank's published example identifier.
    const VALID_DE: &str = "DE98ZZZ09999999999";

    #[test]
    fn validates_known_vector() {
        assert!(validate(VALID_DE));
        assert!(validate("de98zzz09999999999"));
        assert!(validate("DE98 ZZZ 09999999999"));
        assert!(!validate("DE97ZZZ09999999999"));
    }

    #[test]
    fn business_area_is_excluded_from_the_checksum() {
        // Any business area yields the same check digits.
        assert!(validate("DE98ABC09999999999"));
        assert!(validate("DE9800109999999999"));
    }

    #[test]
    fn generate_then_validate_round_trips() {
        let ci = generate("DE", "ZZZ", "00000000001").unwrap();
        assert_eq!(ci, "DE09ZZZ00000000001");
        assert!(validate(&ci));
        let parts = decompose(&ci).unwrap();
        assert_eq!(parts.country, "DE");
        assert_eq!(parts.business_area, "ZZZ");
        assert_eq!(parts.national_id, "00000000001");
    }

    #[test]
    fn generate_pads_and_truncates_the_business_area() {
        let ci = generate("DE", "A", "00000000001").unwrap();
        assert_eq!(business_area_of(&ci).as_deref(), Some("00A"));
        let ci = generate("DE", "ABCD", "00000000001").unwrap();
        assert_eq!(business_area_of(&ci).as_deref(), Some("ABC"));
        // The area never feeds the checksum, so both stay valid.
        assert!(validate(&ci));
    }

    #[test]
    fn generate_rejects_bad_input() {
        assert_eq!(
            generate("US", "ZZZ", "00000000001"),
            Err(IdentifierError::UnknownCountry("US".to_string()))
        );
        assert_eq!(
            generate("DE", "ZZZ", ""),
            Err(IdentifierError::MalformedInput)
        );
        assert_eq!(
            generate("DE", "Z!Z", "00000000001"),
            Err(IdentifierError::InvalidCharacter('!'))
        );
        assert_eq!(
            generate("DE", "ZZZ", "0000000000-"),
            Err(IdentifierError::InvalidCharacter('-'))
        );
    }

    #[test]
    fn accessors_are_total_over_short_input() {
        assert_eq!(country_of("D"), None);
        assert_eq!(country_of("DE98ZZZ1"), Some("DE".to_string()));
        assert_eq!(check_digits_of("DE9"), None);
        assert_eq!(business_area_of("DE98ZZ"), None);
        assert_eq!(national_id_of("DE98ZZZ"), None);
        assert_eq!(national_id_of("DE98ZZZ1"), Some("1".to_string()));
        assert!(decompose("DE98ZZZ").is_none());
    }

    #[test]
    fn well_formed_boundaries() {
        assert!(is_well_formed(VALID_DE));
        assert!(is_well_formed("fr72zzz123456"));
        assert!(!is_well_formed("DE98ZZZ"));
        assert!(!is_well_formed("D898ZZZ09999999999"));
        assert!(!is_well_formed("DEZZ98Z09999999999"));
        assert!(!is_well_formed("DE98ZZ-09999999999"));
    }

    #[test]
    fn single_digit_substitutions_outside_the_area_are_caught() {
        let bytes = VALID_DE.as_bytes();
        for (idx, original) in bytes.iter().enumerate() {
            // Chars 4..7 are the business area; flips there keep the
            // identifier valid by scheme design.
            if (4..7).contains(&idx) || !original.is_ascii_digit() {
                continue;
            }
            for replacement in b'0'..=b'9' {
                if replacement == *original {
                    continue;
                }
                let mut mutated = bytes.to_vec();
                mutated[idx] = replacement;
                let mutated = String::from_utf8(mutated).unwrap();
                assert!(!validate(&mutated), "mutation survived: {}", mutated);
            }
        }
    }

    #[test]
    fn german_fixed_shape_check() {
        assert!(is_german(VALID_DE));
        assert!(!is_german("FR72ZZZ123456"));
        // Letter in the national id part.
        assert!(!is_german("DE98ZZZ0999999999A"));
        // Wrong length.
        assert!(!is_german("DE98ZZZ099999999990"));
        // Right shape, wrong check digits.
        assert!(!is_german("DE97ZZZ09999999999"));
    }
}
