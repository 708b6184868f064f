use crate::error::IdentifierError;

/// Maps letters to their ISO 7064 two-digit codes (A=10..Z=35, either case),
/// keeps decimal digits as-is and rejects every other character.
pub fn transliterate(input: &str) -> Result<String, IdentifierError> {
    let mut out = String::with_capacity(input.len() * 2);
    for ch in input.chars() {
        if ch.is_ascii_digit() {
            out.push(ch);
        } else if ch.is_ascii_alphabetic() {
            let val = ch.to_ascii_uppercase() as u32 - 'A' as u32 + 10;
            out.push_str(&val.to_string());
        } else {
            return Err(IdentifierError::InvalidCharacter(ch));
        }
    }
    Ok(out)
}

/// Remainder of an arbitrarily long decimal digit string modulo 97.
///
/// Left-to-right running reduction, so the value never has to fit a native
/// integer type.
pub fn mod97(digits: &str) -> Result<u32, IdentifierError> {
    let mut remainder: u32 = 0;
    for ch in digits.chars() {
        let d = ch
            .to_digit(10)
            .ok_or(IdentifierError::InvalidCharacter(ch))?;
        remainder = (remainder * 10 + d) % 97;
    }
    Ok(remainder)
}

/// MOD 97-10 remainder of an alphanumeric string.
pub fn checksum_remainder(input: &str) -> Result<u32, IdentifierError> {
    mod97(&transliterate(input)?)
}

/// MOD 97-10 test over an already rearranged check string: remainder must
/// be exactly 1. Both IBAN and creditor-identifier validation come through
/// here, differing only in how the caller assembles the string.
pub fn is_checksum_valid(rearranged: &str) -> Result<bool, IdentifierError> {
    Ok(checksum_remainder(rearranged)? == 1)
}

/// Check digits that make `country + digits + payload` pass the MOD 97-10
/// test: `98 - mod97(payload + country + "00")`, zero-padded to two digits.
pub fn check_digits(payload: &str, country: &str) -> Result<String, IdentifierError> {
    let remainder = checksum_remainder(&format!("{}{}00", payload, country))?;
    Ok(format!("{:02}", 98 - remainder))
}

/// Luhn mod-10 test over a digit string. Non-digit input fails.
pub fn luhn(digits: &str) -> bool {
    if digits.is_empty() {
        return false;
    }
    let mut sum: u32 = 0;
    let mut double = false;
    for ch in digits.chars().rev() {
        let mut d = match ch.to_digit(10) {
            Some(d) => d,
            None => return false,
        };
        if double {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
        double = !double;
    }
    sum % 10 == 0
}

/// The digit that appended to `payload` makes the whole number Luhn-valid.
pub fn luhn_check_digit(payload: &str) -> Option<u32> {
    if payload.is_empty() {
        return None;
    }
    let mut sum: u32 = 0;
    // The check digit will occupy the rightmost slot, so doubling starts
    // immediately.
    let mut double = true;
    for ch in payload.chars().rev() {
        let mut d = ch.to_digit(10)?;
        if double {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
        double = !double;
    }
    Some((10 - sum % 10) % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transliterates_letters_and_digits() {
        assert_eq!(transliterate("AB12").as_deref(), Ok("101112"));
        assert_eq!(transliterate("de").as_deref(), Ok("1314"));
        assert_eq!(transliterate("0Z").as_deref(), Ok("035"));
    }

    #[test]
    fn transliterate_rejects_other_characters() {
        assert_eq!(
            transliterate("DE-89"),
            Err(IdentifierError::InvalidCharacter('-'))
        );
        assert_eq!(
            transliterate("A B"),
            Err(IdentifierError::InvalidCharacter(' '))
        );
    }

    #[test]
    fn mod97_reduces_long_digit_strings() {
        assert_eq!(mod97("98"), Ok(1));
        assert_eq!(mod97("0"), Ok(0));
        // 40 digits, far beyond u64 range: (10^40 - 1) mod 97.
        assert_eq!(mod97("9999999999999999999999999999999999999999"), Ok(90));
    }

    #[test]
    fn mod97_agrees_with_native_arithmetic_where_it_still_fits() {
        let digits = "12345678901234567890123456789012345678";
        let expected = (12345678901234567890123456789012345678u128 % 97) as u32;
        assert_eq!(mod97(digits), Ok(expected));
    }

    #[test]
    fn mod97_matches_small_values() {
        for n in 0u32..2000 {
            assert_eq!(mod97(&n.to_string()), Ok(n % 97));
        }
    }

    #[test]
    fn check_digits_known_vector() {
        assert_eq!(
            check_digits("370400440532013000", "DE").as_deref(),
            Ok("89")
        );
    }

    #[test]
    fn check_digits_are_zero_padded() {
        // 98 - r with r = 89 leaves a single digit.
        let digits = check_digits("00000000001", "DE").unwrap();
        assert_eq!(digits, "09");
    }

    #[test]
    fn luhn_known_vectors() {
        assert!(luhn("4111111111111111"));
        assert!(luhn("5555555555554444"));
        assert!(!luhn("4111111111111112"));
        assert!(!luhn(""));
        assert!(!luhn("4111a11111111111"));
    }

    #[test]
    fn luhn_check_digit_completes_a_payload() {
        assert_eq!(luhn_check_digit("411111111111111"), Some(1));
        let payload = "555555555555444";
        let digit = luhn_check_digit(payload).unwrap();
        assert!(luhn(&format!("{}{}", payload, digit)));
        assert_eq!(luhn_check_digit(""), None);
    }
}
