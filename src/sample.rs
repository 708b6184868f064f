use crate::checksum::luhn_check_digit;
use crate::reference::{IBAN_LENGTHS, SEPA_COUNTRIES};
use crate::{creditor_id, iban};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct SampleConfig {
    pub ibans: usize,
    pub creditor_ids: usize,
    pub cards: usize,
}

pub struct SampleSet {
    pub ibans: Vec<String>,
    pub creditor_ids: Vec<String>,
    pub cards: Vec<String>,
}

// Prefix and total length per sampled card scheme. Prefixes are chosen so
// the result classifies as the intended type, not just Luhn-valid.
const CARD_PREFIXES: &[(&str, usize)] = &[
    ("4", 16),
    ("4", 13),
    ("51", 16),
    ("55", 16),
    ("34", 15),
    ("37", 15),
    ("6011", 16),
    ("3528", 16),
    ("5018", 16),
];

/// Seeded generation of valid identifiers for demos and corpus tests.
pub fn generate_samples(config: &SampleConfig, seed: u64) -> Result<SampleSet, String> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut ibans = Vec::with_capacity(config.ibans);
    for _ in 0..config.ibans {
        let (country, len) = IBAN_LENGTHS
            .choose(&mut rng)
            .copied()
            .ok_or_else(|| "IBAN registry is empty".to_string())?;
        let bban = random_digits(&mut rng, len - 4);
        let value = iban::generate(country, &bban).map_err(|err| err.to_string())?;
        ibans.push(value);
    }

    let mut creditor_ids = Vec::with_capacity(config.creditor_ids);
    for _ in 0..config.creditor_ids {
        let country = SEPA_COUNTRIES
            .choose(&mut rng)
            .ok_or_else(|| "SEPA country list is empty".to_string())?;
        let area = random_alphanum_upper(&mut rng, 3);
        let national_id = random_digits(&mut rng, 11);
        let value =
            creditor_id::generate(country, &area, &national_id).map_err(|err| err.to_string())?;
        creditor_ids.push(value);
    }

    let mut cards = Vec::with_capacity(config.cards);
    for _ in 0..config.cards {
        let (prefix, len) = CARD_PREFIXES
            .choose(&mut rng)
            .copied()
            .ok_or_else(|| "card prefix list is empty".to_string())?;
        let body = random_digits(&mut rng, len - prefix.len() - 1);
        let payload = format!("{}{}", prefix, body);
        let digit = luhn_check_digit(&payload)
            .ok_or_else(|| "card payload must be numeric".to_string())?;
        cards.push(format!("{}{}", payload, digit));
    }

    Ok(SampleSet {
        ibans,
        creditor_ids,
        cards,
    })
}

fn random_digits<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    let mut out = String::with_capacity(len);
    for _ in 0..len {
        let digit = rng.gen_range(0..10);
        out.push(char::from(b'0' + digit as u8));
    }
    out
}

fn random_alphanum_upper<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut out = String::with_capacity(len);
    for _ in 0..len {
        let idx = rng.gen_range(0..CHARSET.len());
        out.push(char::from(CHARSET[idx]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card;

    #[test]
    fn samples_are_all_valid() {
        let config = SampleConfig {
            ibans: 25,
            creditor_ids: 25,
            cards: 25,
        };
        let set = generate_samples(&config, 42).unwrap();
        assert_eq!(set.ibans.len(), 25);
        assert_eq!(set.creditor_ids.len(), 25);
        assert_eq!(set.cards.len(), 25);

        for value in &set.ibans {
            assert!(iban::validate(value), "invalid sample IBAN {}", value);
        }
        for value in &set.creditor_ids {
            assert!(
                creditor_id::validate(value),
                "invalid sample creditor id {}",
                value
            );
        }
        for value in &set.cards {
            assert!(card::is_valid_number(value), "invalid sample card {}", value);
            assert_ne!(card::classify(value), card::CardType::Unknown);
        }
    }

    #[test]
    fn same_seed_same_output() {
        let config = SampleConfig {
            ibans: 3,
            creditor_ids: 3,
            cards: 3,
        };
        let a = generate_samples(&config, 7).unwrap();
        let b = generate_samples(&config, 7).unwrap();
        assert_eq!(a.ibans, b.ibans);
        assert_eq!(a.creditor_ids, b.creditor_ids);
        assert_eq!(a.cards, b.cards);
    }
}
