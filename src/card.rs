use crate::checksum::luhn;
use chrono::{Datelike, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardType {
    Visa,
    Mastercard,
    Amex,
    DinersClub,
    Discover,
    Jcb,
    Maestro,
    Unknown,
}

impl CardType {
    pub fn name(&self) -> &'static str {
        match self {
            CardType::Visa => "Visa",
            CardType::Mastercard => "Mastercard",
            CardType::Amex => "American Express",
            CardType::DinersClub => "Diners Club",
            CardType::Discover => "Discover",
            CardType::Jcb => "JCB",
            CardType::Maestro => "Maestro",
            CardType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

struct CardSpec {
    kind: CardType,
    prefixes: &'static [(u32, u32)],
    lengths: &'static [usize],
}

// First match wins. Maestro's 50-69 window overlaps the Mastercard and
// Discover ranges and is declared last.
const CARD_SPECS: &[CardSpec] = &[
    CardSpec {
        kind: CardType::Visa,
        prefixes: &[(4, 4)],
        lengths: &[13, 16, 19],
    },
    CardSpec {
        kind: CardType::Mastercard,
        prefixes: &[(51, 55), (2221, 2720)],
        lengths: &[16],
    },
    CardSpec {
        kind: CardType::Amex,
        prefixes: &[(34, 34), (37, 37)],
        lengths: &[15],
    },
    CardSpec {
        kind: CardType::DinersClub,
        prefixes: &[(300, 305), (36, 36), (38, 38)],
        lengths: &[14],
    },
    CardSpec {
        kind: CardType::Discover,
        prefixes: &[(6011, 6011), (644, 649), (65, 65)],
        lengths: &[16, 19],
    },
    CardSpec {
        kind: CardType::Jcb,
        prefixes: &[(3528, 3589)],
        lengths: &[16, 19],
    },
    CardSpec {
        kind: CardType::Maestro,
        prefixes: &[(50, 69)],
        lengths: &[12, 13, 14, 15, 16, 17, 18, 19],
    },
];

/// Strips every non-digit character.
pub fn normalize_digits(input: &str) -> String {
    input.chars().filter(|ch| ch.is_ascii_digit()).collect()
}

/// Luhn-checked card number with a normalized length of 12 to 19 digits.
pub fn is_valid_number(input: &str) -> bool {
    let digits = normalize_digits(input);
    (12..=19).contains(&digits.len()) && luhn(&digits)
}

fn prefix_matches(digits: &str, lo: u32, hi: u32) -> bool {
    let width = lo.to_string().len();
    match digits.get(..width).and_then(|p| p.parse::<u32>().ok()) {
        Some(prefix) => (lo..=hi).contains(&prefix),
        None => false,
    }
}

/// First card type whose prefix range and length set both match; `Unknown`
/// when nothing does. A classification outcome, never an error.
pub fn classify(input: &str) -> CardType {
    let digits = normalize_digits(input);
    for spec in CARD_SPECS {
        if spec.lengths.contains(&digits.len())
            && spec
                .prefixes
                .iter()
                .any(|&(lo, hi)| prefix_matches(&digits, lo, hi))
        {
            return spec.kind;
        }
    }
    CardType::Unknown
}

/// Display form: first four and last four digits kept, everything between
/// replaced by asterisks. Numbers under eight digits come back unmasked.
pub fn format_masked(input: &str) -> String {
    let digits = normalize_digits(input);
    if digits.len() < 8 {
        return digits;
    }
    let first = &digits[..4];
    let last = &digits[digits.len() - 4..];
    let middle = "*".repeat(digits.len() - 8);
    if middle.is_empty() {
        format!("{} {}", first, last)
    } else {
        format!("{} {} {}", first, middle, last)
    }
}

/// Expiry check against the current UTC month.
pub fn expiry_valid(month: u32, year: i32) -> bool {
    let now = Utc::now();
    expiry_valid_at(month, year, now.year(), now.month())
}

/// Comparison core with the clock supplied. Two-digit years expand to the
/// current century, rolling one century forward when the expansion lands
/// in the past; the card is expired iff (year, month) sorts before
/// (now_year, now_month).
pub fn expiry_valid_at(month: u32, year: i32, now_year: i32, now_month: u32) -> bool {
    if !(1..=12).contains(&month) || year < 0 {
        return false;
    }
    let year = expand_year(year, now_year);
    (year, month) >= (now_year, now_month)
}

fn expand_year(year: i32, now_year: i32) -> i32 {
    if year >= 100 {
        return year;
    }
    let expanded = now_year - now_year % 100 + year;
    if expanded < now_year {
        expanded + 100
    } else {
        expanded
    }
}

/// Parses "MM/YY", "MM/YYYY" and the '-' separated variants.
pub fn parse_expiry(input: &str) -> Option<(u32, i32)> {
    let (month_part, year_part) = input.trim().split_once(['/', '-'])?;
    let month: u32 = month_part.trim().parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    let year_part = year_part.trim();
    if year_part.len() != 2 && year_part.len() != 4 {
        return None;
    }
    let year: i32 = year_part.parse().ok()?;
    Some((month, year))
}
