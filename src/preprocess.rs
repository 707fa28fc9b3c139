//! Text cleaning: turns raw user text into the spoken-word form the
//! acoustic model was trained on.
//!
//! The cleaner is a pure function of the input text and the target
//! [`Alphabet`]: typographic characters are folded to ASCII, abbreviations,
//! currency, percentages, ordinals and numbers are spelled out, the text is
//! lowercased when the alphabet has no uppercase letters, and whitespace is
//! collapsed.  Characters that still fall outside the alphabet are left for
//! the encoder's [`UnknownSymbolPolicy`](crate::tokenize::UnknownSymbolPolicy).

use fancy_regex::{Captures, Regex};
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::tokenize::Alphabet;

// ─────────────────────────────────────────────────────────────────────────────
// Number → words
// ─────────────────────────────────────────────────────────────────────────────

const ONES: &[&str] = &[
    "", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
    "ten", "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen",
    "seventeen", "eighteen", "nineteen",
];
const TENS: &[&str] = &["", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety"];
const SCALE: &[&str] = &["", "thousand", "million", "billion", "trillion", "quadrillion", "quintillion"];
const DIGITS: &[&str] = &["zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine"];

fn three_digits_to_words(n: u64) -> String {
    let mut parts = Vec::new();
    let hundreds = n / 100;
    let remainder = n % 100;
    if hundreds > 0 {
        parts.push(format!("{} hundred", ONES[hundreds as usize]));
    }
    if remainder >= 20 {
        parts.push(TENS[(remainder / 10) as usize].to_string());
        if remainder % 10 > 0 {
            parts.push(ONES[(remainder % 10) as usize].to_string());
        }
    } else if remainder > 0 {
        parts.push(ONES[remainder as usize].to_string());
    }
    parts.join(" ")
}

/// Spell out a non-negative integer.
///
/// Compound tens are joined with a space ("forty two") so the result only
/// needs letters and spaces from the alphabet.
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return "zero".to_string();
    }
    // 1100..=9900 that aren't whole thousands read as "X hundred"
    if (1100..10_000).contains(&n) && n % 100 == 0 && n % 1000 != 0 {
        return format!("{} hundred", three_digits_to_words(n / 100));
    }
    let mut parts = Vec::new();
    let mut remaining = n;
    for &scale in SCALE {
        let chunk = remaining % 1000;
        if chunk > 0 {
            let words = three_digits_to_words(chunk);
            parts.push(if scale.is_empty() { words } else { format!("{} {}", words, scale) });
        }
        remaining /= 1000;
        if remaining == 0 {
            break;
        }
    }
    parts.reverse();
    parts.join(" ")
}

/// Read a digit string one digit at a time ("0042" → "zero zero four two").
fn digits_to_words(digits: &str) -> String {
    digits
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| DIGITS[d as usize])
        .collect::<Vec<_>>()
        .join(" ")
}

/// Spell out an integer written with optional thousands separators.
/// Values too large for `u64` fall back to digit-by-digit reading.
fn integer_to_words(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    match digits.parse::<u64>() {
        Ok(n) => number_to_words(n),
        Err(_) => digits_to_words(&digits),
    }
}

fn ordinal_to_words(n: u64) -> String {
    let words = number_to_words(n);
    let (prefix, last) = match words.rfind(' ') {
        Some(pos) => (&words[..=pos], &words[pos + 1..]),
        None => ("", words.as_str()),
    };
    let last = match last {
        "one" => "first".to_string(),
        "two" => "second".to_string(),
        "three" => "third".to_string(),
        "five" => "fifth".to_string(),
        "eight" => "eighth".to_string(),
        "nine" => "ninth".to_string(),
        "twelve" => "twelfth".to_string(),
        w if w.ends_with('y') => format!("{}ieth", &w[..w.len() - 1]),
        w => format!("{}th", w),
    };
    format!("{}{}", prefix, last)
}

// ─────────────────────────────────────────────────────────────────────────────
// Compiled regexes (lazily initialised once)
// ─────────────────────────────────────────────────────────────────────────────

static RE_ABBREVIATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(mrs|mr|drs|dr|st|co|jr|sr|maj|gen|rev|lt|hon|sgt|capt|esq|ltd|col|ft|prof)\.").unwrap()
});
static RE_CURRENCY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([$£€])(\d{1,3}(?:,\d{3})+|\d+)(?:\.(\d+))?").unwrap());
static RE_PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,3}(?:,\d{3})+|\d+)(?:\.(\d+))?\s*%").unwrap());
static RE_ORDINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d+)(st|nd|rd|th)\b").unwrap());
static RE_DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?<![\d.])(\d+)\.(\d+)").unwrap());
static RE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{1,3}(?:,\d{3})+(?!\d)|\d+").unwrap());
static RE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static ABBREVIATIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("mrs", "misess"),
        ("mr", "mister"),
        ("drs", "doctors"),
        ("dr", "doctor"),
        ("st", "saint"),
        ("co", "company"),
        ("jr", "junior"),
        ("sr", "senior"),
        ("maj", "major"),
        ("gen", "general"),
        ("rev", "reverend"),
        ("lt", "lieutenant"),
        ("hon", "honorable"),
        ("sgt", "sergeant"),
        ("capt", "captain"),
        ("esq", "esquire"),
        ("ltd", "limited"),
        ("col", "colonel"),
        ("ft", "fort"),
        ("prof", "professor"),
    ]
    .into_iter()
    .collect()
});

// ─────────────────────────────────────────────────────────────────────────────
// Expansion functions
// ─────────────────────────────────────────────────────────────────────────────

/// Fold typographic punctuation and accented Latin letters to ASCII.
pub fn fold_typography(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201B}' | '`' | '´' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '«' | '»' => out.push('"'),
            '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' => out.push(' '),
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => out.push('a'),
            'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => out.push('A'),
            'ç' => out.push('c'),
            'Ç' => out.push('C'),
            'è' | 'é' | 'ê' | 'ë' => out.push('e'),
            'È' | 'É' | 'Ê' | 'Ë' => out.push('E'),
            'ì' | 'í' | 'î' | 'ï' => out.push('i'),
            'Ì' | 'Í' | 'Î' | 'Ï' => out.push('I'),
            'ñ' => out.push('n'),
            'Ñ' => out.push('N'),
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => out.push('o'),
            'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => out.push('O'),
            'ù' | 'ú' | 'û' | 'ü' => out.push('u'),
            'Ù' | 'Ú' | 'Û' | 'Ü' => out.push('U'),
            'ý' | 'ÿ' => out.push('y'),
            'Ý' => out.push('Y'),
            'æ' => out.push_str("ae"),
            'Æ' => out.push_str("AE"),
            'œ' => out.push_str("oe"),
            'Œ' => out.push_str("OE"),
            'ß' => out.push_str("ss"),
            _ => out.push(c),
        }
    }
    out
}

pub fn expand_abbreviations(text: &str) -> String {
    RE_ABBREVIATION
        .replace_all(text, |caps: &Captures| {
            let abbr = &caps[1];
            let word = ABBREVIATIONS
                .get(abbr.to_lowercase().as_str())
                .copied()
                .unwrap_or(abbr);
            if abbr.starts_with(char::is_uppercase) {
                let mut chars = word.chars();
                chars
                    .next()
                    .map(|first| first.to_uppercase().chain(chars).collect())
                    .unwrap_or_default()
            } else {
                word.to_string()
            }
        })
        .into_owned()
}

pub fn expand_currency(text: &str) -> String {
    RE_CURRENCY
        .replace_all(text, |caps: &Captures| {
            let (unit, units, minor, minors) = match &caps[1] {
                "£" => ("pound", "pounds", "penny", "pence"),
                "€" => ("euro", "euros", "cent", "cents"),
                _ => ("dollar", "dollars", "cent", "cents"),
            };
            // `None` when the amount overflows u64; it is then read digit by digit.
            let whole = caps[2].chars().filter(|c| *c != ',').collect::<String>().parse::<u64>().ok();
            let fraction = caps
                .get(3)
                .map(|m| {
                    // Two-digit minor units: ".5" is fifty cents, ".999" is ninety-nine
                    let s: String = m.as_str().chars().chain(std::iter::repeat('0')).take(2).collect();
                    s.parse::<u64>().unwrap_or(0)
                })
                .unwrap_or(0);

            let whole_part = format!(
                "{} {}",
                integer_to_words(&caps[2]),
                if whole == Some(1) { unit } else { units }
            );
            let minor_part = format!("{} {}", number_to_words(fraction), if fraction == 1 { minor } else { minors });
            match (whole, fraction) {
                (_, 0) => whole_part,
                (Some(0), _) => minor_part,
                _ => format!("{}, {}", whole_part, minor_part),
            }
        })
        .into_owned()
}

pub fn expand_percentages(text: &str) -> String {
    RE_PERCENT
        .replace_all(text, |caps: &Captures| {
            let whole = integer_to_words(&caps[1]);
            match caps.get(2) {
                Some(dec) => format!("{} point {} percent", whole, digits_to_words(dec.as_str())),
                None => format!("{} percent", whole),
            }
        })
        .into_owned()
}

pub fn expand_ordinals(text: &str) -> String {
    RE_ORDINAL
        .replace_all(text, |caps: &Captures| match caps[1].parse::<u64>() {
            Ok(n) => ordinal_to_words(n),
            Err(_) => caps[0].to_string(),
        })
        .into_owned()
}

pub fn expand_decimals(text: &str) -> String {
    RE_DECIMAL
        .replace_all(text, |caps: &Captures| {
            format!("{} point {}", integer_to_words(&caps[1]), digits_to_words(&caps[2]))
        })
        .into_owned()
}

pub fn expand_numbers(text: &str) -> String {
    RE_NUMBER
        .replace_all(text, |caps: &Captures| integer_to_words(&caps[0]))
        .into_owned()
}

pub fn collapse_whitespace(text: &str) -> String {
    RE_SPACES.replace_all(text.trim(), " ").into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// TextCleaner: full pipeline
// ─────────────────────────────────────────────────────────────────────────────

/// Switches for the individual cleaning steps.  Everything is on by default.
#[derive(Debug, Clone)]
pub struct CleanerConfig {
    pub fold_typography: bool,
    pub expand_abbreviations: bool,
    pub expand_currency: bool,
    pub expand_percentages: bool,
    pub expand_ordinals: bool,
    pub expand_numbers: bool,
    pub collapse_whitespace: bool,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            fold_typography: true,
            expand_abbreviations: true,
            expand_currency: true,
            expand_percentages: true,
            expand_ordinals: true,
            expand_numbers: true,
            collapse_whitespace: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextCleaner {
    pub config: CleanerConfig,
}

impl TextCleaner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CleanerConfig) -> Self {
        Self { config }
    }

    /// Normalise `text` for `alphabet`.
    pub fn clean(&self, text: &str, alphabet: &Alphabet) -> String {
        let cfg = &self.config;
        let mut text = text.to_string();

        if cfg.fold_typography {
            text = fold_typography(&text);
        }
        if cfg.expand_abbreviations {
            text = expand_abbreviations(&text);
        }
        if cfg.expand_currency {
            text = expand_currency(&text);
        }
        if cfg.expand_percentages {
            text = expand_percentages(&text);
        }
        if cfg.expand_ordinals {
            text = expand_ordinals(&text);
        }
        if cfg.expand_numbers {
            text = expand_decimals(&text);
            text = expand_numbers(&text);
        }
        if !alphabet.has_uppercase() {
            text = text.to_lowercase();
        }
        if cfg.collapse_whitespace {
            text = collapse_whitespace(&text);
        }

        text
    }
}

/// Clean `text` with the default pipeline.
pub fn clean_text(text: &str, alphabet: &Alphabet) -> String {
    TextCleaner::new().clean(text, alphabet)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_to_words() {
        assert_eq!(number_to_words(0), "zero");
        assert_eq!(number_to_words(7), "seven");
        assert_eq!(number_to_words(42), "forty two");
        assert_eq!(number_to_words(100), "one hundred");
        assert_eq!(number_to_words(1200), "twelve hundred");
        assert_eq!(number_to_words(1000), "one thousand");
        assert_eq!(number_to_words(2021), "two thousand twenty one");
        assert_eq!(number_to_words(1_000_000), "one million");
        assert_eq!(number_to_words(3_000_215), "three million two hundred fifteen");
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(ordinal_to_words(1), "first");
        assert_eq!(ordinal_to_words(3), "third");
        assert_eq!(ordinal_to_words(20), "twentieth");
        assert_eq!(ordinal_to_words(22), "twenty second");
        assert_eq!(ordinal_to_words(100), "one hundredth");
        assert_eq!(expand_ordinals("the 4th of july"), "the fourth of july");
    }

    #[test]
    fn test_currency() {
        assert_eq!(expand_currency("$4.99"), "four dollars, ninety nine cents");
        assert_eq!(expand_currency("$1"), "one dollar");
        assert_eq!(expand_currency("$0.01"), "one cent");
        assert_eq!(expand_currency("£2,000"), "two thousand pounds");
        assert_eq!(expand_currency("€3.5"), "three euros, fifty cents");
    }

    #[test]
    fn test_currency_beyond_u64_is_read_digit_by_digit() {
        let amount = "99999999999999999999999";
        assert_eq!(
            expand_currency(&format!("${}", amount)),
            format!("{} dollars", digits_to_words(amount))
        );
        assert_eq!(
            expand_currency(&format!("${}.50", amount)),
            format!("{} dollars, fifty cents", digits_to_words(amount))
        );
    }

    #[test]
    fn test_percentages() {
        assert_eq!(expand_percentages("50% off"), "fifty percent off");
        assert_eq!(expand_percentages("2.5 %"), "two point five percent");
    }

    #[test]
    fn test_numbers_and_decimals() {
        assert_eq!(expand_numbers("1,024 bats"), "one thousand twenty four bats");
        assert_eq!(expand_decimals("pi is 3.14"), "pi is three point one four");
        assert_eq!(expand_numbers("99999999999999999999999"), digits_to_words("99999999999999999999999"));
    }

    #[test]
    fn test_abbreviations_keep_capital() {
        assert_eq!(expand_abbreviations("Dr. Herzog met mr. Kinski"), "Doctor Herzog met mister Kinski");
    }

    #[test]
    fn test_fold_typography() {
        assert_eq!(fold_typography("“Café” — naïve…"), "\"Cafe\" - naive...");
    }

    #[test]
    fn test_clean_lowercases_for_lowercase_alphabet() {
        let out = clean_text("Dr. Smith paid $4.99   on the 3rd.", &Alphabet::english());
        assert_eq!(out, "doctor smith paid four dollars, ninety nine cents on the third.");
    }

    #[test]
    fn test_clean_keeps_case_for_mixed_alphabet() {
        let alphabet = Alphabet::from("Helo wrd");
        assert_eq!(clean_text("  Hello   world ", &alphabet), "Hello world");
    }

    #[test]
    fn test_clean_is_deterministic() {
        let alphabet = Alphabet::english();
        let input = "On 12/3, 45% of the 2nd-year crew — “naïve” men — spent £1,200.50.";
        assert_eq!(clean_text(input, &alphabet), clean_text(input, &alphabet));
    }

    #[test]
    fn test_steps_can_be_disabled() {
        let cleaner = TextCleaner::with_config(CleanerConfig {
            expand_numbers: false,
            ..CleanerConfig::default()
        });
        assert_eq!(cleaner.clean("room 101", &Alphabet::english()), "room 101");
    }
}
