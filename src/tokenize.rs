//! Symbol alphabet and text → ID sequence encoding.
//!
//! The alphabet is the ordered list of characters the acoustic model was
//! trained on; a symbol's ID is its position in that list.  Encoding walks the
//! cleaned text char by char and looks each one up.  What happens to chars the
//! alphabet does not contain is decided by [`UnknownSymbolPolicy`]; the
//! default drops them silently.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{Result, TtsError};

// ─────────────────────────────────────────────────────────────────────────────
// Default English alphabet; ordering matters, IDs are positions
// ─────────────────────────────────────────────────────────────────────────────

/// Pad / punctuation symbols.  `_` is the pad symbol (ID 0), the final
/// character is a plain space.
const PUNCTUATION: &str = "_-!'(),.:;? ";

/// Lowercase ASCII letters.
const LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";

/// Ordered symbol set with a symbol → ID lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Alphabet {
    symbols: Vec<char>,
    ids: HashMap<char, i64>,
}

impl Alphabet {
    /// Build an alphabet from an ordered symbol list.
    ///
    /// A symbol listed twice maps to its last position.
    pub fn new<I: IntoIterator<Item = char>>(symbols: I) -> Self {
        let symbols: Vec<char> = symbols.into_iter().collect();
        let ids = symbols.iter().enumerate().map(|(i, &c)| (c, i as i64)).collect();
        Self { symbols, ids }
    }

    /// The English alphabet the stock models are trained on.
    pub fn english() -> Self {
        Self::new(PUNCTUATION.chars().chain(LETTERS.chars()))
    }

    pub fn id_of(&self, c: char) -> Option<i64> {
        self.ids.get(&c).copied()
    }

    pub fn contains(&self, c: char) -> bool {
        self.ids.contains_key(&c)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// `true` if any symbol is an uppercase letter.  The cleaner lowercases
    /// its output when this is `false`.
    pub fn has_uppercase(&self) -> bool {
        self.symbols.iter().any(|c| c.is_uppercase())
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::english()
    }
}

impl From<&str> for Alphabet {
    fn from(symbols: &str) -> Self {
        Self::new(symbols.chars())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unknown symbol handling
// ─────────────────────────────────────────────────────────────────────────────

/// What to do with a character the alphabet does not contain.
///
/// Deserialises from `"drop"`, `"error"` or `{"substitute": " "}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownSymbolPolicy {
    /// Skip it (no error, no placeholder).
    #[default]
    Drop,
    /// Fail with [`TtsError::UnknownSymbol`].
    Error,
    /// Encode this symbol instead.  It must itself be in the alphabet.
    Substitute(char),
}

/// Encoded model input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSequence(Vec<i64>);

impl TokenSequence {
    pub fn ids(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<i64> {
        self.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Encoding
// ─────────────────────────────────────────────────────────────────────────────

/// Convert cleaned text to a sequence of alphabet IDs, preserving order.
pub fn encode(text: &str, alphabet: &Alphabet, policy: UnknownSymbolPolicy) -> Result<TokenSequence> {
    let substitute = match policy {
        UnknownSymbolPolicy::Substitute(c) => Some(alphabet.id_of(c).ok_or_else(|| {
            TtsError::Config(format!("substitute symbol {:?} is not in the alphabet", c))
        })?),
        _ => None,
    };

    let mut ids = Vec::with_capacity(text.len());
    for (position, c) in text.chars().enumerate() {
        match alphabet.id_of(c) {
            Some(id) => ids.push(id),
            None => match policy {
                UnknownSymbolPolicy::Drop => {
                    log::trace!("dropping symbol {:?} at position {}", c, position);
                }
                UnknownSymbolPolicy::Error => {
                    return Err(TtsError::UnknownSymbol { symbol: c, position });
                }
                UnknownSymbolPolicy::Substitute(_) => ids.extend(substitute),
            },
        }
    }
    Ok(TokenSequence(ids))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
