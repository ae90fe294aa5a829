//! Symbol tables mapping state ids to display labels and comparison symbols.

use serde::{Deserialize, Serialize};

/// Discrete state identifier. Indexes into a [`SymbolTable`].
pub type StateId = u32;

/// Reserved symbol for the unknown/filler state. Always the last table entry.
pub const UNKNOWN_SYMBOL: char = '!';

/// Letters first, then digits. Segment-id reassignment hands out letters,
/// which this ordering guarantees for the first 52 states.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// One unique single-char symbol per state index. Indexes past the alphabet
/// fall back to consecutive codepoints from U+00A1, skipping the surrogate
/// range, so symbols stay unique for any state count.
fn symbol_for(index: usize) -> char {
    if index < ALPHABET.len() {
        return ALPHABET[index] as char;
    }
    let mut cp = 0xA1 + (index - ALPHABET.len()) as u32;
    if cp >= 0xD800 {
        cp += 0x800;
    }
    char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Maps every state id to a free-form display label and a unique
/// single-character symbol. The unknown entry is always last, so
/// `unknown_id` grows with the table and never collides with real states.
///
/// Distance metrics compare state ids directly; ids and symbols are
/// bijective, so the results match a character-level comparison exactly
/// while labels stay free to be multi-character ("12", "basin-A").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolTable {
    labels: Vec<String>,
    symbols: Vec<char>,
}

impl SymbolTable {
    /// Build a table from per-state labels; appends the unknown entry.
    pub fn new(mut labels: Vec<String>) -> Self {
        let n = labels.len();
        let mut symbols: Vec<char> = (0..n).map(symbol_for).collect();
        labels.push(UNKNOWN_SYMBOL.to_string());
        symbols.push(UNKNOWN_SYMBOL);
        Self { labels, symbols }
    }

    /// Numeric labels "0".."n-1", the identity-strategy convention.
    pub fn numeric(n_states: usize) -> Self {
        Self::new((0..n_states).map(|i| i.to_string()).collect())
    }

    /// Single-letter labels matching each state's symbol, the segment-id
    /// strategy convention.
    pub fn lettered(n_states: usize) -> Self {
        Self::new((0..n_states).map(|i| symbol_for(i).to_string()).collect())
    }

    /// Total entries, unknown included.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The reserved unknown/filler state id (always the last entry).
    pub fn unknown_id(&self) -> StateId {
        (self.labels.len() - 1) as StateId
    }

    pub fn is_unknown(&self, id: StateId) -> bool {
        id == self.unknown_id()
    }

    pub fn label(&self, id: StateId) -> Option<&str> {
        self.labels.get(id as usize).map(String::as_str)
    }

    pub fn symbol(&self, id: StateId) -> Option<char> {
        self.symbols.get(id as usize).copied()
    }

    /// Render a state sequence as its symbol string. Out-of-table ids
    /// render as U+FFFD, which no table entry ever uses.
    pub fn render(&self, sequence: &[StateId]) -> String {
        sequence
            .iter()
            .map(|&id| self.symbol(id).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }
}
