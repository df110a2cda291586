//! Text rendering of symbol sequences, for debugging grammars.

use crate::symbol::Symbol;
use std::collections::HashMap;

/// Maps symbols to text snippets and concatenates them.
///
/// Symbols without a definition produce nothing, so a generator with no
/// definitions always yields an empty string.
#[derive(Clone, Debug, Default)]
pub struct StringGenerator {
    definitions: HashMap<Symbol, String>,
}

impl StringGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text for `symbol`. The most recent definition wins.
    pub fn define(&mut self, symbol: Symbol, text: impl Into<String>) {
        self.definitions.insert(symbol, text.into());
    }

    pub fn generate(&self, symbols: &[Symbol]) -> String {
        symbols
            .iter()
            .filter_map(|s| self.definitions.get(s))
            .map(String::as_str)
            .collect()
    }
}
