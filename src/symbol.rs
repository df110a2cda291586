//! Grammar alphabet tokens.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One letter of the grammar alphabet.
///
/// Symbols carry no meaning on their own. Rewriting rules and turtle actions
/// assign meaning to them externally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(char);

impl Symbol {
    pub const fn new(c: char) -> Self {
        Self(c)
    }

    pub const fn as_char(self) -> char {
        self.0
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Self(c)
    }
}

impl FromStr for Symbol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Self(c)),
            _ => Err(Error::InvalidSymbolString(s.to_owned())),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Splits `text` into one [`Symbol`] per character.
pub fn symbols(text: &str) -> Vec<Symbol> {
    text.chars().map(Symbol).collect()
}

/// Renders a symbol sequence back into text, mainly for logs and debugging.
pub fn to_text(symbols: &[Symbol]) -> String {
    symbols.iter().map(|s| s.0).collect()
}

/// Serde adapter storing a symbol sequence as a plain string, e.g. `"F[+F]F"`.
///
/// Use with `#[serde(with = "crate::symbol::text")]`.
pub mod text {
    use super::{Symbol, symbols, to_text};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &[Symbol], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_text(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Symbol>, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(symbols(&text))
    }
}
