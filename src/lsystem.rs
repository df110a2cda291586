//! Context-free symbol rewriting.
//!
//! An [`LSystem`] pairs an axiom with a [`RuleTable`]. [`generate`] expands the
//! axiom through a fixed number of rewrite generations; [`iterate`] performs a
//! single generation.

use crate::error::{Error, Result};
use crate::symbol::{Symbol, symbols, to_text};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument, trace};

/// Production rules, keyed by the symbol they replace.
///
/// A symbol without an entry is terminal and rewrites to itself. Serialized as a
/// map from symbol to replacement text, e.g. `{"F": "F[+F]F"}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<Symbol, String>", into = "HashMap<Symbol, String>")]
pub struct RuleTable {
    rules: HashMap<Symbol, Vec<Symbol>>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `symbol` to `replacement`, replacing any earlier rule for it.
    pub fn define(&mut self, symbol: Symbol, replacement: impl Into<Vec<Symbol>>) {
        let replacement = replacement.into();
        trace!(%symbol, len = replacement.len(), "rule defined");
        self.rules.insert(symbol, replacement);
    }

    /// Builder-style variant of [`define`](Self::define) taking the replacement as text.
    pub fn with_rule(mut self, symbol: char, replacement: &str) -> Self {
        self.define(Symbol::new(symbol), symbols(replacement));
        self
    }

    pub fn get(&self, symbol: Symbol) -> Option<&[Symbol]> {
        self.rules.get(&symbol).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &[Symbol])> {
        self.rules.iter().map(|(s, r)| (*s, r.as_slice()))
    }
}

impl From<HashMap<Symbol, String>> for RuleTable {
    fn from(map: HashMap<Symbol, String>) -> Self {
        map.into_iter().map(|(s, r)| (s, symbols(&r))).collect()
    }
}

impl From<RuleTable> for HashMap<Symbol, String> {
    fn from(table: RuleTable) -> Self {
        table
            .rules
            .into_iter()
            .map(|(s, r)| (s, to_text(&r)))
            .collect()
    }
}

impl FromIterator<(Symbol, Vec<Symbol>)> for RuleTable {
    fn from_iter<T: IntoIterator<Item = (Symbol, Vec<Symbol>)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (symbol, replacement) in iter {
            table.define(symbol, replacement);
        }
        table
    }
}

/// An axiom plus the rules that rewrite it. Read-only once built.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LSystem {
    #[serde(with = "crate::symbol::text")]
    axiom: Vec<Symbol>,
    #[serde(default)]
    rules: RuleTable,
}

impl LSystem {
    pub fn new(axiom: impl Into<Vec<Symbol>>, rules: RuleTable) -> Self {
        Self {
            axiom: axiom.into(),
            rules,
        }
    }

    pub fn axiom(&self) -> &[Symbol] {
        &self.axiom
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }
}

/// Ceiling on expansion size for [`generate_bounded`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteLimits {
    /// Maximum number of symbols any generation may contain.
    pub max_symbols: usize,
}

impl Default for RewriteLimits {
    fn default() -> Self {
        Self {
            max_symbols: 1_000_000,
        }
    }
}

/// Performs one rewrite generation over `previous`.
///
/// Every symbol is replaced by its rule, or kept as-is when it has none. Output
/// order follows input order.
pub fn iterate(previous: &[Symbol], rules: &RuleTable) -> Vec<Symbol> {
    rewrite_into(previous, rules, expanded_len(previous, rules))
}

/// Length of the generation [`iterate`] would produce from `previous`, without
/// building it. Saturates at `usize::MAX`.
pub fn expanded_len(previous: &[Symbol], rules: &RuleTable) -> usize {
    previous.iter().fold(0usize, |total, &symbol| {
        total.saturating_add(rules.get(symbol).map_or(1, <[_]>::len))
    })
}

fn rewrite_into(previous: &[Symbol], rules: &RuleTable, capacity: usize) -> Vec<Symbol> {
    let mut next = Vec::with_capacity(capacity);
    for &symbol in previous {
        match rules.get(symbol) {
            Some(replacement) => next.extend_from_slice(replacement),
            None => next.push(symbol),
        }
    }
    next
}

/// Expands the axiom of `lsystem` through `iterations` generations.
///
/// Zero iterations returns the axiom. Growth is unbounded; use
/// [`generate_bounded`] when the rule set may explode.
#[instrument(skip_all, fields(iterations = iterations))]
pub fn generate(lsystem: &LSystem, iterations: usize) -> Vec<Symbol> {
    let mut current = lsystem.axiom.clone();
    for generation in 1..=iterations {
        current = iterate(&current, &lsystem.rules);
        debug!(generation, length = current.len(), "rewrite generation");
    }
    current
}

/// Like [`generate`], but fails once any generation would exceed `limits.max_symbols`.
///
/// Each generation's length is counted before it is built, so an oversized
/// generation is rejected without being allocated.
#[instrument(skip_all, fields(iterations = iterations, limit = limits.max_symbols))]
pub fn generate_bounded(
    lsystem: &LSystem,
    iterations: usize,
    limits: &RewriteLimits,
) -> Result<Vec<Symbol>> {
    let check = |iteration: usize, length: usize| {
        if length > limits.max_symbols {
            Err(Error::GrowthLimitExceeded {
                iteration,
                length,
                limit: limits.max_symbols,
            })
        } else {
            Ok(())
        }
    };

    let mut current = lsystem.axiom.clone();
    check(0, current.len())?;
    for generation in 1..=iterations {
        let length = expanded_len(&current, &lsystem.rules);
        check(generation, length)?;
        current = rewrite_into(&current, &lsystem.rules, length);
        debug!(generation, length, "rewrite generation");
    }
    Ok(current)
}
