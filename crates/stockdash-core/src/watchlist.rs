//! User-maintained symbol lists: search history and favorites.
//!
//! Both lists serialize as plain JSON arrays of symbol strings, which is the
//! persisted format. Deserialized input is re-normalized, so a hand-edited or
//! stale store can never break the list invariants.

use crate::symbol::Symbol;
use serde::{Deserialize, Deserializer, Serialize};

/// Maximum number of entries kept in `SearchHistory`.
pub const SEARCH_HISTORY_LIMIT: usize = 10;

/// Most-recently-searched symbols, newest first.
///
/// Invariants: at most `SEARCH_HISTORY_LIMIT` entries, no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchHistory(Vec<Symbol>);

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an arbitrary list, keeping the first occurrence of each
    /// symbol and truncating to the limit.
    pub fn from_symbols(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        let mut entries: Vec<Symbol> = Vec::new();
        for symbol in symbols {
            if !entries.contains(&symbol) {
                entries.push(symbol);
            }
        }
        entries.truncate(SEARCH_HISTORY_LIMIT);
        Self(entries)
    }

    /// Record a search: drop any earlier occurrence, prepend, truncate.
    pub fn record(&mut self, symbol: Symbol) {
        self.0.retain(|s| s != &symbol);
        self.0.insert(0, symbol);
        self.0.truncate(SEARCH_HISTORY_LIMIT);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.0.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for SearchHistory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let symbols = Vec::<Symbol>::deserialize(deserializer)?;
        Ok(Self::from_symbols(symbols))
    }
}

/// Symbols the user starred. Kept in insertion order for stable display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Favorites(Vec<Symbol>);

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_symbols(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        let mut favorites = Self::new();
        for symbol in symbols {
            if !favorites.contains(&symbol) {
                favorites.0.push(symbol);
            }
        }
        favorites
    }

    /// Add the symbol if absent, remove it if present.
    ///
    /// Returns `true` if the symbol is a favorite after the call.
    pub fn toggle(&mut self, symbol: Symbol) -> bool {
        if let Some(pos) = self.0.iter().position(|s| s == &symbol) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(symbol);
            true
        }
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.0.contains(symbol)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Favorites {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let symbols = Vec::<Symbol>::deserialize(deserializer)?;
        Ok(Self::from_symbols(symbols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Symbol {
        Symbol::new(s).unwrap()
    }

    #[test]
    fn test_history_dedup_then_prepend() {
        let mut history = SearchHistory::new();
        history.record(sym("AAPL"));
        history.record(sym("MSFT"));
        history.record(sym("AAPL"));

        assert_eq!(history.symbols(), &[sym("AAPL"), sym("MSFT")]);
    }

    #[test]
    fn test_history_bounded_and_unique() {
        let mut history = SearchHistory::new();
        let tickers = [
            "A", "B", "C", "A", "D", "E", "F", "G", "H", "I", "J", "K", "B", "L", "C", "M",
        ];
        for t in tickers {
            history.record(sym(t));
            assert!(history.len() <= SEARCH_HISTORY_LIMIT);
            let mut seen = history.symbols().to_vec();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), history.len());
        }
        assert_eq!(history.len(), SEARCH_HISTORY_LIMIT);
        assert_eq!(history.symbols()[0], sym("M"));
        assert_eq!(history.symbols()[1], sym("C"));
    }

    #[test]
    fn test_history_deserialize_normalizes() {
        let history: SearchHistory = serde_json::from_str(
            r#"["aapl","AAPL","b","c","d","e","f","g","h","i","j","k","l"]"#,
        )
        .unwrap();
        assert_eq!(history.len(), SEARCH_HISTORY_LIMIT);
        assert_eq!(history.symbols()[0], sym("AAPL"));
        assert_eq!(history.symbols()[1], sym("B"));
        assert_eq!(
            serde_json::to_string(&SearchHistory::from_symbols([sym("X")])).unwrap(),
            r#"["X"]"#
        );
    }

    #[test]
    fn test_favorites_toggle_twice_restores() {
        let mut favorites = Favorites::from_symbols([sym("IBM")]);
        let before = favorites.clone();

        assert!(favorites.toggle(sym("TSLA")));
        assert!(favorites.contains(&sym("TSLA")));
        assert!(!favorites.toggle(sym("TSLA")));
        assert_eq!(favorites, before);

        assert!(!favorites.toggle(sym("IBM")));
        assert!(favorites.is_empty());
        assert!(favorites.toggle(sym("IBM")));
        assert_eq!(favorites, before);
    }

    #[test]
    fn test_favorites_deserialize_dedups() {
        let favorites: Favorites = serde_json::from_str(r#"["IBM","ibm","NVDA"]"#).unwrap();
        assert_eq!(favorites.symbols(), &[sym("IBM"), sym("NVDA")]);
    }
}
