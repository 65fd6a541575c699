//! Ticker symbol type.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ticker symbol identifying a tradable instrument (e.g., "AAPL").
///
/// Always trimmed and uppercase. The only validation is non-emptiness;
/// the upstream provider is the authority on whether a symbol exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Normalize raw user input into a symbol.
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::EmptySymbol);
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_normalizes_case_and_whitespace() {
        let symbol = Symbol::new("  msft ").unwrap();
        assert_eq!(symbol.as_str(), "MSFT");
        assert_eq!(symbol.to_string(), "MSFT");
    }

    #[test]
    fn test_empty_symbol_rejected() {
        assert!(matches!(Symbol::new(""), Err(CoreError::EmptySymbol)));
        assert!(matches!(Symbol::new("   "), Err(CoreError::EmptySymbol)));
    }

    #[test]
    fn test_symbol_serde_as_plain_string() {
        let symbol: Symbol = serde_json::from_str("\"ibm\"").unwrap();
        assert_eq!(symbol.as_str(), "IBM");
        assert_eq!(serde_json::to_string(&symbol).unwrap(), "\"IBM\"");
        assert!(serde_json::from_str::<Symbol>("\"\"").is_err());
    }
}
