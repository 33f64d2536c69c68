//! Display identifiers bound to region ranks.
//!
//! Every ordered region gets a short token (①, ②, ... then `(51)`, `(52)`)
//! that appears both next to its label on the image and in the first
//! column of the report. The mapping is computed once per run and shared.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::model::OrderedRegion;

/// The circled numerals ① through ㊿, in order.
pub const CIRCLED_NUMERALS: [&str; 50] = [
    "①", "②", "③", "④", "⑤", "⑥", "⑦", "⑧", "⑨", "⑩", //
    "⑪", "⑫", "⑬", "⑭", "⑮", "⑯", "⑰", "⑱", "⑲", "⑳", //
    "㉑", "㉒", "㉓", "㉔", "㉕", "㉖", "㉗", "㉘", "㉙", "㉚", //
    "㉛", "㉜", "㉝", "㉞", "㉟", "㊱", "㊲", "㊳", "㊴", "㊵", //
    "㊶", "㊷", "㊸", "㊹", "㊺", "㊻", "㊼", "㊽", "㊾", "㊿",
];

/// Placeholder replaced by the 1-based position in the overflow template.
///
/// Only an `n` standing on its own counts: `"(n)"` and `"Section n"` have
/// one, `"Item"` does not.
pub const OVERFLOW_PLACEHOLDER: char = 'n';

/// A display token for one region.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Creates an identifier from a raw token.
    #[inline]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The ordered symbol set identifiers are drawn from.
///
/// Ranks below `symbols.len()` use the symbol at that index. Higher ranks
/// use `overflow` with its placeholder replaced by `rank + 1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentifierAlphabet {
    pub symbols: Vec<String>,
    pub overflow: String,
}

impl Default for IdentifierAlphabet {
    fn default() -> Self {
        Self {
            symbols: CIRCLED_NUMERALS.iter().map(|s| s.to_string()).collect(),
            overflow: "(n)".to_string(),
        }
    }
}

impl IdentifierAlphabet {
    /// Returns the identifier for a 0-based rank.
    pub fn token(&self, rank: usize) -> Identifier {
        if let Some(symbol) = self.symbols.get(rank) {
            return Identifier::new(symbol.clone());
        }
        match self.overflow_parts() {
            Some((prefix, suffix)) => Identifier::new(format!("{}{}{}", prefix, rank + 1, suffix)),
            None => Identifier::new(format!("{}{}", self.overflow, rank + 1)),
        }
    }

    /// Splits the overflow template around its placeholder.
    ///
    /// Returns `None` if the template has no standalone placeholder.
    pub fn overflow_parts(&self) -> Option<(&str, &str)> {
        let template = self.overflow.as_str();
        let standalone = |c: Option<char>| c.map_or(true, |c| !c.is_alphanumeric());

        template.char_indices().find_map(|(i, c)| {
            if c != OVERFLOW_PLACEHOLDER {
                return None;
            }
            let (prefix, rest) = template.split_at(i);
            let suffix = &rest[c.len_utf8()..];
            (standalone(prefix.chars().next_back()) && standalone(suffix.chars().next()))
                .then_some((prefix, suffix))
        })
    }

    /// Whether the overflow template can produce `symbol` for some rank.
    pub fn is_overflow_token(&self, symbol: &str) -> bool {
        let Some((prefix, suffix)) = self.overflow_parts() else {
            return false;
        };
        symbol
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix(suffix))
            .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Assigns an identifier to every ordered region, indexed by rank.
    ///
    /// Overflowing the symbol list is an expected path, not an error.
    pub fn assign(&self, regions: &[OrderedRegion]) -> IdentifierMap {
        if regions.len() > self.symbols.len() {
            tracing::warn!(
                regions = regions.len(),
                symbols = self.symbols.len(),
                "more regions than identifier symbols; using overflow template"
            );
        }
        IdentifierMap(regions.iter().map(|r| self.token(r.rank)).collect())
    }
}

/// Identifiers for one run, indexed by rank.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdentifierMap(Vec<Identifier>);

impl IdentifierMap {
    /// Returns the identifier for a rank, if the rank was assigned.
    #[inline]
    pub fn get(&self, rank: usize) -> Option<&Identifier> {
        self.0.get(rank)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Identifier> {
        self.0.iter()
    }
}
