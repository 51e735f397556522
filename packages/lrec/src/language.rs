use derive_more::Display;

/// Marker for the empty production in the textual grammar format.
pub const EPSILON: &str = "e";

/// An atomic grammar symbol, compared by exact equality only.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(s: impl Into<String>) -> Self {
        let s = s.into();
        assert!(!s.is_empty());
        Symbol(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
