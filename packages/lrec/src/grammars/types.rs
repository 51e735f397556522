use std::fmt::Display;

use derive_more::Display;
use itertools::Itertools;
use thiserror::Error;

use crate::language::{Symbol, EPSILON};

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Terminal(pub Symbol);

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonTerminal(pub Symbol);

impl Terminal {
    pub fn new(s: impl Into<String>) -> Self {
        Terminal(Symbol::new(s))
    }
}

impl NonTerminal {
    pub fn new(s: impl Into<String>) -> Self {
        NonTerminal(Symbol::new(s))
    }
}

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
pub enum ProductionSymbol {
    Terminal(Terminal),
    NonTerminal(NonTerminal),
}

impl ProductionSymbol {
    pub fn symbol(&self) -> &Symbol {
        match self {
            ProductionSymbol::Terminal(t) => &t.0,
            ProductionSymbol::NonTerminal(nt) => &nt.0,
        }
    }
}

/// One alternative of a non-terminal. The empty sequence is the epsilon
/// production; the textual epsilon marker exists only at the parse/format
/// boundary, so epsilon can never be substituted into or concatenated with
/// other symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production(pub Vec<ProductionSymbol>);

impl Production {
    pub fn epsilon() -> Self {
        Production(Vec::new())
    }

    pub fn is_epsilon(&self) -> bool {
        self.0.is_empty()
    }

    pub fn leading_non_terminal(&self) -> Option<&NonTerminal> {
        match self.0.first() {
            Some(ProductionSymbol::NonTerminal(nt)) => Some(nt),
            _ => None,
        }
    }

    /// The symbols after the leading one.
    pub fn tail(&self) -> &[ProductionSymbol] {
        self.0.get(1..).unwrap_or(&[])
    }

    pub fn with_suffix(mut self, nt: &NonTerminal) -> Self {
        self.0.push(ProductionSymbol::NonTerminal(nt.clone()));
        self
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            write!(f, "{}", EPSILON)
        } else {
            write!(f, "{}", self.0.iter().join(""))
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("expected a production rule of the form `A -> ...`, got {0:?}")]
    MalformedRule(String),

    #[error("no productions registered for non-terminal {0}")]
    MissingNonTerminal(NonTerminal),

    #[error("non-terminal {0} appears twice in the processing order")]
    DuplicateNonTerminal(NonTerminal),

    #[error("non-terminal {0} has productions but no position in the processing order")]
    UnorderedNonTerminal(NonTerminal),

    #[error("the fresh non-terminal alphabet is exhausted")]
    NameSpaceExhausted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_display_concatenates_symbols() {
        let production = Production(vec![
            ProductionSymbol::NonTerminal(NonTerminal::new("A")),
            ProductionSymbol::Terminal(Terminal::new("a")),
            ProductionSymbol::Terminal(Terminal::new("b")),
        ]);

        assert_eq!(production.to_string(), "Aab");
    }

    #[test]
    fn epsilon_production_displays_as_marker() {
        assert_eq!(Production::epsilon().to_string(), EPSILON);
        assert!(Production::epsilon().is_epsilon());
    }

    #[test]
    fn leading_non_terminal_ignores_terminals_and_epsilon() {
        let recursive = Production(vec![
            ProductionSymbol::NonTerminal(NonTerminal::new("A")),
            ProductionSymbol::Terminal(Terminal::new("a")),
        ]);
        let plain = Production(vec![ProductionSymbol::Terminal(Terminal::new("b"))]);

        assert_eq!(recursive.leading_non_terminal(), Some(&NonTerminal::new("A")));
        assert_eq!(plain.leading_non_terminal(), None);
        assert_eq!(Production::epsilon().leading_non_terminal(), None);
    }

    #[test]
    fn with_suffix_appends_a_single_non_terminal() {
        let fresh = NonTerminal::new("B");
        let production = Production(vec![ProductionSymbol::Terminal(Terminal::new("b"))]);

        assert_eq!(production.with_suffix(&fresh).to_string(), "bB");
        assert_eq!(Production::epsilon().with_suffix(&fresh).to_string(), "B");
    }
}
