use std::fmt::Display;

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use tabled::{builder::Builder, settings::Style};

use crate::{
    grammars::types::{GrammarError, NonTerminal, Production, ProductionSymbol, Terminal},
    language::{Symbol, EPSILON},
};

/// A context-free grammar with an explicit processing order.
///
/// The order is a snapshot taken at construction and is never perturbed by
/// non-terminals created later: the production mapping keeps insertion order,
/// so freshly created non-terminals end up after all original ones, while
/// `order` keeps listing only the originals.
#[derive(Debug, Clone)]
pub struct ContextFreeGrammar {
    pub(super) order: Vec<NonTerminal>,
    pub(super) productions: IndexMap<NonTerminal, Vec<Production>>,
    pub(super) used_symbols: IndexSet<Symbol>,
}

impl ContextFreeGrammar {
    pub fn new(
        order: Vec<NonTerminal>,
        productions: IndexMap<NonTerminal, Vec<Production>>,
    ) -> Result<Self, GrammarError> {
        for (index, nt) in order.iter().enumerate() {
            if order[..index].contains(nt) {
                return Err(GrammarError::DuplicateNonTerminal(nt.clone()));
            }
            if !productions.contains_key(nt) {
                return Err(GrammarError::MissingNonTerminal(nt.clone()));
            }
        }

        if let Some(stray) = productions.keys().find(|nt| !order.contains(nt)) {
            return Err(GrammarError::UnorderedNonTerminal(stray.clone()));
        }

        let used_symbols = order.iter().map(|nt| nt.0.clone()).collect();

        Ok(Self {
            order,
            productions,
            used_symbols,
        })
    }

    /// Parses rules in the line format `A -> Aa | b`: the left side is split
    /// off at ` -> `, the right side is whitespace-split with bare `|` tokens
    /// ignored, so `A -> Aa | b` and `A -> Aa b` are equivalent. Symbols are
    /// single characters, ASCII uppercase being non-terminals; the alternative
    /// consisting of exactly the epsilon marker is the empty production. The
    /// processing order is the line order.
    pub fn parse(lines: &[impl AsRef<str>]) -> Result<Self, GrammarError> {
        let mut order = Vec::with_capacity(lines.len());
        let mut productions = IndexMap::with_capacity(lines.len());

        for line in lines {
            let line = line.as_ref().trim();

            let (name, body) = line
                .split_once(" -> ")
                .ok_or_else(|| GrammarError::MalformedRule(line.to_string()))?;

            let name = name.trim();
            if name.is_empty() {
                return Err(GrammarError::MalformedRule(line.to_string()));
            }

            let nt = NonTerminal::new(name);
            if productions.contains_key(&nt) {
                return Err(GrammarError::DuplicateNonTerminal(nt));
            }

            let alternatives = body
                .split_whitespace()
                .filter(|token| *token != "|")
                .map(Self::parse_alternative)
                .collect();

            order.push(nt.clone());
            productions.insert(nt, alternatives);
        }

        Self::new(order, productions)
    }

    fn parse_alternative(token: &str) -> Production {
        if token == EPSILON {
            return Production::epsilon();
        }

        Production(
            token
                .chars()
                .map(|c| {
                    if c.is_ascii_uppercase() {
                        ProductionSymbol::NonTerminal(NonTerminal(Symbol::new(c)))
                    } else {
                        ProductionSymbol::Terminal(Terminal(Symbol::new(c)))
                    }
                })
                .collect(),
        )
    }

    /// The original processing order, without created non-terminals.
    pub fn order(&self) -> &[NonTerminal] {
        &self.order
    }

    /// All non-terminals in output order: originals first, then created ones
    /// in creation order.
    pub fn non_terminals(&self) -> impl Iterator<Item = &NonTerminal> {
        self.productions.keys()
    }

    pub fn alternatives(&self, nt: &NonTerminal) -> Option<&[Production]> {
        self.productions.get(nt).map(Vec::as_slice)
    }

    pub fn used_symbols(&self) -> &IndexSet<Symbol> {
        &self.used_symbols
    }

    /// One line per non-terminal: `<nt> -> <alt1> <alt2> ... <altk>`.
    /// A non-terminal left with zero alternatives emits an empty body.
    pub fn definition(&self) -> String {
        self.productions
            .iter()
            .map(|(nt, alternatives)| {
                let mut line = format!("{} ->", nt);
                if !alternatives.is_empty() {
                    line.push(' ');
                    line.push_str(&alternatives.iter().join(" "));
                }
                line
            })
            .join("\n")
    }

    pub fn table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Non-terminal", "Productions"]);

        for (nt, alternatives) in &self.productions {
            builder.push_record([nt.to_string(), alternatives.iter().join(" | ")]);
        }

        let mut table = builder.build();
        table.with(Style::rounded());

        table.to_string()
    }
}

impl Display for ContextFreeGrammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.definition())
    }
}

impl PartialEq for ContextFreeGrammar {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order && self.productions == other.productions
    }
}

impl Eq for ContextFreeGrammar {}
