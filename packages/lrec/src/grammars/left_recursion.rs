use indexmap::IndexSet;

use crate::{
    grammars::{
        context_free::ContextFreeGrammar,
        types::{GrammarError, NonTerminal, Production},
    },
    language::Symbol,
};

/// Fresh non-terminal names for the left-recursion rewrite, drawn from the 26
/// uppercase ASCII letters.
///
/// The generator is seeded from the grammar's used-symbol set: scanning starts
/// past the letters already claimed by the original non-terminals and wraps
/// around the alphabet, so a grammar over [S, A] gets C as its first fresh
/// name. `fresh` is a pure query; registering the returned name in the
/// used-symbol set is the caller's job.
#[derive(Debug)]
pub struct FreshNames {
    alphabet: Vec<Symbol>,
    start: usize,
}

impl FreshNames {
    pub fn seeded(used: &IndexSet<Symbol>) -> Self {
        FreshNames {
            alphabet: ('A'..='Z').map(Symbol::new).collect(),
            start: used.len(),
        }
    }

    /// The first alphabet letter not present in the used-symbol set, or
    /// `NameSpaceExhausted` once all 26 letters are taken.
    pub fn fresh(&self, used: &IndexSet<Symbol>) -> Result<Symbol, GrammarError> {
        let n = self.alphabet.len();

        (0..n)
            .map(|k| &self.alphabet[(self.start + k) % n])
            .find(|letter| !used.contains(*letter))
            .cloned()
            .ok_or(GrammarError::NameSpaceExhausted)
    }
}

impl ContextFreeGrammar {
    /// Removes all left recursion, direct and indirect, with respect to the
    /// grammar's processing order A1..An: for each Ai, every earlier Aj is
    /// substituted into Ai's productions, then any remaining immediate
    /// recursion on Ai is eliminated. Aj is already recursion-free when it is
    /// substituted, which is what turns indirect recursion into immediate
    /// recursion on Ai. Non-terminals created along the way never re-enter
    /// the outer loop.
    pub fn eliminate_left_recursion(&mut self) -> Result<(), GrammarError> {
        let names = FreshNames::seeded(&self.used_symbols);
        let order = self.order.clone();

        for (i, current) in order.iter().enumerate() {
            for earlier in &order[..i] {
                self.substitute(current, earlier)?;
            }

            self.eliminate_immediate(current, &names)?;
        }

        Ok(())
    }

    /// Replaces every production of `target` that begins with `source` by one
    /// production per alternative δ of `source`, each followed by the
    /// remainder of the original production. Other productions keep their
    /// relative order, and inserted groups preserve the order of `source`'s
    /// alternatives. Duplicates produced by the expansion are kept.
    pub fn substitute(
        &mut self,
        target: &NonTerminal,
        source: &NonTerminal,
    ) -> Result<(), GrammarError> {
        let expansions = self
            .productions
            .get(source)
            .ok_or_else(|| GrammarError::MissingNonTerminal(source.clone()))?
            .clone();

        let alternatives = self
            .productions
            .get_mut(target)
            .ok_or_else(|| GrammarError::MissingNonTerminal(target.clone()))?;

        let mut rewritten = Vec::with_capacity(alternatives.len());

        for production in std::mem::take(alternatives) {
            if production.leading_non_terminal() == Some(source) {
                // An epsilon alternative of `source` contributes the
                // remainder as-is, since epsilon is the empty sequence.
                rewritten.extend(expansions.iter().map(|expansion| {
                    let mut symbols = expansion.0.clone();
                    symbols.extend_from_slice(production.tail());
                    Production(symbols)
                }));
            } else {
                rewritten.push(production);
            }
        }

        *alternatives = rewritten;

        Ok(())
    }

    /// Rewrites A -> Aα1 | .. | Aαm | β1 | .. | βn into
    /// A -> β1A' | .. | βnA' and A' -> α1A' | .. | αmA' | ε, where A' is a
    /// fresh non-terminal. Without any recursive alternative this is a strict
    /// no-op: the production list is left untouched and no name is drawn.
    /// Returns the created non-terminal, if any.
    ///
    /// A non-terminal whose alternatives are all recursive ends up with zero
    /// productions; the grammar stays representable but is degenerate.
    pub fn eliminate_immediate(
        &mut self,
        nt: &NonTerminal,
        names: &FreshNames,
    ) -> Result<Option<NonTerminal>, GrammarError> {
        let alternatives = self
            .productions
            .get(nt)
            .ok_or_else(|| GrammarError::MissingNonTerminal(nt.clone()))?;

        let mut recursive = Vec::new();
        let mut base = Vec::new();

        for production in alternatives {
            if production.leading_non_terminal() == Some(nt) {
                recursive.push(Production(production.tail().to_vec()));
            } else {
                base.push(production.clone());
            }
        }

        if recursive.is_empty() {
            return Ok(None);
        }

        let fresh = NonTerminal(names.fresh(&self.used_symbols)?);

        let rewritten = base
            .into_iter()
            .map(|production| production.with_suffix(&fresh))
            .collect();

        let mut fresh_alternatives: Vec<Production> = recursive
            .into_iter()
            .map(|tail| tail.with_suffix(&fresh))
            .collect();
        fresh_alternatives.push(Production::epsilon());

        self.productions.insert(nt.clone(), rewritten);
        self.productions.insert(fresh.clone(), fresh_alternatives);
        self.used_symbols.insert(fresh.0.clone());

        Ok(Some(fresh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(lines: &[&str]) -> ContextFreeGrammar {
        ContextFreeGrammar::parse(lines).unwrap()
    }

    #[test]
    fn substitution_expands_leading_source_only() {
        let mut grammar = parsed(&["S -> a | b", "T -> Sc | cS"]);

        grammar
            .substitute(&NonTerminal::new("T"), &NonTerminal::new("S"))
            .unwrap();

        assert_eq!(grammar.definition(), "S -> a b\nT -> ac bc cS");
    }

    #[test]
    fn substitution_keeps_duplicate_results() {
        let mut grammar = parsed(&["S -> a", "T -> Sa | Sa"]);

        grammar
            .substitute(&NonTerminal::new("T"), &NonTerminal::new("S"))
            .unwrap();

        assert_eq!(grammar.definition(), "S -> a\nT -> aa aa");
    }

    #[test]
    fn substituting_an_epsilon_alternative_inserts_the_remainder() {
        let mut grammar = parsed(&["S -> e | a", "T -> Sb"]);

        grammar
            .substitute(&NonTerminal::new("T"), &NonTerminal::new("S"))
            .unwrap();

        assert_eq!(grammar.definition(), "S -> e a\nT -> b ab");
    }

    #[test]
    fn substitution_fails_fast_on_a_missing_source() {
        let mut grammar = parsed(&["T -> Sa"]);

        assert_eq!(
            grammar.substitute(&NonTerminal::new("T"), &NonTerminal::new("S")),
            Err(GrammarError::MissingNonTerminal(NonTerminal::new("S")))
        );
    }

    #[test]
    fn immediate_elimination_is_a_no_op_without_recursion() {
        let mut grammar = parsed(&["A -> aA | b"]);
        let names = FreshNames::seeded(grammar.used_symbols());
        let before = grammar.clone();

        let created = grammar
            .eliminate_immediate(&NonTerminal::new("A"), &names)
            .unwrap();

        assert_eq!(created, None);
        assert_eq!(grammar, before);
    }

    #[test]
    fn immediate_elimination_partitions_alternatives() {
        let mut grammar = parsed(&["A -> Aa | b"]);
        let names = FreshNames::seeded(grammar.used_symbols());

        let created = grammar
            .eliminate_immediate(&NonTerminal::new("A"), &names)
            .unwrap();

        assert_eq!(created, Some(NonTerminal::new("B")));
        assert_eq!(grammar.definition(), "A -> bB\nB -> aB e");
    }

    #[test]
    fn fresh_names_skip_used_letters() {
        let used = IndexSet::from([Symbol::new("B")]);
        let names = FreshNames::seeded(&used);

        // Scanning starts at the second letter; B is taken, so C comes out.
        assert_eq!(names.fresh(&used).unwrap(), Symbol::new("C"));
    }

    #[test]
    fn fresh_names_wrap_around_the_alphabet() {
        let used = ('B'..='Z').map(Symbol::new).collect::<IndexSet<_>>();
        let names = FreshNames::seeded(&used);

        assert_eq!(names.fresh(&used).unwrap(), Symbol::new("A"));
    }

    #[test]
    fn fresh_names_error_once_the_alphabet_is_exhausted() {
        let used = ('A'..='Z').map(Symbol::new).collect::<IndexSet<_>>();
        let names = FreshNames::seeded(&used);

        assert_eq!(names.fresh(&used), Err(GrammarError::NameSpaceExhausted));
    }
}
