pub mod context_free;
pub mod left_recursion;
pub mod types;

pub use context_free::ContextFreeGrammar;
pub use left_recursion::FreshNames;
pub use types::{GrammarError, NonTerminal, Production, ProductionSymbol, Terminal};
