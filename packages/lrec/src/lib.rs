pub mod grammars;
pub mod language;
