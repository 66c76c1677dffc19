pub mod analyzer;
pub mod cache;
pub mod expander;
mod lexicon;
pub mod morphology;
pub mod stages;

pub use analyzer::{Intent, RoleAssignment, SemanticAnalysis, SemanticAnalyzer, SemanticRole};
pub use cache::ExpansionCache;
pub use expander::{rule_confidence, ExpansionMethod, ExpansionResult, GrammarExpander};
pub use stages::{Clause, Stage, PIPELINE};
