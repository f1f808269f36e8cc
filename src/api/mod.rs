/*!

The public API of the library: signature and ADT construction, the strategy
algebra, transition-system assembly, and the analysis entry points. The semantic
types that construction produces (terms, substitutions, state sets, outcomes,
errors) are re-exported here from the core.

*/

pub mod adt;
pub mod signature;
pub mod strategy;
pub mod transition_system;

pub use adt::{Adt, VarId, VariableDecl};
pub use signature::{OpId, Operation, OperationAttribute, OperationAttributes, Signature};
pub use strategy::{
  ChildIndex,
  DeclaredStrategy,
  RewriteRule,
  Strategy,
  StrategyAttribute,
  StrategyAttributes,
  StrategyVariable
};
pub use transition_system::TransitionSystem;

pub use crate::core::{
  error::{BadSignature, BadTerm, BadTransitionSystem, CoreError, LinkerError, RewriteFault},
  lattice::{fix, CancellationToken, LatticeElement, StateSet, Universe},
  rewriter::{Applied, RewriteSettings, Rewriter},
  sort::{Sort, SortId},
  substitution::{match_pattern, Substitution},
  term::{occurs_in, Term}
};
