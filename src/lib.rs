/*!

Stratagem computes the reachable state space of a transition system whose states are
first-order terms over a many-sorted algebraic signature and whose transitions are
rewrite rules orchestrated by *strategies* in the ELAN/Stratego tradition.

The crate is organized in three layers:

 - [`api`] is the public surface: signatures, ADTs, strategies, and the
   [`TransitionSystem`](api::TransitionSystem) that ties them together.
 - `core` holds the semantic machinery: sorts and the sub-sort closure, hash-consed
   terms, matching and substitution, the strategy linker, the rewriter, and the
   state-set lattice with its memoised operations.
 - [`abstractions`] holds backing types the rest of the crate is written against:
   interned strings, bitsets over naturals, and the logging layer.

A client builds a [`Signature`](api::Signature), wraps it in an [`Adt`](api::Adt),
declares variables and terms, assembles a `TransitionSystem` from named strategy
declarations, links it, and then rewrites the initial state or saturates the full
reachable set.

*/

pub mod abstractions;
pub mod api;
mod core;

// We re-export abstractions that are meant to be used publicly.
pub use abstractions::{
  log,
  IString
};
