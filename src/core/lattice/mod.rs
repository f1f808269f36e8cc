/*!

The lattice of state sets.

A lattice element carries a distinguished bottom element and the three operations
`∪`, `∩`, `\`. Elements are hash-consed — structurally equal elements share
identity — which makes convergence checks in fixed-point iteration a pointer
comparison, and makes the other operand's identity a sound memoisation key.

The concrete element here is [`StateSet`], a canonically ordered set of ground
terms interned in a [`Universe`]. The raw set algebra is private; the public
operations interpose the per-element [`op_cache`](op_cache::OpCache)s, so every
`StateSet` is the decorated form of the capability described by
[`LatticeElement`].

*/

pub(crate) mod fixpoint;
pub(crate) mod op_cache;
pub(crate) mod state_set;

pub use fixpoint::{fix, CancellationToken};
pub use state_set::{StateSet, Universe};

/// The lattice capability: bottom detection and the three set operations.
/// Operations never fail; on hash-consed implementations `a == b` is identity.
pub trait LatticeElement: Clone + PartialEq {
  fn is_bottom(&self) -> bool;

  /// `self ∪ other`.
  fn union(&self, other: &Self) -> Self;

  /// `self ∩ other`.
  fn inter(&self, other: &Self) -> Self;

  /// `self \ other`.
  fn diff(&self, other: &Self) -> Self;
}
