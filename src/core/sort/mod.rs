/*!

A sort is a named type. Sorts are related by a sub-sort relation which, in the
absence of error conditions, is a partial order: a DAG rooted at base sorts.

## The Sub-Sort Relation

Any two sorts are either incomparable, equal, or one is a subsort of the other.
`is_subsort_of` is reflexive and transitive. Rather than walking the adjacency
lists at query time, each sort carries the precomputed transitive closure of its
supersorts as a [`NatSet`](crate::abstractions::NatSet) of sort indices
(`geq_sorts`): `a ≤ b` exactly when `b`'s index is in `a.geq_sorts`.

## Computing the Closure

The closure is maintained at insertion time. A supersort named in a declaration
must already exist, so when a fresh sort is inserted its closure is the supersort's
closure plus itself, and existing closures never change. Declaring an *additional*
edge between existing sorts is also supported; there the closure of every sort at
or below the new subsort grows by the new supersort's closure, and an edge whose
endpoints are already related in the opposite direction is rejected as a cycle.

## Lifecycle and Ownership

Sorts are owned by the [`Signature`](crate::api::Signature) in which they are
declared and are frozen together with it; sorts are referred to by index
([`SortId`]) thereafter.

*/

mod collection;
mod sort;

pub use collection::SortCollection;
pub use sort::{Sort, SortId};
