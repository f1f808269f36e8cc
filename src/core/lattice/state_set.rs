/*!

`StateSet`: the concrete lattice element — a set of ground terms in canonical
(sorted, deduplicated) layout, hash-consed in a [`Universe`].

The `Universe` is the scope of sharing: it is owned by a transition system,
created lazily with it, and released when the system is dropped. Its table holds
weak references only, so a state set lives exactly as long as some client,
rewriter frame, or live cache result needs it.

*/

use std::{
  cell::RefCell,
  collections::HashMap,
  fmt::{Debug, Display, Formatter},
  hash::{Hash, Hasher},
  rc::{Rc, Weak},
};

use crate::{
  abstractions::{hash2, join_string},
  core::{
    lattice::{op_cache::OpCache, LatticeElement},
    term::Term
  },
  trace,
};

const STATE_SET_SEED: u64 = 0x2545_f491_4f6c_dd1d;

pub struct StateSetData {
  terms   : Vec<Term>,
  hash    : u64,
  universe: Universe,
  union_cache: OpCache<StateSetData>,
  inter_cache: OpCache<StateSetData>,
  diff_cache : OpCache<StateSetData>,
}

#[derive(Clone)]
pub struct StateSet(pub(crate) Rc<StateSetData>);

impl StateSet {
  /// The member terms in canonical order.
  #[inline(always)]
  pub fn terms(&self) -> &[Term] {
    &self.0.terms
  }

  pub fn len(&self) -> usize {
    self.0.terms.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.terms.is_empty()
  }

  pub fn contains(&self, term: &Term) -> bool {
    self.0.terms.binary_search(term).is_ok()
  }

  #[inline(always)]
  pub fn universe(&self) -> &Universe {
    &self.0.universe
  }

  /// The memoised structural hash.
  #[inline(always)]
  pub fn hash_value(&self) -> u64 {
    self.0.hash
  }

  /// The identity a peer uses as its memoisation key for this element.
  #[inline(always)]
  pub(crate) fn id(&self) -> usize {
    Rc::as_ptr(&self.0) as usize
  }

  /// Total cache traffic over this element's three op-caches, `(hits, misses)`.
  pub fn cache_stats(&self) -> (u64, u64) {
    let hits = self.0.union_cache.hits() + self.0.inter_cache.hits() + self.0.diff_cache.hits();
    let misses =
      self.0.union_cache.misses() + self.0.inter_cache.misses() + self.0.diff_cache.misses();
    (hits, misses)
  }

  /// Drops every memoised result held by this element. Observable behavior does
  /// not change; subsequent operations recompute.
  pub fn clear_caches(&self) {
    self.0.union_cache.clear();
    self.0.inter_cache.clear();
    self.0.diff_cache.clear();
  }
}

// Hash-consing makes pointer equality coincide with set equality within a
// universe.
impl PartialEq for StateSet {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for StateSet {}

impl Hash for StateSet {
  fn hash<H: Hasher>(&self, state: &mut H) {
    state.write_u64(self.0.hash)
  }
}

impl Display for StateSet {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{{{}}}", join_string(self.0.terms.iter(), ", "))
  }
}

impl Debug for StateSet {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    Display::fmt(self, f)
  }
}

impl LatticeElement for StateSet {
  fn is_bottom(&self) -> bool {
    self.0.terms.is_empty()
  }

  fn union(&self, other: &Self) -> Self {
    // Short-circuits, cheapest first.
    if Rc::ptr_eq(&self.0, &other.0) {
      return self.clone();
    }
    if other.is_bottom() {
      return self.clone();
    }
    if self.is_bottom() {
      return other.clone();
    }

    // Canonical operand order for the commutative operation: the larger identity
    // carries the cache entry, so each unordered pair occupies one slot.
    let (x, y) = if self.id() < other.id() { (other, self) } else { (self, other) };

    if let Some(hit) = x.0.union_cache.lookup(y.id()) {
      return StateSet(hit);
    }
    let result = x.0.universe.make(merge_union(&x.0.terms, &y.0.terms));
    x.0.union_cache.insert(y.id(), &result.0);
    result
  }

  fn inter(&self, other: &Self) -> Self {
    if Rc::ptr_eq(&self.0, &other.0) {
      return self.clone();
    }
    if other.is_bottom() {
      return other.clone();
    }
    if self.is_bottom() {
      return self.clone();
    }

    let (x, y) = if self.id() < other.id() { (other, self) } else { (self, other) };

    if let Some(hit) = x.0.inter_cache.lookup(y.id()) {
      return StateSet(hit);
    }
    let result = x.0.universe.make(merge_inter(&x.0.terms, &y.0.terms));
    x.0.inter_cache.insert(y.id(), &result.0);
    result
  }

  fn diff(&self, other: &Self) -> Self {
    if other.is_bottom() {
      return self.clone();
    }

    if let Some(hit) = self.0.diff_cache.lookup(other.id()) {
      return StateSet(hit);
    }
    let result = self.0.universe.make(merge_diff(&self.0.terms, &other.0.terms));
    self.0.diff_cache.insert(other.id(), &result.0);
    result
  }
}

// region Raw set algebra over canonically ordered term vectors

fn merge_union(xs: &[Term], ys: &[Term]) -> Vec<Term> {
  let mut merged = Vec::with_capacity(xs.len() + ys.len());
  let (mut i, mut j) = (0, 0);
  while i < xs.len() && j < ys.len() {
    match xs[i].cmp(&ys[j]) {
      std::cmp::Ordering::Less => {
        merged.push(xs[i].clone());
        i += 1;
      }
      std::cmp::Ordering::Greater => {
        merged.push(ys[j].clone());
        j += 1;
      }
      std::cmp::Ordering::Equal => {
        merged.push(xs[i].clone());
        i += 1;
        j += 1;
      }
    }
  }
  merged.extend_from_slice(&xs[i..]);
  merged.extend_from_slice(&ys[j..]);
  merged
}

fn merge_inter(xs: &[Term], ys: &[Term]) -> Vec<Term> {
  let mut merged = Vec::new();
  let (mut i, mut j) = (0, 0);
  while i < xs.len() && j < ys.len() {
    match xs[i].cmp(&ys[j]) {
      std::cmp::Ordering::Less => i += 1,
      std::cmp::Ordering::Greater => j += 1,
      std::cmp::Ordering::Equal => {
        merged.push(xs[i].clone());
        i += 1;
        j += 1;
      }
    }
  }
  merged
}

fn merge_diff(xs: &[Term], ys: &[Term]) -> Vec<Term> {
  let mut merged = Vec::new();
  let (mut i, mut j) = (0, 0);
  while i < xs.len() {
    if j >= ys.len() {
      merged.extend_from_slice(&xs[i..]);
      break;
    }
    match xs[i].cmp(&ys[j]) {
      std::cmp::Ordering::Less => {
        merged.push(xs[i].clone());
        i += 1;
      }
      std::cmp::Ordering::Greater => j += 1,
      std::cmp::Ordering::Equal => {
        i += 1;
        j += 1;
      }
    }
  }
  merged
}

// endregion

/// The hash-consing scope for state sets. Cheap to clone; clones share the table.
#[derive(Clone, Default)]
pub struct Universe(Rc<UniverseData>);

#[derive(Default)]
struct UniverseData {
  table: RefCell<HashMap<u64, Vec<Weak<StateSetData>>>>,
}

impl Universe {
  pub fn new() -> Self {
    Self::default()
  }

  /// The empty set.
  pub fn bottom(&self) -> StateSet {
    self.make(Vec::new())
  }

  pub fn singleton(&self, term: Term) -> StateSet {
    debug_assert!(term.is_ground(), "state sets hold ground terms");
    self.make(vec![term])
  }

  /// Interns a set given by an arbitrary term list; sorts and deduplicates into
  /// the canonical layout first.
  pub fn make(&self, mut terms: Vec<Term>) -> StateSet {
    terms.sort();
    terms.dedup();

    let hash = terms
        .iter()
        .fold(STATE_SET_SEED, |h, term| hash2(h, term.hash_value()));

    let mut table = self.0.table.borrow_mut();
    let bucket = table.entry(hash).or_default();
    bucket.retain(|weak| weak.strong_count() > 0);

    for weak in bucket.iter() {
      if let Some(existing) = weak.upgrade() {
        if existing.terms.len() == terms.len()
            && existing.terms.iter().zip(terms.iter()).all(|(a, b)| a == b)
        {
          return StateSet(existing);
        }
      }
    }

    trace!(4; "interning a state set of {} term(s)", terms.len());
    let data = Rc::new(StateSetData {
      terms,
      hash,
      universe   : self.clone(),
      union_cache: OpCache::default(),
      inter_cache: OpCache::default(),
      diff_cache : OpCache::default(),
    });
    bucket.push(Rc::downgrade(&data));
    StateSet(data)
  }

  /// The number of live interned sets.
  pub fn live_count(&self) -> usize {
    self
        .0
        .table
        .borrow()
        .values()
        .map(|bucket| bucket.iter().filter(|weak| weak.strong_count() > 0).count())
        .sum()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::{adt::Adt, signature::Signature};

  fn small_adt() -> Adt {
    let signature = Signature::new()
        .with_sort("s")
        .and_then(|sig| sig.with_generator("a", "s", &[]))
        .and_then(|sig| sig.with_generator("b", "s", &[]))
        .and_then(|sig| sig.with_generator("c", "s", &[]))
        .unwrap();
    Adt::new("small", signature)
  }

  fn abc(universe: &Universe, adt: &Adt) -> (StateSet, StateSet, StateSet) {
    let a = universe.singleton(adt.constant("a").unwrap());
    let b = universe.singleton(adt.constant("b").unwrap());
    let c = universe.singleton(adt.constant("c").unwrap());
    (a, b, c)
  }

  #[test]
  fn sets_are_hash_consed() {
    let adt = small_adt();
    let universe = Universe::new();
    let a = adt.constant("a").unwrap();
    let b = adt.constant("b").unwrap();

    let x = universe.make(vec![a.clone(), b.clone()]);
    let y = universe.make(vec![b, a]);
    assert_eq!(x, y);
    assert!(Rc::ptr_eq(&x.0, &y.0));
  }

  #[test]
  fn lattice_identities() {
    let adt = small_adt();
    let universe = Universe::new();
    let (x, y, _) = abc(&universe, &adt);
    let x = x.union(&y);
    let bottom = universe.bottom();

    assert_eq!(x.union(&x), x);
    assert_eq!(x.union(&bottom), x);
    assert_eq!(bottom.union(&x), x);
    assert_eq!(x.inter(&x), x);
    assert_eq!(x.inter(&bottom), bottom);
    assert_eq!(bottom.inter(&x), bottom);
    assert_eq!(x.diff(&bottom), x);
    assert_eq!(x.diff(&x), bottom);
    assert!(bottom.is_bottom());
  }

  #[test]
  fn commutativity_and_associativity() {
    let adt = small_adt();
    let universe = Universe::new();
    let (a, b, c) = abc(&universe, &adt);

    assert_eq!(a.union(&b), b.union(&a));
    assert_eq!(a.union(&b).union(&c), a.union(&b.union(&c)));

    let ab = a.union(&b);
    let bc = b.union(&c);
    assert_eq!(ab.inter(&bc), bc.inter(&ab));
    assert_eq!(ab.inter(&bc), b);
  }

  #[test]
  fn union_results_are_memoised() {
    let adt = small_adt();
    let universe = Universe::new();
    let (a, b, _) = abc(&universe, &adt);

    let first = a.union(&b);
    let second = a.union(&b);
    assert!(Rc::ptr_eq(&first.0, &second.0));

    // One of the operands carries the pair's entry; both orders hit it.
    let (hits, _) = a.cache_stats();
    let (hits_b, _) = b.cache_stats();
    assert_eq!(hits + hits_b, 1);
  }

  #[test]
  fn cache_clearing_is_transparent() {
    let adt = small_adt();
    let universe = Universe::new();
    let (a, b, c) = abc(&universe, &adt);

    let before = a.union(&b).inter(&b.union(&c)).diff(&c);
    a.clear_caches();
    b.clear_caches();
    c.clear_caches();
    let after = a.union(&b).inter(&b.union(&c)).diff(&c);
    assert_eq!(before, after);
  }

  #[test]
  fn dead_sets_are_reclaimed() {
    let adt = small_adt();
    let universe = Universe::new();
    let keep = universe.singleton(adt.constant("a").unwrap());
    {
      let _transient = universe.make(vec![
        adt.constant("a").unwrap(),
        adt.constant("b").unwrap(),
        adt.constant("c").unwrap(),
      ]);
      assert_eq!(universe.live_count(), 2);
    }
    assert_eq!(universe.live_count(), 1);
    assert_eq!(keep.len(), 1);
  }
}
