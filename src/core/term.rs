/*!

A `Term` is either a variable of an algebraic sort or an application of an operation
to sub-terms. Terms are immutable values belonging to exactly one ADT.

## Hash-Consing

Terms are hash-consed through a table owned by their ADT: two structurally equal
terms of the same ADT are the same allocation, so equality is a pointer comparison
and the structural hash is computed once. The table holds weak references only;
terms are reclaimed as soon as no client or cache keeps them alive.

*/

use std::{
  cell::RefCell,
  cmp::Ordering,
  collections::HashMap,
  fmt::{Debug, Display, Formatter},
  hash::{Hash, Hasher},
  rc::{Rc, Weak},
};

use crate::{
  abstractions::hash2,
  api::{
    adt::{Adt, VarId},
    signature::OpId
  },
  core::sort::SortId,
};

const VARIABLE_SEED   : u64 = 0x517c_c1b7_2722_0a95;
const APPLICATION_SEED: u64 = 0x27d4_eb2f_1656_67c5;

#[derive(Clone)]
pub struct Term(pub(crate) Rc<TermData>);

pub struct TermData {
  pub(crate) adt : Adt,
  pub(crate) node: TermNode,
  hash  : u64,
  ground: bool,
}

#[derive(Clone)]
pub enum TermNode {
  Variable(VarId),
  Application { op: OpId, args: Vec<Term> },
}

impl Term {
  /// Constructs a hash-consed term. The caller (the ADT) has already validated
  /// arity, argument sorts and ADT membership.
  pub(crate) fn make(adt: &Adt, node: TermNode) -> Term {
    let hash = match &node {
      TermNode::Variable(v) => hash2(VARIABLE_SEED, v.0 as u64),
      TermNode::Application { op, args } => args
          .iter()
          .fold(hash2(APPLICATION_SEED, op.0 as u64), |h, arg| hash2(h, arg.hash_value())),
    };
    let ground = match &node {
      TermNode::Variable(_) => false,
      TermNode::Application { args, .. } => args.iter().all(|arg| arg.is_ground()),
    };

    adt.0.terms.borrow_mut().intern(adt, node, hash, ground)
  }

  #[inline(always)]
  pub fn adt(&self) -> &Adt {
    &self.0.adt
  }

  #[inline(always)]
  pub fn node(&self) -> &TermNode {
    &self.0.node
  }

  /// The memoised structural hash.
  #[inline(always)]
  pub fn hash_value(&self) -> u64 {
    self.0.hash
  }

  /// A ground term contains no variables.
  #[inline(always)]
  pub fn is_ground(&self) -> bool {
    self.0.ground
  }

  pub fn is_variable(&self) -> bool {
    matches!(self.0.node, TermNode::Variable(_))
  }

  /// The sort of the term: the declared sort for a variable, the operation's
  /// return sort for an application.
  pub fn sort(&self) -> SortId {
    match &self.0.node {
      TermNode::Variable(v) => self.0.adt.variable_decl(*v).sort,
      TermNode::Application { op, .. } => self.0.adt.signature().operation(*op).return_sort,
    }
  }

  /// The number of immediate sub-terms.
  pub fn arity(&self) -> usize {
    match &self.0.node {
      TermNode::Variable(_) => 0,
      TermNode::Application { args, .. } => args.len(),
    }
  }

  pub fn args(&self) -> &[Term] {
    match &self.0.node {
      TermNode::Variable(_) => &[],
      TermNode::Application { args, .. } => args,
    }
  }

  /// Replaces the child at `index` (zero-based), re-consing the spine.
  pub(crate) fn with_child(&self, index: usize, child: Term) -> Term {
    match &self.0.node {
      TermNode::Variable(_) => unreachable!("tried to replace a child of a variable"),
      TermNode::Application { op, args } => {
        let mut args = args.clone();
        args[index] = child;
        Term::make(&self.0.adt, TermNode::Application { op: *op, args })
      }
    }
  }

  /// Total structural order among terms of one ADT: variables before
  /// applications, then indices, then arguments lexicographically. Used for the
  /// canonical layout of state sets.
  pub(crate) fn structural_cmp(&self, other: &Term) -> Ordering {
    if Rc::ptr_eq(&self.0, &other.0) {
      return Ordering::Equal;
    }
    match (&self.0.node, &other.0.node) {
      (TermNode::Variable(a), TermNode::Variable(b)) => a.cmp(b),
      (TermNode::Variable(_), TermNode::Application { .. }) => Ordering::Less,
      (TermNode::Application { .. }, TermNode::Variable(_)) => Ordering::Greater,
      (TermNode::Application { op: a, args: xs }, TermNode::Application { op: b, args: ys }) => {
        a.cmp(b).then_with(|| {
          for (x, y) in xs.iter().zip(ys.iter()) {
            let ordering = x.structural_cmp(y);
            if ordering.is_ne() {
              return ordering;
            }
          }
          xs.len().cmp(&ys.len())
        })
      }
    }
  }
}

/// Does variable `v` occur in `t`?
pub fn occurs_in(v: VarId, t: &Term) -> bool {
  match t.node() {
    TermNode::Variable(w) => *w == v,
    TermNode::Application { args, .. } => args.iter().any(|arg| occurs_in(v, arg)),
  }
}

// region trait impls for Term

// Hash-consing makes pointer equality coincide with structural equality within an
// ADT; terms of different ADTs are never equal.
impl PartialEq for Term {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for Term {}

impl Hash for Term {
  fn hash<H: Hasher>(&self, state: &mut H) {
    state.write_u64(self.0.hash)
  }
}

impl PartialOrd for Term {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Term {
  fn cmp(&self, other: &Self) -> Ordering {
    self
        .0
        .adt
        .id()
        .cmp(&other.0.adt.id())
        .then_with(|| self.structural_cmp(other))
  }
}

impl Display for Term {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match &self.0.node {
      TermNode::Variable(v) => write!(f, "{}", self.0.adt.variable_decl(*v).name),
      TermNode::Application { op, args } => {
        write!(f, "{}", self.0.adt.signature().operation(*op).name)?;
        if !args.is_empty() {
          write!(f, "(")?;
          for (i, arg) in args.iter().enumerate() {
            if i > 0 {
              write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
          }
          write!(f, ")")?;
        }
        Ok(())
      }
    }
  }
}

impl Debug for Term {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    Display::fmt(self, f)
  }
}

// endregion

/// The per-ADT hash-consing table. Buckets hold weak references; dead entries are
/// swept out of a bucket as it is scanned.
#[derive(Default)]
pub(crate) struct TermTable {
  buckets: HashMap<u64, Vec<Weak<TermData>>>,
}

impl TermTable {
  fn intern(&mut self, adt: &Adt, node: TermNode, hash: u64, ground: bool) -> Term {
    let bucket = self.buckets.entry(hash).or_default();
    bucket.retain(|weak| weak.strong_count() > 0);

    for weak in bucket.iter() {
      if let Some(existing) = weak.upgrade() {
        if node_eq(&existing.node, &node) {
          return Term(existing);
        }
      }
    }

    let data = Rc::new(TermData {
      adt: adt.clone(),
      node,
      hash,
      ground,
    });
    bucket.push(Rc::downgrade(&data));
    Term(data)
  }
}

/// Shallow structural equality. Children are already hash-consed, so comparing
/// them is pointer comparison.
fn node_eq(a: &TermNode, b: &TermNode) -> bool {
  match (a, b) {
    (TermNode::Variable(x), TermNode::Variable(y)) => x == y,
    (TermNode::Application { op: f, args: xs }, TermNode::Application { op: g, args: ys }) => {
      f == g && xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(x, y)| x == y)
    }
    _ => false,
  }
}
