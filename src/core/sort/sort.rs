use std::fmt::Display;

use crate::abstractions::{IString, NatSet};

/// The index of a sort within its signature. Only meaningful together with the
/// signature that issued it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct SortId(pub(crate) u32);

impl SortId {
  #[inline(always)]
  pub(crate) fn index(self) -> usize {
    self.0 as usize
  }
}

pub struct Sort {
  pub name : IString,
  pub index: SortId,

  /// Immediately declared supersorts. Transitive supersorts live in `geq_sorts`.
  pub supersorts: Vec<SortId>,

  /// Indices of all sorts this sort is a subsort of, including itself. This is the
  /// transitive closure of the `supersorts` edges.
  pub(crate) geq_sorts: NatSet,
}

impl Sort {
  pub(crate) fn new(name: IString, index: SortId) -> Sort {
    Sort {
      name,
      index,
      supersorts: Vec::new(),
      geq_sorts : NatSet::singleton(index.index()),
    }
  }

  /// Is this a base sort, i.e. one with no declared supersort?
  pub fn is_base_sort(&self) -> bool {
    self.supersorts.is_empty()
  }
}

impl Display for Sort {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.name)
  }
}
