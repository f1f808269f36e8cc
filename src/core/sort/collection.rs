use std::collections::HashMap;

use crate::{
  abstractions::IString,
  core::{
    error::BadSignature,
    sort::{Sort, SortId}
  },
};

/// The ordered set of sorts of a signature, with the sub-sort closure maintained
/// at insertion time.
#[derive(Default)]
pub struct SortCollection {
  sorts: Vec<Sort>,
  index: HashMap<IString, SortId>,
}

impl SortCollection {
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts a fresh sort, optionally as a subsort of an existing one. The
  /// supersort must already be declared; the name must not be.
  pub fn insert(&mut self, name: IString, supersort: Option<&IString>) -> Result<SortId, BadSignature> {
    if self.index.contains_key(&name) {
      return Err(BadSignature::DuplicateSort { name });
    }

    let supersort_id = match supersort {
      Some(supersort_name) => Some(self.id_of(supersort_name)?),
      None => None,
    };

    let id = SortId(self.sorts.len() as u32);
    let mut sort = Sort::new(name.clone(), id);
    if let Some(supersort_id) = supersort_id {
      sort.supersorts.push(supersort_id);
      let closure = self.sorts[supersort_id.index()].geq_sorts.clone();
      sort.geq_sorts.union_in_place(&closure);
    }

    self.index.insert(name, id);
    self.sorts.push(sort);
    Ok(id)
  }

  /// Declares an additional sub-sort edge between two existing sorts. Rejected
  /// when the supersort is already below the subsort, which would close a cycle.
  pub fn insert_subsort_edge(&mut self, subsort: &IString, supersort: &IString) -> Result<(), BadSignature> {
    let sub = self.id_of(subsort)?;
    let sup = self.id_of(supersort)?;

    if self.sorts[sup.index()].geq_sorts.contains(sub.index()) {
      return Err(BadSignature::SubSortCycle {
        subsort  : subsort.clone(),
        supersort: supersort.clone(),
      });
    }

    self.sorts[sub.index()].supersorts.push(sup);

    // Every sort at or below `sub` gains the closure of `sup`.
    let gained = self.sorts[sup.index()].geq_sorts.clone();
    for sort in self.sorts.iter_mut() {
      if sort.geq_sorts.contains(sub.index()) {
        sort.geq_sorts.union_in_place(&gained);
      }
    }
    Ok(())
  }

  /// Reflexive-transitive sub-sort query: is `a ≤ b`?
  #[inline(always)]
  pub fn is_subsort_of(&self, a: SortId, b: SortId) -> bool {
    self.sorts[a.index()].geq_sorts.contains(b.index())
  }

  pub fn id_of(&self, name: &IString) -> Result<SortId, BadSignature> {
    self
        .index
        .get(name)
        .copied()
        .ok_or_else(|| BadSignature::UnknownSort { name: name.clone() })
  }

  #[inline(always)]
  pub fn get(&self, id: SortId) -> &Sort {
    &self.sorts[id.index()]
  }

  /// Iterates the sorts in declaration order.
  pub fn iter(&self) -> impl Iterator<Item = &Sort> {
    self.sorts.iter()
  }
}
