/*!

A `Signature` is an ordered set of sorts together with the operations over them.

An operation has a name, a list of formal-parameter sorts (empty for constants) and
a return sort. Operations carry attribute flags; the one the rewriting core
interprets is `Generator`, which marks the operation as a constructor of its return
sort — only generators appear at the roots of canonical values. The theory flags
(`Associative`, `Commutative`) are recorded but not executed by this crate.

The builder is chainable by value: every `with_*` method consumes the signature and
returns it extended, or refuses the step with a [`BadSignature`] naming the
offender.

```
use stratagem::api::Signature;

let sig = Signature::new()
    .with_sort("state")?
    .with_sort("fork")?
    .with_subsort("plate", "fork")?
    .with_generator("forkFree", "fork", &[])?
    .with_generator("take", "state", &["state", "fork"])?;
# Ok::<(), stratagem::api::CoreError>(())
```

*/

use std::collections::HashMap;
use std::fmt::Display;

use enumflags2::{bitflags, BitFlags};

use crate::{
  abstractions::{join_string, IString},
  core::{
    error::{BadSignature, CoreError},
    sort::{Sort, SortCollection, SortId}
  },
};

/// The index of an operation within its signature.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct OpId(pub(crate) u32);

impl OpId {
  #[inline(always)]
  pub(crate) fn index(self) -> usize {
    self.0 as usize
  }
}

#[bitflags]
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum OperationAttribute {
  /// The operation is a constructor of its return sort.
  Generator,

  // Theory attributes, recorded but not interpreted by the rewriting core.
  Associative,
  Commutative,
}

pub type OperationAttributes = BitFlags<OperationAttribute>;

pub struct Operation {
  pub name       : IString,
  pub param_sorts: Vec<SortId>,
  pub return_sort: SortId,
  pub attributes : OperationAttributes,
}

impl Operation {
  #[inline(always)]
  pub fn arity(&self) -> usize {
    self.param_sorts.len()
  }

  #[inline(always)]
  pub fn is_generator(&self) -> bool {
    self.attributes.contains(OperationAttribute::Generator)
  }

  pub fn is_constant(&self) -> bool {
    self.param_sorts.is_empty()
  }
}

impl Display for Operation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.name)
  }
}

#[derive(Default)]
pub struct Signature {
  sorts          : SortCollection,
  operations     : Vec<Operation>,
  operation_index: HashMap<IString, OpId>,
}

impl Signature {
  pub fn new() -> Self {
    Self::default()
  }

  // region Builder

  /// Declares a base sort.
  pub fn with_sort(mut self, name: &str) -> Result<Self, CoreError> {
    self.sorts.insert(IString::new(name), None)?;
    Ok(self)
  }

  /// Declares a sort as a subsort of an already declared sort.
  pub fn with_subsort(mut self, name: &str, supersort: &str) -> Result<Self, CoreError> {
    self.sorts.insert(IString::new(name), Some(&IString::new(supersort)))?;
    Ok(self)
  }

  /// Declares an additional sub-sort edge between two existing sorts. Edges that
  /// would close a cycle are refused.
  pub fn with_subsort_relation(mut self, subsort: &str, supersort: &str) -> Result<Self, CoreError> {
    self
        .sorts
        .insert_subsort_edge(&IString::new(subsort), &IString::new(supersort))?;
    Ok(self)
  }

  /// Declares an operation that is not a generator.
  pub fn with_operation(self, name: &str, return_sort: &str, param_sorts: &[&str]) -> Result<Self, CoreError> {
    self.add_operation(name, return_sort, param_sorts, OperationAttributes::empty())
  }

  /// Declares a generator: an operation that constructs canonical values of its
  /// return sort.
  pub fn with_generator(self, name: &str, return_sort: &str, param_sorts: &[&str]) -> Result<Self, CoreError> {
    self.add_operation(name, return_sort, param_sorts, OperationAttribute::Generator.into())
  }

  fn add_operation(
    mut self,
    name       : &str,
    return_sort: &str,
    param_sorts: &[&str],
    attributes : OperationAttributes,
  ) -> Result<Self, CoreError> {
    let name = IString::new(name);
    if self.operation_index.contains_key(&name) {
      return Err(BadSignature::DuplicateOperation { name }.into());
    }

    let return_sort = self.sorts.id_of(&IString::new(return_sort))?;
    let param_sorts = param_sorts
        .iter()
        .map(|sort_name| self.sorts.id_of(&IString::new(sort_name)))
        .collect::<Result<Vec<SortId>, _>>()?;

    let id = OpId(self.operations.len() as u32);
    self.operation_index.insert(name.clone(), id);
    self.operations.push(Operation {
      name,
      param_sorts,
      return_sort,
      attributes,
    });
    Ok(self)
  }

  // endregion

  // region Queries

  pub fn sort_named(&self, name: &str) -> Result<SortId, CoreError> {
    Ok(self.sorts.id_of(&IString::new(name))?)
  }

  #[inline(always)]
  pub fn sort(&self, id: SortId) -> &Sort {
    self.sorts.get(id)
  }

  pub fn operation_named(&self, name: &str) -> Result<OpId, CoreError> {
    let name = IString::new(name);
    self
        .operation_index
        .get(&name)
        .copied()
        .ok_or_else(|| BadSignature::UnknownOperation { name }.into())
  }

  #[inline(always)]
  pub fn operation(&self, id: OpId) -> &Operation {
    &self.operations[id.index()]
  }

  /// Reflexive-transitive sub-sort query: is `a ≤ b`?
  #[inline(always)]
  pub fn is_subsort_of(&self, a: SortId, b: SortId) -> bool {
    self.sorts.is_subsort_of(a, b)
  }

  pub fn sorts(&self) -> impl Iterator<Item = &Sort> {
    self.sorts.iter()
  }

  pub fn operations(&self) -> impl Iterator<Item = &Operation> {
    self.operations.iter()
  }

  // endregion
}

impl Display for Signature {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "signature {{ sorts: [{}], operations: [{}] }}",
      join_string(self.sorts(), ", "),
      join_string(self.operations(), ", ")
    )
  }
}
