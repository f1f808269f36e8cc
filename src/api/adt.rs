/*!

An `Adt` is a signature plus a set of variable declarations: the universe of terms
a transition system works over.

## Lifecycle

An ADT is built by chaining `declare_variable` on an exclusively owned handle, then
frozen by use: the first term created through it shares the handle, and any further
declaration attempt is refused with `AdtFrozen`. This is the construction-then-
freeze discipline; no lock or status field is needed because the reference count
carries the same information.

ADT *identity* is reference identity. Two ADTs built from identical signatures are
still distinct, and their terms never mix.

*/

use std::{
  cell::RefCell,
  collections::HashMap,
  fmt::Display,
  rc::Rc
};

use crate::{
  abstractions::IString,
  api::signature::Signature,
  core::{
    error::{BadSignature, BadTerm, CoreError},
    sort::SortId,
    term::{Term, TermNode, TermTable}
  },
};

/// The index of a variable declaration within its ADT.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct VarId(pub(crate) u32);

impl VarId {
  #[inline(always)]
  pub(crate) fn index(self) -> usize {
    self.0 as usize
  }
}

pub struct VariableDecl {
  pub name: IString,
  pub sort: SortId,
}

pub struct AdtData {
  pub(crate) name          : IString,
  pub(crate) signature     : Signature,
  pub(crate) variables     : Vec<VariableDecl>,
  pub(crate) variable_index: HashMap<IString, VarId>,
  pub(crate) terms         : RefCell<TermTable>,
}

#[derive(Clone)]
pub struct Adt(pub(crate) Rc<AdtData>);

impl Adt {
  pub fn new(name: &str, signature: Signature) -> Adt {
    Adt(Rc::new(AdtData {
      name          : IString::new(name),
      signature,
      variables     : Vec::new(),
      variable_index: HashMap::new(),
      terms         : RefCell::new(TermTable::default()),
    }))
  }

  /// Declares a variable of the given sort. Chainable by value; refused once the
  /// ADT has live terms.
  pub fn declare_variable(mut self, name: &str, sort: &str) -> Result<Self, CoreError> {
    let sort = self.0.signature.sort_named(sort)?;
    let name = IString::new(name);
    let adt_name = self.0.name.clone();

    match Rc::get_mut(&mut self.0) {
      None => Err(BadSignature::AdtFrozen { adt: adt_name }.into()),
      Some(data) => {
        if data.variable_index.contains_key(&name) {
          return Err(BadSignature::DuplicateVariable { name }.into());
        }
        let id = VarId(data.variables.len() as u32);
        data.variable_index.insert(name.clone(), id);
        data.variables.push(VariableDecl { name, sort });
        Ok(self)
      }
    }
  }

  /// Builds the application of an operation to the given arguments, verifying
  /// arity, argument sorts and ADT membership. The result is hash-consed.
  pub fn term(&self, op_name: &str, args: &[Term]) -> Result<Term, CoreError> {
    let op_id = self.0.signature.operation_named(op_name)?;
    let operation = self.0.signature.operation(op_id);

    if operation.arity() != args.len() {
      return Err(
        BadTerm::ArityMismatch {
          operation: operation.name.clone(),
          required : operation.arity(),
          found    : args.len(),
        }
        .into(),
      );
    }

    for (position, (arg, &formal)) in args.iter().zip(operation.param_sorts.iter()).enumerate() {
      if !Adt::ptr_eq(arg.adt(), self) {
        return Err(
          BadTerm::CrossAdtSubTerm {
            operation: operation.name.clone(),
            position : position + 1,
          }
          .into(),
        );
      }
      if !self.0.signature.is_subsort_of(arg.sort(), formal) {
        return Err(
          BadTerm::IllSortedArgument {
            operation: operation.name.clone(),
            position : position + 1,
            required : self.0.signature.sort(formal).name.clone(),
            found    : self.0.signature.sort(arg.sort()).name.clone(),
          }
          .into(),
        );
      }
    }

    Ok(Term::make(self, TermNode::Application { op: op_id, args: args.to_vec() }))
  }

  /// Builds a constant: an application with no arguments.
  pub fn constant(&self, op_name: &str) -> Result<Term, CoreError> {
    self.term(op_name, &[])
  }

  /// Builds a variable term referring to a declared variable.
  pub fn variable(&self, name: &str) -> Result<Term, CoreError> {
    let id = self.variable_named(name)?;
    Ok(Term::make(self, TermNode::Variable(id)))
  }

  pub fn variable_named(&self, name: &str) -> Result<VarId, CoreError> {
    let name = IString::new(name);
    self
        .0
        .variable_index
        .get(&name)
        .copied()
        .ok_or_else(|| BadTerm::UnknownVariable { name }.into())
  }

  #[inline(always)]
  pub fn variable_decl(&self, id: VarId) -> &VariableDecl {
    &self.0.variables[id.index()]
  }

  #[inline(always)]
  pub fn signature(&self) -> &Signature {
    &self.0.signature
  }

  #[inline(always)]
  pub fn name(&self) -> &IString {
    &self.0.name
  }

  /// ADT identity is reference identity.
  #[inline(always)]
  pub fn ptr_eq(a: &Adt, b: &Adt) -> bool {
    Rc::ptr_eq(&a.0, &b.0)
  }

  /// A process-unique identifier, used for canonical ordering.
  #[inline(always)]
  pub(crate) fn id(&self) -> usize {
    Rc::as_ptr(&self.0) as usize
  }
}

impl Display for Adt {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0.name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn philosopher_adt() -> Adt {
    let signature = Signature::new()
        .with_sort("ph")
        .and_then(|s| s.with_sort("state"))
        .and_then(|s| s.with_sort("fork"))
        .and_then(|s| s.with_generator("thinking", "state", &[]))
        .and_then(|s| s.with_generator("forkFree", "fork", &[]))
        .and_then(|s| s.with_generator("emptytable", "ph", &[]))
        .and_then(|s| s.with_generator("philo", "ph", &["state", "fork", "ph"]))
        .unwrap();
    Adt::new("philosophers", signature)
        .declare_variable("s", "state")
        .and_then(|adt| adt.declare_variable("f", "fork"))
        .and_then(|adt| adt.declare_variable("p", "ph"))
        .unwrap()
  }

  #[test]
  fn terms_are_hash_consed() {
    let adt = philosopher_adt();
    let a = adt
        .term("philo", &[
          adt.constant("thinking").unwrap(),
          adt.constant("forkFree").unwrap(),
          adt.constant("emptytable").unwrap(),
        ])
        .unwrap();
    let b = adt
        .term("philo", &[
          adt.constant("thinking").unwrap(),
          adt.constant("forkFree").unwrap(),
          adt.constant("emptytable").unwrap(),
        ])
        .unwrap();

    assert_eq!(a, b);
    assert!(Rc::ptr_eq(&a.0, &b.0));
    assert!(a.is_ground());
    assert_eq!(a.to_string(), "philo(thinking, forkFree, emptytable)");
  }

  #[test]
  fn open_terms_are_not_ground() {
    let adt = philosopher_adt();
    let pattern = adt
        .term("philo", &[
          adt.variable("s").unwrap(),
          adt.variable("f").unwrap(),
          adt.variable("p").unwrap(),
        ])
        .unwrap();
    assert!(!pattern.is_ground());
  }

  #[test]
  fn arity_is_checked() {
    let adt = philosopher_adt();
    let result = adt.term("philo", &[adt.constant("thinking").unwrap()]);
    assert!(matches!(
      result,
      Err(CoreError::BadTerm(BadTerm::ArityMismatch { required: 3, found: 1, .. }))
    ));
  }

  #[test]
  fn argument_sorts_are_checked() {
    let adt = philosopher_adt();
    let result = adt.term("philo", &[
      adt.constant("forkFree").unwrap(), // a fork where a state is required
      adt.constant("forkFree").unwrap(),
      adt.constant("emptytable").unwrap(),
    ]);
    assert!(matches!(
      result,
      Err(CoreError::BadTerm(BadTerm::IllSortedArgument { position: 1, .. }))
    ));
  }

  #[test]
  fn cross_adt_subterms_are_refused() {
    let adt1 = philosopher_adt();
    let adt2 = philosopher_adt();
    let foreign = adt2.constant("thinking").unwrap();
    let result = adt1.term("philo", &[
      foreign,
      adt1.constant("forkFree").unwrap(),
      adt1.constant("emptytable").unwrap(),
    ]);
    assert!(matches!(
      result,
      Err(CoreError::BadTerm(BadTerm::CrossAdtSubTerm { position: 1, .. }))
    ));
  }

  #[test]
  fn adt_freezes_once_terms_exist() {
    let adt = philosopher_adt();
    let _term = adt.constant("thinking").unwrap();
    let result = adt.declare_variable("q", "ph");
    assert!(matches!(
      result,
      Err(CoreError::BadSignature(BadSignature::AdtFrozen { .. }))
    ));
  }
}
