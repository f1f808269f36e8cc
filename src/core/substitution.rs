/*!

Matching a pattern against a ground term, and applying the resulting substitution.

A `Substitution` is a finite map from variable declarations to ground terms. It is
well-sorted by construction: a binding is only admitted when the bound term's sort
is a subsort of the variable's declared sort.

*/

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use crate::{
  abstractions::join_string,
  api::adt::{Adt, VarId},
  core::{
    error::{BadTerm, CoreError},
    term::{Term, TermNode}
  },
};

#[derive(Clone, Default)]
pub struct Substitution {
  bindings: HashMap<VarId, Term>,
}

impl Substitution {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_empty(&self) -> bool {
    self.bindings.is_empty()
  }

  pub fn len(&self) -> usize {
    self.bindings.len()
  }

  pub fn get(&self, v: VarId) -> Option<&Term> {
    self.bindings.get(&v)
  }

  /// Applies the substitution to a pattern, bottom-up. Applying to a ground term
  /// is the identity; a pattern variable without a binding is an error.
  pub fn apply(&self, pattern: &Term) -> Result<Term, CoreError> {
    if pattern.is_ground() {
      return Ok(pattern.clone());
    }
    match pattern.node() {
      TermNode::Variable(v) => match self.bindings.get(v) {
        Some(bound) => Ok(bound.clone()),
        None => Err(
          BadTerm::UnboundVariable {
            name: pattern.adt().variable_decl(*v).name.clone(),
          }
          .into(),
        ),
      },
      TermNode::Application { args, .. } => {
        let mut new_args = Vec::with_capacity(args.len());
        for arg in args {
          new_args.push(self.apply(arg)?);
        }
        // Bindings are well-sorted, so the rebuilt application is too; re-cons
        // the spine directly.
        let mut rebuilt = pattern.clone();
        for (index, new_arg) in new_args.into_iter().enumerate() {
          if rebuilt.args()[index] != new_arg {
            rebuilt = rebuilt.with_child(index, new_arg);
          }
        }
        Ok(rebuilt)
      }
    }
  }
}

impl Debug for Substitution {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let mut entries: Vec<_> = self.bindings.iter().collect();
    entries.sort_by_key(|(v, _)| **v);
    let rendered = entries
        .iter()
        .map(|(v, t)| format!("{} -> {}", t.adt().variable_decl(**v).name, t));
    write!(f, "{{{}}}", join_string(rendered, ", "))
  }
}

/// Matches `pattern` against the ground term `subject`. Returns the substitution
/// under which the pattern equals the subject, or `None` when they do not unify.
/// A variable that is already bound must meet the same term again (by identity,
/// which hash-consing makes exact).
pub fn match_pattern(pattern: &Term, subject: &Term) -> Option<Substitution> {
  debug_assert!(subject.is_ground(), "match subject must be ground");
  if !Adt::ptr_eq(pattern.adt(), subject.adt()) {
    return None;
  }
  let mut substitution = Substitution::new();
  if match_into(pattern, subject, &mut substitution) {
    Some(substitution)
  } else {
    None
  }
}

fn match_into(pattern: &Term, subject: &Term, substitution: &mut Substitution) -> bool {
  match pattern.node() {
    TermNode::Variable(v) => {
      let decl = pattern.adt().variable_decl(*v);
      if !pattern.adt().signature().is_subsort_of(subject.sort(), decl.sort) {
        return false;
      }
      match substitution.bindings.get(v) {
        Some(bound) => bound == subject,
        None => {
          substitution.bindings.insert(*v, subject.clone());
          true
        }
      }
    }
    TermNode::Application { op, args } => match subject.node() {
      TermNode::Application { op: subject_op, args: subject_args } if op == subject_op => args
          .iter()
          .zip(subject_args.iter())
          .all(|(p, s)| match_into(p, s, substitution)),
      _ => false,
    },
  }
}
