/*!

Static checks over the strategy declarations of a transition system.

The linker walks every declaration body and validates:

 1. every `DeclaredStrategyInstance` resolves to a declaration;
 2. the actual parameter count matches the resolved declaration;
 3. every strategy variable is one of the enclosing declaration's formals,
    by referential identity;
 4. only `SimpleStrategy`, nested `Not`, strategy variables, and zero-argument
    instances whose (transitive) bodies obey the same restriction appear under
    `Not`.

Errors accumulate; the caller receives all of them at once. The walk order is
declaration order, then depth-first through each body, so repeated runs produce
byte-identical error lists.

*/

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::{
  abstractions::IString,
  api::strategy::{DeclaredStrategy, Strategy, StrategyVariable},
  core::error::LinkerError,
  warning,
};

pub(crate) fn diagnose(declarations: &IndexMap<IString, DeclaredStrategy>) -> Vec<LinkerError> {
  let mut errors = Vec::new();
  for declaration in declarations.values() {
    check(&declaration.body, declaration, declarations, &mut errors);
  }
  for error in errors.iter() {
    warning!(1; "linker: {}", error);
  }
  errors
}

fn check(
  strategy    : &Strategy,
  declaration : &DeclaredStrategy,
  declarations: &IndexMap<IString, DeclaredStrategy>,
  errors      : &mut Vec<LinkerError>,
) {
  match strategy {
    Strategy::Fail | Strategy::Identity | Strategy::Simple(_) => {}

    Strategy::Choice(a, b) | Strategy::Sequence(a, b) | Strategy::Union(a, b) => {
      check(a, declaration, declarations, errors);
      check(b, declaration, declarations, errors);
    }

    Strategy::IfThenElse(c, t, e) => {
      check(c, declaration, declarations, errors);
      check(t, declaration, declarations, errors);
      check(e, declaration, declarations, errors);
    }

    Strategy::One(inner, _)
    | Strategy::Try(inner)
    | Strategy::FixPoint(inner)
    | Strategy::Saturation(inner, _) => {
      check(inner, declaration, declarations, errors);
    }

    Strategy::Not(inner) => {
      check_not_operand(inner, declarations, errors);
      check(inner, declaration, declarations, errors);
    }

    Strategy::Variable(v) => {
      if !is_formal(v, declaration) {
        errors.push(LinkerError::UnknownStrategyVariable { variable: v.name().clone() });
      }
    }

    Strategy::Instance(name, actuals) => {
      match declarations.get(name) {
        None => {
          errors.push(LinkerError::InvalidStrategyReference {
            used       : name.clone(),
            declaration: declaration.name.clone(),
          });
        }
        Some(target) => {
          if target.arity() != actuals.len() {
            errors.push(LinkerError::InvalidParameterCount {
              strategy: name.clone(),
              required: target.arity(),
              found   : actuals.len(),
            });
          }
        }
      }
      for actual in actuals {
        check(actual, declaration, declarations, errors);
      }
    }
  }
}

fn is_formal(v: &StrategyVariable, declaration: &DeclaredStrategy) -> bool {
  declaration.formals.iter().any(|formal| StrategyVariable::same(formal, v))
}

/// The operand of a `Not` must be a `SimpleStrategy`, a nested `Not`, a strategy
/// variable, or a zero-argument instance whose transitive body obeys the same
/// restriction.
fn check_not_operand(
  strategy    : &Strategy,
  declarations: &IndexMap<IString, DeclaredStrategy>,
  errors      : &mut Vec<LinkerError>,
) {
  match strategy {
    Strategy::Simple(_) | Strategy::Variable(_) => {}

    Strategy::Not(inner) => check_not_operand(inner, declarations, errors),

    Strategy::Instance(name, actuals) => {
      if !actuals.is_empty() {
        errors.push(LinkerError::ParameterizedUnderNot { strategy: name.clone() });
        return;
      }
      // Unknown names are reported by the reference check; only a resolved body
      // can violate the restriction. The visited set guards against cyclic
      // declarations such as `repeat`.
      let mut visited = HashSet::new();
      visited.insert(name.clone());
      if let Some(target) = declarations.get(name) {
        if let Some(offender) = find_not_offender(&target.body, declarations, &mut visited) {
          errors.push(offender);
        }
      }
    }

    other => {
      errors.push(LinkerError::IllegalUnderNot { found: other.to_string() });
    }
  }
}

fn find_not_offender(
  strategy    : &Strategy,
  declarations: &IndexMap<IString, DeclaredStrategy>,
  visited     : &mut HashSet<IString>,
) -> Option<LinkerError> {
  match strategy {
    Strategy::Simple(_) | Strategy::Variable(_) => None,

    Strategy::Not(inner) => find_not_offender(inner, declarations, visited),

    Strategy::Instance(name, actuals) => {
      if !actuals.is_empty() {
        return Some(LinkerError::ParameterizedUnderNot { strategy: name.clone() });
      }
      if !visited.insert(name.clone()) {
        return None;
      }
      declarations
          .get(name)
          .and_then(|target| find_not_offender(&target.body, declarations, visited))
    }

    other => Some(LinkerError::IllegalUnderNot { found: other.to_string() }),
  }
}
