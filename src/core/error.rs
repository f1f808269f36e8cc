/*!

Error values for the whole crate.

Construction errors (`BadSignature`, `BadTerm`, `BadTransitionSystem`) are raised
immediately by the operation that detects them. Linker diagnostics accumulate and
come back together inside one `BadTransitionSystem`. A strategy that does not apply
is *not* an error: failure is an ordinary evaluation outcome
([`Applied::Fail`](crate::api::Applied)) and never appears here.

The `Display` text of each [`LinkerError`] has a stable prefix; client tests match
on it.

*/

use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

use crate::abstractions::IString;

#[derive(Clone, PartialEq, Eq)]
pub enum CoreError {
  BadSignature(BadSignature),
  BadTerm(BadTerm),
  BadTransitionSystem(BadTransitionSystem),
  Rewrite(RewriteFault),
  /// Cooperative cancellation was observed between fixed-point iterations.
  Cancelled,
}

impl Display for CoreError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      CoreError::BadSignature(e) => write!(f, "bad signature: {}", e),
      CoreError::BadTerm(e) => write!(f, "bad term: {}", e),
      CoreError::BadTransitionSystem(e) => write!(f, "bad transition system: {}", e),
      CoreError::Rewrite(e) => write!(f, "rewrite fault: {}", e),
      CoreError::Cancelled => write!(f, "evaluation was cancelled"),
    }
  }
}

impl Debug for CoreError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    Display::fmt(self, f)
  }
}

impl Error for CoreError {}

impl From<BadSignature> for CoreError {
  fn from(e: BadSignature) -> Self {
    CoreError::BadSignature(e)
  }
}

impl From<BadTerm> for CoreError {
  fn from(e: BadTerm) -> Self {
    CoreError::BadTerm(e)
  }
}

impl From<BadTransitionSystem> for CoreError {
  fn from(e: BadTransitionSystem) -> Self {
    CoreError::BadTransitionSystem(e)
  }
}

impl From<RewriteFault> for CoreError {
  fn from(e: RewriteFault) -> Self {
    CoreError::Rewrite(e)
  }
}

/// A signature or ADT construction step was refused. The builder state before the
/// refused step is unchanged.
#[derive(Clone, PartialEq, Eq)]
pub enum BadSignature {
  DuplicateSort { name: IString },
  DuplicateOperation { name: IString },
  UnknownSort { name: IString },
  UnknownOperation { name: IString },
  SubSortCycle { subsort: IString, supersort: IString },
  DuplicateVariable { name: IString },
  /// The ADT already has live terms; its declarations can no longer change.
  AdtFrozen { adt: IString },
}

impl Display for BadSignature {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      BadSignature::DuplicateSort { name } => {
        write!(f, "sort {} is already declared", name)
      }
      BadSignature::DuplicateOperation { name } => {
        write!(f, "operation {} is already declared", name)
      }
      BadSignature::UnknownSort { name } => {
        write!(f, "sort {} is not declared", name)
      }
      BadSignature::UnknownOperation { name } => {
        write!(f, "operation {} is not declared", name)
      }
      BadSignature::SubSortCycle { subsort, supersort } => {
        write!(
          f,
          "declaring {} as a subsort of {} would introduce a cycle in the sort graph",
          subsort, supersort
        )
      }
      BadSignature::DuplicateVariable { name } => {
        write!(f, "variable {} is already declared", name)
      }
      BadSignature::AdtFrozen { adt } => {
        write!(f, "ADT {} already has terms and can no longer be extended", adt)
      }
    }
  }
}

impl Debug for BadSignature {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    Display::fmt(self, f)
  }
}

impl Error for BadSignature {}

/// A term construction or substitution step was refused.
#[derive(Clone, PartialEq, Eq)]
pub enum BadTerm {
  ArityMismatch {
    operation: IString,
    required : usize,
    found    : usize,
  },
  IllSortedArgument {
    operation: IString,
    position : usize,
    required : IString,
    found    : IString,
  },
  CrossAdtSubTerm {
    operation: IString,
    position : usize,
  },
  UnknownVariable { name: IString },
  /// A pattern variable had no binding while a substitution was applied.
  UnboundVariable { name: IString },
}

impl Display for BadTerm {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      BadTerm::ArityMismatch { operation, required, found } => {
        write!(
          f,
          "operation {} takes {} argument(s), found {}",
          operation, required, found
        )
      }
      BadTerm::IllSortedArgument { operation, position, required, found } => {
        write!(
          f,
          "argument {} of operation {} must be a subsort of {}, found {}",
          position, operation, required, found
        )
      }
      BadTerm::CrossAdtSubTerm { operation, position } => {
        write!(
          f,
          "argument {} of operation {} belongs to a different ADT",
          position, operation
        )
      }
      BadTerm::UnknownVariable { name } => {
        write!(f, "variable {} is not declared in this ADT", name)
      }
      BadTerm::UnboundVariable { name } => {
        write!(f, "variable {} is not bound by the substitution", name)
      }
    }
  }
}

impl Debug for BadTerm {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    Display::fmt(self, f)
  }
}

impl Error for BadTerm {}

/// Assembly of a transition system was refused, either eagerly (duplicate strategy
/// name, foreign or open initial term) or by the linker (collected diagnostics).
#[derive(Clone, PartialEq, Eq)]
pub enum BadTransitionSystem {
  DuplicateStrategy { name: IString },
  ForeignInitialTerm { system_adt: IString, term_adt: IString },
  OpenInitialTerm,
  VariableStrategyBody { name: IString },
  Linker { errors: Vec<LinkerError> },
}

impl Display for BadTransitionSystem {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      BadTransitionSystem::DuplicateStrategy { name } => {
        write!(f, "strategy {} is already declared", name)
      }
      BadTransitionSystem::ForeignInitialTerm { system_adt, term_adt } => {
        write!(
          f,
          "initial term belongs to ADT {} but the transition system is over ADT {}",
          term_adt, system_adt
        )
      }
      BadTransitionSystem::OpenInitialTerm => {
        write!(f, "initial term contains variables")
      }
      BadTransitionSystem::VariableStrategyBody { name } => {
        write!(f, "the body of declared strategy {} may not be a bare strategy variable", name)
      }
      BadTransitionSystem::Linker { errors } => {
        writeln!(f, "{} linker error(s):", errors.len())?;
        for error in errors {
          writeln!(f, "  {}", error)?;
        }
        Ok(())
      }
    }
  }
}

impl Debug for BadTransitionSystem {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    Display::fmt(self, f)
  }
}

impl Error for BadTransitionSystem {}

/// A single linker diagnostic. The message prefixes are stable.
#[derive(Clone, PartialEq, Eq)]
pub enum LinkerError {
  /// A `DeclaredStrategyInstance` refers to a name with no declaration.
  InvalidStrategyReference {
    used       : IString,
    declaration: IString,
  },
  /// An instance supplies the wrong number of actual parameters.
  InvalidParameterCount {
    strategy: IString,
    required: usize,
    found   : usize,
  },
  /// A strategy variable in a body is not one of the declaration's formals.
  UnknownStrategyVariable { variable: IString },
  /// A strategy of an inadmissible form appears under `Not`.
  IllegalUnderNot { found: String },
  /// A declared strategy with parameters appears under `Not`.
  ParameterizedUnderNot { strategy: IString },
}

impl Display for LinkerError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      LinkerError::InvalidStrategyReference { used, declaration } => {
        write!(f, "Usage of invalid strategy {} in declared strategy {}", used, declaration)
      }
      LinkerError::InvalidParameterCount { strategy, required, found } => {
        write!(
          f,
          "Invalid number of parameters for strategy {}. Required Set{{{}}}, found Set{{{}}}",
          strategy, required, found
        )
      }
      LinkerError::UnknownStrategyVariable { variable } => {
        write!(
          f,
          "Strategy variable name '{}' is not in declaration. If you wanted to use a declared \
           strategy you need to append parentheses to it, like this: {}()",
          variable, variable
        )
      }
      LinkerError::IllegalUnderNot { found } => {
        write!(
          f,
          "Strategy Not only accepts SimpleStrategy and Not strategies as parameters. Found {}",
          found
        )
      }
      LinkerError::ParameterizedUnderNot { strategy } => {
        write!(
          f,
          "Strategy Not only accepts SimpleStrategy and Not strategies as parameters. Found \
           declared strategy {} which takes parameters",
          strategy
        )
      }
    }
  }
}

impl Debug for LinkerError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    Display::fmt(self, f)
  }
}

impl Error for LinkerError {}

/// An evaluation-time fault. These indicate an unlinked or mis-assembled system;
/// on a system that passed [`link`](crate::api::TransitionSystem::link) they do
/// not occur.
#[derive(Clone, PartialEq, Eq)]
pub enum RewriteFault {
  UnknownStrategy { name: IString },
  UnboundStrategyVariable { name: IString },
  RootStrategyHasParameters { name: IString, required: usize },
  ParameterCountMismatch { name: IString, required: usize, found: usize },
}

impl Display for RewriteFault {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      RewriteFault::UnknownStrategy { name } => {
        write!(f, "strategy {} is not declared in this transition system", name)
      }
      RewriteFault::UnboundStrategyVariable { name } => {
        write!(f, "strategy variable {} reached the rewriter without a binding", name)
      }
      RewriteFault::RootStrategyHasParameters { name, required } => {
        write!(
          f,
          "strategy {} takes {} parameter(s) and cannot be evaluated as a root strategy",
          name, required
        )
      }
      RewriteFault::ParameterCountMismatch { name, required, found } => {
        write!(
          f,
          "strategy {} takes {} parameter(s), found {}; the system was not linked",
          name, required, found
        )
      }
    }
  }
}

impl Debug for RewriteFault {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    Display::fmt(self, f)
  }
}

impl Error for RewriteFault {}
