/*!

A `TransitionSystem` owns everything a model-checking run needs: the ADT its
states are terms of, the initial ground state, the ordered table of named
strategy declarations, and the universe in which state sets are hash-consed.

Checking is split in two, deliberately: structural violations (duplicate strategy
name, an initial term from a foreign ADT or containing variables, a bare-variable
body) are refused eagerly at construction, while the reference/arity/variable/
`Not` diagnostics of the linker run only when [`link`](TransitionSystem::link) or
[`diagnose`](TransitionSystem::diagnose) is invoked.

*/

use indexmap::IndexMap;

use crate::{
  abstractions::IString,
  api::{
    adt::Adt,
    strategy::{DeclaredStrategy, Strategy, StrategyVariable}
  },
  core::{
    error::{BadTransitionSystem, CoreError, LinkerError},
    lattice::{fix, LatticeElement, StateSet, Universe},
    linker,
    rewriter::{Applied, RewriteSettings, Rewriter},
    term::Term
  },
  info,
};

pub struct TransitionSystem {
  adt         : Adt,
  initial     : Term,
  declarations: IndexMap<IString, DeclaredStrategy>,
  universe    : Universe,
}

impl TransitionSystem {
  /// Creates a transition system over `adt` with the given initial state. The
  /// initial term must belong to `adt` and be ground.
  pub fn new(adt: Adt, initial: Term) -> Result<Self, CoreError> {
    if !Adt::ptr_eq(initial.adt(), &adt) {
      return Err(
        BadTransitionSystem::ForeignInitialTerm {
          system_adt: adt.name().clone(),
          term_adt  : initial.adt().name().clone(),
        }
        .into(),
      );
    }
    if !initial.is_ground() {
      return Err(BadTransitionSystem::OpenInitialTerm.into());
    }
    Ok(TransitionSystem {
      adt,
      initial,
      declarations: IndexMap::new(),
      universe    : Universe::new(),
    })
  }

  /// Adds a named strategy declaration. Re-declaring a name is refused
  /// immediately, as is a body consisting of a bare strategy variable.
  pub fn declare_strategy(&mut self, declaration: DeclaredStrategy) -> Result<&mut Self, CoreError> {
    if self.declarations.contains_key(&declaration.name) {
      return Err(BadTransitionSystem::DuplicateStrategy { name: declaration.name }.into());
    }
    if declaration.body.is_variable() {
      return Err(BadTransitionSystem::VariableStrategyBody { name: declaration.name }.into());
    }
    self.declarations.insert(declaration.name.clone(), declaration);
    Ok(self)
  }

  /// Convenience form of [`declare_strategy`](Self::declare_strategy).
  pub fn declare(
    &mut self,
    name         : &str,
    formals      : Vec<StrategyVariable>,
    body         : Strategy,
    is_transition: bool,
  ) -> Result<&mut Self, CoreError> {
    self.declare_strategy(DeclaredStrategy::new(name, formals, body, is_transition))
  }

  // region Accessors

  pub fn adt(&self) -> &Adt {
    &self.adt
  }

  pub fn initial_state(&self) -> &Term {
    &self.initial
  }

  pub fn declaration(&self, name: &str) -> Option<&DeclaredStrategy> {
    self.declarations.get(&IString::new(name))
  }

  /// The declarations in declaration order.
  pub fn declarations(&self) -> impl Iterator<Item = &DeclaredStrategy> {
    self.declarations.values()
  }

  /// The hash-consing scope for this system's state sets.
  pub fn universe(&self) -> &Universe {
    &self.universe
  }

  // endregion

  // region Analysis

  /// Runs the linker; the collected diagnostics, possibly none.
  pub fn diagnose(&self) -> Vec<LinkerError> {
    linker::diagnose(&self.declarations)
  }

  /// Runs the linker and fails when it finds anything.
  pub fn link(&self) -> Result<(), CoreError> {
    let errors = self.diagnose();
    if errors.is_empty() {
      Ok(())
    } else {
      Err(BadTransitionSystem::Linker { errors }.into())
    }
  }

  /// Applies a declared, parameterless strategy to a term. `None` when the
  /// strategy fails. A strategy with several outcomes yields the canonical least
  /// one; [`rewrite_states`](Self::rewrite_states) is the lossless form.
  pub fn rewrite(&self, strategy: &str, term: &Term) -> Result<Option<Term>, CoreError> {
    Ok(
      self
          .rewrite_states(strategy, term)?
          .and_then(|states| states.terms().first().cloned()),
    )
  }

  /// Applies a declared, parameterless strategy to a term, producing the full
  /// result set. `None` when the strategy fails.
  pub fn rewrite_states(&self, strategy: &str, term: &Term) -> Result<Option<StateSet>, CoreError> {
    let mut rewriter = Rewriter::new(self);
    Ok(rewriter.apply_named(strategy, term)?.ok())
  }

  /// Computes the reachable state space: the least fixed point of the initial
  /// state under all `Transition`-flagged declarations.
  pub fn reachable(&self) -> Result<StateSet, CoreError> {
    self.reachable_with(&RewriteSettings::default())
  }

  /// [`reachable`](Self::reachable) with an explicit cancellation token and
  /// progress settings.
  pub fn reachable_with(&self, settings: &RewriteSettings) -> Result<StateSet, CoreError> {
    let transitions: Vec<IString> = self
        .declarations
        .values()
        .filter(|declaration| declaration.is_transition())
        .map(|declaration| declaration.name.clone())
        .collect();
    info!(1; "computing reachability over {} transition strategy(ies)", transitions.len());

    let initial = self.universe.singleton(self.initial.clone());
    let mut rewriter = Rewriter::with_settings(self, settings.clone());

    fix(
      |states| {
        let mut image = self.universe.bottom();
        for name in &transitions {
          if let Applied::Set(successors) = rewriter.apply_named_to_set(name.as_str(), states)? {
            image = image.union(&successors);
          }
        }
        Ok(image)
      },
      initial,
      &settings.token,
    )
    .inspect(|reachable| {
      crate::debug!(3; "reachability done: {} state(s), {} live set(s) in the universe",
        reachable.len(), self.universe.live_count());
    })
  }

  // endregion
}
