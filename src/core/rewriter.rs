/*!

The strategy evaluator.

`apply(s, t)` produces exactly one of `Applied::Set` or `Applied::Fail`; failure
is a value, not an error, and there are no partial effects to roll back. The
evaluator works on state sets throughout — a single term enters as its singleton
lift — so `Union` is the memoised lattice join and `FixPoint` convergence is a
pointer comparison on hash-consed sets.

Declared strategies evaluate under a stack of parameter frames. Actual parameters
are resolved against the *caller's* frame before the callee's frame is pushed, so
every binding on the stack is a closed strategy and a variable lookup never needs
to search past the top frame. Strategy-variable bindings are keyed by referential
identity, matching the linker's notion of a formal.

*/

use crate::{
  api::{
    strategy::{DeclaredStrategy, Strategy, StrategyVariable},
    transition_system::TransitionSystem
  },
  core::{
    error::{CoreError, RewriteFault},
    lattice::{fixpoint::CancellationToken, LatticeElement, StateSet},
    substitution::match_pattern,
    term::Term
  },
  debug,
};

/// Evaluator configuration: the cancellation token observed inside fixed-point
/// loops, and how often a running fixed point logs progress (0 disables).
#[derive(Clone)]
pub struct RewriteSettings {
  pub token            : CancellationToken,
  pub progress_interval: u64,
}

impl Default for RewriteSettings {
  fn default() -> Self {
    RewriteSettings {
      token            : CancellationToken::new(),
      progress_interval: 10_000,
    }
  }
}

/// The outcome of applying a strategy: a non-empty state set, or failure.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Applied {
  Set(StateSet),
  Fail,
}

impl Applied {
  pub fn is_fail(&self) -> bool {
    matches!(self, Applied::Fail)
  }

  pub fn ok(self) -> Option<StateSet> {
    match self {
      Applied::Set(states) => Some(states),
      Applied::Fail => None,
    }
  }
}

struct Frame {
  bindings: Vec<(StrategyVariable, Strategy)>,
}

pub struct Rewriter<'a> {
  system  : &'a TransitionSystem,
  settings: RewriteSettings,
  frames  : Vec<Frame>,
}

impl<'a> Rewriter<'a> {
  pub fn new(system: &'a TransitionSystem) -> Self {
    Self::with_settings(system, RewriteSettings::default())
  }

  pub fn with_settings(system: &'a TransitionSystem, settings: RewriteSettings) -> Self {
    Rewriter {
      system,
      settings,
      frames: Vec::new(),
    }
  }

  /// Applies a declared strategy to a single term (as its singleton lift). The
  /// declaration must take no parameters.
  pub fn apply_named(&mut self, name: &str, term: &Term) -> Result<Applied, CoreError> {
    let states = self.system.universe().singleton(term.clone());
    self.apply_named_to_set(name, &states)
  }

  /// Applies a declared, parameterless strategy to a state set.
  pub fn apply_named_to_set(&mut self, name: &str, states: &StateSet) -> Result<Applied, CoreError> {
    let system = self.system;
    let declaration = system
        .declaration(name)
        .ok_or_else(|| RewriteFault::UnknownStrategy { name: name.into() })?;
    if declaration.arity() != 0 {
      return Err(
        RewriteFault::RootStrategyHasParameters {
          name    : declaration.name.clone(),
          required: declaration.arity(),
        }
        .into(),
      );
    }
    debug!(3; "applying strategy {} to {} state(s)", declaration.name, states.len());
    self.enter(declaration, Vec::new(), states)
  }

  /// Applies a strategy expression to a single term.
  pub fn apply(&mut self, strategy: &Strategy, term: &Term) -> Result<Applied, CoreError> {
    let states = self.system.universe().singleton(term.clone());
    self.eval(strategy, &states)
  }

  /// Applies a strategy expression to a state set.
  pub fn apply_to_set(&mut self, strategy: &Strategy, states: &StateSet) -> Result<Applied, CoreError> {
    self.eval(strategy, states)
  }

  fn eval(&mut self, strategy: &Strategy, states: &StateSet) -> Result<Applied, CoreError> {
    match strategy {
      Strategy::Identity => Ok(Applied::Set(states.clone())),

      Strategy::Fail => Ok(Applied::Fail),

      Strategy::Simple(rules) => {
        let mut rewritten = Vec::new();
        for term in states.terms() {
          // First applicable rule wins, in declaration order.
          for rule in rules {
            if let Some(substitution) = match_pattern(&rule.lhs, term) {
              rewritten.push(substitution.apply(&rule.rhs)?);
              break;
            }
          }
        }
        if rewritten.is_empty() {
          Ok(Applied::Fail)
        } else {
          Ok(Applied::Set(self.system.universe().make(rewritten)))
        }
      }

      Strategy::Choice(first, second) => match self.eval(first, states)? {
        Applied::Set(result) => Ok(Applied::Set(result)),
        Applied::Fail => self.eval(second, states),
      },

      Strategy::Sequence(first, second) => match self.eval(first, states)? {
        Applied::Set(intermediate) => self.eval(second, &intermediate),
        Applied::Fail => Ok(Applied::Fail),
      },

      Strategy::Union(first, second) => {
        let left = self.eval(first, states)?;
        let right = self.eval(second, states)?;
        match (left, right) {
          (Applied::Fail, Applied::Fail) => Ok(Applied::Fail),
          (Applied::Set(result), Applied::Fail) | (Applied::Fail, Applied::Set(result)) => {
            Ok(Applied::Set(result))
          }
          (Applied::Set(a), Applied::Set(b)) => Ok(Applied::Set(a.union(&b))),
        }
      }

      Strategy::IfThenElse(condition, then_branch, else_branch) => {
        // Both branches see the original input, not the condition's result.
        match self.eval(condition, states)? {
          Applied::Set(_) => self.eval(then_branch, states),
          Applied::Fail => self.eval(else_branch, states),
        }
      }

      Strategy::One(inner, child) => {
        let position = child.position();
        let mut results = Vec::new();
        for term in states.terms() {
          if term.arity() < position {
            continue;
          }
          let child_term = self.system.universe().singleton(term.args()[position - 1].clone());
          if let Applied::Set(new_children) = self.eval(inner, &child_term)? {
            for new_child in new_children.terms() {
              results.push(term.with_child(position - 1, new_child.clone()));
            }
          }
        }
        if results.is_empty() {
          Ok(Applied::Fail)
        } else {
          Ok(Applied::Set(self.system.universe().make(results)))
        }
      }

      Strategy::Not(inner) => match self.eval(inner, states)? {
        Applied::Set(_) => Ok(Applied::Fail),
        Applied::Fail => Ok(Applied::Set(states.clone())),
      },

      Strategy::Try(inner) => match self.eval(inner, states)? {
        Applied::Set(result) => Ok(Applied::Set(result)),
        Applied::Fail => Ok(Applied::Set(states.clone())),
      },

      Strategy::FixPoint(inner) => self.eval_fix_point(inner, states),

      // The level targets a structured backend representation; on flat sets the
      // semantics coincide with the fixed point.
      Strategy::Saturation(inner, _level) => self.eval_fix_point(inner, states),

      Strategy::Variable(v) => {
        let bound = self
            .lookup(v)
            .cloned()
            .ok_or_else(|| RewriteFault::UnboundStrategyVariable { name: v.name().clone() })?;
        self.eval(&bound, states)
      }

      Strategy::Instance(name, actuals) => {
        let system = self.system;
        let declaration = system
            .declaration(name)
            .ok_or_else(|| RewriteFault::UnknownStrategy { name: name.clone() })?;
        if declaration.arity() != actuals.len() {
          return Err(
            RewriteFault::ParameterCountMismatch {
              name    : name.clone(),
              required: declaration.arity(),
              found   : actuals.len(),
            }
            .into(),
          );
        }
        let resolved = actuals
            .iter()
            .map(|actual| self.resolve(actual))
            .collect::<Result<Vec<Strategy>, CoreError>>()?;
        self.enter(declaration, resolved, states)
      }
    }
  }

  /// Pushes a parameter frame, evaluates a declaration body, pops.
  fn enter(
    &mut self,
    declaration: &DeclaredStrategy,
    actuals    : Vec<Strategy>,
    states     : &StateSet,
  ) -> Result<Applied, CoreError> {
    let bindings = declaration.formals.iter().cloned().zip(actuals).collect();
    self.frames.push(Frame { bindings });
    let result = self.eval(&declaration.body, states);
    self.frames.pop();
    result
  }

  fn eval_fix_point(&mut self, inner: &Strategy, states: &StateSet) -> Result<Applied, CoreError> {
    let mut current = states.clone();
    let mut iteration: u64 = 0;
    loop {
      if self.settings.token.is_cancelled() {
        return Err(CoreError::Cancelled);
      }
      iteration += 1;
      if self.settings.progress_interval > 0 && iteration % self.settings.progress_interval == 0 {
        crate::info!(2; "fixed point running: iteration {}, {} state(s)", iteration, current.len());
      }

      match self.eval(inner, &current)? {
        // Convergence by failure: the last successful iterate is the result.
        Applied::Fail => return Ok(Applied::Set(current)),
        Applied::Set(next) => {
          if next == current {
            return Ok(Applied::Set(current));
          }
          current = next;
        }
      }
    }
  }

  fn lookup(&self, v: &StrategyVariable) -> Option<&Strategy> {
    self.frames.last().and_then(|frame| {
      frame
          .bindings
          .iter()
          .find(|(formal, _)| StrategyVariable::same(formal, v))
          .map(|(_, strategy)| strategy)
    })
  }

  /// Replaces every strategy variable in an actual parameter with its binding in
  /// the current frame, producing a closed strategy for the callee's frame.
  fn resolve(&self, strategy: &Strategy) -> Result<Strategy, CoreError> {
    Ok(match strategy {
      Strategy::Variable(v) => self
          .lookup(v)
          .cloned()
          .ok_or_else(|| RewriteFault::UnboundStrategyVariable { name: v.name().clone() })?,

      Strategy::Fail | Strategy::Identity | Strategy::Simple(_) => strategy.clone(),

      Strategy::Choice(a, b) => {
        Strategy::choice(self.resolve(a)?, self.resolve(b)?)
      }
      Strategy::Sequence(a, b) => {
        Strategy::sequence(self.resolve(a)?, self.resolve(b)?)
      }
      Strategy::Union(a, b) => {
        Strategy::union(self.resolve(a)?, self.resolve(b)?)
      }
      Strategy::IfThenElse(c, t, e) => {
        Strategy::if_then_else(self.resolve(c)?, self.resolve(t)?, self.resolve(e)?)
      }
      Strategy::One(inner, child) => Strategy::one_at(self.resolve(inner)?, *child),
      Strategy::Not(inner) => Strategy::not(self.resolve(inner)?),
      Strategy::Try(inner) => Strategy::try_(self.resolve(inner)?),
      Strategy::FixPoint(inner) => Strategy::fix_point(self.resolve(inner)?),
      Strategy::Saturation(inner, level) => Strategy::saturation(self.resolve(inner)?, *level),

      Strategy::Instance(name, actuals) => Strategy::Instance(
        name.clone(),
        actuals
            .iter()
            .map(|actual| self.resolve(actual))
            .collect::<Result<Vec<Strategy>, CoreError>>()?,
      ),
    })
  }
}
