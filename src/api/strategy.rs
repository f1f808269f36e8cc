/*!

The strategy algebra: a closed variant type of rewriting strategies in the
ELAN/Stratego tradition, plus named strategy declarations.

Printing is canonical and stable; linker diagnostics quote it. Equality is
structural, except for strategy variables, which compare by *referential identity*:
cloning a [`StrategyVariable`] yields the same variable, while two calls to
[`StrategyVariable::new`] yield different variables even under the same name. The
linker leans on this to tell a formal parameter from a same-named stranger.

`Try` and `Repeat` are surface forms: `Try(s)` evaluates as `Choice(s, Identity)`,
and `Repeat` is the library-supplied declaration
`repeat(S) { Try(Sequence(S, repeat(S))) }` (see [`DeclaredStrategy::repeat`]) —
cyclic only through the name table, so the AST stays a finite tree.

*/

use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

use enumflags2::{bitflags, BitFlags};

use crate::{
  abstractions::{join_string, IString},
  api::adt::Adt,
  core::term::Term,
};

/// A strategy variable: the formal parameter of a declared strategy. Identity is
/// reference identity, not name equality.
#[derive(Clone)]
pub struct StrategyVariable(Rc<StrategyVariableData>);

struct StrategyVariableData {
  name: IString,
}

impl StrategyVariable {
  pub fn new(name: &str) -> Self {
    StrategyVariable(Rc::new(StrategyVariableData { name: IString::new(name) }))
  }

  #[inline(always)]
  pub fn name(&self) -> &IString {
    &self.0.name
  }

  /// Are the two handles the *same* variable?
  #[inline(always)]
  pub fn same(a: &StrategyVariable, b: &StrategyVariable) -> bool {
    Rc::ptr_eq(&a.0, &b.0)
  }
}

impl PartialEq for StrategyVariable {
  fn eq(&self, other: &Self) -> bool {
    StrategyVariable::same(self, other)
  }
}

impl Eq for StrategyVariable {}

impl Display for StrategyVariable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0.name)
  }
}

impl Debug for StrategyVariable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0.name)
  }
}

/// One rewrite rule: a left-hand pattern and a right-hand pattern over the same
/// ADT.
#[derive(Clone, PartialEq, Eq)]
pub struct RewriteRule {
  pub lhs: Term,
  pub rhs: Term,
}

impl RewriteRule {
  pub fn new(lhs: Term, rhs: Term) -> RewriteRule {
    assert!(
      Adt::ptr_eq(lhs.adt(), rhs.adt()),
      "both sides of a rewrite rule must belong to the same ADT"
    );
    RewriteRule { lhs, rhs }
  }
}

impl Display for RewriteRule {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} => {}", self.lhs, self.rhs)
  }
}

impl Debug for RewriteRule {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    Display::fmt(self, f)
  }
}

/// The child position a [`Strategy::One`] descends into: any one-based position
/// up to the subject term's arity. An omitted index in the surface syntax means
/// the first child.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ChildIndex(usize);

impl ChildIndex {
  pub fn new(position: usize) -> ChildIndex {
    assert!(position >= 1, "child positions are one-based");
    ChildIndex(position)
  }

  /// The one-based position.
  #[inline(always)]
  pub fn position(self) -> usize {
    self.0
  }
}

impl Default for ChildIndex {
  fn default() -> Self {
    ChildIndex(1)
  }
}

impl Display for ChildIndex {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Clone, PartialEq)]
pub enum Strategy {
  /// Never applies.
  Fail,
  /// Applies to every term, unchanged.
  Identity,
  /// An ordered, non-empty rule list; the first applicable rule wins.
  Simple(Vec<RewriteRule>),
  /// The second strategy is evaluated only when the first fails.
  Choice(Box<Strategy>, Box<Strategy>),
  /// The second strategy is evaluated on the first's result.
  Sequence(Box<Strategy>, Box<Strategy>),
  /// Both strategies on the same input; the results are joined in the lattice.
  Union(Box<Strategy>, Box<Strategy>),
  /// Condition, then-branch, else-branch. Both branches see the original input.
  IfThenElse(Box<Strategy>, Box<Strategy>, Box<Strategy>),
  /// Applies the strategy to one child and re-plugs the result.
  One(Box<Strategy>, ChildIndex),
  /// Inverts success and failure; restricted by the linker.
  Not(Box<Strategy>),
  /// `Try(s)` = `Choice(s, Identity)`: applies `s` where it can.
  Try(Box<Strategy>),
  /// Iterates until failure or a fixed point.
  FixPoint(Box<Strategy>),
  /// `FixPoint` at a structural level of the state representation. The level is
  /// a backend optimisation hint; flat-set semantics coincide with `FixPoint`.
  Saturation(Box<Strategy>, usize),
  /// A reference to a formal parameter of the enclosing declaration.
  Variable(StrategyVariable),
  /// An instance of a declared strategy, with actual parameters.
  Instance(IString, Vec<Strategy>),
}

impl Strategy {
  /// A `SimpleStrategy` over an ordered, non-empty rule list.
  pub fn simple(rules: Vec<RewriteRule>) -> Strategy {
    assert!(!rules.is_empty(), "a SimpleStrategy needs at least one rule");
    Strategy::Simple(rules)
  }

  /// A `SimpleStrategy` with a single rule.
  pub fn rule(lhs: Term, rhs: Term) -> Strategy {
    Strategy::Simple(vec![RewriteRule::new(lhs, rhs)])
  }

  pub fn choice(first: Strategy, second: Strategy) -> Strategy {
    Strategy::Choice(Box::new(first), Box::new(second))
  }

  pub fn sequence(first: Strategy, second: Strategy) -> Strategy {
    Strategy::Sequence(Box::new(first), Box::new(second))
  }

  pub fn union(first: Strategy, second: Strategy) -> Strategy {
    Strategy::Union(Box::new(first), Box::new(second))
  }

  pub fn if_then_else(condition: Strategy, then_branch: Strategy, else_branch: Strategy) -> Strategy {
    Strategy::IfThenElse(Box::new(condition), Box::new(then_branch), Box::new(else_branch))
  }

  /// `One` descending into the first child.
  pub fn one(inner: Strategy) -> Strategy {
    Strategy::One(Box::new(inner), ChildIndex::default())
  }

  /// `One` descending into the child at a one-based position.
  pub fn one_at(inner: Strategy, child: ChildIndex) -> Strategy {
    Strategy::One(Box::new(inner), child)
  }

  pub fn not(inner: Strategy) -> Strategy {
    Strategy::Not(Box::new(inner))
  }

  pub fn try_(inner: Strategy) -> Strategy {
    Strategy::Try(Box::new(inner))
  }

  pub fn fix_point(inner: Strategy) -> Strategy {
    Strategy::FixPoint(Box::new(inner))
  }

  pub fn saturation(inner: Strategy, level: usize) -> Strategy {
    Strategy::Saturation(Box::new(inner), level)
  }

  pub fn variable(v: &StrategyVariable) -> Strategy {
    Strategy::Variable(v.clone())
  }

  /// An instance of the declared strategy `name`.
  pub fn instance(name: &str, actuals: Vec<Strategy>) -> Strategy {
    Strategy::Instance(IString::new(name), actuals)
  }

  pub fn is_variable(&self) -> bool {
    matches!(self, Strategy::Variable(_))
  }
}

impl Display for Strategy {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Strategy::Fail => write!(f, "Fail"),
      Strategy::Identity => write!(f, "Identity"),
      Strategy::Simple(rules) => {
        write!(f, "SimpleStrategy[{}]", join_string(rules.iter(), ", "))
      }
      Strategy::Choice(a, b) => write!(f, "Choice({}, {})", a, b),
      Strategy::Sequence(a, b) => write!(f, "Sequence({}, {})", a, b),
      Strategy::Union(a, b) => write!(f, "Union({}, {})", a, b),
      Strategy::IfThenElse(c, t, e) => write!(f, "IfThenElse({}, {}, {})", c, t, e),
      Strategy::One(s, child) => write!(f, "One({}, {})", s, child),
      Strategy::Not(s) => write!(f, "Not({})", s),
      Strategy::Try(s) => write!(f, "Try({})", s),
      Strategy::FixPoint(s) => write!(f, "FixPointStrategy({})", s),
      Strategy::Saturation(s, level) => write!(f, "Saturation({}, {})", s, level),
      Strategy::Variable(v) => write!(f, "{}", v),
      Strategy::Instance(name, actuals) => {
        write!(f, "{}({})", name, join_string(actuals.iter(), ", "))
      }
    }
  }
}

impl Debug for Strategy {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    Display::fmt(self, f)
  }
}

#[bitflags]
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum StrategyAttribute {
  /// The declaration is a top-level transition relation, as opposed to an
  /// auxiliary strategy.
  Transition,
}

pub type StrategyAttributes = BitFlags<StrategyAttribute>;

/// A named strategy declaration: a label, an ordered list of formal
/// strategy-variable parameters, and a body. The body may reference a strategy
/// variable only if it is one of the formals — the *same* variable, not a
/// same-named one; the linker enforces this.
#[derive(Clone)]
pub struct DeclaredStrategy {
  pub name      : IString,
  pub formals   : Vec<StrategyVariable>,
  pub body      : Strategy,
  pub attributes: StrategyAttributes,
}

impl DeclaredStrategy {
  pub fn new(name: &str, formals: Vec<StrategyVariable>, body: Strategy, is_transition: bool) -> DeclaredStrategy {
    let attributes = if is_transition {
      StrategyAttribute::Transition.into()
    } else {
      StrategyAttributes::empty()
    };
    DeclaredStrategy {
      name: IString::new(name),
      formals,
      body,
      attributes,
    }
  }

  #[inline(always)]
  pub fn is_transition(&self) -> bool {
    self.attributes.contains(StrategyAttribute::Transition)
  }

  pub fn arity(&self) -> usize {
    self.formals.len()
  }

  /// The library-supplied `repeat` declaration:
  /// `repeat(S) { Try(Sequence(S, repeat(S))) }`.
  pub fn repeat() -> DeclaredStrategy {
    let s = StrategyVariable::new("S");
    let body = Strategy::try_(Strategy::sequence(
      Strategy::variable(&s),
      Strategy::instance("repeat", vec![Strategy::variable(&s)]),
    ));
    DeclaredStrategy::new("repeat", vec![s], body, false)
  }
}

impl Display for DeclaredStrategy {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}({}) {{ {} }}", self.name, join_string(self.formals.iter(), ", "), self.body)?;
    if !self.attributes.is_empty() {
      write!(f, " [{}]", join_string(self.attributes.iter().map(|a| format!("{:?}", a)), ", "))?;
    }
    Ok(())
  }
}
