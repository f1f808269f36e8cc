/*!

End-to-end scenarios: system construction, linking, rewriting, and reachability,
exercised together the way a client drives them.

*/

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
  api::{
    Adt,
    Applied,
    BadTransitionSystem,
    CancellationToken,
    CoreError,
    DeclaredStrategy,
    LatticeElement,
    RewriteSettings,
    Rewriter,
    Signature,
    StateSet,
    Strategy,
    StrategyVariable,
    TransitionSystem,
    Universe,
  },
};

// region Fixtures

/// The dining-philosophers signature: a philosopher is a state, a fork, and the
/// next philosopher down the table.
fn philosopher_adt() -> Adt {
  let signature = Signature::new()
      .with_sort("ph")
      .and_then(|s| s.with_sort("state"))
      .and_then(|s| s.with_sort("fork"))
      .and_then(|s| s.with_generator("eating", "state", &[]))
      .and_then(|s| s.with_generator("thinking", "state", &[]))
      .and_then(|s| s.with_generator("waiting", "state", &[]))
      .and_then(|s| s.with_generator("waitingForLeftFork", "state", &[]))
      .and_then(|s| s.with_generator("waitingForRightFork", "state", &[]))
      .and_then(|s| s.with_generator("forkUsed", "fork", &[]))
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

/// `philo(state, fork, rest)`.
fn philo(adt: &Adt, state: &str, fork: &str, rest: crate::api::Term) -> crate::api::Term {
  adt
      .term("philo", &[
        adt.constant(state).unwrap(),
        adt.constant(fork).unwrap(),
        rest,
      ])
      .unwrap()
}

/// A rule rewriting a philosopher's own state and fork, leaving the rest alone.
fn own_step(adt: &Adt, from: (&str, &str), to: (&str, &str)) -> Strategy {
  let p = adt.variable("p").unwrap();
  let lhs = adt
      .term("philo", &[adt.constant(from.0).unwrap(), adt.constant(from.1).unwrap(), p.clone()])
      .unwrap();
  let rhs = adt
      .term("philo", &[adt.constant(to.0).unwrap(), adt.constant(to.1).unwrap(), p])
      .unwrap();
  Strategy::rule(lhs, rhs)
}

/// A rule also touching the neighbour's fork.
fn neighbour_step(adt: &Adt, from: (&str, &str), to: (&str, &str)) -> Strategy {
  let s = adt.variable("s").unwrap();
  let f = adt.variable("f").unwrap();
  let p = adt.variable("p").unwrap();
  let lhs = adt
      .term("philo", &[
        adt.constant(from.0).unwrap(),
        f.clone(),
        adt
            .term("philo", &[s.clone(), adt.constant(from.1).unwrap(), p.clone()])
            .unwrap(),
      ])
      .unwrap();
  let rhs = adt
      .term("philo", &[
        adt.constant(to.0).unwrap(),
        f,
        adt.term("philo", &[s, adt.constant(to.1).unwrap(), p]).unwrap(),
      ])
      .unwrap();
  Strategy::rule(lhs, rhs)
}

fn philosopher_system() -> TransitionSystem {
  let adt = philosopher_adt();
  let initial = philo(&adt, "thinking", "forkFree", philo(&adt, "thinking", "forkFree", adt.constant("emptytable").unwrap()));
  let mut system = TransitionSystem::new(adt.clone(), initial).unwrap();

  system
      .declare("goToWaitPhilo", vec![], own_step(&adt, ("thinking", "forkFree"), ("waiting", "forkFree")), true)
      .unwrap();
  system
      .declare(
        "takeRightForkFromWaitingPhilo",
        vec![],
        own_step(&adt, ("waiting", "forkFree"), ("waitingForLeftFork", "forkUsed")),
        true,
      )
      .unwrap();
  system
      .declare(
        "takeLeftForkFromWaitingPhilo",
        vec![],
        neighbour_step(&adt, ("waiting", "forkFree"), ("waitingForRightFork", "forkUsed")),
        true,
      )
      .unwrap();
  system
      .declare(
        "goToEatFromLeftPhilo",
        vec![],
        neighbour_step(&adt, ("waitingForLeftFork", "forkFree"), ("eating", "forkUsed")),
        true,
      )
      .unwrap();
  system
      .declare(
        "goToEatFromRightPhilo",
        vec![],
        own_step(&adt, ("waitingForRightFork", "forkFree"), ("eating", "forkUsed")),
        true,
      )
      .unwrap();
  system
      .declare("goToThinkPhilo", vec![], own_step(&adt, ("eating", "forkUsed"), ("thinking", "forkFree")), true)
      .unwrap();
  system
}

fn counter_adt() -> Adt {
  let signature = Signature::new()
      .with_sort("nat")
      .and_then(|s| s.with_generator("zero", "nat", &[]))
      .and_then(|s| s.with_generator("succ", "nat", &["nat"]))
      .and_then(|s| s.with_generator("pair", "nat", &["nat", "nat"]))
      .unwrap();
  Adt::new("counter", signature)
      .declare_variable("x", "nat")
      .unwrap()
}

fn nat(adt: &Adt, n: usize) -> crate::api::Term {
  let mut term = adt.constant("zero").unwrap();
  for _ in 0..n {
    term = adt.term("succ", &[term]).unwrap();
  }
  term
}

// endregion

// region Construction and linking scenarios

#[test]
fn philosophers_declare_and_link() {
  let system = philosopher_system();
  assert_eq!(system.declarations().count(), 6);
  assert!(system.diagnose().is_empty());
  system.link().unwrap();
}

#[test]
fn undeclared_strategy_is_linked_against() {
  let signature = Signature::new()
      .with_sort("s")
      .and_then(|s| s.with_generator("p0", "s", &[]))
      .unwrap();
  let adt = Adt::new("minimal", signature);
  let initial = adt.constant("p0").unwrap();
  let mut system = TransitionSystem::new(adt, initial).unwrap();

  let s1 = StrategyVariable::new("S1");
  system
      .declare(
        "newStrategy",
        vec![s1.clone()],
        Strategy::instance("try", vec![Strategy::variable(&s1)]),
        false,
      )
      .unwrap();

  let errors = system.diagnose();
  assert!(errors[0]
      .to_string()
      .starts_with("Usage of invalid strategy try in declared strategy newStrategy"));
}

#[test]
fn parameter_count_is_linked_against() {
  let signature = Signature::new()
      .with_sort("s")
      .and_then(|s| s.with_generator("p0", "s", &[]))
      .unwrap();
  let adt = Adt::new("minimal", signature);
  let initial = adt.constant("p0").unwrap();
  let mut system = TransitionSystem::new(adt, initial).unwrap();

  let s1 = StrategyVariable::new("S1");
  let s2 = StrategyVariable::new("S2");
  system
      .declare("try", vec![s1.clone()], Strategy::Identity, false)
      .unwrap();
  system
      .declare(
        "newStrategy",
        vec![s1.clone()],
        Strategy::instance("try", vec![Strategy::variable(&s1), Strategy::variable(&s2)]),
        false,
      )
      .unwrap();

  let errors = system.diagnose();
  assert!(errors[0]
      .to_string()
      .starts_with("Invalid number of parameters for strategy try. Required Set{1}, found Set{2}"));
}

#[test]
fn foreign_strategy_variable_is_linked_against() {
  let signature = Signature::new()
      .with_sort("s")
      .and_then(|s| s.with_generator("p0", "s", &[]))
      .unwrap();
  let adt = Adt::new("minimal", signature);
  let initial = adt.constant("p0").unwrap();
  let mut system = TransitionSystem::new(adt, initial).unwrap();

  let s1 = StrategyVariable::new("S1");
  let s2 = StrategyVariable::new("S2");
  system
      .declare("try", vec![s1.clone()], Strategy::Identity, false)
      .unwrap();
  system
      .declare(
        "newStrategy",
        vec![s1],
        Strategy::instance("try", vec![Strategy::variable(&s2)]),
        false,
      )
      .unwrap();

  let errors = system.diagnose();
  assert!(errors[0].to_string().ends_with(
    "Strategy variable name 'S2' is not in declaration. If you wanted to use a declared strategy \
     you need to append parentheses to it, like this: S2()"
  ));
}

#[test]
fn duplicate_strategy_name_is_refused_eagerly() {
  let mut system = philosopher_system();
  let adt = system.adt().clone();
  let again = own_step(&adt, ("thinking", "forkFree"), ("waiting", "forkFree"));
  let result = system.declare("goToWaitPhilo", vec![], again, true);
  assert!(matches!(
    result,
    Err(CoreError::BadTransitionSystem(BadTransitionSystem::DuplicateStrategy { .. }))
  ));
}

#[test]
fn cross_adt_initial_term_is_refused_eagerly() {
  let make_signature = || {
    Signature::new()
        .with_sort("s")
        .and_then(|s| s.with_generator("p0", "s", &[]))
        .unwrap()
  };
  let adt1 = Adt::new("first", make_signature());
  let adt2 = Adt::new("second", make_signature());

  let result = TransitionSystem::new(adt1, adt2.constant("p0").unwrap());
  assert!(matches!(
    result,
    Err(CoreError::BadTransitionSystem(BadTransitionSystem::ForeignInitialTerm { .. }))
  ));
}

// endregion

// region Evaluator invariants

#[test]
fn identity_and_fail_invariants() {
  let adt = counter_adt();
  let initial = nat(&adt, 0);
  let system = TransitionSystem::new(adt.clone(), initial.clone()).unwrap();
  let mut rewriter = Rewriter::new(&system);

  let two = nat(&adt, 2);
  let singleton = system.universe().singleton(two.clone());
  assert_eq!(
    rewriter.apply(&Strategy::Identity, &two).unwrap(),
    Applied::Set(singleton)
  );
  assert_eq!(rewriter.apply(&Strategy::Fail, &two).unwrap(), Applied::Fail);
}

#[test]
fn try_never_fails() {
  let adt = counter_adt();
  let system = TransitionSystem::new(adt.clone(), nat(&adt, 0)).unwrap();
  let mut rewriter = Rewriter::new(&system);

  let zero = nat(&adt, 0);
  let shrink = Strategy::rule(
    adt.term("succ", &[adt.variable("x").unwrap()]).unwrap(),
    adt.variable("x").unwrap(),
  );

  // The rule fails on zero; Try turns the failure into identity.
  assert!(rewriter.apply(&shrink, &zero).unwrap().is_fail());
  let result = rewriter.apply(&Strategy::try_(shrink), &zero).unwrap();
  assert_eq!(result, Applied::Set(system.universe().singleton(zero)));

  assert!(!rewriter
      .apply(&Strategy::try_(Strategy::Fail), &nat(&adt, 3))
      .unwrap()
      .is_fail());
}

#[test]
fn sequence_with_identity_is_neutral() {
  let adt = counter_adt();
  let system = TransitionSystem::new(adt.clone(), nat(&adt, 0)).unwrap();
  let mut rewriter = Rewriter::new(&system);

  let shrink = Strategy::try_(Strategy::rule(
    adt.term("succ", &[adt.variable("x").unwrap()]).unwrap(),
    adt.variable("x").unwrap(),
  ));
  let term = nat(&adt, 4);

  let plain = rewriter.apply(&shrink, &term).unwrap();
  let pre = rewriter
      .apply(&Strategy::sequence(Strategy::Identity, shrink.clone()), &term)
      .unwrap();
  let post = rewriter
      .apply(&Strategy::sequence(shrink.clone(), Strategy::Identity), &term)
      .unwrap();
  assert_eq!(plain, pre);
  assert_eq!(plain, post);
}

#[test]
fn fix_point_is_idempotent() {
  let adt = counter_adt();
  let system = TransitionSystem::new(adt.clone(), nat(&adt, 0)).unwrap();
  let mut rewriter = Rewriter::new(&system);

  let shrink = Strategy::fix_point(Strategy::rule(
    adt.term("succ", &[adt.variable("x").unwrap()]).unwrap(),
    adt.variable("x").unwrap(),
  ));

  let once = rewriter.apply(&shrink, &nat(&adt, 5)).unwrap().ok().unwrap();
  assert_eq!(once, system.universe().singleton(nat(&adt, 0)));

  let twice = rewriter
      .apply_to_set(&shrink, &once)
      .unwrap()
      .ok()
      .unwrap();
  assert_eq!(once, twice);
}

#[test]
fn saturation_matches_the_fix_point_on_terms() {
  let adt = counter_adt();
  let system = TransitionSystem::new(adt.clone(), nat(&adt, 0)).unwrap();
  let mut rewriter = Rewriter::new(&system);

  let x = adt.variable("x").unwrap();
  let shrink = Strategy::rule(adt.term("succ", &[x.clone()]).unwrap(), x);

  let saturated = rewriter
      .apply(&Strategy::saturation(shrink.clone(), 2), &nat(&adt, 4))
      .unwrap();
  let fixed = rewriter
      .apply(&Strategy::fix_point(shrink), &nat(&adt, 4))
      .unwrap();
  assert_eq!(saturated, fixed);
}

#[test]
fn simple_strategy_takes_the_first_applicable_rule() {
  use crate::api::RewriteRule;

  let adt = counter_adt();
  let system = TransitionSystem::new(adt.clone(), nat(&adt, 0)).unwrap();
  let mut rewriter = Rewriter::new(&system);

  let x = adt.variable("x").unwrap();
  let both_match = Strategy::simple(vec![
    RewriteRule::new(x.clone(), nat(&adt, 0)),
    RewriteRule::new(x.clone(), adt.term("succ", &[x.clone()]).unwrap()),
  ]);

  let result = rewriter.apply(&both_match, &nat(&adt, 2)).unwrap();
  assert_eq!(result, Applied::Set(system.universe().singleton(nat(&adt, 0))));
}

#[test]
fn union_collects_both_outcomes() {
  let adt = counter_adt();
  let system = TransitionSystem::new(adt.clone(), nat(&adt, 0)).unwrap();
  let mut rewriter = Rewriter::new(&system);

  let x = adt.variable("x").unwrap();
  let grow = Strategy::rule(x.clone(), adt.term("succ", &[x.clone()]).unwrap());
  let wrap = Strategy::rule(x.clone(), adt.term("pair", &[x.clone(), x.clone()]).unwrap());

  let one = nat(&adt, 1);
  let result = rewriter
      .apply(&Strategy::union(grow.clone(), wrap), &one)
      .unwrap()
      .ok()
      .unwrap();
  assert_eq!(result.len(), 2);
  assert!(result.contains(&nat(&adt, 2)));
  assert!(result.contains(&adt.term("pair", &[one.clone(), one.clone()]).unwrap()));

  // One failing arm leaves the other's result.
  let shrink = Strategy::rule(adt.term("succ", &[x.clone()]).unwrap(), x.clone());
  let zero = nat(&adt, 0);
  let partial = rewriter
      .apply(&Strategy::union(shrink.clone(), grow), &zero)
      .unwrap()
      .ok()
      .unwrap();
  assert_eq!(partial, system.universe().singleton(nat(&adt, 1)));

  // Both failing arms fail.
  assert!(rewriter
      .apply(&Strategy::union(shrink.clone(), shrink), &zero)
      .unwrap()
      .is_fail());
}

#[test]
fn one_descends_into_the_chosen_child() {
  use crate::api::ChildIndex;

  let adt = counter_adt();
  let system = TransitionSystem::new(adt.clone(), nat(&adt, 0)).unwrap();
  let mut rewriter = Rewriter::new(&system);

  let x = adt.variable("x").unwrap();
  let shrink = Strategy::rule(adt.term("succ", &[x.clone()]).unwrap(), x.clone());

  let subject = adt.term("pair", &[nat(&adt, 2), nat(&adt, 3)]).unwrap();

  let left = rewriter
      .apply(&Strategy::one(shrink.clone()), &subject)
      .unwrap()
      .ok()
      .unwrap();
  assert_eq!(
    left,
    system
        .universe()
        .singleton(adt.term("pair", &[nat(&adt, 1), nat(&adt, 3)]).unwrap())
  );

  let right = rewriter
      .apply(&Strategy::one_at(shrink.clone(), ChildIndex::new(2)), &subject)
      .unwrap()
      .ok()
      .unwrap();
  assert_eq!(
    right,
    system
        .universe()
        .singleton(adt.term("pair", &[nat(&adt, 2), nat(&adt, 2)]).unwrap())
  );

  // Arity 0 fails.
  assert!(rewriter
      .apply(&Strategy::one(shrink), &nat(&adt, 0))
      .unwrap()
      .is_fail());
}

#[test]
fn one_reaches_children_beyond_the_second() {
  use crate::api::ChildIndex;

  let adt = philosopher_adt();
  let empty = adt.constant("emptytable").unwrap();
  let inner = philo(&adt, "thinking", "forkFree", empty);
  let subject = philo(&adt, "eating", "forkUsed", inner);
  let system = TransitionSystem::new(adt.clone(), subject.clone()).unwrap();
  let mut rewriter = Rewriter::new(&system);

  // philo/3: descend into the third argument, the rest of the table.
  let step = own_step(&adt, ("thinking", "forkFree"), ("waiting", "forkFree"));
  let result = rewriter
      .apply(&Strategy::one_at(step.clone(), ChildIndex::new(3)), &subject)
      .unwrap()
      .ok()
      .unwrap();

  let rewritten_inner = philo(&adt, "waiting", "forkFree", adt.constant("emptytable").unwrap());
  let expected = philo(&adt, "eating", "forkUsed", rewritten_inner);
  assert_eq!(result, system.universe().singleton(expected));

  // A position past the arity fails.
  assert!(rewriter
      .apply(&Strategy::one_at(step, ChildIndex::new(4)), &subject)
      .unwrap()
      .is_fail());
}

#[test]
fn if_then_else_branches_on_the_original_input() {
  let adt = counter_adt();
  let system = TransitionSystem::new(adt.clone(), nat(&adt, 0)).unwrap();
  let mut rewriter = Rewriter::new(&system);

  let x = adt.variable("x").unwrap();
  let is_successor = Strategy::rule(adt.term("succ", &[x.clone()]).unwrap(), x.clone());
  let grow = Strategy::rule(x.clone(), adt.term("succ", &[x.clone()]).unwrap());

  // On succ(zero): condition holds, and the then-branch sees succ(zero), not
  // the condition's result.
  let one = nat(&adt, 1);
  let strategy = Strategy::if_then_else(is_successor.clone(), grow.clone(), Strategy::Identity);
  let result = rewriter.apply(&strategy, &one).unwrap().ok().unwrap();
  assert_eq!(result, system.universe().singleton(nat(&adt, 2)));

  // On zero: condition fails, the else-branch sees zero.
  let zero = nat(&adt, 0);
  let result = rewriter.apply(&strategy, &zero).unwrap().ok().unwrap();
  assert_eq!(result, system.universe().singleton(zero));
}

#[test]
fn not_inverts_success() {
  let adt = counter_adt();
  let system = TransitionSystem::new(adt.clone(), nat(&adt, 0)).unwrap();
  let mut rewriter = Rewriter::new(&system);

  let x = adt.variable("x").unwrap();
  let shrink = Strategy::rule(adt.term("succ", &[x.clone()]).unwrap(), x);

  let zero = nat(&adt, 0);
  let guarded = Strategy::not(shrink);
  let result = rewriter.apply(&guarded, &zero).unwrap();
  assert_eq!(result, Applied::Set(system.universe().singleton(zero)));

  assert!(rewriter.apply(&guarded, &nat(&adt, 1)).unwrap().is_fail());
}

#[test]
fn declared_recursion_through_repeat() {
  let adt = counter_adt();
  let mut system = TransitionSystem::new(adt.clone(), nat(&adt, 0)).unwrap();

  let x = adt.variable("x").unwrap();
  let shrink = Strategy::rule(adt.term("succ", &[x.clone()]).unwrap(), x);

  system.declare_strategy(DeclaredStrategy::repeat()).unwrap();
  system
      .declare("shrinkAll", vec![], Strategy::instance("repeat", vec![shrink]), false)
      .unwrap();
  system.link().unwrap();

  let result = system.rewrite("shrinkAll", &nat(&adt, 6)).unwrap();
  assert_eq!(result, Some(nat(&adt, 0)));
}

#[test]
fn cancellation_stops_a_divergent_fix_point() {
  let adt = counter_adt();
  let system = TransitionSystem::new(adt.clone(), nat(&adt, 0)).unwrap();

  let token = CancellationToken::new();
  token.cancel();
  let settings = RewriteSettings {
    token,
    progress_interval: 0,
  };
  let mut rewriter = Rewriter::with_settings(&system, settings);

  let x = adt.variable("x").unwrap();
  let grow = Strategy::fix_point(Strategy::rule(x.clone(), adt.term("succ", &[x]).unwrap()));
  let result = rewriter.apply(&grow, &nat(&adt, 0));
  assert!(matches!(result, Err(CoreError::Cancelled)));
}

// endregion

// region Reachability

#[test]
fn reachable_state_space_of_a_cycle() {
  let signature = Signature::new()
      .with_sort("cell")
      .and_then(|s| s.with_generator("red", "cell", &[]))
      .and_then(|s| s.with_generator("green", "cell", &[]))
      .and_then(|s| s.with_generator("blue", "cell", &[]))
      .unwrap();
  let adt = Adt::new("traffic", signature);

  let mut system = TransitionSystem::new(adt.clone(), adt.constant("red").unwrap()).unwrap();
  let step = |from: &str, to: &str| {
    Strategy::rule(adt.constant(from).unwrap(), adt.constant(to).unwrap())
  };
  system.declare("advance", vec![], step("red", "green"), true).unwrap();
  system.declare("advanceMore", vec![], step("green", "blue"), true).unwrap();
  system.declare("wrap", vec![], step("blue", "red"), true).unwrap();
  system.link().unwrap();

  let reachable = system.reachable().unwrap();
  assert_eq!(reachable.len(), 3);
  for color in ["red", "green", "blue"] {
    assert!(reachable.contains(&adt.constant(color).unwrap()));
  }
}

#[test]
fn philosophers_have_a_finite_state_space() {
  let system = philosopher_system();
  system.link().unwrap();

  let reachable = system.reachable().unwrap();
  // Both philosophers start thinking with a free fork; every state keeps the
  // nesting depth, so the space is finite and contains the initial state.
  assert!(reachable.contains(system.initial_state()));
  assert!(reachable.len() > 1);

  // Saturating twice changes nothing.
  let again = system.reachable().unwrap();
  assert_eq!(reachable, again);
}

#[test]
fn auxiliary_strategies_do_not_drive_reachability() {
  let signature = Signature::new()
      .with_sort("cell")
      .and_then(|s| s.with_generator("red", "cell", &[]))
      .and_then(|s| s.with_generator("green", "cell", &[]))
      .unwrap();
  let adt = Adt::new("lamp", signature);

  let mut system = TransitionSystem::new(adt.clone(), adt.constant("red").unwrap()).unwrap();
  let step = Strategy::rule(adt.constant("red").unwrap(), adt.constant("green").unwrap());
  // Declared, but not flagged as a transition.
  system.declare("helper", vec![], step, false).unwrap();
  system.link().unwrap();

  let reachable = system.reachable().unwrap();
  assert_eq!(reachable, system.universe().singleton(adt.constant("red").unwrap()));
}

// endregion

// region Op-cache transparency under load

/// Replays a deterministic random sequence of lattice operations twice, clearing
/// every element's caches between steps on the second run. The results must be
/// identical: the cache is an optimisation, never semantics.
#[test]
fn op_cache_is_transparent_under_random_load() {
  let adt = counter_adt();
  let universe = Universe::new();

  let pool: Vec<StateSet> = (0..8)
      .map(|i| {
        let members: Vec<_> = (0..=i).map(|n| nat(&adt, n)).collect();
        universe.make(members)
      })
      .collect();

  let run = |clear_caches: bool| -> Vec<StateSet> {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let mut results = Vec::new();
    let mut accumulator = universe.bottom();
    for _ in 0..200 {
      let a = &pool[rng.gen_range(0..pool.len())];
      let b = &pool[rng.gen_range(0..pool.len())];
      let result = match rng.gen_range(0..3) {
        0 => a.union(b),
        1 => a.inter(b),
        _ => a.diff(b),
      };
      if clear_caches {
        for set in &pool {
          set.clear_caches();
        }
        result.clear_caches();
      }
      accumulator = accumulator.union(&result);
      results.push(result);
    }
    results.push(accumulator);
    results
  };

  let cached = run(false);
  let cleared = run(true);
  assert_eq!(cached, cleared);
}

// endregion
