/*!

The accumulating fixed-point driver: `fix(f)(x)` iterates `x ∪ f(x)` until the
iterate stops changing. Hash-consing makes the convergence check a pointer
comparison, and the memoised union makes re-joining the accumulated set against a
mostly unchanged image cheap.

A long-running fixed point observes a cooperative [`CancellationToken`] between
iterations; a host enforces a timeout by setting the flag from wherever it keeps
time.

*/

use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

use crate::{
  core::{
    error::CoreError,
    lattice::{LatticeElement, StateSet}
  },
  info,
};

/// A shared flag observed between fixed-point iterations. Cloning shares the
/// flag; the host side may set it from another thread.
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cancel(&self) {
    self.0.store(true, Ordering::SeqCst);
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::SeqCst)
  }
}

/// Iterates `x ← x ∪ f(x)` from `start` until the iterate is stable, observing
/// `token` between iterations.
pub fn fix<F>(mut f: F, start: StateSet, token: &CancellationToken) -> Result<StateSet, CoreError>
where
  F: FnMut(&StateSet) -> Result<StateSet, CoreError>,
{
  let mut current = start;
  let mut iteration: u64 = 0;
  loop {
    if token.is_cancelled() {
      return Err(CoreError::Cancelled);
    }
    iteration += 1;

    let image = f(&current)?;
    let next = current.union(&image);
    if next == current {
      info!(2; "fixed point stable after {} iteration(s), {} state(s)", iteration, current.len());
      return Ok(current);
    }
    current = next;
  }
}
