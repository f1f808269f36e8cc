/*!

Logging with a global verbosity threshold layered over `tracing`.

Every log entry carries a numeric *verbosity*: 0 is always emitted, higher values
are chattier. The global threshold (set with [`set_global_verbosity`]) decides which
entries reach the subscriber; an entry is emitted when its verbosity is at most the
threshold. The level macros take an optional leading verbosity separated from the
format string by a semicolon:

```
use stratagem::{info, debug};

stratagem::log::set_global_verbosity(2);
info!("always emitted");
info!(2; "emitted at verbosity {}", 2);
debug!(3; "not emitted");
```

Initialization is implicit: the first log entry installs the subscriber. A host that
has already installed its own `tracing` subscriber keeps it; the verbosity field then
shows up as an ordinary event field.

*/

mod filter;
mod macros;

use std::sync::{
  atomic::{AtomicU8, Ordering},
  LazyLock,
};

use tracing_subscriber::{
  fmt,
  layer::SubscriberExt,
  Registry
};

use filter::{MessageFieldFormatter, VerbosityFilterLayer};
pub use macros::*;

/// Used for implicit initialization.
static INIT_LOGGING: LazyLock<()> = LazyLock::new(|| {
  let subscriber = Registry::default()
      .with(VerbosityFilterLayer)
      .with(
        fmt::layer()
            .fmt_fields(MessageFieldFormatter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr),
      );

  // The host may have installed a subscriber already; theirs wins.
  let _ = tracing::subscriber::set_global_default(subscriber);
});

/// Called by the logging macros. Installs the subscriber on first use.
pub fn init_logging() {
  LazyLock::force(&INIT_LOGGING);
}

static GLOBAL_VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Sets the global verbosity threshold. Entries logged at a verbosity greater than
/// this value are not emitted.
pub fn set_global_verbosity(verbosity: u8) {
  GLOBAL_VERBOSITY.store(verbosity, Ordering::SeqCst);
}

/// Retrieves the global verbosity threshold.
pub fn global_verbosity() -> u8 {
  GLOBAL_VERBOSITY.load(Ordering::SeqCst)
}
