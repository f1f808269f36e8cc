//! Macros for generating log entries at each level. The optional leading verbosity
//! is separated from the format arguments by a semicolon; omitting it means
//! verbosity 0 (always emitted).

#[macro_export]
macro_rules! error {
  ($verbosity:expr; $($arg:tt)+) => {{
    $crate::log::init_logging();
    tracing::event!(
      tracing::Level::ERROR,
      verbosity = $verbosity as u64,
      message = format_args!($($arg)+)
    );
  }};
  ($($arg:tt)+) => {{
    $crate::log::init_logging();
    tracing::event!(tracing::Level::ERROR, verbosity = 0u64, message = format_args!($($arg)+));
  }};
}

#[macro_export]
macro_rules! warning {
  ($verbosity:expr; $($arg:tt)+) => {{
    $crate::log::init_logging();
    tracing::event!(
      tracing::Level::WARN,
      verbosity = $verbosity as u64,
      message = format_args!($($arg)+)
    );
  }};
  ($($arg:tt)+) => {{
    $crate::log::init_logging();
    tracing::event!(tracing::Level::WARN, verbosity = 0u64, message = format_args!($($arg)+));
  }};
}

#[macro_export]
macro_rules! info {
  ($verbosity:expr; $($arg:tt)+) => {{
    $crate::log::init_logging();
    tracing::event!(
      tracing::Level::INFO,
      verbosity = $verbosity as u64,
      message = format_args!($($arg)+)
    );
  }};
  ($($arg:tt)+) => {{
    $crate::log::init_logging();
    tracing::event!(tracing::Level::INFO, verbosity = 0u64, message = format_args!($($arg)+));
  }};
}

#[macro_export]
macro_rules! debug {
  ($verbosity:expr; $($arg:tt)+) => {{
    $crate::log::init_logging();
    tracing::event!(
      tracing::Level::DEBUG,
      verbosity = $verbosity as u64,
      message = format_args!($($arg)+)
    );
  }};
  ($($arg:tt)+) => {{
    $crate::log::init_logging();
    tracing::event!(tracing::Level::DEBUG, verbosity = 0u64, message = format_args!($($arg)+));
  }};
}

#[macro_export]
macro_rules! trace {
  ($verbosity:expr; $($arg:tt)+) => {{
    $crate::log::init_logging();
    tracing::event!(
      tracing::Level::TRACE,
      verbosity = $verbosity as u64,
      message = format_args!($($arg)+)
    );
  }};
  ($($arg:tt)+) => {{
    $crate::log::init_logging();
    tracing::event!(tracing::Level::TRACE, verbosity = 0u64, message = format_args!($($arg)+));
  }};
}

// The following makes the macros importable directly from the `log` module.
pub use {debug, error, info, trace, warning};
