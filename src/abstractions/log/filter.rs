/*!

The `tracing` plumbing for verbosity filtering: a `Layer` that drops events whose
`verbosity` field exceeds the global threshold, and a field formatter that prints
the message alone (the verbosity field is a routing detail, not output).

*/

use std::fmt::Debug;

use tracing::{
  field::{Field, Visit},
  Event,
  Subscriber
};
use tracing_subscriber::{
  field::RecordFields,
  fmt::{format::Writer, FormatFields},
  layer::Context,
  registry::LookupSpan,
  Layer
};

use super::global_verbosity;

pub(crate) struct VerbosityFilterLayer;

impl<S> Layer<S> for VerbosityFilterLayer
where
  S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
  fn event_enabled(&self, event: &Event<'_>, _ctx: Context<'_, S>) -> bool {
    let mut visitor = VerbosityVisitor { verbosity: None };
    event.record(&mut visitor);

    match visitor.verbosity {
      Some(verbosity) => verbosity <= global_verbosity(),
      // No verbosity field means verbosity 0: always emitted.
      None => true,
    }
  }
}

/// Extracts the `verbosity` field from an event. Out-of-range values saturate
/// rather than abort logging.
struct VerbosityVisitor {
  verbosity: Option<u8>,
}

impl Visit for VerbosityVisitor {
  fn record_u64(&mut self, field: &Field, value: u64) {
    if field.name() == "verbosity" {
      self.verbosity = Some(value.min(u8::MAX as u64) as u8);
    }
  }

  fn record_i64(&mut self, field: &Field, value: i64) {
    if field.name() == "verbosity" {
      self.verbosity = Some(value.clamp(0, u8::MAX as i64) as u8);
    }
  }

  fn record_debug(&mut self, _field: &Field, _value: &dyn Debug) {}
}

pub(crate) struct MessageFieldFormatter;

impl<'writer> FormatFields<'writer> for MessageFieldFormatter {
  fn format_fields<R: RecordFields>(&self, writer: Writer<'writer>, fields: R) -> std::fmt::Result {
    let mut visitor = MessageVisitor { writer };
    fields.record(&mut visitor);
    Ok(())
  }
}

struct MessageVisitor<'writer> {
  writer: Writer<'writer>,
}

impl<'writer> Visit for MessageVisitor<'writer> {
  fn record_u64(&mut self, field: &Field, value: u64) {
    if field.name() != "verbosity" {
      let _ = write!(self.writer, "{}={} ", field.name(), value);
    }
  }

  fn record_i64(&mut self, field: &Field, value: i64) {
    if field.name() != "verbosity" {
      let _ = write!(self.writer, "{}={} ", field.name(), value);
    }
  }

  fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
    match field.name() {
      "message" => {
        let _ = write!(self.writer, "{:?}", value);
      }
      "verbosity" => {}
      name => {
        let _ = write!(self.writer, "{}={:?} ", name, value);
      }
    }
  }
}
