//! Run diagnostics collector
//!
//! Categorized console messages with per-kind counts and an end-of-run
//! summary. The collector is owned by the run context and passed through
//! every phase; the run's overall success is decided by fatal errors alone,
//! never by these counts.

use std::collections::BTreeMap;
use std::fmt;

/// Message categories, ordered by how alarming they are
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageKind {
  /// Progress and results
  Info,
  /// Verbatim output of external tools
  External,
  /// Detected inconsistencies that do not abort the run
  Problem,
  /// Fatal conditions (also surfaced as errors)
  Failure,
  /// Developer-level detail
  Debug,
}

impl MessageKind {
  fn style(self) -> anstyle::Style {
    let color = match self {
      MessageKind::Info => anstyle::AnsiColor::Cyan,
      MessageKind::External => anstyle::AnsiColor::White,
      MessageKind::Problem => anstyle::AnsiColor::Yellow,
      MessageKind::Failure => anstyle::AnsiColor::Red,
      MessageKind::Debug => anstyle::AnsiColor::Magenta,
    };
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(color)))
  }
}

impl fmt::Display for MessageKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      MessageKind::Info => "Info",
      MessageKind::External => "External",
      MessageKind::Problem => "Problem",
      MessageKind::Failure => "Failure",
      MessageKind::Debug => "Debug",
    };
    write!(f, "{}", name)
  }
}

/// Collects and prints categorized run messages
#[derive(Debug, Default)]
pub struct Diagnostics {
  counts: BTreeMap<MessageKind, usize>,
  quiet: bool,
}

impl Diagnostics {
  pub fn new() -> Self {
    Self::default()
  }

  /// A collector that counts but does not print
  #[allow(dead_code)] // unit-test fixture
  pub fn silent() -> Self {
    Self {
      counts: BTreeMap::new(),
      quiet: true,
    }
  }

  /// Record and print a message of the given kind
  pub fn report(&mut self, kind: MessageKind, message: impl AsRef<str>) {
    let message = message.as_ref();
    *self.counts.entry(kind).or_insert(0) += 1;

    match kind {
      MessageKind::Debug => log::debug!("{}", message),
      MessageKind::Problem => log::warn!("{}", message),
      MessageKind::Failure => log::error!("{}", message),
      _ => log::info!("{}", message),
    }

    // Debug output only reaches the console through the logger
    if self.quiet || kind == MessageKind::Debug {
      return;
    }

    let style = kind.style();
    println!("{}[{}] {}{}", style.render(), kind, message, style.render_reset());
  }

  pub fn info(&mut self, message: impl AsRef<str>) {
    self.report(MessageKind::Info, message);
  }

  pub fn external(&mut self, message: impl AsRef<str>) {
    self.report(MessageKind::External, message);
  }

  pub fn problem(&mut self, message: impl AsRef<str>) {
    self.report(MessageKind::Problem, message);
  }

  pub fn debug(&mut self, message: impl AsRef<str>) {
    self.report(MessageKind::Debug, message);
  }

  /// Number of messages recorded for a kind
  #[allow(dead_code)] // asserted on by unit tests
  pub fn count(&self, kind: MessageKind) -> usize {
    self.counts.get(&kind).copied().unwrap_or(0)
  }

  /// Print the per-kind message totals
  pub fn print_summary(&self) {
    if self.quiet {
      return;
    }
    let total: usize = self.counts.values().sum();
    if total == 0 {
      println!("No messages.");
      return;
    }
    println!("Messages by type (total: {}):", total);
    for (kind, count) in &self.counts {
      println!("  {}: {}", kind, count);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_counts_by_kind() {
    let mut diag = Diagnostics::silent();
    diag.info("found module");
    diag.problem("unknown profile");
    diag.problem("unknown target");
    assert_eq!(diag.count(MessageKind::Info), 1);
    assert_eq!(diag.count(MessageKind::Problem), 2);
    assert_eq!(diag.count(MessageKind::Failure), 0);
  }
}
