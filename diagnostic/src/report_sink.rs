use std::collections::HashSet;

use colored::*;

use crate::{
  diagnostic::Diagnostic,
  diagnostic_code::{DiagnosticCode, Severity},
  formatter::DiagnosticFormatter,
  position::Position,
};

/// Collector for all diagnostics produced while compiling one file.
///
/// Insertion order is preserved (§5's ordering guarantee: reports preserve
/// insertion order per file), and duplicate diagnostics — same position,
/// same code, same message — are silently dropped on insert (§3's
/// deduplication invariant), the same way the teacher's `DiagnosticEngine`
/// tracks running error/warning counts as diagnostics are emitted.
#[derive(Debug, Default)]
pub struct ReportSink {
  diagnostics: Vec<Diagnostic>,
  seen: HashSet<(Option<Position>, DiagnosticCode, String)>,
  error_count: usize,
  warning_count: usize,
}

impl ReportSink {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn emit(&mut self, diagnostic: Diagnostic) {
    let key = (diagnostic.pos, diagnostic.code, diagnostic.message.clone());
    if !self.seen.insert(key) {
      return;
    }

    match diagnostic.severity {
      Severity::Error => self.error_count += 1,
      Severity::Warning => self.warning_count += 1,
      _ => {},
    }
    self.diagnostics.push(diagnostic);
  }

  pub fn has_errors(&self) -> bool {
    self.error_count > 0
  }

  pub fn error_count(&self) -> usize {
    self.error_count
  }

  pub fn warning_count(&self) -> usize {
    self.warning_count
  }

  /// Print all diagnostics with colors to stdout
  pub fn print_all(&self, source_code: &str) {
    for diagnostic in &self.diagnostics {
      let formatter = DiagnosticFormatter::new(diagnostic, source_code);
      print!("{}", formatter.format());
    }

    self.print_summary();
  }

  /// Get all diagnostics as plain text (for file logging)
  pub fn format_all_plain(&self, source_code: &str) -> String {
    let mut output = String::new();

    for diagnostic in &self.diagnostics {
      let formatter = DiagnosticFormatter::new(diagnostic, source_code);
      output.push_str(&formatter.format_plain());
      output.push('\n');
    }

    output.push_str(&self.format_summary_plain());
    output
  }

  fn print_summary(&self) {
    if self.error_count > 0 || self.warning_count > 0 {
      println!();

      if self.has_errors() {
        println!(
          "{}: could not compile due to {} previous {}{}",
          "error".red().bold(),
          self.error_count.to_string().red().bold(),
          plural(self.error_count, "error", "errors"),
          self.warning_suffix_colored(),
        );
      } else {
        println!(
          "{}: {} {} emitted",
          "warning".yellow().bold(),
          self.warning_count.to_string().yellow().bold(),
          plural(self.warning_count, "warning", "warnings"),
        );
      }
    }
  }

  fn warning_suffix_colored(&self) -> String {
    if self.warning_count > 0 {
      format!(
        "; {} {} emitted",
        self.warning_count.to_string().yellow().bold(),
        plural(self.warning_count, "warning", "warnings"),
      )
    } else {
      String::new()
    }
  }

  fn format_summary_plain(&self) -> String {
    if self.error_count > 0 || self.warning_count > 0 {
      if self.has_errors() {
        let suffix = if self.warning_count > 0 {
          format!(
            "; {} {} emitted",
            self.warning_count,
            plural(self.warning_count, "warning", "warnings")
          )
        } else {
          String::new()
        };
        format!(
          "error: could not compile due to {} previous {}{}",
          self.error_count,
          plural(self.error_count, "error", "errors"),
          suffix
        )
      } else {
        format!(
          "warning: {} {} emitted",
          self.warning_count,
          plural(self.warning_count, "warning", "warnings")
        )
      }
    } else {
      String::new()
    }
  }

  pub fn get_diagnostics(&self) -> &[Diagnostic] {
    &self.diagnostics
  }
}

fn plural(count: usize, singular: &'static str, plural: &'static str) -> &'static str {
  if count == 1 {
    singular
  } else {
    plural
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::diagnostic_code::DiagnosticCode;

  #[test]
  fn duplicate_diagnostics_are_deduplicated() {
    let mut sink = ReportSink::new();
    let pos = Position::point(1, 1);
    sink.emit(Diagnostic::at(
      DiagnosticCode::UnknownIdentifier,
      "unknown identifier `x`",
      "input",
      pos,
    ));
    sink.emit(Diagnostic::at(
      DiagnosticCode::UnknownIdentifier,
      "unknown identifier `x`",
      "input",
      pos,
    ));

    assert_eq!(sink.get_diagnostics().len(), 1);
    assert_eq!(sink.error_count(), 1);
  }

  #[test]
  fn reports_preserve_insertion_order() {
    let mut sink = ReportSink::new();
    sink.emit(Diagnostic::at(
      DiagnosticCode::UnknownIdentifier,
      "first",
      "input",
      Position::point(2, 1),
    ));
    sink.emit(Diagnostic::at(
      DiagnosticCode::UnknownIdentifier,
      "second",
      "input",
      Position::point(1, 1),
    ));

    let messages: Vec<&str> = sink
      .get_diagnostics()
      .iter()
      .map(|d| d.message.as_str())
      .collect();
    assert_eq!(messages, vec!["first", "second"]);
  }
}
