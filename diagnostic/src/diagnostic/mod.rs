use crate::diagnostic_code::{DiagnosticCode, Severity};
use crate::position::Position;

/// Represents a source code location, as rendered by the formatter.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
  pub file: String,
  pub line: usize,
  pub column: usize,
  pub length: usize,
}

impl Span {
  pub fn from_position(file: &str, pos: &Position) -> Self {
    Self {
      file: file.to_string(),
      line: pos.start_line,
      column: pos.start_col,
      length: pos.length(),
    }
  }
}

/// Label for underlining specific parts of code
#[derive(Debug, Clone)]
pub struct Label {
  pub span: Span,
  pub message: Option<String>,
  pub style: LabelStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
  Primary,
  Secondary,
}

impl Label {
  pub fn primary(span: Span, message: Option<String>) -> Self {
    Self {
      span,
      message,
      style: LabelStyle::Primary,
    }
  }

  pub fn secondary(span: Span, message: Option<String>) -> Self {
    Self {
      span,
      message,
      style: LabelStyle::Secondary,
    }
  }
}

/// A single diagnostic message.
///
/// `pos` is the diagnostic's own anchor position (used for ordering and
/// deduplication, §3 of the spec); `labels` carry any additional underlines
/// the formatter should render, which may point at other spans entirely.
#[derive(Debug, Clone)]
pub struct Diagnostic {
  pub code: DiagnosticCode,
  pub severity: Severity,
  pub message: String,
  pub pos: Option<Position>,
  pub labels: Vec<Label>,
  pub notes: Vec<String>,
  pub help: Option<String>,
}

impl Diagnostic {
  pub fn new(code: DiagnosticCode, message: String) -> Self {
    Self {
      severity: code.severity(),
      code,
      message,
      pos: None,
      labels: Vec::new(),
      notes: Vec::new(),
      help: None,
    }
  }

  /// Convenience constructor for the common case of a diagnostic anchored
  /// to a single source position, with a primary label at that position.
  pub fn at(code: DiagnosticCode, message: impl Into<String>, file: &str, pos: Position) -> Self {
    let message = message.into();
    Self::new(code, message.clone())
      .with_pos(pos)
      .with_label(Label::primary(Span::from_position(file, &pos), None))
  }

  pub fn with_pos(mut self, pos: Position) -> Self {
    self.pos = Some(pos);
    self
  }

  pub fn with_label(mut self, label: Label) -> Self {
    self.labels.push(label);
    self
  }

  pub fn with_note(mut self, note: String) -> Self {
    self.notes.push(note);
    self
  }

  pub fn with_help(mut self, help: String) -> Self {
    self.help = Some(help);
    self
  }
}
