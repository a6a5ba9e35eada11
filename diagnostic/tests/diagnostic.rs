use diagnostic::{
  diagnostic::{Diagnostic, Label, Span},
  diagnostic_code::DiagnosticCode,
  position::Position,
  ReportSink,
};

#[test]
fn test_diagnostic_formatting() {
  let source = r#"var b = "asdfasdf"#;

  let mut sink = ReportSink::new();

  let error = Diagnostic::new(
    DiagnosticCode::UnterminatedString,
    "wrong string syntax".to_string(),
  )
  .with_pos(Position::point(1, 18))
  .with_label(Label::primary(
    Span {
      file: "input".to_string(),
      line: 1,
      column: 18,
      length: 7,
    },
    Some("newline not allowed in string".to_string()),
  ))
  .with_help("ensure strings are properly closed on the same line".to_string());

  sink.emit(error);
  let rendered = sink.format_all_plain(source);
  assert!(rendered.contains("wrong string syntax"));
  assert!(rendered.contains("help: ensure strings are properly closed"));
}

#[test]
fn summary_counts_errors_and_warnings() {
  let mut sink = ReportSink::new();
  sink.emit(Diagnostic::at(
    DiagnosticCode::UnknownIdentifier,
    "unknown identifier `x`",
    "input",
    Position::point(1, 1),
  ));
  sink.emit(Diagnostic::at(
    DiagnosticCode::UnusedExpression,
    "unused expression",
    "input",
    Position::point(2, 1),
  ));

  assert_eq!(sink.error_count(), 1);
  assert_eq!(sink.warning_count(), 1);
  assert!(sink.has_errors());
}
