use diagnostic::ReportSink;
use parser::ast::{Expr, Stmt};
use parser::types::{PrimitiveType, Type};
use parser::Parser;
use scanner::Scanner;
use semantic_analysis::Checker;

fn check(source: &str) -> (parser::ast::File, ReportSink) {
  let mut scanner = Scanner::new();
  let mut sink = ReportSink::new();
  let tokens = scanner.scan(source, &mut sink).to_vec();
  let mut parser = Parser::new("input", tokens);
  let mut file = parser.parse(&mut sink);
  let mut checker = Checker::new("input");
  checker.check(&mut file, &mut sink);
  (file, sink)
}

#[test]
fn field_block_resolves_declared_primitive_types() {
  let (file, sink) = check(
    r#"
    class X {
      pub:
        a: i32
      priv mut:
        b: i64
    }
    "#,
  );
  assert!(!sink.has_errors(), "unexpected errors: {:?}", sink.get_diagnostics());
  assert_eq!(file.clazz.fields[0].ty, Some(Type::Primitive(PrimitiveType::I32)));
  assert_eq!(file.clazz.fields[1].ty, Some(Type::Primitive(PrimitiveType::I64)));
}

#[test]
fn function_return_type_resolves_and_body_type_checks() {
  let (file, sink) = check("class X impl X { fn f(): i32 { return 1 + 2 } }");
  assert!(!sink.has_errors(), "unexpected errors: {:?}", sink.get_diagnostics());
  assert_eq!(file.clazz.functions[0].return_type, Some(Type::Primitive(PrimitiveType::I32)));
}

#[test]
fn array_initialization_reports_heterogeneous_element_mismatch() {
  let (_file, sink) = check("class X impl X { fn f() { a := :[true, 1] } }");
  assert!(sink.has_errors());
  assert!(sink
    .get_diagnostics()
    .iter()
    .any(|d| d.code == diagnostic::DiagnosticCode::TypeMismatch));
}

#[test]
fn array_index_assignment_widens_index_and_keeps_element_type() {
  let (file, sink) = check("class X impl X { fn f() { a := :{1, 2, 3} a[1] = 5 } }");
  assert!(!sink.has_errors(), "unexpected errors: {:?}", sink.get_diagnostics());

  let Stmt::ExpressionStatement { expr, .. } = &file.clazz.functions[0].statements[1] else {
    panic!("expected an expression statement");
  };
  let Expr::AssignmentExpression { left, .. } = expr else {
    panic!("expected an assignment");
  };
  let Expr::IndexExpression { cast_to, ty, .. } = left.as_ref() else {
    panic!("expected an index expression target");
  };
  assert_eq!(*cast_to, Some(Type::Primitive(PrimitiveType::I32)));
  assert_eq!(*ty, Some(Type::Primitive(PrimitiveType::I8)));
}

#[test]
fn duplicate_variable_in_same_scope_is_reported() {
  let (_file, sink) = check("class X impl X { fn f() { a := 1 a := 2 } }");
  assert!(sink
    .get_diagnostics()
    .iter()
    .any(|d| d.code == diagnostic::DiagnosticCode::DuplicateVariable));
}

#[test]
fn shadowing_in_a_nested_block_is_allowed() {
  let (_file, sink) = check("class X impl X { fn f() { a := 1 if true { a := 2 } } }");
  assert!(!sink.has_errors(), "unexpected errors: {:?}", sink.get_diagnostics());
}

#[test]
fn immutable_variable_assignment_is_reported() {
  let (_file, sink) = check("class X impl X { fn f() { a := 1 a = 2 } }");
  assert!(sink
    .get_diagnostics()
    .iter()
    .any(|d| d.code == diagnostic::DiagnosticCode::ImmutableAssignment));
}

#[test]
fn mutable_variable_may_be_reassigned() {
  let (_file, sink) = check("class X impl X { fn f() { mut a := 1 a = 2 } }");
  assert!(!sink.has_errors(), "unexpected errors: {:?}", sink.get_diagnostics());
}

#[test]
fn calling_non_companion_function_from_companion_context_is_reported() {
  let (_file, sink) = check("class X impl X { comp { fn g() { h() } } fn h() { } }");
  assert!(sink
    .get_diagnostics()
    .iter()
    .any(|d| d.code == diagnostic::DiagnosticCode::NonCompanionAccessFromCompanion));
}

#[test]
fn companion_function_is_callable_from_a_companion_context() {
  let (_file, sink) = check("class X impl X { comp { fn g() { h() } fn h() { } } }");
  assert!(!sink.has_errors(), "unexpected errors: {:?}", sink.get_diagnostics());
}

#[test]
fn unknown_field_access_is_reported() {
  let (_file, sink) = check("class X impl X { fn f(): i32 { return self.missing } }");
  assert!(sink
    .get_diagnostics()
    .iter()
    .any(|d| d.code == diagnostic::DiagnosticCode::UnknownField || d.code == diagnostic::DiagnosticCode::UnknownIdentifier));
}

#[test]
fn returning_a_narrower_type_than_declared_widens_without_error() {
  let (_file, sink) = check("class X impl X { fn f(): i64 { return 1 } }");
  assert!(!sink.has_errors(), "unexpected errors: {:?}", sink.get_diagnostics());
}

#[test]
fn returning_a_wider_type_than_declared_is_a_type_mismatch() {
  let (_file, sink) = check("class X impl X { fn f(): i8 { return 1d } }");
  assert!(sink
    .get_diagnostics()
    .iter()
    .any(|d| d.code == diagnostic::DiagnosticCode::TypeMismatch));
}

#[test]
fn constructor_call_resolves_matching_signature() {
  let (_file, sink) = check("class X impl X { new(v: i32) { } fn f() { a := new X(1) } }");
  assert!(!sink.has_errors(), "unexpected errors: {:?}", sink.get_diagnostics());
}
