use diagnostic::ReportSink;
use parser::ast::{Accessor, Expr, Stmt};
use parser::Parser;
use scanner::Scanner;

fn parse(source: &str) -> (parser::ast::File, ReportSink) {
  let mut scanner = Scanner::new();
  let mut sink = ReportSink::new();
  let tokens = scanner.scan(source, &mut sink).to_vec();
  let mut parser = Parser::new("input", tokens);
  let file = parser.parse(&mut sink);
  (file, sink)
}

#[test]
fn package_usages_and_empty_class() {
  let (file, sink) = parse("mod a.b use c::{D, E as F} class G");
  assert!(!sink.has_errors(), "unexpected errors: {:?}", sink.get_diagnostics());
  assert_eq!(file.clazz.pkg, Some(vec!["a".to_string(), "b".to_string()]));
  assert_eq!(file.clazz.name, "G");
  assert_eq!(file.clazz.usages.len(), 2);
  assert_eq!(file.clazz.usages[0].reference.to_dotted(), "c.D");
  assert_eq!(file.clazz.usages[0].alias, None);
  assert_eq!(file.clazz.usages[1].reference.to_dotted(), "c.E");
  assert_eq!(file.clazz.usages[1].alias, Some("F".to_string()));
  assert!(file.clazz.fields.is_empty());
}

#[test]
fn field_block_parses_access_and_mutability() {
  let (file, sink) = parse(
    r#"
    class Point {
      pub mut:
        x: I32
        y: I32
      priv:
        label: Str
    }
    "#,
  );
  assert!(!sink.has_errors(), "unexpected errors: {:?}", sink.get_diagnostics());
  assert_eq!(file.clazz.fields.len(), 3);
  assert!(file.clazz.fields[0].mutable);
  assert_eq!(file.clazz.fields[0].accessor, Accessor::Pub);
  assert!(!file.clazz.fields[2].mutable);
  assert_eq!(file.clazz.fields[2].accessor, Accessor::Priv);
}

#[test]
fn duplicate_access_block_is_reported() {
  let (_file, sink) = parse(
    r#"
    class Dup {
      pub:
        a: I32
      pub:
        b: I32
    }
    "#,
  );
  assert!(sink.has_errors());
}

#[test]
fn impl_block_with_constructor_and_function() {
  let (file, sink) = parse(
    r#"
    class Counter {
      pub mut:
        count: I32
    }
    impl Counter {
      new(start: I32) {
        count := start
      }
      fn increment() {
        count = count + 1
      }
    }
    "#,
  );
  assert!(!sink.has_errors(), "unexpected errors: {:?}", sink.get_diagnostics());
  assert_eq!(file.clazz.constructors.len(), 1);
  assert_eq!(file.clazz.functions.len(), 1);
  assert_eq!(file.clazz.functions[0].name, "increment");
}

#[test]
fn companion_block_marks_companion_members() {
  let (file, sink) = parse(
    r#"
    class Registry {
      comp {
        priv:
          instances: I32
      }
    }
    impl Registry {
      comp {
        fn count(): I32 {
          return instances
        }
      }
    }
    "#,
  );
  assert!(!sink.has_errors(), "unexpected errors: {:?}", sink.get_diagnostics());
  assert!(file.clazz.fields[0].companion);
  assert!(file.clazz.functions[0].companion);
}

#[test]
fn nested_companion_block_is_reported() {
  let (_file, sink) = parse(
    r#"
    class Bad {
      comp {
        comp {
          pub:
            x: I32
        }
      }
    }
    "#,
  );
  assert!(sink.has_errors());
}

#[test]
fn constructor_in_companion_is_reported() {
  let (_file, sink) = parse(
    r#"
    class Bad {}
    impl Bad {
      comp {
        new() {}
      }
    }
    "#,
  );
  assert!(sink.has_errors());
}

#[test]
fn operator_precedence_builds_expected_tree() {
  let (file, sink) = parse(
    r#"
    class Calc {}
    impl Calc {
      fn f() {
        result := 1 + 2 * 3
      }
    }
    "#,
  );
  assert!(!sink.has_errors());
  let body = &file.clazz.functions[0].statements;
  let Stmt::VariableDeclaration { expr, .. } = &body[0] else {
    panic!("expected variable declaration")
  };
  match expr {
    Expr::BinaryExpression { left, op, .. } => {
      assert_eq!(*op, parser::ast::BinaryOp::Add);
      assert!(matches!(**left, Expr::Literal { .. }));
    },
    other => panic!("expected top-level add, got {other:?}"),
  }
}

#[test]
fn chained_calls_and_indexing_build_left_leaning_chain() {
  let (file, sink) = parse(
    r#"
    class Calc {}
    impl Calc {
      fn f() {
        a.b.c(1)[0]
      }
    }
    "#,
  );
  assert!(!sink.has_errors(), "unexpected errors: {:?}", sink.get_diagnostics());
  let Stmt::ExpressionStatement { expr, .. } = &file.clazz.functions[0].statements[0] else {
    panic!("expected expression statement")
  };
  assert!(matches!(expr, Expr::IndexExpression { .. }));
}

#[test]
fn companion_path_access_resolves_owner_reference() {
  let (file, sink) = parse(
    r#"
    class Calc {}
    impl Calc {
      fn f() {
        Other::helper()
      }
    }
    "#,
  );
  assert!(!sink.has_errors());
  let Stmt::ExpressionStatement { expr, .. } = &file.clazz.functions[0].statements[0] else {
    panic!("expected expression statement")
  };
  match expr {
    Expr::FunctionCall { owner_ref, in_companion, .. } => {
      assert!(in_companion);
      assert_eq!(owner_ref.as_ref().unwrap().to_dotted(), "Other");
    },
    other => panic!("expected function call, got {other:?}"),
  }
}

#[test]
fn super_call_is_lifted_into_constructor_super_args() {
  let (file, sink) = parse(
    r#"
    class Base {}
    impl Base {
      new(x: I32) {
        super(x)
        count := x
      }
    }
    "#,
  );
  assert!(!sink.has_errors(), "unexpected errors: {:?}", sink.get_diagnostics());
  let ctor = &file.clazz.constructors[0];
  assert!(ctor.super_args.is_some());
  assert_eq!(ctor.super_args.as_ref().unwrap().len(), 1);
  assert_eq!(ctor.statements.len(), 1);
}

#[test]
fn array_declaration_and_initialization_forms_parse() {
  let (file, sink) = parse(
    r#"
    class Arr {}
    impl Arr {
      fn f() {
        xs := I32:[3]{}
        ys := :{1, 2, 3}
      }
    }
    "#,
  );
  assert!(!sink.has_errors(), "unexpected errors: {:?}", sink.get_diagnostics());
  let stmts = &file.clazz.functions[0].statements;
  let Stmt::VariableDeclaration { expr, .. } = &stmts[0] else {
    panic!("expected variable declaration")
  };
  assert!(matches!(expr, Expr::ArrayDeclaration { .. }));
  let Stmt::VariableDeclaration { expr, .. } = &stmts[1] else {
    panic!("expected variable declaration")
  };
  assert!(matches!(expr, Expr::ArrayInitialization { .. }));
}

#[test]
fn malformed_input_reports_and_does_not_panic() {
  let (_file, sink) = parse("class");
  assert!(sink.has_errors());
}
