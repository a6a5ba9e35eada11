use diagnostic::{DiagnosticCode, ReportSink};
use scanner::token::types::TokenKind;

use super::Parser;
use crate::ast::{Expr, Stmt};

impl Parser {
  pub(crate) fn parse_statements_until_brace(&mut self, sink: &mut ReportSink) -> Vec<Stmt> {
    let mut statements = Vec::new();
    while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
      statements.push(self.parse_statement(sink));
    }
    statements
  }

  pub(crate) fn parse_statement(&mut self, sink: &mut ReportSink) -> Stmt {
    match self.peek_kind() {
      TokenKind::LeftBrace => self.parse_block(sink),
      TokenKind::If => self.parse_if(sink),
      TokenKind::For => self.parse_for(sink),
      TokenKind::Return => self.parse_return(sink),
      TokenKind::Mut => self.parse_var_decl(sink),
      TokenKind::Identifier if self.peek_at(1) == TokenKind::ColonEqual => self.parse_var_decl(sink),
      _ => self.parse_expr_statement(sink),
    }
  }

  fn parse_var_decl(&mut self, sink: &mut ReportSink) -> Stmt {
    let pos = self.current_pos();
    let mutable = self.match_kind(TokenKind::Mut);
    let (name, _) = self.parse_simple_name(sink);
    self.expect(TokenKind::ColonEqual, DiagnosticCode::UnexpectedToken, "':='", sink);
    let expr = self.parse_expression(sink);
    Stmt::VariableDeclaration {
      mutable,
      name,
      expr,
      index: None,
      pos: Some(pos),
    }
  }

  fn parse_return(&mut self, sink: &mut ReportSink) -> Stmt {
    let pos = self.current_pos();
    self.advance();
    let expr = if self.can_start_expression() {
      Some(self.parse_expression(sink))
    } else {
      None
    };
    Stmt::ReturnStatement {
      expr,
      return_type: None,
      pos: Some(pos),
    }
  }

  fn parse_if(&mut self, sink: &mut ReportSink) -> Stmt {
    let pos = self.current_pos();
    self.advance();
    let cond = self.parse_expression(sink);
    let then = Box::new(self.parse_statement(sink));
    let else_branch = if self.match_kind(TokenKind::Else) {
      Some(Box::new(self.parse_statement(sink)))
    } else {
      None
    };
    Stmt::IfStatement {
      cond,
      then,
      else_branch,
      pos: Some(pos),
    }
  }

  fn parse_for(&mut self, sink: &mut ReportSink) -> Stmt {
    let pos = self.current_pos();
    self.advance();
    let init = Some(Box::new(self.parse_statement(sink)));
    self.expect(TokenKind::SemiColon, DiagnosticCode::UnexpectedToken, "';'", sink);
    let cond = if self.can_start_expression() {
      Some(self.parse_expression(sink))
    } else {
      None
    };
    self.expect(TokenKind::SemiColon, DiagnosticCode::UnexpectedToken, "';'", sink);
    let post = if self.can_start_expression() {
      Some(self.parse_expression(sink))
    } else {
      None
    };
    let body = Box::new(self.parse_statement(sink));
    Stmt::JForStatement {
      init,
      cond,
      post,
      body,
      pos: Some(pos),
    }
  }

  fn parse_block(&mut self, sink: &mut ReportSink) -> Stmt {
    let pos = self.current_pos();
    self.advance();
    let statements = self.parse_statements_until_brace(sink);
    self.expect(TokenKind::RightBrace, DiagnosticCode::MissingClosingBrace, "'}'", sink);
    Stmt::BlockStatement {
      statements,
      pos: Some(pos),
    }
  }

  fn parse_expr_statement(&mut self, sink: &mut ReportSink) -> Stmt {
    let pos = self.current_pos();
    let expr = self.parse_expression(sink);
    if !expr.has_side_effect() {
      self.warn(DiagnosticCode::UnusedExpression, "unused expression", expr.pos().unwrap_or(pos), sink);
    }
    Stmt::ExpressionStatement { expr, pos: Some(pos) }
  }

  pub(crate) fn can_start_expression(&self) -> bool {
    matches!(
      self.peek_kind(),
      TokenKind::Int
        | TokenKind::Float
        | TokenKind::Char
        | TokenKind::Str
        | TokenKind::True
        | TokenKind::False
        | TokenKind::Null
        | TokenKind::Identifier
        | TokenKind::SelfKw
        | TokenKind::New
        | TokenKind::LeftParen
        | TokenKind::Colon
        | TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::Bang
        | TokenKind::Tilde
    )
  }

  /// Lifts a leading bare `super(args)` call out of a constructor's body
  /// into `Constructor.super_args`, per the parser's post-hoc convention
  /// for recognizing parent-chain calls (§9).
  pub(crate) fn take_super_args(&self, statements: &mut Vec<Stmt>) -> Option<Vec<Expr>> {
    let is_super_call = matches!(
      statements.first(),
      Some(Stmt::ExpressionStatement {
        expr: Expr::FunctionCall { name, .. },
        ..
      }) if name == "super"
    );
    if !is_super_call {
      return None;
    }
    let Stmt::ExpressionStatement {
      expr: Expr::FunctionCall { args, .. },
      ..
    } = statements.remove(0)
    else {
      unreachable!()
    };
    Some(args)
  }
}
