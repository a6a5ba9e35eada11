use diagnostic::{DiagnosticCode, Position, ReportSink};
use scanner::token::types::{Literal as TokenLiteral, TokenKind};

use super::Parser;
use crate::ast::{BinaryOp, Expr, Literal, Reference, TypeRef, UnaryOp};

impl Parser {
  pub(crate) fn parse_expression(&mut self, sink: &mut ReportSink) -> Expr {
    self.parse_assignment(sink)
  }

  /// Level 1: assignment, right-associative, handled above the binary chain.
  fn parse_assignment(&mut self, sink: &mut ReportSink) -> Expr {
    let left = self.parse_or(sink);
    if self.check(TokenKind::Equal) {
      let pos = self.current_pos();
      self.advance();
      let right = self.parse_assignment(sink);
      return Expr::AssignmentExpression {
        left: Box::new(left),
        right: Box::new(right),
        retain_value: true,
        ty: None,
        pos: Some(pos),
      };
    }
    left
  }

  fn parse_or(&mut self, sink: &mut ReportSink) -> Expr {
    let mut left = self.parse_and(sink);
    while self.check(TokenKind::PipePipe) {
      let pos = self.current_pos();
      self.advance();
      let right = self.parse_and(sink);
      left = binary(left, BinaryOp::Or, right, pos);
    }
    left
  }

  fn parse_and(&mut self, sink: &mut ReportSink) -> Expr {
    let mut left = self.parse_equality(sink);
    while self.check(TokenKind::AmpAmp) {
      let pos = self.current_pos();
      self.advance();
      let right = self.parse_equality(sink);
      left = binary(left, BinaryOp::And, right, pos);
    }
    left
  }

  fn parse_equality(&mut self, sink: &mut ReportSink) -> Expr {
    let mut left = self.parse_relational(sink);
    loop {
      let op = match self.peek_kind() {
        TokenKind::EqualEqual => BinaryOp::Eq,
        TokenKind::BangEqual => BinaryOp::Ne,
        _ => break,
      };
      let pos = self.current_pos();
      self.advance();
      let right = self.parse_relational(sink);
      left = binary(left, op, right, pos);
    }
    left
  }

  fn parse_relational(&mut self, sink: &mut ReportSink) -> Expr {
    let mut left = self.parse_bitor(sink);
    loop {
      let op = match self.peek_kind() {
        TokenKind::Less => BinaryOp::Lt,
        TokenKind::LessEqual => BinaryOp::Le,
        TokenKind::Greater => BinaryOp::Gt,
        TokenKind::GreaterEqual => BinaryOp::Ge,
        _ => break,
      };
      let pos = self.current_pos();
      self.advance();
      let right = self.parse_bitor(sink);
      left = binary(left, op, right, pos);
    }
    left
  }

  fn parse_bitor(&mut self, sink: &mut ReportSink) -> Expr {
    let mut left = self.parse_bitxor(sink);
    while self.check(TokenKind::Pipe) {
      let pos = self.current_pos();
      self.advance();
      let right = self.parse_bitxor(sink);
      left = binary(left, BinaryOp::BitOr, right, pos);
    }
    left
  }

  fn parse_bitxor(&mut self, sink: &mut ReportSink) -> Expr {
    let mut left = self.parse_bitand(sink);
    while self.check(TokenKind::Caret) {
      let pos = self.current_pos();
      self.advance();
      let right = self.parse_bitand(sink);
      left = binary(left, BinaryOp::BitXor, right, pos);
    }
    left
  }

  fn parse_bitand(&mut self, sink: &mut ReportSink) -> Expr {
    let mut left = self.parse_shift(sink);
    while self.check(TokenKind::Amp) {
      let pos = self.current_pos();
      self.advance();
      let right = self.parse_shift(sink);
      left = binary(left, BinaryOp::BitAnd, right, pos);
    }
    left
  }

  fn parse_shift(&mut self, sink: &mut ReportSink) -> Expr {
    let mut left = self.parse_additive(sink);
    loop {
      let op = match self.peek_kind() {
        TokenKind::LessLess => BinaryOp::Shl,
        TokenKind::GreaterGreater => BinaryOp::Shr,
        TokenKind::GreaterGreaterGreater => BinaryOp::UShr,
        _ => break,
      };
      let pos = self.current_pos();
      self.advance();
      let right = self.parse_additive(sink);
      left = binary(left, op, right, pos);
    }
    left
  }

  fn parse_additive(&mut self, sink: &mut ReportSink) -> Expr {
    let mut left = self.parse_multiplicative(sink);
    loop {
      let op = match self.peek_kind() {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        _ => break,
      };
      let pos = self.current_pos();
      self.advance();
      let right = self.parse_multiplicative(sink);
      left = binary(left, op, right, pos);
    }
    left
  }

  fn parse_multiplicative(&mut self, sink: &mut ReportSink) -> Expr {
    let mut left = self.parse_unary(sink);
    loop {
      let op = match self.peek_kind() {
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Rem,
        _ => break,
      };
      let pos = self.current_pos();
      self.advance();
      let right = self.parse_unary(sink);
      left = binary(left, op, right, pos);
    }
    left
  }

  /// Level 10: unary prefix `+ - ! ~`. `++`/`--` are postfix-only (level 11).
  fn parse_unary(&mut self, sink: &mut ReportSink) -> Expr {
    let op = match self.peek_kind() {
      TokenKind::Plus => UnaryOp::Plus,
      TokenKind::Minus => UnaryOp::Minus,
      TokenKind::Bang => UnaryOp::Not,
      TokenKind::Tilde => UnaryOp::BitNot,
      _ => return self.parse_postfix(sink),
    };
    let pos = self.current_pos();
    self.advance();
    let operand = self.parse_unary(sink);
    Expr::UnaryExpression {
      op,
      operand: Box::new(operand),
      is_postfix: false,
      retain_value: true,
      ty: None,
      pos: Some(pos),
    }
  }

  /// Level 11: postfix `++`/`--`, valid only on identifier-calls.
  fn parse_postfix(&mut self, sink: &mut ReportSink) -> Expr {
    let mut expr = self.parse_chain(sink);
    loop {
      let op = match self.peek_kind() {
        TokenKind::PlusPlus => UnaryOp::Increment,
        TokenKind::MinusMinus => UnaryOp::Decrement,
        _ => break,
      };
      if !matches!(expr, Expr::IdentifierCall { .. }) {
        break;
      }
      let pos = self.current_pos();
      self.advance();
      expr = Expr::UnaryExpression {
        op,
        operand: Box::new(expr),
        is_postfix: true,
        retain_value: true,
        ty: None,
        pos: Some(pos),
      };
    }
    expr
  }

  /// Level 12: primary plus chained `.name`, `.name(args)`, `::name`,
  /// `::name(args)`, and `[expr]` suffixes.
  fn parse_chain(&mut self, sink: &mut ReportSink) -> Expr {
    let mut expr = self.parse_primary(sink);
    loop {
      match self.peek_kind() {
        TokenKind::Dot => {
          self.advance();
          let (name, pos) = self.parse_simple_name(sink);
          if self.check(TokenKind::LeftParen) {
            let args = self.parse_args(sink);
            expr = Expr::FunctionCall {
              owner_ref: None,
              previous: Some(Box::new(expr)),
              name,
              args,
              in_companion: false,
              signature: None,
              ty: None,
              pos: Some(pos),
            };
          } else {
            expr = Expr::IdentifierCall {
              owner_ref: None,
              previous: Some(Box::new(expr)),
              name,
              index: None,
              ty: None,
              is_companion_field: false,
              pos: Some(pos),
            };
          }
        },
        TokenKind::ColonColon => {
          self.advance();
          let (name, pos) = self.parse_simple_name(sink);
          let owner_ref = expr_to_reference(&expr);
          let previous = if owner_ref.is_some() { None } else { Some(Box::new(expr)) };
          if self.check(TokenKind::LeftParen) {
            let args = self.parse_args(sink);
            expr = Expr::FunctionCall {
              owner_ref,
              previous,
              name,
              args,
              in_companion: true,
              signature: None,
              ty: None,
              pos: Some(pos),
            };
          } else {
            expr = Expr::IdentifierCall {
              owner_ref,
              previous,
              name,
              index: None,
              ty: None,
              is_companion_field: true,
              pos: Some(pos),
            };
          }
        },
        TokenKind::LeftBracket => {
          let pos = self.current_pos();
          self.advance();
          let index_expr = self.parse_expression(sink);
          self.expect(TokenKind::RightBracket, DiagnosticCode::MissingClosingBracket, "']'", sink);
          expr = Expr::IndexExpression {
            previous: Box::new(expr),
            index_expr: Box::new(index_expr),
            ty: None,
            cast_to: None,
            is_assigned_by: false,
            pos: Some(pos),
          };
        },
        _ => break,
      }
    }
    expr
  }

  fn parse_primary(&mut self, sink: &mut ReportSink) -> Expr {
    let pos = self.current_pos();
    match self.peek_kind() {
      TokenKind::Int | TokenKind::Float | TokenKind::Char | TokenKind::Str | TokenKind::True | TokenKind::False | TokenKind::Null => {
        let tok = self.advance();
        let is_f64_suffix = tok.kind == TokenKind::Float && tok.lexeme.ends_with(['d', 'D']);
        Expr::Literal {
          value: literal_from_token(&tok.literal, is_f64_suffix),
          ty: None,
          cast_to: None,
          pos: Some(pos),
        }
      },
      TokenKind::LeftParen => {
        self.advance();
        let inner = self.parse_expression(sink);
        self.expect(TokenKind::RightParen, DiagnosticCode::MissingClosingParen, "')'", sink);
        Expr::ParenthesizedExpression {
          inner: Box::new(inner),
          pos: Some(pos),
        }
      },
      TokenKind::New => {
        self.advance();
        let (segments, ref_pos) = self.parse_dotted_name(sink);
        let args = if self.check(TokenKind::LeftParen) { self.parse_args(sink) } else { Vec::new() };
        Expr::ConstructorCall {
          owner_ref: Reference::new(segments, Some(ref_pos)),
          args,
          signature: None,
          ty: None,
          pos: Some(pos),
        }
      },
      TokenKind::SelfKw => {
        self.advance();
        Expr::IdentifierCall {
          owner_ref: None,
          previous: None,
          name: "self".to_string(),
          index: None,
          ty: None,
          is_companion_field: false,
          pos: Some(pos),
        }
      },
      TokenKind::Identifier => {
        let tok = self.advance();
        if self.check(TokenKind::Colon) {
          self.advance();
          let type_ref = TypeRef::Named(Reference::new(vec![tok.lexeme], Some(pos)));
          self.parse_array_tail(type_ref, pos, sink)
        } else if self.check(TokenKind::LeftParen) {
          let args = self.parse_args(sink);
          Expr::FunctionCall {
            owner_ref: None,
            previous: None,
            name: tok.lexeme,
            args,
            in_companion: false,
            signature: None,
            ty: None,
            pos: Some(pos),
          }
        } else {
          Expr::IdentifierCall {
            owner_ref: None,
            previous: None,
            name: tok.lexeme,
            index: None,
            ty: None,
            is_companion_field: false,
            pos: Some(pos),
          }
        }
      },
      TokenKind::Colon => {
        self.advance();
        self.expect(TokenKind::LeftBrace, DiagnosticCode::MissingClosingBrace, "'{'", sink);
        let elements = self.parse_expr_list_until(TokenKind::RightBrace, sink);
        self.expect(TokenKind::RightBrace, DiagnosticCode::MissingClosingBrace, "'}'", sink);
        Expr::ArrayInitialization {
          infer_type_ref: None,
          elements,
          ty: None,
          pos: Some(pos),
        }
      },
      _ => {
        let found = self.peek().clone();
        self.error(
          DiagnosticCode::UnexpectedToken,
          format!("expected an expression, found {:?}", found.kind),
          found.pos,
          sink,
        );
        self.advance();
        Expr::Literal {
          value: Literal::Null,
          ty: None,
          cast_to: None,
          pos: Some(pos),
        }
      },
    }
  }

  /// Parses the `[dim]... { elements? }` tail of array syntax following a
  /// type name and `:` (§4.1's array grammar).
  fn parse_array_tail(&mut self, base_type_ref: TypeRef, start_pos: Position, sink: &mut ReportSink) -> Expr {
    let mut dimensions = Vec::new();
    while self.check(TokenKind::LeftBracket) {
      self.advance();
      if self.check(TokenKind::RightBracket) {
        self.error(
          DiagnosticCode::DimensionMismatch,
          "array dimension expression expected inside '['",
          self.current_pos(),
          sink,
        );
        dimensions.push(Expr::Literal {
          value: Literal::Null,
          ty: None,
          cast_to: None,
          pos: Some(self.current_pos()),
        });
      } else {
        dimensions.push(self.parse_expression(sink));
      }
      self.expect(TokenKind::RightBracket, DiagnosticCode::MissingClosingBracket, "']'", sink);
    }

    self.expect(TokenKind::LeftBrace, DiagnosticCode::MissingClosingBrace, "'{'", sink);
    let elements = if self.check(TokenKind::RightBrace) {
      Vec::new()
    } else {
      self.parse_expr_list_until(TokenKind::RightBrace, sink)
    };
    self.expect(TokenKind::RightBrace, DiagnosticCode::MissingClosingBrace, "'}'", sink);

    if dimensions.is_empty() {
      Expr::ArrayInitialization {
        infer_type_ref: Some(base_type_ref),
        elements,
        ty: None,
        pos: Some(start_pos),
      }
    } else {
      Expr::ArrayDeclaration {
        base_type_ref,
        dimensions,
        ty: None,
        pos: Some(start_pos),
      }
    }
  }

  fn parse_args(&mut self, sink: &mut ReportSink) -> Vec<Expr> {
    self.expect(TokenKind::LeftParen, DiagnosticCode::MissingClosingParen, "'('", sink);
    let args = if self.check(TokenKind::RightParen) {
      Vec::new()
    } else {
      self.parse_expr_list_until(TokenKind::RightParen, sink)
    };
    self.expect(TokenKind::RightParen, DiagnosticCode::MissingClosingParen, "')'", sink);
    args
  }

  fn parse_expr_list_until(&mut self, end: TokenKind, sink: &mut ReportSink) -> Vec<Expr> {
    let mut exprs = vec![self.parse_expression(sink)];
    while self.match_kind(TokenKind::Comma) {
      if self.check(end) {
        break;
      }
      exprs.push(self.parse_expression(sink));
    }
    exprs
  }
}

fn binary(left: Expr, op: BinaryOp, right: Expr, pos: Position) -> Expr {
  Expr::BinaryExpression {
    left: Box::new(left),
    op,
    right: Box::new(right),
    ty: None,
    left_cast_to: None,
    right_cast_to: None,
    pos: Some(pos),
  }
}

fn literal_from_token(literal: &TokenLiteral, is_f64_suffix: bool) -> Literal {
  match literal {
    TokenLiteral::Int(v) => Literal::Int(*v),
    TokenLiteral::Float(v) => Literal::Float(*v, is_f64_suffix),
    TokenLiteral::Char(v) => Literal::Char(*v),
    TokenLiteral::Str(v) => Literal::Str(v.clone()),
    TokenLiteral::Bool(v) => Literal::Bool(*v),
    TokenLiteral::Null | TokenLiteral::None => Literal::Null,
  }
}

/// Reduces a pure `.`-chain of identifier-calls down to a dotted `Reference`,
/// used to decide whether a `::` suffix targets a type path (`owner_ref`) or
/// an arbitrary instance expression (`previous`).
fn expr_to_reference(expr: &Expr) -> Option<Reference> {
  match expr {
    Expr::IdentifierCall {
      owner_ref: None,
      previous: None,
      name,
      pos,
      ..
    } => Some(Reference::new(vec![name.clone()], *pos)),
    Expr::IdentifierCall {
      owner_ref: None,
      previous: Some(previous),
      name,
      pos,
      ..
    } => {
      let mut reference = expr_to_reference(previous)?;
      reference.path.push(name.clone());
      reference.pos = *pos;
      Some(reference)
    },
    _ => None,
  }
}
