use diagnostic::{Diagnostic, DiagnosticCode, Position, ReportSink};
use scanner::token::{types::TokenKind, Token};

use crate::ast::File;

mod decl;
mod expr;
mod stmt;

/// The one configurable knob the grammar actually needs: whether an explicit
/// `pub` accessor should be warned on as redundant (§4.1). Not a config-file
/// or env-backed system — just a constructor argument with a sane default.
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
  pub warn_redundant_pub: bool,
}

impl Default for ParserOptions {
  fn default() -> Self {
    Self {
      warn_redundant_pub: true,
    }
  }
}

/// A hand-written recursive-descent parser. Never panics on malformed input:
/// `expect` reports and advances past the offending token instead of
/// aborting, so a single syntax error does not stop the rest of the file
/// from being parsed (§4.1).
pub struct Parser {
  pub(crate) tokens: Vec<Token>,
  pub(crate) current: usize,
  pub(crate) path: String,
  pub(crate) options: ParserOptions,
}

impl Parser {
  pub fn new(path: impl Into<String>, tokens: Vec<Token>) -> Self {
    Self::with_options(path, tokens, ParserOptions::default())
  }

  pub fn with_options(path: impl Into<String>, tokens: Vec<Token>, options: ParserOptions) -> Self {
    Self {
      tokens,
      current: 0,
      path: path.into(),
      options,
    }
  }

  /// Parses the whole token stream into a `File`. Always returns a `File`
  /// even when the source is malformed — reports accumulate in `sink`.
  pub fn parse(&mut self, sink: &mut ReportSink) -> File {
    self.parse_file(sink)
  }

  // -- cursor primitives --------------------------------------------------

  pub(crate) fn is_at_end(&self) -> bool {
    matches!(self.peek_kind(), TokenKind::Eof)
  }

  pub(crate) fn peek(&self) -> &Token {
    &self.tokens[self.current.min(self.tokens.len() - 1)]
  }

  pub(crate) fn peek_kind(&self) -> TokenKind {
    self.peek().kind
  }

  pub(crate) fn peek_at(&self, offset: usize) -> TokenKind {
    self
      .tokens
      .get(self.current + offset)
      .map(|t| t.kind)
      .unwrap_or(TokenKind::Eof)
  }

  pub(crate) fn advance(&mut self) -> Token {
    let tok = self.tokens[self.current.min(self.tokens.len() - 1)].clone();
    if !self.is_at_end() {
      self.current += 1;
    }
    tok
  }

  pub(crate) fn check(&self, kind: TokenKind) -> bool {
    self.peek_kind() == kind
  }

  pub(crate) fn match_kind(&mut self, kind: TokenKind) -> bool {
    if self.check(kind) {
      self.advance();
      true
    } else {
      false
    }
  }

  pub(crate) fn current_pos(&self) -> Position {
    self.peek().pos
  }

  /// Consumes `kind` or reports `code` and advances past the offending
  /// token anyway, so the caller can keep parsing (§4.1's `assert`).
  pub(crate) fn expect(&mut self, kind: TokenKind, code: DiagnosticCode, what: &str, sink: &mut ReportSink) -> Token {
    if self.check(kind) {
      self.advance()
    } else {
      let found = self.peek().clone();
      sink.emit(Diagnostic::at(
        code,
        format!("expected {what}, found {:?}", found.kind),
        &self.path,
        found.pos,
      ));
      self.advance()
    }
  }

  pub(crate) fn error(&mut self, code: DiagnosticCode, message: impl Into<String>, pos: Position, sink: &mut ReportSink) {
    sink.emit(Diagnostic::at(code, message, &self.path, pos));
  }

  pub(crate) fn warn(&mut self, code: DiagnosticCode, message: impl Into<String>, pos: Position, sink: &mut ReportSink) {
    sink.emit(Diagnostic::at(code, message, &self.path, pos));
  }
}
