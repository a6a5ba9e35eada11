use diagnostic::ReportSink;

use crate::token::Token;

pub mod token;
mod utils;

/// A hand-written, regular-grammar tokenizer. Owns the source text it scans
/// and produces an owned `Vec<Token>` terminated by `Eof`; never panics on
/// malformed input (§4.0).
pub struct Scanner {
  pub tokens: Vec<Token>,
  pub source: String,
  pub line: usize,
  pub column: usize,
  pub current: usize,
  pub start: usize,
}

impl Default for Scanner {
  fn default() -> Self {
    Self::new()
  }
}

impl Scanner {
  pub fn new() -> Self {
    Self {
      source: String::new(),
      line: 1,
      column: 0,
      start: 0,
      current: 0,
      tokens: vec![],
    }
  }

  /// Scans `source` into `self.tokens`, returning the tokens by reference.
  /// Lexical errors are appended to `sink` and do not stop the scan.
  pub fn scan(&mut self, source: &str, sink: &mut ReportSink) -> &[Token] {
    self.source = source.to_string();
    self.get_tokens(sink);
    &self.tokens
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::token::types::TokenKind;

  #[test]
  fn scans_empty_source_to_a_lone_eof() {
    let mut scanner = Scanner::new();
    let mut sink = ReportSink::new();
    let tokens = scanner.scan("", &mut sink);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
  }

  #[test]
  fn recognizes_keywords_and_identifiers() {
    let mut scanner = Scanner::new();
    let mut sink = ReportSink::new();
    let tokens = scanner.scan("class Foo mut bar", &mut sink);
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
      kinds,
      vec![
        TokenKind::Class,
        TokenKind::Identifier,
        TokenKind::Mut,
        TokenKind::Identifier,
        TokenKind::Eof,
      ]
    );
  }

  #[test]
  fn maximal_munch_on_walrus_and_double_colon() {
    let mut scanner = Scanner::new();
    let mut sink = ReportSink::new();
    let tokens = scanner.scan("x := 1 y::z", &mut sink);
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
      kinds,
      vec![
        TokenKind::Identifier,
        TokenKind::ColonEqual,
        TokenKind::Int,
        TokenKind::Identifier,
        TokenKind::ColonColon,
        TokenKind::Identifier,
        TokenKind::Eof,
      ]
    );
  }

  #[test]
  fn unterminated_string_is_reported_not_panicked() {
    let mut scanner = Scanner::new();
    let mut sink = ReportSink::new();
    scanner.scan("\"abc", &mut sink);
    assert!(sink.has_errors());
  }
}
