use diagnostic::{Diagnostic, DiagnosticCode, Position, ReportSink};

use crate::{
  token::{
    types::{Literal, TokenKind},
    Token,
  },
  Scanner,
};

impl Scanner {
  /// Scans the whole of `self.source` into `self.tokens`, appending a
  /// trailing `Eof` token. Never panics: an unrecognized character is
  /// reported and skipped (§4.0).
  pub fn get_tokens(&mut self, sink: &mut ReportSink) {
    while !self.is_at_end() {
      self.start = self.current;
      let start_line = self.line;
      let start_col = self.column;
      let c = self.advance();

      let kind = match c {
        '{' => Some(TokenKind::LeftBrace),
        '}' => Some(TokenKind::RightBrace),
        '(' => Some(TokenKind::LeftParen),
        ')' => Some(TokenKind::RightParen),
        '[' => Some(TokenKind::LeftBracket),
        ']' => Some(TokenKind::RightBracket),
        ',' => Some(TokenKind::Comma),
        ';' => Some(TokenKind::SemiColon),

        // According to the maximal munch rule, +++a is tokenized as '++' '+a', not '+' '++a'.
        '+' => {
          if self.match_char('+') {
            self.advance();
            Some(TokenKind::PlusPlus)
          } else {
            Some(TokenKind::Plus)
          }
        },

        // '-' stays a standalone token even before a digit; negative literals
        // are a unary expression at the parser layer, not a lexical concern.
        '-' => {
          if self.match_char('-') {
            self.advance();
            Some(TokenKind::MinusMinus)
          } else {
            Some(TokenKind::Minus)
          }
        },

        '*' => Some(TokenKind::Star),
        '%' => Some(TokenKind::Percent),
        '/' => self.tokenize_slash(sink, start_line, start_col),

        '"' | '\'' => Some(self.tokenize_quoted(c, sink, start_line, start_col)),

        '!' => {
          if self.match_char('=') {
            self.advance();
            Some(TokenKind::BangEqual)
          } else {
            Some(TokenKind::Bang)
          }
        },
        '=' => {
          if self.match_char('=') {
            self.advance();
            Some(TokenKind::EqualEqual)
          } else {
            Some(TokenKind::Equal)
          }
        },
        '<' => {
          if self.match_char('=') {
            self.advance();
            Some(TokenKind::LessEqual)
          } else if self.match_char('<') {
            self.advance();
            Some(TokenKind::LessLess)
          } else {
            Some(TokenKind::Less)
          }
        },
        '>' => {
          if self.match_char('=') {
            self.advance();
            Some(TokenKind::GreaterEqual)
          } else if self.match_char('>') {
            self.advance();
            if self.match_char('>') {
              self.advance();
              Some(TokenKind::GreaterGreaterGreater)
            } else {
              Some(TokenKind::GreaterGreater)
            }
          } else {
            Some(TokenKind::Greater)
          }
        },
        '|' => {
          if self.match_char('|') {
            self.advance();
            Some(TokenKind::PipePipe)
          } else {
            Some(TokenKind::Pipe)
          }
        },
        '&' => {
          if self.match_char('&') {
            self.advance();
            Some(TokenKind::AmpAmp)
          } else {
            Some(TokenKind::Amp)
          }
        },
        '^' => Some(TokenKind::Caret),
        '~' => Some(TokenKind::Tilde),
        '?' => Some(TokenKind::Question),

        ':' => {
          if self.match_char('=') {
            self.advance();
            Some(TokenKind::ColonEqual)
          } else if self.match_char(':') {
            self.advance();
            Some(TokenKind::ColonColon)
          } else {
            Some(TokenKind::Colon)
          }
        },

        '.' => self.tokenize_dot(),

        ' ' | '\r' | '\t' => None,
        '\n' => {
          self.column = 0;
          self.line += 1;
          None
        },

        'a'..='z' | 'A'..='Z' | '_' => Some(self.tokenize_identifier_or_keyword()),
        '0'..='9' => Some(self.tokenize_number()),

        _ => {
          sink.emit(Diagnostic::at(
            DiagnosticCode::InvalidCharacter,
            format!("unexpected character {c:?}"),
            "input",
            Position::point(start_line, start_col),
          ));
          None
        },
      };

      if let Some(kind) = kind {
        self.add_token(kind, start_line, start_col);
      }
    }

    self.tokens.push(Token::new(
      TokenKind::Eof,
      String::new(),
      Literal::None,
      Position::point(self.line, self.column),
    ));
  }

  /// `.` followed directly by a digit starts a fractional literal (`.5`);
  /// otherwise it's the member-access/chain operator.
  fn tokenize_dot(&mut self) -> Option<TokenKind> {
    if let Some(c) = self.peek() {
      if c.is_ascii_digit() {
        while let Some(c) = self.peek() {
          if !c.is_ascii_digit() {
            break;
          }
          self.advance();
        }
        return Some(TokenKind::Float);
      }
    }
    Some(TokenKind::Dot)
  }

  /// Strings (`"..."`) and chars (`'.'`) share quote-matching logic; the
  /// opening quote character decides which literal kind results.
  fn tokenize_quoted(
    &mut self,
    quote: char,
    sink: &mut ReportSink,
    start_line: usize,
    start_col: usize,
  ) -> TokenKind {
    let mut terminated = false;
    while let Some(c) = self.peek() {
      self.advance();
      if c == quote {
        terminated = true;
        break;
      }
      if c == '\n' {
        self.line += 1;
        self.column = 0;
      }
    }

    if !terminated {
      sink.emit(Diagnostic::at(
        DiagnosticCode::UnterminatedString,
        "unterminated string or char literal",
        "input",
        Position::new(start_line, start_col, self.line, self.column),
      ));
    }

    if quote == '\'' {
      TokenKind::Char
    } else {
      TokenKind::Str
    }
  }

  /// `/` starts a line comment, a block comment, or stands alone as division.
  /// Comments produce no token, hence the `Option` return.
  fn tokenize_slash(
    &mut self,
    sink: &mut ReportSink,
    start_line: usize,
    start_col: usize,
  ) -> Option<TokenKind> {
    if self.match_char('/') {
      self.advance();
      while let Some(c) = self.peek() {
        if c == '\n' {
          break;
        }
        self.advance();
      }
      None
    } else if self.match_char('*') {
      self.advance();
      let mut closed = false;
      while !self.is_at_end() {
        if self.peek() == Some('*') && self.peek_next() == Some('/') {
          self.advance();
          self.advance();
          closed = true;
          break;
        }
        let c = self.advance();
        if c == '\n' {
          self.column = 0;
          self.line += 1;
        }
      }
      if !closed {
        sink.emit(Diagnostic::at(
          DiagnosticCode::UnterminatedComment,
          "unterminated block comment",
          "input",
          Position::new(start_line, start_col, self.line, self.column),
        ));
      }
      None
    } else {
      Some(TokenKind::Slash)
    }
  }

  fn tokenize_number(&mut self) -> TokenKind {
    let mut is_float = false;
    while let Some(c) = self.peek() {
      if c.is_ascii_digit() {
        self.advance();
      } else if c == '.' && !is_float && matches!(self.peek_next(), Some(next) if next.is_ascii_digit()) {
        is_float = true;
        self.advance();
      } else {
        break;
      }
    }
    // Optional trailing `D`/`d` suffix forcing f64, part of the lexeme; the
    // checker inspects it rather than the scanner distinguishing f32/f64.
    if matches!(self.peek(), Some('d') | Some('D')) {
      is_float = true;
      self.advance();
    }

    if is_float {
      TokenKind::Float
    } else {
      TokenKind::Int
    }
  }

  fn tokenize_identifier_or_keyword(&mut self) -> TokenKind {
    while let Some(c) = self.peek() {
      if c.is_ascii_alphanumeric() || c == '_' {
        self.advance();
      } else {
        break;
      }
    }

    let lexeme = self.current_lexeme();
    match lexeme {
      "true" => TokenKind::True,
      "false" => TokenKind::False,
      "null" => TokenKind::Null,
      _ => TokenKind::keyword_kind(lexeme).unwrap_or(TokenKind::Identifier),
    }
  }

  fn add_token(&mut self, kind: TokenKind, start_line: usize, start_col: usize) {
    let mut lexeme = self.current_lexeme().to_string();
    let literal = self.literal_for(&kind, &lexeme);

    if (kind == TokenKind::Str || kind == TokenKind::Char) && lexeme.len() >= 2 {
      lexeme = lexeme[1..lexeme.len() - 1].to_string();
    }

    self.tokens.push(Token::new(
      kind,
      lexeme,
      literal,
      Position::new(start_line, start_col, self.line, self.column),
    ));
  }

  fn literal_for(&self, kind: &TokenKind, lexeme: &str) -> Literal {
    match kind {
      TokenKind::Int => lexeme.parse::<i64>().map(Literal::Int).unwrap_or(Literal::None),
      TokenKind::Float => {
        let trimmed = lexeme.trim_end_matches(['d', 'D']);
        trimmed.parse::<f64>().map(Literal::Float).unwrap_or(Literal::None)
      },
      TokenKind::Str => Literal::Str(lexeme[1..lexeme.len() - 1].to_string()),
      TokenKind::Char => lexeme
        .chars()
        .nth(1)
        .map(Literal::Char)
        .unwrap_or(Literal::None),
      TokenKind::True => Literal::Bool(true),
      TokenKind::False => Literal::Bool(false),
      TokenKind::Null => Literal::Null,
      _ => Literal::None,
    }
  }

  fn is_at_end(&self) -> bool {
    self.current >= self.source.len()
  }

  fn advance(&mut self) -> char {
    let c = self.peek().expect("advance called at end of input");
    self.current += c.len_utf8();
    self.column += 1;
    c
  }

  fn peek(&self) -> Option<char> {
    self.source[self.current..].chars().next()
  }

  fn peek_next(&self) -> Option<char> {
    let mut chars = self.source[self.current..].chars();
    chars.next()?;
    chars.next()
  }

  fn current_lexeme(&self) -> &str {
    &self.source[self.start..self.current]
  }

  fn match_char(&self, expected: char) -> bool {
    self.peek() == Some(expected)
  }
}
