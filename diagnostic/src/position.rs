/// A source span expressed as a (line, column) pair at each end, 1-indexed.
///
/// Every AST node carries an `Option<Position>` rather than owning a reference
/// into the source text, so positions survive past the lifetime of the token
/// stream that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
  pub start_line: usize,
  pub start_col: usize,
  pub end_line: usize,
  pub end_col: usize,
}

impl Position {
  pub fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
    Self {
      start_line,
      start_col,
      end_line,
      end_col,
    }
  }

  pub fn point(line: usize, col: usize) -> Self {
    Self::new(line, col, line, col)
  }

  /// Combines two positions into the smallest span covering both, taking
  /// `self` as the start and `other` as the end of the resulting span.
  pub fn extend(&self, other: &Position) -> Position {
    Position::new(self.start_line, self.start_col, other.end_line, other.end_col)
  }

  pub fn length(&self) -> usize {
    if self.end_line != self.start_line {
      return 1;
    }
    self.end_col.saturating_sub(self.start_col).max(1)
  }
}
