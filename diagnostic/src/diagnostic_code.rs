/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Error,
  Warning,
  Note,
  Help,
}

/// Unique identifier for each distinguishable diagnostic reported by the
/// scanner, parser, or checker. Grouped the way the taxonomy table groups
/// them: lexical/structural, declaration, name resolution, typing,
/// mutability/visibility, style, internal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
  // Lexical / structural
  InvalidCharacter,
  UnterminatedString,
  UnterminatedComment,
  UnexpectedToken,
  MissingClosingBrace,
  MissingClosingParen,
  MissingClosingBracket,

  // Declaration
  DuplicateField,
  DuplicateFunction,
  DuplicateConstructor,
  DuplicateAccessBlock,
  NestedCompanionBlock,
  ConstructorInCompanion,
  MutableConstructor,
  DuplicateParameterName,
  InvalidModifierOrder,
  DuplicateVariable,

  // Name resolution
  UnknownTypeSymbol,
  UnknownIdentifier,
  UnknownFunction,
  UnknownField,

  // Typing
  TypeMismatch,
  NonNumericOperand,
  NonIntegerOperand,
  NonBooleanOperand,
  DimensionMismatch,
  NonArrayIndexed,
  UnitTypeInVariable,
  AmbiguousOverload,

  // Mutability / visibility
  ImmutableAssignment,
  NonCompanionAccessFromCompanion,
  InvalidAssignmentTarget,
  PrivateMemberAccess,

  // Style / redundancy (warnings)
  RedundantPublicAccessor,
  UnusedExpression,
  DuplicateCompanionBlockWarning,

  // Internal
  InternalCompilerError,
}

impl DiagnosticCode {
  pub fn code(&self) -> &'static str {
    match self {
      Self::InvalidCharacter => "E0001",
      Self::UnterminatedString => "E0002",
      Self::UnterminatedComment => "E0003",
      Self::UnexpectedToken => "E0100",
      Self::MissingClosingBrace => "E0101",
      Self::MissingClosingParen => "E0102",
      Self::MissingClosingBracket => "E0103",

      Self::DuplicateField => "E0200",
      Self::DuplicateFunction => "E0201",
      Self::DuplicateConstructor => "E0202",
      Self::DuplicateAccessBlock => "E0203",
      Self::NestedCompanionBlock => "E0204",
      Self::ConstructorInCompanion => "E0205",
      Self::MutableConstructor => "E0206",
      Self::DuplicateParameterName => "E0207",
      Self::InvalidModifierOrder => "E0208",
      Self::DuplicateVariable => "E0209",

      Self::UnknownTypeSymbol => "E0300",
      Self::UnknownIdentifier => "E0301",
      Self::UnknownFunction => "E0302",
      Self::UnknownField => "E0303",

      Self::TypeMismatch => "E0400",
      Self::NonNumericOperand => "E0401",
      Self::NonIntegerOperand => "E0402",
      Self::NonBooleanOperand => "E0403",
      Self::DimensionMismatch => "E0404",
      Self::NonArrayIndexed => "E0405",
      Self::UnitTypeInVariable => "E0406",
      Self::AmbiguousOverload => "E0407",

      Self::ImmutableAssignment => "E0500",
      Self::NonCompanionAccessFromCompanion => "E0501",
      Self::InvalidAssignmentTarget => "E0502",
      Self::PrivateMemberAccess => "E0503",

      Self::RedundantPublicAccessor => "W0001",
      Self::UnusedExpression => "W0002",
      Self::DuplicateCompanionBlockWarning => "W0003",

      Self::InternalCompilerError => "W0900",
    }
  }

  pub fn severity(&self) -> Severity {
    match self {
      Self::RedundantPublicAccessor
      | Self::UnusedExpression
      | Self::DuplicateCompanionBlockWarning
      | Self::InternalCompilerError => Severity::Warning,
      _ => Severity::Error,
    }
  }
}
