use diagnostic::Position;

use crate::types::Type;

/// A fully-qualified dotted name plus its simple (last-segment) name.
/// References are structural: two references with the same `path` compare
/// equal regardless of where they were parsed.
#[derive(Debug, Clone)]
pub struct Reference {
  pub path: Vec<String>,
  pub pos: Option<Position>,
}

impl Reference {
  pub fn new(path: Vec<String>, pos: Option<Position>) -> Self {
    Self { path, pos }
  }

  pub fn simple_name(&self) -> &str {
    self.path.last().map(String::as_str).unwrap_or("")
  }

  pub fn to_dotted(&self) -> String {
    self.path.join(".")
  }
}

impl PartialEq for Reference {
  fn eq(&self, other: &Self) -> bool {
    self.path == other.path
  }
}
impl Eq for Reference {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Accessor {
  Priv,
  Intl,
  Prot,
  #[default]
  Pub,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
  Named(Reference),
  Array(Box<TypeRef>),
}

#[derive(Debug, Clone)]
pub struct Usage {
  pub reference: Reference,
  pub alias: Option<String>,
  pub pos: Option<Position>,
}

#[derive(Debug, Clone)]
pub struct Parameter {
  pub mutable: bool,
  pub name: String,
  pub type_ref: TypeRef,
  pub ty: Option<Type>,
  pub pos: Option<Position>,
}

#[derive(Debug, Clone)]
pub struct Field {
  pub owner: Option<Reference>,
  pub accessor: Accessor,
  pub mutable: bool,
  pub companion: bool,
  pub name: String,
  pub type_ref: TypeRef,
  pub ty: Option<Type>,
  pub pos: Option<Position>,
}

#[derive(Debug, Clone)]
pub struct Function {
  pub owner: Option<Reference>,
  pub accessor: Accessor,
  pub mutable: bool,
  pub companion: bool,
  pub name: String,
  pub params: Vec<Parameter>,
  pub return_type_ref: Option<TypeRef>,
  pub return_type: Option<Type>,
  pub statements: Vec<Stmt>,
  pub pos: Option<Position>,
}

#[derive(Debug, Clone)]
pub struct Constructor {
  pub owner: Option<Reference>,
  pub parent_ref: Option<Reference>,
  pub accessor: Accessor,
  pub params: Vec<Parameter>,
  /// Placeholder for parent-chain (`super(...)`) call arguments; never
  /// required to resolve for the constructor to type-check (§9).
  pub super_args: Option<Vec<Expr>>,
  pub statements: Vec<Stmt>,
  pub pos: Option<Position>,
}

#[derive(Debug, Clone)]
pub struct Class {
  pub pkg: Option<Vec<String>>,
  pub usages: Vec<Usage>,
  pub accessor: Accessor,
  pub name: String,
  pub fields: Vec<Field>,
  pub constructors: Vec<Constructor>,
  pub functions: Vec<Function>,
  pub pos: Option<Position>,
}

#[derive(Debug, Clone)]
pub struct File {
  pub path: String,
  pub clazz: Class,
}

// ---------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Stmt {
  VariableDeclaration {
    mutable: bool,
    name: String,
    expr: Expr,
    index: Option<usize>,
    pos: Option<Position>,
  },
  ExpressionStatement {
    expr: Expr,
    pos: Option<Position>,
  },
  ReturnStatement {
    expr: Option<Expr>,
    return_type: Option<Type>,
    pos: Option<Position>,
  },
  IfStatement {
    cond: Expr,
    then: Box<Stmt>,
    else_branch: Option<Box<Stmt>>,
    pos: Option<Position>,
  },
  JForStatement {
    init: Option<Box<Stmt>>,
    cond: Option<Expr>,
    post: Option<Expr>,
    body: Box<Stmt>,
    pos: Option<Position>,
  },
  BlockStatement {
    statements: Vec<Stmt>,
    pos: Option<Position>,
  },
}

impl Stmt {
  pub fn pos(&self) -> Option<Position> {
    match self {
      Stmt::VariableDeclaration { pos, .. }
      | Stmt::ExpressionStatement { pos, .. }
      | Stmt::ReturnStatement { pos, .. }
      | Stmt::IfStatement { pos, .. }
      | Stmt::JForStatement { pos, .. }
      | Stmt::BlockStatement { pos, .. } => *pos,
    }
  }
}

// ---------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
  Plus,
  Minus,
  Not,
  BitNot,
  Increment,
  Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
  Rem,
  Lt,
  Le,
  Gt,
  Ge,
  Eq,
  Ne,
  And,
  Or,
  BitAnd,
  BitOr,
  BitXor,
  Shl,
  Shr,
  UShr,
}

#[derive(Debug, Clone)]
pub enum Literal {
  Int(i64),
  /// `D`/`d`-suffixed float literals are forced to `F64`; otherwise a float
  /// literal defaults to `F32` (§4.3). The bool records whether the suffix
  /// was present in the source lexeme.
  Float(f64, bool),
  Char(char),
  Str(String),
  Bool(bool),
  Null,
}

#[derive(Debug, Clone)]
pub enum Expr {
  Literal {
    value: Literal,
    ty: Option<Type>,
    cast_to: Option<Type>,
    pos: Option<Position>,
  },
  IdentifierCall {
    owner_ref: Option<Reference>,
    previous: Option<Box<Expr>>,
    name: String,
    index: Option<usize>,
    ty: Option<Type>,
    is_companion_field: bool,
    pos: Option<Position>,
  },
  FunctionCall {
    owner_ref: Option<Reference>,
    previous: Option<Box<Expr>>,
    name: String,
    args: Vec<Expr>,
    in_companion: bool,
    signature: Option<crate::types::Signature>,
    ty: Option<Type>,
    pos: Option<Position>,
  },
  ConstructorCall {
    owner_ref: Reference,
    args: Vec<Expr>,
    signature: Option<crate::types::Signature>,
    ty: Option<Type>,
    pos: Option<Position>,
  },
  IndexExpression {
    previous: Box<Expr>,
    index_expr: Box<Expr>,
    ty: Option<Type>,
    cast_to: Option<Type>,
    is_assigned_by: bool,
    pos: Option<Position>,
  },
  UnaryExpression {
    op: UnaryOp,
    operand: Box<Expr>,
    is_postfix: bool,
    retain_value: bool,
    ty: Option<Type>,
    pos: Option<Position>,
  },
  BinaryExpression {
    left: Box<Expr>,
    op: BinaryOp,
    right: Box<Expr>,
    ty: Option<Type>,
    left_cast_to: Option<Type>,
    right_cast_to: Option<Type>,
    pos: Option<Position>,
  },
  AssignmentExpression {
    left: Box<Expr>,
    right: Box<Expr>,
    retain_value: bool,
    ty: Option<Type>,
    pos: Option<Position>,
  },
  ParenthesizedExpression {
    inner: Box<Expr>,
    pos: Option<Position>,
  },
  ArrayInitialization {
    infer_type_ref: Option<TypeRef>,
    elements: Vec<Expr>,
    ty: Option<Type>,
    pos: Option<Position>,
  },
  ArrayDeclaration {
    base_type_ref: TypeRef,
    dimensions: Vec<Expr>,
    ty: Option<Type>,
    pos: Option<Position>,
  },
}

impl Expr {
  pub fn pos(&self) -> Option<Position> {
    match self {
      Expr::Literal { pos, .. }
      | Expr::IdentifierCall { pos, .. }
      | Expr::FunctionCall { pos, .. }
      | Expr::ConstructorCall { pos, .. }
      | Expr::IndexExpression { pos, .. }
      | Expr::UnaryExpression { pos, .. }
      | Expr::BinaryExpression { pos, .. }
      | Expr::AssignmentExpression { pos, .. }
      | Expr::ParenthesizedExpression { pos, .. }
      | Expr::ArrayInitialization { pos, .. }
      | Expr::ArrayDeclaration { pos, .. } => *pos,
    }
  }

  /// True for the expression kinds §4.3 treats as "worth keeping for its
  /// effect" in an `ExpressionStatement` — assignment, any call, or a
  /// prefix/postfix increment/decrement.
  pub fn has_side_effect(&self) -> bool {
    matches!(
      self,
      Expr::AssignmentExpression { .. } | Expr::FunctionCall { .. } | Expr::ConstructorCall { .. }
    ) || matches!(
      self,
      Expr::UnaryExpression { op: UnaryOp::Increment | UnaryOp::Decrement, .. }
    )
  }
}
