use crate::ast::Reference;

/// The built-in scalar kinds. Ordered by `rank()` so promotion is a total
/// order: `I8 < I16 < I32 < I64 < F32 < F64` (§4.3, §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
  Bool,
  Char,
  I8,
  I16,
  I32,
  I64,
  F32,
  F64,
  Str,
  Null,
  Unit,
}

impl PrimitiveType {
  /// Numeric rank used for promotion; `None` for non-numeric primitives.
  pub fn rank(&self) -> Option<u8> {
    match self {
      PrimitiveType::I8 => Some(0),
      PrimitiveType::I16 => Some(1),
      PrimitiveType::I32 => Some(2),
      PrimitiveType::I64 => Some(3),
      PrimitiveType::F32 => Some(4),
      PrimitiveType::F64 => Some(5),
      _ => None,
    }
  }

  pub fn is_numeric(&self) -> bool {
    self.rank().is_some()
  }

  pub fn is_integer(&self) -> bool {
    matches!(
      self,
      PrimitiveType::I8 | PrimitiveType::I16 | PrimitiveType::I32 | PrimitiveType::I64
    )
  }

  /// Smallest integer primitive that fits `value` (§4.3: integer literals
  /// are typed by fit).
  pub fn smallest_fit(value: i64) -> PrimitiveType {
    if value >= i8::MIN as i64 && value <= i8::MAX as i64 {
      PrimitiveType::I8
    } else if value >= i16::MIN as i64 && value <= i16::MAX as i64 {
      PrimitiveType::I16
    } else if value >= i32::MIN as i64 && value <= i32::MAX as i64 {
      PrimitiveType::I32
    } else {
      PrimitiveType::I64
    }
  }

  /// Number of 32-bit variable slots this primitive occupies (§3 invariant
  /// 3: a 64-bit primitive occupies two slots).
  pub fn slot_width(&self) -> usize {
    match self {
      PrimitiveType::I64 | PrimitiveType::F64 => 2,
      _ => 1,
    }
  }
}

/// The wider of two numeric ranks — `promote(a, b) = max(rank(a), rank(b))`.
pub fn promote(a: PrimitiveType, b: PrimitiveType) -> Option<PrimitiveType> {
  let (ra, rb) = (a.rank()?, b.rank()?);
  Some(if ra >= rb { a } else { b })
}

/// `canCast(from, to)`: `from` can be used where `to` is expected without
/// an explicit conversion — identity, or numeric widening.
pub fn can_cast_primitive(from: PrimitiveType, to: PrimitiveType) -> bool {
  if from == to {
    return true;
  }
  match (from.rank(), to.rank()) {
    (Some(rf), Some(rt)) => rf <= rt,
    _ => false,
  }
}

/// The semantic type recorded on a checked AST node. Class types are
/// represented as a compact reference rather than an embedded `ClassType`
/// (fields/signatures live in the registry, keyed by the same reference) —
/// this sidesteps the cycle the distilled spec calls out between a
/// `ClassType` and field types that refer back to sibling classes (§9).
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
  Primitive(PrimitiveType),
  Array(Box<Type>),
  Class(Reference),
}

impl Type {
  pub fn unit() -> Type {
    Type::Primitive(PrimitiveType::Unit)
  }

  pub fn bool() -> Type {
    Type::Primitive(PrimitiveType::Bool)
  }

  pub fn is_unit(&self) -> bool {
    matches!(self, Type::Primitive(PrimitiveType::Unit))
  }

  pub fn is_null(&self) -> bool {
    matches!(self, Type::Primitive(PrimitiveType::Null))
  }

  pub fn is_numeric(&self) -> bool {
    matches!(self, Type::Primitive(p) if p.is_numeric())
  }

  pub fn is_reference_type(&self) -> bool {
    matches!(self, Type::Array(_) | Type::Class(_) | Type::Primitive(PrimitiveType::Str))
  }

  pub fn as_array_element(&self) -> Option<&Type> {
    match self {
      Type::Array(inner) => Some(inner),
      _ => None,
    }
  }
}

/// A function or constructor identity: owner, name, and ordered parameter
/// types — the key dedup sets and overload resolution both operate on.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
  pub owner: Option<Reference>,
  pub name: String,
  pub params: Vec<Type>,
  pub return_type: Type,
  pub is_constructor: bool,
  pub companion: bool,
}

impl Signature {
  /// The constructor name used as a signature key, matching §4.3's
  /// "looks up signatures by `<init>`".
  pub const CONSTRUCTOR_NAME: &'static str = "<init>";

  pub fn key(&self) -> (String, Vec<Type>) {
    (self.name.clone(), self.params.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const NUMERIC: [PrimitiveType; 6] = [
    PrimitiveType::I8,
    PrimitiveType::I16,
    PrimitiveType::I32,
    PrimitiveType::I64,
    PrimitiveType::F32,
    PrimitiveType::F64,
  ];

  #[test]
  fn rank_is_a_total_order() {
    for (i, a) in NUMERIC.iter().enumerate() {
      for (j, b) in NUMERIC.iter().enumerate() {
        assert_eq!(i < j, a.rank() < b.rank());
      }
    }
  }

  #[test]
  fn promotion_monotonicity_holds_for_every_numeric_pair() {
    for &a in &NUMERIC {
      for &b in &NUMERIC {
        let wide = promote(a, b).expect("numeric pair promotes");
        assert!(can_cast_primitive(a, wide), "{a:?} should cast to {wide:?}");
        assert!(can_cast_primitive(b, wide), "{b:?} should cast to {wide:?}");
      }
    }
  }

  #[test]
  fn smallest_fit_picks_the_narrowest_container() {
    assert_eq!(PrimitiveType::smallest_fit(0), PrimitiveType::I8);
    assert_eq!(PrimitiveType::smallest_fit(200), PrimitiveType::I16);
    assert_eq!(PrimitiveType::smallest_fit(40_000), PrimitiveType::I32);
    assert_eq!(PrimitiveType::smallest_fit(i64::from(i32::MAX) + 1), PrimitiveType::I64);
  }

  #[test]
  fn slot_width_accounts_for_64_bit_primitives() {
    assert_eq!(PrimitiveType::I32.slot_width(), 1);
    assert_eq!(PrimitiveType::I64.slot_width(), 2);
    assert_eq!(PrimitiveType::F64.slot_width(), 2);
  }

  #[test]
  fn cannot_cast_a_wider_numeric_down() {
    assert!(!can_cast_primitive(PrimitiveType::I64, PrimitiveType::I32));
    assert!(!can_cast_primitive(PrimitiveType::F64, PrimitiveType::F32));
  }
}
