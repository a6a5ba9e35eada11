use std::collections::HashMap;

use parser::ast::Accessor;
use parser::types::{can_cast_primitive, Signature, Type};

#[derive(Debug, Clone)]
pub struct FieldEntry {
  pub name: String,
  pub ty: Type,
  pub mutable: bool,
  pub accessor: Accessor,
  pub companion: bool,
}

/// `ClassType{reference, fields, signatures}` resolved against usages/global
/// (§3). Keyed by dotted path in the registry below.
#[derive(Debug, Clone, Default)]
pub struct ClassEntry {
  pub fields: Vec<FieldEntry>,
  pub signatures: Vec<Signature>,
}

impl ClassEntry {
  pub fn field(&self, name: &str) -> Option<&FieldEntry> {
    self.fields.iter().find(|f| f.name == name)
  }

  /// `find_function(name, arg_types) -> Signature?`: an argument of
  /// primitive numeric type matches a parameter if it's equal or widenable
  /// to it (§4.2). Returns the most-specific (fewest widenings) match; ties
  /// are ambiguous and resolve to `None`.
  pub fn find_signature(&self, name: &str, arg_types: &[Type], constructor: bool) -> Option<&Signature> {
    let candidates: Vec<&Signature> = self
      .signatures
      .iter()
      .filter(|s| s.is_constructor == constructor && (constructor || s.name == name) && s.params.len() == arg_types.len())
      .filter(|s| s.params.iter().zip(arg_types).all(|(p, a)| types_compatible(a, p)))
      .collect();

    if candidates.is_empty() {
      return None;
    }
    if candidates.len() == 1 {
      return Some(candidates[0]);
    }

    let mut best: Option<(&Signature, usize)> = None;
    for candidate in &candidates {
      let cost: usize = candidate
        .params
        .iter()
        .zip(arg_types)
        .map(|(p, a)| if p == a { 0 } else { 1 })
        .sum();
      match best {
        Some((_, best_cost)) if cost < best_cost => best = Some((candidate, cost)),
        Some((_, best_cost)) if cost == best_cost => return None,
        None => best = Some((candidate, cost)),
        _ => {},
      }
    }
    best.map(|(s, _)| s)
  }
}

pub(crate) fn types_compatible(arg: &Type, param: &Type) -> bool {
  if arg == param {
    return true;
  }
  match (arg, param) {
    (Type::Primitive(a), Type::Primitive(b)) => can_cast_primitive(*a, *b),
    (Type::Primitive(parser::types::PrimitiveType::Null), _) => param.is_reference_type(),
    _ => false,
  }
}

/// Read-only (after population) mapping from a dotted class name to its
/// resolved fields and signatures (§6's "global type registry"). Populated
/// from the class currently being checked; cross-file/usage-only symbols
/// that never appear in source resolve to `None` and the caller reports
/// "unknown type symbol".
#[derive(Debug, Default)]
pub struct TypeRegistry {
  classes: HashMap<String, ClassEntry>,
}

impl TypeRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register(&mut self, dotted_path: String, entry: ClassEntry) {
    self.classes.insert(dotted_path, entry);
  }

  pub fn get(&self, dotted_path: &str) -> Option<&ClassEntry> {
    self.classes.get(dotted_path)
  }

  pub fn contains(&self, dotted_path: &str) -> bool {
    self.classes.contains_key(dotted_path)
  }
}
