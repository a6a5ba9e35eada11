use std::collections::HashMap;

use diagnostic::{Diagnostic, DiagnosticCode, Position, ReportSink};
use parser::ast::{BinaryOp, Class, Constructor, Expr, File, Function, Literal, Reference, Stmt, TypeRef, UnaryOp};
use parser::types::{can_cast_primitive, promote, PrimitiveType, Signature, Type};

use crate::registry::{types_compatible, ClassEntry, FieldEntry, TypeRegistry};
use crate::scope::ScopeArena;

/// Two-pass checker: Pass A resolves every field/function/constructor
/// signature in the class (so intra-class forward references work before a
/// single body is checked), Pass B walks statements and expressions,
/// annotating the AST in place with resolved types (§4.3, §6).
pub struct Checker {
  path: String,
}

impl Checker {
  pub fn new(path: impl Into<String>) -> Self {
    Self { path: path.into() }
  }

  pub fn check(&mut self, file: &mut File, sink: &mut ReportSink) -> TypeRegistry {
    let class = &mut file.clazz;
    let class_dotted = dotted_class_name(class);
    let class_path: Vec<String> = class_dotted.split('.').map(str::to_string).collect();
    let usages = build_usage_map(class);

    let mut registry = TypeRegistry::new();
    let entry = self.check_signatures(class, &usages, &class_dotted, sink);
    registry.register(class_dotted.clone(), entry);

    let mut arena = ScopeArena::new();
    let class_scope = arena.open(None, class_path, false);

    for ctor in &mut class.constructors {
      self.check_constructor(ctor, &mut arena, class_scope, &registry, &usages, &class_dotted, sink);
    }
    for func in &mut class.functions {
      self.check_function(func, &mut arena, class_scope, &registry, &usages, &class_dotted, sink);
    }

    registry
  }

  // -- Pass A: signatures --------------------------------------------------

  fn check_signatures(&mut self, class: &mut Class, usages: &UsageMap, class_dotted: &str, sink: &mut ReportSink) -> ClassEntry {
    let mut entry = ClassEntry::default();

    for field in &mut class.fields {
      let ty = self.resolve_type_ref(&field.type_ref, usages, class_dotted, sink);
      field.ty = Some(ty.clone());
      entry.fields.push(FieldEntry {
        name: field.name.clone(),
        ty,
        mutable: field.mutable,
        accessor: field.accessor,
        companion: field.companion,
      });
    }

    for ctor in &mut class.constructors {
      let params: Vec<Type> = ctor
        .params
        .iter_mut()
        .map(|p| {
          let ty = self.resolve_type_ref(&p.type_ref, usages, class_dotted, sink);
          p.ty = Some(ty.clone());
          ty
        })
        .collect();
      entry.signatures.push(Signature {
        owner: Some(Reference::new(usages.class_path(class_dotted), None)),
        name: Signature::CONSTRUCTOR_NAME.to_string(),
        params,
        return_type: Type::Class(Reference::new(usages.class_path(class_dotted), None)),
        is_constructor: true,
        companion: false,
      });
    }

    for func in &mut class.functions {
      let params: Vec<Type> = func
        .params
        .iter_mut()
        .map(|p| {
          let ty = self.resolve_type_ref(&p.type_ref, usages, class_dotted, sink);
          p.ty = Some(ty.clone());
          ty
        })
        .collect();
      let return_type = match &func.return_type_ref {
        Some(type_ref) => self.resolve_type_ref(type_ref, usages, class_dotted, sink),
        None => Type::unit(),
      };
      func.return_type = Some(return_type.clone());
      entry.signatures.push(Signature {
        owner: Some(Reference::new(usages.class_path(class_dotted), None)),
        name: func.name.clone(),
        params,
        return_type,
        is_constructor: false,
        companion: func.companion,
      });
    }

    entry
  }

  /// `find_type(reference) -> Type?`: primitive name, then self-reference,
  /// then a usage alias, then a bare dotted path taken on faith (§6) — there
  /// is no cross-file registry here, so a path outside the current class and
  /// its usages cannot be verified beyond "it parsed as a name".
  fn resolve_type_ref(&mut self, type_ref: &TypeRef, usages: &UsageMap, class_dotted: &str, sink: &mut ReportSink) -> Type {
    match type_ref {
      TypeRef::Array(inner) => Type::Array(Box::new(self.resolve_type_ref(inner, usages, class_dotted, sink))),
      TypeRef::Named(reference) => {
        if reference.path.len() == 1 {
          let name = &reference.path[0];
          if let Some(prim) = primitive_from_name(name) {
            return Type::Primitive(prim);
          }
          if name == class_dotted.rsplit('.').next().unwrap_or(class_dotted) {
            return Type::Class(Reference::new(usages.class_path(class_dotted), reference.pos));
          }
          if let Some(full) = usages.resolve(name) {
            return Type::Class(Reference::new(full, reference.pos));
          }
          self.error(DiagnosticCode::UnknownTypeSymbol, format!("unknown type `{name}`"), reference.pos, sink);
          return Type::unit();
        }
        Type::Class(Reference::new(reference.path.clone(), reference.pos))
      },
    }
  }

  // -- Pass B: bodies -------------------------------------------------------

  #[allow(clippy::too_many_arguments)]
  fn check_constructor(
    &mut self,
    ctor: &mut Constructor,
    arena: &mut ScopeArena,
    class_scope: usize,
    registry: &TypeRegistry,
    usages: &UsageMap,
    class_dotted: &str,
    sink: &mut ReportSink,
  ) {
    let scope = arena.open(Some(class_scope), arena.class_path(class_scope).to_vec(), false);
    for param in &ctor.params {
      let ty = param.ty.clone().unwrap_or_else(Type::unit);
      arena.register_variable(scope, param.mutable, param.name.clone(), ty);
    }

    if let Some(super_args) = &mut ctor.super_args {
      for arg in super_args {
        self.check_expr(arg, arena, scope, registry, usages, class_dotted, false, sink);
      }
    }

    for stmt in &mut ctor.statements {
      self.check_stmt(stmt, arena, scope, registry, usages, class_dotted, &Type::unit(), sink);
    }
  }

  #[allow(clippy::too_many_arguments)]
  fn check_function(
    &mut self,
    func: &mut Function,
    arena: &mut ScopeArena,
    class_scope: usize,
    registry: &TypeRegistry,
    usages: &UsageMap,
    class_dotted: &str,
    sink: &mut ReportSink,
  ) {
    let scope = arena.open(Some(class_scope), arena.class_path(class_scope).to_vec(), func.companion);
    for param in &func.params {
      let ty = param.ty.clone().unwrap_or_else(Type::unit);
      arena.register_variable(scope, param.mutable, param.name.clone(), ty);
    }

    let return_type = func.return_type.clone().unwrap_or_else(Type::unit);
    for stmt in &mut func.statements {
      self.check_stmt(stmt, arena, scope, registry, usages, class_dotted, &return_type, sink);
    }
  }

  #[allow(clippy::too_many_arguments)]
  fn check_stmt(
    &mut self,
    stmt: &mut Stmt,
    arena: &mut ScopeArena,
    scope: usize,
    registry: &TypeRegistry,
    usages: &UsageMap,
    class_dotted: &str,
    return_type: &Type,
    sink: &mut ReportSink,
  ) {
    match stmt {
      Stmt::VariableDeclaration { mutable, name, expr, index, pos } => {
        let ty = self.check_expr(expr, arena, scope, registry, usages, class_dotted, false, sink);
        if ty.is_unit() {
          self.error(DiagnosticCode::UnitTypeInVariable, format!("variable `{name}` cannot hold a `Unit` value"), *pos, sink);
        }
        match arena.register_variable(scope, *mutable, name.clone(), ty) {
          Some(slot) => *index = Some(slot),
          None => self.error(DiagnosticCode::DuplicateVariable, format!("`{name}` is already declared in this scope"), *pos, sink),
        }
      },
      Stmt::ExpressionStatement { expr, .. } => {
        self.check_expr(expr, arena, scope, registry, usages, class_dotted, false, sink);
      },
      Stmt::ReturnStatement { expr, return_type: slot, pos } => {
        *slot = Some(return_type.clone());
        match expr {
          Some(e) => {
            let ty = self.check_expr(e, arena, scope, registry, usages, class_dotted, false, sink);
            if !castable(&ty, return_type) {
              self.error(
                DiagnosticCode::TypeMismatch,
                format!("cannot return {ty:?} where {return_type:?} is expected"),
                *pos,
                sink,
              );
            }
          },
          None => {
            if !return_type.is_unit() {
              self.error(DiagnosticCode::TypeMismatch, "missing return value", *pos, sink);
            }
          },
        }
      },
      Stmt::IfStatement { cond, then, else_branch, pos } => {
        let cond_ty = self.check_expr(cond, arena, scope, registry, usages, class_dotted, false, sink);
        if cond_ty != Type::bool() {
          self.error(DiagnosticCode::NonBooleanOperand, "if condition must be `Bool`", *pos, sink);
        }
        let then_scope = arena.open(Some(scope), arena.class_path(scope).to_vec(), arena.is_companion(scope));
        self.check_stmt(then, arena, then_scope, registry, usages, class_dotted, return_type, sink);
        if let Some(else_stmt) = else_branch {
          let else_scope = arena.open(Some(scope), arena.class_path(scope).to_vec(), arena.is_companion(scope));
          self.check_stmt(else_stmt, arena, else_scope, registry, usages, class_dotted, return_type, sink);
        }
      },
      Stmt::JForStatement { init, cond, post, body, pos: _ } => {
        let for_scope = arena.open(Some(scope), arena.class_path(scope).to_vec(), arena.is_companion(scope));
        if let Some(init_stmt) = init {
          self.check_stmt(init_stmt, arena, for_scope, registry, usages, class_dotted, return_type, sink);
        }
        if let Some(c) = cond {
          let cond_ty = self.check_expr(c, arena, for_scope, registry, usages, class_dotted, false, sink);
          if cond_ty != Type::bool() {
            self.error(DiagnosticCode::NonBooleanOperand, "for condition must be `Bool`", c.pos(), sink);
          }
        }
        if let Some(p) = post {
          self.check_expr(p, arena, for_scope, registry, usages, class_dotted, false, sink);
        }
        self.check_stmt(body, arena, for_scope, registry, usages, class_dotted, return_type, sink);
      },
      Stmt::BlockStatement { statements, .. } => {
        let block_scope = arena.open(Some(scope), arena.class_path(scope).to_vec(), arena.is_companion(scope));
        for s in statements {
          self.check_stmt(s, arena, block_scope, registry, usages, class_dotted, return_type, sink);
        }
      },
    }
  }

  #[allow(clippy::too_many_arguments)]
  fn check_expr(
    &mut self,
    expr: &mut Expr,
    arena: &mut ScopeArena,
    scope: usize,
    registry: &TypeRegistry,
    usages: &UsageMap,
    class_dotted: &str,
    write: bool,
    sink: &mut ReportSink,
  ) -> Type {
    match expr {
      Expr::Literal { value, ty, cast_to: _, pos: _ } => {
        let t = match value {
          Literal::Int(v) => Type::Primitive(PrimitiveType::smallest_fit(*v)),
          Literal::Float(_, is_f64) => Type::Primitive(if *is_f64 { PrimitiveType::F64 } else { PrimitiveType::F32 }),
          Literal::Char(_) => Type::Primitive(PrimitiveType::Char),
          Literal::Str(_) => Type::Primitive(PrimitiveType::Str),
          Literal::Bool(_) => Type::bool(),
          Literal::Null => Type::Primitive(PrimitiveType::Null),
        };
        *ty = Some(t.clone());
        t
      },

      Expr::IdentifierCall { owner_ref, previous, name, index, ty, is_companion_field, pos } => {
        let result = if let Some(owner) = owner_ref.clone() {
          let dotted = usages.resolve_reference(&owner);
          match registry.get(&dotted).and_then(|entry| entry.field(name)) {
            Some(field) => {
              if !field.companion {
                self.error(
                  DiagnosticCode::NonCompanionAccessFromCompanion,
                  format!("`{name}` is not a companion field of `{dotted}`"),
                  *pos,
                  sink,
                );
              }
              if write && !field.mutable {
                self.error(DiagnosticCode::ImmutableAssignment, format!("field `{name}` is not `mut`"), *pos, sink);
              }
              *is_companion_field = true;
              field.ty.clone()
            },
            None => {
              self.error(DiagnosticCode::UnknownField, format!("unknown field `{name}` on `{dotted}`"), *pos, sink);
              Type::unit()
            },
          }
        } else if let Some(previous_expr) = previous {
          let prev_ty = self.check_expr(previous_expr, arena, scope, registry, usages, class_dotted, false, sink);
          match &prev_ty {
            Type::Class(reference) => {
              let dotted = reference.to_dotted();
              match registry.get(&dotted).and_then(|entry| entry.field(name)) {
                Some(field) => {
                  if !field.companion && arena.is_companion(scope) {
                    self.error(
                      DiagnosticCode::NonCompanionAccessFromCompanion,
                      format!("cannot reach instance field `{name}` from a companion context"),
                      *pos,
                      sink,
                    );
                  }
                  if write && !field.mutable {
                    self.error(DiagnosticCode::ImmutableAssignment, format!("field `{name}` is not `mut`"), *pos, sink);
                  }
                  *is_companion_field = field.companion;
                  field.ty.clone()
                },
                None => {
                  self.error(DiagnosticCode::UnknownField, format!("unknown field `{name}` on `{dotted}`"), *pos, sink);
                  Type::unit()
                },
              }
            },
            _ => {
              self.error(DiagnosticCode::UnknownField, format!("cannot access field `{name}` on a non-class value"), *pos, sink);
              Type::unit()
            },
          }
        } else if name == "self" {
          Type::Class(Reference::new(usages.class_path(class_dotted), *pos))
        } else if let Some(var) = arena.find_variable(scope, name) {
          if write && !var.mutable {
            self.error(DiagnosticCode::ImmutableAssignment, format!("`{name}` is not `mut`"), *pos, sink);
          }
          *index = Some(var.index);
          var.ty.clone()
        } else if let Some(field) = registry.get(class_dotted).and_then(|entry| entry.field(name)) {
          if !field.companion && arena.is_companion(scope) {
            self.error(
              DiagnosticCode::NonCompanionAccessFromCompanion,
              format!("cannot reach instance field `{name}` from a companion context"),
              *pos,
              sink,
            );
          }
          if write && !field.mutable {
            self.error(DiagnosticCode::ImmutableAssignment, format!("field `{name}` is not `mut`"), *pos, sink);
          }
          *is_companion_field = field.companion;
          field.ty.clone()
        } else {
          self.error(DiagnosticCode::UnknownIdentifier, format!("unknown identifier `{name}`"), *pos, sink);
          Type::unit()
        };
        *ty = Some(result.clone());
        result
      },

      Expr::FunctionCall { owner_ref, previous, name, args, in_companion: _, signature, ty, pos } => {
        let arg_types: Vec<Type> = args
          .iter_mut()
          .map(|a| self.check_expr(a, arena, scope, registry, usages, class_dotted, false, sink))
          .collect();

        let (target_dotted, cross_class) = if let Some(owner) = owner_ref.clone() {
          let dotted = usages.resolve_reference(&owner);
          (dotted.clone(), dotted != class_dotted)
        } else if let Some(previous_expr) = previous {
          let prev_ty = self.check_expr(previous_expr, arena, scope, registry, usages, class_dotted, false, sink);
          match prev_ty {
            Type::Class(reference) => {
              let dotted = reference.to_dotted();
              let cross = dotted != class_dotted;
              (dotted, cross)
            },
            _ => (class_dotted.to_string(), false),
          }
        } else {
          (class_dotted.to_string(), false)
        };

        let result = match registry.get(&target_dotted).and_then(|entry| entry.find_signature(name, &arg_types, false)) {
          Some(sig) => {
            if cross_class && !sig.companion {
              self.error(
                DiagnosticCode::NonCompanionAccessFromCompanion,
                format!("`{name}` must be a companion function to call it from outside `{target_dotted}`"),
                *pos,
                sink,
              );
            } else if !cross_class && arena.is_companion(scope) && !sig.companion {
              self.error(
                DiagnosticCode::NonCompanionAccessFromCompanion,
                format!("cannot call instance function `{name}` from a companion context"),
                *pos,
                sink,
              );
            }
            *signature = Some(sig.clone());
            sig.return_type.clone()
          },
          None => {
            self.error(DiagnosticCode::UnknownFunction, format!("no matching function `{name}`"), *pos, sink);
            Type::unit()
          },
        };
        *ty = Some(result.clone());
        result
      },

      Expr::ConstructorCall { owner_ref, args, signature, ty, pos } => {
        let arg_types: Vec<Type> = args
          .iter_mut()
          .map(|a| self.check_expr(a, arena, scope, registry, usages, class_dotted, false, sink))
          .collect();
        let target_dotted = usages.resolve_reference(owner_ref);
        let result = match registry
          .get(&target_dotted)
          .and_then(|entry| entry.find_signature(Signature::CONSTRUCTOR_NAME, &arg_types, true))
        {
          Some(sig) => {
            *signature = Some(sig.clone());
            Type::Class(Reference::new(owner_ref.path.clone(), owner_ref.pos))
          },
          None => {
            self.error(DiagnosticCode::UnknownFunction, format!("no matching constructor for `{target_dotted}`"), *pos, sink);
            Type::unit()
          },
        };
        *ty = Some(result.clone());
        result
      },

      Expr::IndexExpression { previous, index_expr, ty, cast_to, is_assigned_by, pos } => {
        let prev_ty = self.check_expr(previous, arena, scope, registry, usages, class_dotted, false, sink);
        let idx_ty = self.check_expr(index_expr, arena, scope, registry, usages, class_dotted, false, sink);
        match &idx_ty {
          Type::Primitive(p) if can_cast_primitive(*p, PrimitiveType::I32) => {
            if idx_ty != Type::Primitive(PrimitiveType::I32) {
              *cast_to = Some(Type::Primitive(PrimitiveType::I32));
            }
          },
          _ => self.error(DiagnosticCode::NonNumericOperand, "array index must be castable to `I32`", *pos, sink),
        }
        *is_assigned_by = write;
        let result = match prev_ty.as_array_element() {
          Some(elem) => elem.clone(),
          None => {
            self.error(DiagnosticCode::NonArrayIndexed, "cannot index a non-array value", *pos, sink);
            Type::unit()
          },
        };
        *ty = Some(result.clone());
        result
      },

      Expr::UnaryExpression { op, operand, ty, pos, .. } => {
        let operand_ty = self.check_expr(operand, arena, scope, registry, usages, class_dotted, matches!(op, UnaryOp::Increment | UnaryOp::Decrement), sink);
        let result = match op {
          UnaryOp::Plus | UnaryOp::Minus | UnaryOp::Increment | UnaryOp::Decrement => {
            if !operand_ty.is_numeric() {
              self.error(DiagnosticCode::NonNumericOperand, "operand must be numeric", *pos, sink);
            }
            operand_ty.clone()
          },
          UnaryOp::BitNot => {
            match &operand_ty {
              Type::Primitive(p) if p.is_integer() => {},
              _ => self.error(DiagnosticCode::NonIntegerOperand, "`~` requires an integer operand", *pos, sink),
            }
            operand_ty.clone()
          },
          UnaryOp::Not => {
            if operand_ty != Type::bool() {
              self.error(DiagnosticCode::NonBooleanOperand, "`!` requires a `Bool` operand", *pos, sink);
            }
            Type::bool()
          },
        };
        *ty = Some(result.clone());
        result
      },

      Expr::BinaryExpression { left, op, right, ty, left_cast_to, right_cast_to, pos } => {
        let left_ty = self.check_expr(left, arena, scope, registry, usages, class_dotted, false, sink);
        let right_ty = self.check_expr(right, arena, scope, registry, usages, class_dotted, false, sink);

        let result = match op {
          BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            match numeric_pair(&left_ty, &right_ty) {
              Some(wide) => {
                set_cast(left_cast_to, &left_ty, &wide);
                set_cast(right_cast_to, &right_ty, &wide);
                wide
              },
              None => {
                self.error(DiagnosticCode::NonNumericOperand, "arithmetic requires numeric operands", *pos, sink);
                Type::unit()
              },
            }
          },
          BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            match numeric_pair(&left_ty, &right_ty) {
              Some(wide) => {
                set_cast(left_cast_to, &left_ty, &wide);
                set_cast(right_cast_to, &right_ty, &wide);
              },
              None => self.error(DiagnosticCode::NonNumericOperand, "relational comparison requires numeric operands", *pos, sink),
            }
            Type::bool()
          },
          BinaryOp::Eq | BinaryOp::Ne => {
            if left_ty != right_ty {
              let ok = (left_ty.is_null() && right_ty.is_reference_type()) || (right_ty.is_null() && left_ty.is_reference_type());
              if !ok {
                self.error(
                  DiagnosticCode::TypeMismatch,
                  format!("cannot compare {left_ty:?} with {right_ty:?} (one side must be `Null` and the other a reference type)"),
                  *pos,
                  sink,
                );
              }
            }
            Type::bool()
          },
          BinaryOp::And | BinaryOp::Or => {
            if left_ty != Type::bool() || right_ty != Type::bool() {
              self.error(DiagnosticCode::NonBooleanOperand, "logical operators require `Bool` operands", *pos, sink);
            }
            Type::bool()
          },
          BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor | BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => {
            match integer_pair(&left_ty, &right_ty) {
              Some(wide) => {
                set_cast(left_cast_to, &left_ty, &wide);
                set_cast(right_cast_to, &right_ty, &wide);
                wide
              },
              None => {
                self.error(DiagnosticCode::NonIntegerOperand, "bitwise operators require integer operands", *pos, sink);
                Type::unit()
              },
            }
          },
        };
        *ty = Some(result.clone());
        result
      },

      Expr::AssignmentExpression { left, right, ty, pos, .. } => {
        let target_ty = match &mut **left {
          Expr::IdentifierCall { .. } | Expr::IndexExpression { .. } => {
            self.check_expr(left, arena, scope, registry, usages, class_dotted, true, sink)
          },
          _ => {
            self.error(DiagnosticCode::InvalidAssignmentTarget, "assignment target must be a variable, field, or index expression", *pos, sink);
            Type::unit()
          },
        };
        let right_ty = self.check_expr(right, arena, scope, registry, usages, class_dotted, false, sink);
        if !target_ty.is_unit() && !castable(&right_ty, &target_ty) {
          self.error(
            DiagnosticCode::TypeMismatch,
            format!("cannot assign {right_ty:?} to a target of type {target_ty:?}"),
            *pos,
            sink,
          );
        }
        *ty = Some(target_ty.clone());
        target_ty
      },

      Expr::ParenthesizedExpression { inner, .. } => self.check_expr(inner, arena, scope, registry, usages, class_dotted, write, sink),

      Expr::ArrayInitialization { infer_type_ref, elements, ty, pos: _ } => {
        let declared = infer_type_ref
          .as_ref()
          .map(|type_ref| self.resolve_type_ref(type_ref, usages, class_dotted, sink));

        let mut element_types = Vec::with_capacity(elements.len());
        for element in elements.iter_mut() {
          element_types.push(self.check_expr(element, arena, scope, registry, usages, class_dotted, false, sink));
        }

        let seed = match declared.clone() {
          Some(t) => t,
          None => element_types.first().cloned().unwrap_or_else(Type::unit),
        };

        for (element_ty, element) in element_types.iter().zip(elements.iter()) {
          if !castable(element_ty, &seed) {
            self.error(
              DiagnosticCode::TypeMismatch,
              format!("array element of type {element_ty:?} is not castable to {seed:?}"),
              element.pos(),
              sink,
            );
          }
        }

        let result = Type::Array(Box::new(seed));
        *ty = Some(result.clone());
        result
      },

      Expr::ArrayDeclaration { base_type_ref, dimensions, ty, pos: _ } => {
        let base = self.resolve_type_ref(base_type_ref, usages, class_dotted, sink);
        for dim in dimensions.iter_mut() {
          let dim_ty = self.check_expr(dim, arena, scope, registry, usages, class_dotted, false, sink);
          if !matches!(&dim_ty, Type::Primitive(p) if can_cast_primitive(*p, PrimitiveType::I32)) {
            self.error(DiagnosticCode::NonNumericOperand, "array dimension must be castable to `I32`", dim.pos(), sink);
          }
        }
        let result = dimensions.iter().fold(base, |acc, _| Type::Array(Box::new(acc)));
        *ty = Some(result.clone());
        result
      },
    }
  }

  fn error(&mut self, code: DiagnosticCode, message: impl Into<String>, pos: Option<Position>, sink: &mut ReportSink) {
    let pos = pos.unwrap_or_else(|| Position::point(0, 0));
    sink.emit(Diagnostic::at(code, message, &self.path, pos));
  }
}

fn primitive_from_name(name: &str) -> Option<PrimitiveType> {
  match name {
    "bool" => Some(PrimitiveType::Bool),
    "char" => Some(PrimitiveType::Char),
    "i8" => Some(PrimitiveType::I8),
    "i16" => Some(PrimitiveType::I16),
    "i32" => Some(PrimitiveType::I32),
    "i64" => Some(PrimitiveType::I64),
    "f32" => Some(PrimitiveType::F32),
    "f64" => Some(PrimitiveType::F64),
    "str" => Some(PrimitiveType::Str),
    _ => None,
  }
}

fn castable(from: &Type, to: &Type) -> bool {
  types_compatible(from, to)
}

fn numeric_pair(a: &Type, b: &Type) -> Option<Type> {
  match (a, b) {
    (Type::Primitive(pa), Type::Primitive(pb)) => promote(*pa, *pb).map(Type::Primitive),
    _ => None,
  }
}

fn integer_pair(a: &Type, b: &Type) -> Option<Type> {
  match (a, b) {
    (Type::Primitive(pa), Type::Primitive(pb)) if pa.is_integer() && pb.is_integer() => promote(*pa, *pb).map(Type::Primitive),
    _ => None,
  }
}

fn set_cast(slot: &mut Option<Type>, from: &Type, to: &Type) {
  if from != to {
    *slot = Some(to.clone());
  }
}

fn dotted_class_name(class: &Class) -> String {
  match &class.pkg {
    Some(pkg) if !pkg.is_empty() => format!("{}.{}", pkg.join("."), class.name),
    _ => class.name.clone(),
  }
}

/// Resolves a usage alias (or simple name) to its full dotted path (§4.2's
/// "alias-aware" lookup), falling back to the name itself when no matching
/// `use` declaration exists — there is no cross-file registry to validate
/// against, so an un-aliased multi-segment path is trusted as given.
struct UsageMap {
  aliases: HashMap<String, Vec<String>>,
  self_path: Vec<String>,
}

impl UsageMap {
  fn resolve(&self, simple_name: &str) -> Option<Vec<String>> {
    self.aliases.get(simple_name).cloned()
  }

  fn class_path(&self, _class_dotted: &str) -> Vec<String> {
    self.self_path.clone()
  }

  fn resolve_reference(&self, reference: &Reference) -> String {
    if reference.path.len() == 1 {
      if let Some(full) = self.resolve(&reference.path[0]) {
        return full.join(".");
      }
    }
    reference.to_dotted()
  }
}

fn build_usage_map(class: &Class) -> UsageMap {
  let mut aliases = HashMap::new();
  for usage in &class.usages {
    let key = usage.alias.clone().unwrap_or_else(|| usage.reference.simple_name().to_string());
    aliases.insert(key, usage.reference.path.clone());
  }
  let self_path = match &class.pkg {
    Some(pkg) if !pkg.is_empty() => {
      let mut path = pkg.clone();
      path.push(class.name.clone());
      path
    },
    _ => vec![class.name.clone()],
  };
  UsageMap { aliases, self_path }
}
