use parser::types::Type;

/// A resolved local variable or parameter: its declared type and the slot
/// index it was assigned within its enclosing function (§4.2, §3 invariant
/// 3: a 64-bit primitive occupies two slots).
#[derive(Debug, Clone)]
pub struct Variable {
  pub name: String,
  pub mutable: bool,
  pub ty: Type,
  pub index: usize,
}

/// A single lexical frame: a class body, a function/constructor body, a
/// block, or a `for` header. Frames are linked by parent index rather than
/// owning their parent, the "scope as linked frames" design the distilled
/// spec calls for (§9) — variables live in an arena (`ScopeArena::frames`)
/// instead of a tree of boxed scopes.
#[derive(Debug, Clone)]
pub struct ScopeFrame {
  pub parent: Option<usize>,
  pub class_path: Vec<String>,
  pub is_companion: bool,
  variables: Vec<Variable>,
  next_index: usize,
}

/// Owns every scope frame created while checking one class. Frames are
/// pushed on scope entry and never removed — only the "current frame"
/// cursor moves back to the parent on scope exit (§3 lifecycle: "destroyed
/// on exit in LIFO order" is modeled as the cursor popping, not a
/// deallocation, so finished frames remain inspectable for diagnostics).
#[derive(Debug, Default)]
pub struct ScopeArena {
  frames: Vec<ScopeFrame>,
}

impl ScopeArena {
  pub fn new() -> Self {
    Self::default()
  }

  /// Opens a new frame as a child of `parent`, inheriting its `class_path`
  /// unless a new one is given, and returns the new frame's index.
  pub fn open(&mut self, parent: Option<usize>, class_path: Vec<String>, is_companion: bool) -> usize {
    self.frames.push(ScopeFrame {
      parent,
      class_path,
      is_companion,
      variables: Vec::new(),
      next_index: parent.map(|p| self.frames[p].next_index).unwrap_or(0),
    });
    self.frames.len() - 1
  }

  pub fn class_path(&self, frame: usize) -> &[String] {
    &self.frames[frame].class_path
  }

  pub fn is_companion(&self, frame: usize) -> bool {
    self.frames[frame].is_companion
  }

  /// `register_variable(mut, name, type) -> bool`: fails if the name is
  /// already declared in `frame` itself (§4.2). Never shadows its own
  /// frame; a child frame may still shadow this one.
  pub fn register_variable(&mut self, frame: usize, mutable: bool, name: String, ty: Type) -> Option<usize> {
    if self.frames[frame].variables.iter().any(|v| v.name == name) {
      return None;
    }
    let index = self.frames[frame].next_index;
    let width = ty.as_primitive_slot_width();
    self.frames[frame].next_index += width;
    self.frames[frame].variables.push(Variable {
      name,
      mutable,
      ty,
      index,
    });
    Some(index)
  }

  /// `find_variable(name) -> Variable?`: walks the parent chain.
  pub fn find_variable(&self, frame: usize, name: &str) -> Option<&Variable> {
    let mut current = Some(frame);
    while let Some(idx) = current {
      if let Some(v) = self.frames[idx].variables.iter().find(|v| v.name == name) {
        return Some(v);
      }
      current = self.frames[idx].parent;
    }
    None
  }
}

trait SlotWidth {
  fn as_primitive_slot_width(&self) -> usize;
}

impl SlotWidth for Type {
  fn as_primitive_slot_width(&self) -> usize {
    match self {
      Type::Primitive(p) => p.slot_width(),
      _ => 1,
    }
  }
}
