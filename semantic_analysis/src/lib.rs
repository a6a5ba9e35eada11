pub mod checker;
pub mod registry;
pub mod scope;

pub use checker::Checker;
pub use registry::{ClassEntry, FieldEntry, TypeRegistry};
pub use scope::{ScopeArena, Variable};
