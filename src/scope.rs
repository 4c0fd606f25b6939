use std::collections::HashMap;

use crate::types::Type;

/// A lexical block's bindings. Child scopes borrow their parent, so a child
/// can never outlive the block that encloses it.
#[derive(Debug, Default)]
pub struct Scope<'parent> {
    bindings: HashMap<Box<str>, Type>,
    parent: Option<&'parent Scope<'parent>>,
}

impl Scope<'_> {
    /// Creates a root scope.
    pub fn new() -> Scope<'static> {
        Scope {
            bindings: HashMap::new(),
            parent: None,
        }
    }

    /// Creates an empty scope nested in `self`.
    pub fn child(&self) -> Scope<'_> {
        Scope {
            bindings: HashMap::new(),
            parent: Some(self),
        }
    }

    /// Binds `name` in this scope, returning the type it was previously bound
    /// to *in this same scope*, if any. Bindings of enclosing scopes are
    /// shadowed, not replaced.
    pub fn define(&mut self, name: &str, ty: Type) -> Option<Type> {
        self.bindings.insert(name.into(), ty)
    }

    /// Whether `name` is bound in this scope, ignoring enclosing ones.
    pub fn is_defined_locally(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Looks `name` up, walking outward through the enclosing scopes.
    pub fn lookup(&self, name: &str) -> Option<Type> {
        let mut curr = self;
        loop {
            if let Some(&ty) = curr.bindings.get(name) {
                return Some(ty);
            }
            match curr.parent {
                Some(parent) => curr = parent,
                None => return None,
            }
        }
    }

    /// Number of scopes from this one up to the root (which has depth 0).
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut curr = self;
        while let Some(parent) = curr.parent {
            depth += 1;
            curr = parent;
        }
        depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_outward() {
        //   root { x: INTEGER }
        //     child { y: BOOLEAN }
        //       grandchild { x: STRING }
        let mut root = Scope::new();
        root.define("x", Type::Integer);

        let mut child = root.child();
        child.define("y", Type::Boolean);
        assert_eq!(child.lookup("x"), Some(Type::Integer));
        assert_eq!(child.lookup("y"), Some(Type::Boolean));
        assert!(!child.is_defined_locally("x"));

        let mut grandchild = child.child();
        grandchild.define("x", Type::String);
        assert_eq!(grandchild.lookup("x"), Some(Type::String));
        assert_eq!(grandchild.lookup("y"), Some(Type::Boolean));
        assert_eq!(grandchild.depth(), 2);

        assert_eq!(child.lookup("x"), Some(Type::Integer));
        assert_eq!(root.lookup("y"), None);
    }

    #[test]
    fn define_reports_local_redefinition() {
        let mut root = Scope::new();
        assert_eq!(root.define("x", Type::Integer), None);
        assert_eq!(root.define("x", Type::Decimal), Some(Type::Integer));

        let mut child = root.child();
        assert_eq!(child.define("x", Type::String), None);
    }

    #[test]
    fn child_bindings_are_dropped_with_the_child() {
        let mut root = Scope::new();
        {
            let mut child = root.child();
            child.define("tmp", Type::Integer);
        }
        assert_eq!(root.lookup("tmp"), None);
        root.define("tmp", Type::Boolean);
        assert_eq!(root.lookup("tmp"), Some(Type::Boolean));
    }
}
