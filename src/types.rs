use std::fmt;

/// The closed set of types known to the language.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Boolean,
    Integer,
    Decimal,
    String,
    Void,
    Any,
}

impl Type {
    pub const ALL: &[Type] = &[
        Type::Boolean,
        Type::Integer,
        Type::Decimal,
        Type::String,
        Type::Void,
        Type::Any,
    ];

    /// The name used to refer to this type in source.
    pub const fn name(self) -> &'static str {
        match self {
            Type::Boolean => "BOOLEAN",
            Type::Integer => "INTEGER",
            Type::Decimal => "DECIMAL",
            Type::String => "STRING",
            Type::Void => "VOID",
            Type::Any => "ANY",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Type::Integer | Type::Decimal)
    }

    /// Whether a value of type `self` may be stored where `target` is
    /// expected:
    ///
    /// - the types are the same;
    /// - `self` is `INTEGER` and `target` is `DECIMAL`;
    /// - `self` is not `VOID` and `target` is `ANY`.
    pub fn is_assignable_to(self, target: Type) -> bool {
        match (self, target) {
            (a, b) if a == b => true,
            (Type::Integer, Type::Decimal) => true,
            (Type::Void, _) => false,
            (_, Type::Any) => true,
            _ => false,
        }
    }

    /// Result type of an arithmetic operation, `None` if both operands are
    /// not numeric. `DECIMAL` dominates `INTEGER`.
    pub fn widen(self, other: Type) -> Option<Type> {
        match (self, other) {
            (Type::Integer, Type::Integer) => Some(Type::Integer),
            (a, b) if a.is_numeric() && b.is_numeric() => Some(Type::Decimal),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignable_is_reflexive() {
        for &ty in Type::ALL {
            assert!(ty.is_assignable_to(ty), "{ty} should be assignable to itself");
        }
    }

    #[test]
    fn is_assignable_to() {
        use Type::*;

        assert!(Integer.is_assignable_to(Decimal));
        assert!(!Decimal.is_assignable_to(Integer));

        assert!(Boolean.is_assignable_to(Any));
        assert!(String.is_assignable_to(Any));
        assert!(Integer.is_assignable_to(Any));
        assert!(Decimal.is_assignable_to(Any));
        assert!(!Void.is_assignable_to(Any));

        assert!(!Any.is_assignable_to(Integer));
        assert!(!Boolean.is_assignable_to(Integer));
        assert!(!String.is_assignable_to(Boolean));
        assert!(!Integer.is_assignable_to(String));
        assert!(!Integer.is_assignable_to(Void));
    }

    #[test]
    fn widen() {
        use Type::*;

        assert_eq!(Integer.widen(Integer), Some(Integer));
        assert_eq!(Integer.widen(Decimal), Some(Decimal));
        assert_eq!(Decimal.widen(Integer), Some(Decimal));
        assert_eq!(Decimal.widen(Decimal), Some(Decimal));
        assert_eq!(Integer.widen(String), None);
        assert_eq!(Boolean.widen(Boolean), None);
        assert_eq!(Any.widen(Integer), None);
    }
}
