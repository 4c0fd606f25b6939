use std::{collections::HashMap, sync::LazyLock};

use log::trace;

use crate::types::Type;

/// Source type names, with their default host (Java) spelling.
static TYPES: phf::Map<&'static str, (Type, &'static str)> = phf::phf_map! {
    "BOOLEAN" => (Type::Boolean, "boolean"),
    "INTEGER" => (Type::Integer, "int"),
    "DECIMAL" => (Type::Decimal, "double"),
    "STRING" => (Type::String, "String"),
    "VOID" => (Type::Void, "void"),
    "ANY" => (Type::Any, "Object"),
};

/// Names a variable can't take in the generated code: Java keywords and
/// literals, plus the parameter of `main`.
static HOST_RESERVED: phf::Set<&'static str> = phf::phf_set! {
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char",
    "class", "const", "continue", "default", "do", "double", "else", "enum",
    "extends", "final", "finally", "float", "for", "goto", "if", "implements",
    "import", "instanceof", "int", "interface", "long", "native", "new",
    "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while", "true", "false", "null",
    "var", "yield", "record", "_", "args",
};

/// Built-in functions of the standard catalog: name, parameters, return type
/// and host name.
const STANDARD_FUNCTIONS: &[(&str, &[Type], Type, &str)] = &[
    ("print", &[Type::Any], Type::Void, "System.out.println"),
    ("abs", &[Type::Decimal], Type::Decimal, "Math.abs"),
    ("sqrt", &[Type::Decimal], Type::Decimal, "Math.sqrt"),
    ("min", &[Type::Decimal, Type::Decimal], Type::Decimal, "Math.min"),
    ("max", &[Type::Decimal, Type::Decimal], Type::Decimal, "Math.max"),
];

static STANDARD: LazyLock<Catalog> = LazyLock::new(|| {
    let mut catalog = Catalog::new();
    for &(name, params, ret, host_name) in STANDARD_FUNCTIONS {
        catalog.define_function(name, params, ret, host_name);
    }
    catalog
});

/// The table of types and built-in functions available to programs.
///
/// A catalog is only read during compilation, so a single one may be shared
/// by any number of compilations.
#[derive(Clone, Debug)]
pub struct Catalog {
    host_types: HashMap<Type, Box<str>>,
    functions: HashMap<(Box<str>, usize), Signature>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub params: Box<[Type]>,
    pub ret: Type,
    /// Name of the function in the target language.
    pub host_name: Box<str>,
}

impl Catalog {
    /// A catalog with all types and no functions.
    pub fn new() -> Catalog {
        Catalog {
            host_types: TYPES
                .values()
                .map(|&(ty, host)| (ty, Box::from(host)))
                .collect(),
            functions: HashMap::new(),
        }
    }

    /// The process-wide standard catalog.
    pub fn standard() -> &'static Catalog {
        &STANDARD
    }

    /// Defines (or redefines) the function with the given name and arity.
    pub fn define_function(
        &mut self,
        name: &str,
        params: &[Type],
        ret: Type,
        host_name: &str,
    ) -> &mut Catalog {
        let signature = Signature {
            params: params.into(),
            ret,
            host_name: host_name.into(),
        };
        self.functions.insert((name.into(), params.len()), signature);
        self
    }

    /// Overrides how a type is spelled in the target language.
    pub fn set_host_type(&mut self, ty: Type, host_name: &str) -> &mut Catalog {
        self.host_types.insert(ty, host_name.into());
        self
    }

    /// Resolves a type name as written in source.
    pub fn lookup_type(&self, name: &str) -> Option<Type> {
        TYPES.get(name).map(|&(ty, _)| ty)
    }

    pub fn host_type(&self, ty: Type) -> &str {
        // Every type is inserted by the constructor and never removed.
        &self.host_types[&ty]
    }

    /// Whether `name` can't be used as a variable in the generated code.
    ///
    /// Besides the fixed set of Java words, a local named like the qualifier
    /// of a host function (`Math` in `Math.max`) would hide it.
    pub fn is_host_reserved(&self, name: &str) -> bool {
        HOST_RESERVED.contains(name)
            || self.functions.values().any(|signature| {
                signature
                    .host_name
                    .split_once('.')
                    .is_some_and(|(qualifier, _)| qualifier == name)
            })
    }

    pub fn lookup_function(&self, name: &str, arity: usize) -> Option<&Signature> {
        // Tuples of owned keys can't be borrowed as `(&str, usize)`, hence
        // the allocation.
        let key: (Box<str>, usize) = (name.into(), arity);
        let signature = self.functions.get(&key);
        trace!("lookup {name}/{arity}: {}", signature.is_some());
        signature
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::new()
    }
}
