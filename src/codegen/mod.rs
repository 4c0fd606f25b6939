use log::debug;

use crate::{
    ast::{Source, Typed},
    catalog::Catalog,
};

mod java;

pub use java::Generator;

/// Knobs of the emitted Java.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Name of the single emitted class.
    pub class_name: String,
    /// Spaces per nesting level.
    pub indent_width: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            class_name: "Main".to_owned(),
            indent_width: 4,
        }
    }
}

/// Generates the Java translation of an analyzed source. Host names of types
/// and functions are taken from `catalog`.
pub fn generate(source: &Source<Typed>, catalog: &Catalog, options: &Options) -> String {
    let code = Generator::new(catalog, options).generate(source);
    debug!("generated {} bytes of Java", code.len());
    code
}

#[cfg(test)]
mod tests;
