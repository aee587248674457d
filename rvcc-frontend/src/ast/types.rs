//! Type specifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source-level type attached by value to declarations.
///
/// Every `match` over this enum is exhaustive, so adding a variant forces
/// the spelling below to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeSpecifier {
    Int,
}

impl TypeSpecifier {
    /// The keyword used to write this type in source
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeSpecifier::Int => "int",
        }
    }
}

impl fmt::Display for TypeSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
