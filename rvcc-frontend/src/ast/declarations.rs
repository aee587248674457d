//! Declarators and function definitions

use super::{Identifier, Node, TypeSpecifier};
use serde::{Deserialize, Serialize};

/// The part of a declaration that names the declared entity.
///
/// Holding a typed `Identifier` makes a declarator without a name
/// unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectDeclarator {
    identifier: Identifier,
}

impl DirectDeclarator {
    pub fn new(identifier: Identifier) -> Self {
        Self { identifier }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn name(&self) -> &str {
        self.identifier.name()
    }
}

/// `<type> <name>() { <body> }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    type_specifier: TypeSpecifier,
    declarator: DirectDeclarator,
    body: Option<Box<Node>>,
}

impl FunctionDefinition {
    pub fn new(type_specifier: TypeSpecifier, declarator: DirectDeclarator, body: Option<Node>) -> Self {
        Self {
            type_specifier,
            declarator,
            body: body.map(Box::new),
        }
    }

    pub fn type_specifier(&self) -> TypeSpecifier {
        self.type_specifier
    }

    pub fn declarator(&self) -> &DirectDeclarator {
        &self.declarator
    }

    pub fn name(&self) -> &str {
        self.declarator.name()
    }

    pub fn body(&self) -> Option<&Node> {
        self.body.as_deref()
    }
}
