//! Abstract Syntax Tree definitions for the C subset
//!
//! The tree is built bottom-up by the parser and is never reshaped once
//! built: every node exclusively owns its children, so dropping the root
//! releases the whole tree. Code generation only reads it.

pub mod declarations;
pub mod expressions;
pub mod statements;
pub mod types;

pub use declarations::{DirectDeclarator, FunctionDefinition};
pub use expressions::{Identifier, IntConstant};
pub use statements::{NodeList, ReturnStatement};
pub use types::TypeSpecifier;

use serde::{Deserialize, Serialize};

/// Any node of the tree. The variant set is closed, so both traversals
/// (printing and assembly emission) match on it exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Identifier(Identifier),
    IntConstant(IntConstant),
    ReturnStatement(ReturnStatement),
    DirectDeclarator(DirectDeclarator),
    FunctionDefinition(FunctionDefinition),
    NodeList(NodeList),
}

impl Node {
    /// Short human-readable name of the node kind, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Identifier(_) => "identifier",
            Node::IntConstant(_) => "integer constant",
            Node::ReturnStatement(_) => "return statement",
            Node::DirectDeclarator(_) => "declarator",
            Node::FunctionDefinition(_) => "function definition",
            Node::NodeList(_) => "node list",
        }
    }
}

impl From<Identifier> for Node {
    fn from(node: Identifier) -> Self {
        Node::Identifier(node)
    }
}

impl From<IntConstant> for Node {
    fn from(node: IntConstant) -> Self {
        Node::IntConstant(node)
    }
}

impl From<ReturnStatement> for Node {
    fn from(node: ReturnStatement) -> Self {
        Node::ReturnStatement(node)
    }
}

impl From<DirectDeclarator> for Node {
    fn from(node: DirectDeclarator) -> Self {
        Node::DirectDeclarator(node)
    }
}

impl From<FunctionDefinition> for Node {
    fn from(node: FunctionDefinition) -> Self {
        Node::FunctionDefinition(node)
    }
}

impl From<NodeList> for Node {
    fn from(node: NodeList) -> Self {
        Node::NodeList(node)
    }
}
