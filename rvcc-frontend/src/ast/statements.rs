//! Statement nodes and ordered node sequences

use super::Node;
use serde::{Deserialize, Serialize};

/// `return;` or `return <expression>;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatement {
    expression: Option<Box<Node>>,
}

impl ReturnStatement {
    pub fn new(expression: Option<Node>) -> Self {
        Self {
            expression: expression.map(Box::new),
        }
    }

    pub fn expression(&self) -> Option<&Node> {
        self.expression.as_deref()
    }
}

/// An ordered sequence of declarations or statements.
///
/// Entries may be absent (an empty statement, or an optional grammar
/// element that was not present). Absent entries keep their position but
/// are skipped by every traversal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeList {
    nodes: Vec<Option<Node>>,
}

impl NodeList {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn with_first(node: Node) -> Self {
        Self {
            nodes: vec![Some(node)],
        }
    }

    /// Append an entry in program order
    pub fn push(&mut self, node: Option<Node>) {
        self.nodes.push(node);
    }

    /// Present entries, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().flatten()
    }

    /// All entries including absent ones
    pub fn entries(&self) -> &[Option<Node>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::IntConstant;

    #[test]
    fn test_iter_skips_absent_entries() {
        let mut list = NodeList::new();
        list.push(Some(IntConstant::new(1).into()));
        list.push(None);
        list.push(Some(IntConstant::new(2).into()));

        assert_eq!(list.len(), 3);
        let values: Vec<_> = list
            .iter()
            .map(|node| match node {
                Node::IntConstant(c) => c.value(),
                other => panic!("unexpected {}", other.kind_name()),
            })
            .collect();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn test_return_without_expression() {
        let ret = ReturnStatement::new(None);
        assert!(ret.expression().is_none());
    }
}
