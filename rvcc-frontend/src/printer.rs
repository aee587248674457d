//! Pretty-printing of the AST back to C source.
//!
//! Printing is `Display`: it is a pure function of the subtree and needs no
//! compilation state. The output is diagnostic. It re-parses to an
//! equivalent tree but does not preserve the original layout.

use crate::ast::*;
use std::fmt;

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Identifier(node) => fmt::Display::fmt(node, f),
            Node::IntConstant(node) => fmt::Display::fmt(node, f),
            Node::ReturnStatement(node) => fmt::Display::fmt(node, f),
            Node::DirectDeclarator(node) => fmt::Display::fmt(node, f),
            Node::FunctionDefinition(node) => fmt::Display::fmt(node, f),
            Node::NodeList(node) => fmt::Display::fmt(node, f),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for IntConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl fmt::Display for ReturnStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("return")?;
        if let Some(expression) = self.expression() {
            write!(f, " {}", expression)?;
        }
        writeln!(f, ";")
    }
}

impl fmt::Display for DirectDeclarator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.identifier(), f)
    }
}

impl fmt::Display for FunctionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}() {{", self.type_specifier(), self.declarator())?;
        if let Some(body) = self.body() {
            fmt::Display::fmt(body, f)?;
        }
        writeln!(f, "}}")
    }
}

impl fmt::Display for NodeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.iter() {
            fmt::Display::fmt(node, f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn function(name: &str, body: Option<Node>) -> Node {
        FunctionDefinition::new(TypeSpecifier::Int, DirectDeclarator::new(Identifier::new(name)), body).into()
    }

    #[test]
    fn test_print_return_constant() {
        let body = NodeList::with_first(ReturnStatement::new(Some(IntConstant::new(5).into())).into());
        let root = NodeList::with_first(function("f", Some(body.into())));
        assert_eq!(Node::from(root).to_string(), "int f() {\nreturn 5;\n}\n");
    }

    #[test]
    fn test_print_bare_return() {
        let body = NodeList::with_first(ReturnStatement::new(None).into());
        assert_eq!(function("g", Some(body.into())).to_string(), "int g() {\nreturn;\n}\n");
    }

    #[test]
    fn test_print_function_without_body() {
        assert_eq!(function("h", None).to_string(), "int h() {\n}\n");
    }

    #[test]
    fn test_print_skips_absent_entries() {
        let mut body = NodeList::new();
        body.push(None);
        body.push(Some(ReturnStatement::new(Some(Identifier::new("x").into())).into()));
        body.push(None);
        assert_eq!(Node::from(body).to_string(), "return x;\n");
    }

    #[test]
    fn test_print_negative_constant() {
        assert_eq!(Node::from(IntConstant::new(-12)).to_string(), "-12");
    }
}
