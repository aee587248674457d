//! Expression parsing

use crate::ast::*;
use crate::lexer::TokenType;
use crate::parser::Parser;
use rvcc_common::CompilerError;

impl Parser {
    /// expression := integer-literal | identifier
    pub fn parse_expression(&mut self) -> Result<Node, CompilerError> {
        match self.peek_type() {
            TokenType::IntLiteral(value) => {
                let constant = IntConstant::new(*value);
                self.advance()?;
                Ok(constant.into())
            }
            TokenType::Identifier(_) => Ok(self.parse_identifier("expression")?.into()),
            _ => Err(self.unexpected("expression").into()),
        }
    }
}
