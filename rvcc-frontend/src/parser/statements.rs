//! Statement parsing

use crate::ast::*;
use crate::lexer::TokenType;
use crate::parser::Parser;
use rvcc_common::CompilerError;

impl Parser {
    /// compound-statement := '{' statement* '}'
    ///
    /// An empty statement is kept as an absent entry so the list still
    /// reflects every statement position.
    pub fn parse_compound_statement(&mut self) -> Result<Node, CompilerError> {
        self.expect(TokenType::LeftBrace, "compound statement")?;

        let mut statements = NodeList::new();
        while !self.check(&TokenType::RightBrace) && !self.check(&TokenType::EndOfFile) {
            statements.push(self.parse_statement()?);
        }

        self.expect(TokenType::RightBrace, "compound statement")?;

        Ok(statements.into())
    }

    /// statement := 'return' expression? ';' | ';'
    pub fn parse_statement(&mut self) -> Result<Option<Node>, CompilerError> {
        match self.peek_type() {
            TokenType::Return => {
                self.advance()?;
                Ok(Some(self.parse_return_statement()?))
            }
            TokenType::Semicolon => {
                self.advance()?;
                Ok(None)
            }
            _ => Err(self.unexpected("statement").into()),
        }
    }

    fn parse_return_statement(&mut self) -> Result<Node, CompilerError> {
        let expression = if self.check(&TokenType::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect(TokenType::Semicolon, "return statement")?;

        Ok(ReturnStatement::new(expression).into())
    }
}
