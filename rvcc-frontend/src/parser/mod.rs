//! Recursive descent parser for the C subset
//!
//! Builds the `Node` tree bottom-up: each production returns a fully
//! constructed subtree that the enclosing production then takes ownership of.

pub mod declarations;
pub mod errors;
pub mod expressions;
pub mod statements;

use crate::ast::{Node, NodeList};
use crate::lexer::{Token, TokenType};
use rvcc_common::{CompilerError, SourceLocation, SourceSpan};
use std::collections::VecDeque;

pub use errors::ParseError;

static END_OF_FILE: TokenType = TokenType::EndOfFile;

pub struct Parser {
    tokens: VecDeque<Token>,
}

impl Parser {
    /// Create a parser over a token stream ending in `EndOfFile`
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens: tokens.into() }
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    pub(crate) fn peek_type(&self) -> &TokenType {
        self.peek().map(|t| &t.token_type).unwrap_or(&END_OF_FILE)
    }

    /// Consume the current token. `EndOfFile` is never consumed, so the
    /// stream cannot run dry.
    pub(crate) fn advance(&mut self) -> Result<Token, ParseError> {
        if self.check(&TokenType::EndOfFile) {
            return Err(self.unexpected("more input"));
        }
        self.tokens.pop_front().ok_or_else(|| self.unexpected("more input"))
    }

    pub(crate) fn check(&self, token_type: &TokenType) -> bool {
        std::mem::discriminant(self.peek_type()) == std::mem::discriminant(token_type)
    }

    pub(crate) fn match_token(&mut self, token_type: &TokenType) -> bool {
        if self.check(token_type) && *token_type != TokenType::EndOfFile {
            self.tokens.pop_front();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, token_type: TokenType, context: &str) -> Result<Token, ParseError> {
        if self.check(&token_type) {
            self.advance()
        } else {
            Err(self.unexpected(&format!("'{}' in {}", token_type, context)))
        }
    }

    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        let found = match self.peek() {
            Some(token) => token.clone(),
            None => Token::new(TokenType::EndOfFile, SourceSpan::from_location(SourceLocation::unknown())),
        };
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found,
        }
    }

    /// Parse a complete translation unit into a `NodeList` of function
    /// definitions
    pub fn parse_translation_unit(&mut self) -> Result<Node, CompilerError> {
        let mut items = NodeList::new();

        while !self.check(&TokenType::EndOfFile) {
            items.push(Some(self.parse_function_definition()?));
        }

        if items.is_empty() {
            let location = self
                .peek()
                .map(|t| t.span.start.clone())
                .unwrap_or_else(SourceLocation::unknown);
            return Err(ParseError::EmptyTranslationUnit { location }.into());
        }

        Ok(items.into())
    }
}
