//! Function definition parsing

use crate::ast::*;
use crate::lexer::TokenType;
use crate::parser::Parser;
use rvcc_common::CompilerError;

impl Parser {
    /// function-definition := type-specifier direct-declarator '(' 'void'? ')' compound-statement
    pub fn parse_function_definition(&mut self) -> Result<Node, CompilerError> {
        let type_specifier = self.parse_type_specifier()?;
        let declarator = self.parse_direct_declarator()?;

        self.expect(TokenType::LeftParen, "function declarator")?;
        self.match_token(&TokenType::Void);
        self.expect(TokenType::RightParen, "function declarator")?;

        let body = self.parse_compound_statement()?;

        Ok(FunctionDefinition::new(type_specifier, declarator, Some(body)).into())
    }

    pub fn parse_type_specifier(&mut self) -> Result<TypeSpecifier, CompilerError> {
        match self.peek_type() {
            TokenType::Int => {
                self.advance()?;
                Ok(TypeSpecifier::Int)
            }
            _ => Err(self.unexpected("type specifier").into()),
        }
    }

    pub fn parse_direct_declarator(&mut self) -> Result<DirectDeclarator, CompilerError> {
        let identifier = self.parse_identifier("declarator")?;
        Ok(DirectDeclarator::new(identifier))
    }

    pub(crate) fn parse_identifier(&mut self, context: &str) -> Result<Identifier, CompilerError> {
        match self.peek_type() {
            TokenType::Identifier(name) => {
                let identifier = Identifier::new(name.clone());
                self.advance()?;
                Ok(identifier)
            }
            _ => Err(self.unexpected(&format!("identifier in {}", context)).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn parser(input: &str) -> Parser {
        Parser::new(Lexer::new(input, "decl.c").tokenize().unwrap())
    }

    #[test]
    fn test_void_parameter_list() {
        let func = parser("int main(void) { return 0; }").parse_function_definition().unwrap();
        assert_eq!(func.to_string(), "int main() {\nreturn 0;\n}\n");
    }

    #[test]
    fn test_missing_type_specifier() {
        let err = parser("f() { return 0; }").parse_function_definition().unwrap_err();
        assert!(err.to_string().contains("Expected type specifier"), "{err}");
    }

    #[test]
    fn test_missing_declarator_name() {
        let err = parser("int () { return 0; }").parse_function_definition().unwrap_err();
        assert!(err.to_string().contains("identifier in declarator"), "{err}");
    }
}
