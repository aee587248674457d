//! Integer literal scanning

use crate::lexer::{Lexer, TokenType};
use rvcc_common::CompilerError;

impl Lexer {
    /// Tokenize a decimal, hexadecimal (`0x`) or octal (leading `0`) literal
    pub(crate) fn tokenize_integer(&mut self) -> Result<TokenType, CompilerError> {
        let start = self.current_location();

        let (radix, digits) = if self.current_char() == Some('0')
            && matches!(self.peek_char(1), Some('x') | Some('X'))
        {
            self.advance(); // '0'
            self.advance(); // 'x'
            let digits = self.take_while(|ch| ch.is_ascii_hexdigit());
            if digits.is_empty() {
                return Err(CompilerError::lexer_error("Invalid hex literal", start));
            }
            (16, digits)
        } else if self.current_char() == Some('0') {
            self.advance();
            let digits = self.take_while(|ch| ch.is_ascii_digit());
            if let Some(bad) = digits.chars().find(|ch| *ch > '7') {
                return Err(CompilerError::lexer_error(
                    format!("Invalid digit '{}' in octal literal", bad),
                    start,
                ));
            }
            if digits.is_empty() {
                (8, "0".to_string())
            } else {
                (8, digits)
            }
        } else {
            (10, self.take_while(|ch| ch.is_ascii_digit()))
        };

        if let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                return Err(CompilerError::lexer_error(
                    format!("Invalid suffix '{}' on integer literal", ch),
                    self.current_location(),
                ));
            }
        }

        let value = i64::from_str_radix(&digits, radix).map_err(|_| {
            CompilerError::lexer_error(format!("Integer literal out of range: {}", digits), start)
        })?;

        Ok(TokenType::IntLiteral(value))
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(ch) = self.current_char() {
            if !accept(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }
}
