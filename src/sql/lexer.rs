//! Hand-written tokenizer for the siftql query language.
//!
//! The [`Lexer`] is a pull-based scanner: the parser drives it through
//! [`Lexer::peek`] (non-destructive, one token of lookahead) and
//! [`Lexer::next_token`]. Keywords are case-insensitive. String literals
//! are double-quoted with no escape sequences; numbers are unsigned
//! decimals with an optional fractional part.

use crate::error::{Result, SiftError};

/// A single query-language token.
///
/// Identifier and literal text travels inside the variant, so there is no
/// out-of-band "last token text" accessor to keep in sync.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Select,
    From,
    Where,
    And,
    Or,
    True,
    False,

    // Comparison operators
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Punctuation
    Star,
    Comma,
    LeftParen,
    RightParen,

    // Identifiers & literals
    Identifier(String),
    /// Raw numeric text, e.g. `19` or `19.0`. Kept textual; numeric
    /// interpretation happens at comparison time.
    Number(String),
    /// String literal contents with the surrounding quotes removed.
    Str(String),

    /// End-of-input sentinel.
    Eof,
}

impl Token {
    /// A short human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::And => "AND".into(),
            Token::Or => "OR".into(),
            Token::True => "true".into(),
            Token::False => "false".into(),
            Token::Eq => "'='".into(),
            Token::NotEq => "'!='".into(),
            Token::Lt => "'<'".into(),
            Token::LtEq => "'<='".into(),
            Token::Gt => "'>'".into(),
            Token::GtEq => "'>='".into(),
            Token::Star => "'*'".into(),
            Token::Comma => "','".into(),
            Token::LeftParen => "'('".into(),
            Token::RightParen => "')'".into(),
            Token::Identifier(name) => format!("identifier '{name}'"),
            Token::Number(text) => format!("number {text}"),
            Token::Str(text) => format!("string \"{text}\""),
            Token::Eof => "end of input".into(),
        }
    }
}

fn keyword_token(word: &str) -> Option<Token> {
    // The input `word` is already uppercased by the caller.
    match word {
        "SELECT" => Some(Token::Select),
        "FROM" => Some(Token::From),
        "WHERE" => Some(Token::Where),
        "AND" => Some(Token::And),
        "OR" => Some(Token::Or),
        "TRUE" => Some(Token::True),
        "FALSE" => Some(Token::False),
        _ => None,
    }
}

/// A pull-based tokenizer with one-token lookahead.
///
/// Create one with [`Lexer::new`], then alternate [`Lexer::peek`] and
/// [`Lexer::next_token`]. Once [`Token::Eof`] is returned it is returned
/// forever; the lexer never backtracks.
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    line: u32,
    peeked: Option<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over the given query text.
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.as_bytes(),
            pos: 0,
            line: 1,
            peeked: None,
        }
    }

    /// The line the lexer most recently scanned a token on (1-based).
    /// Used by the parser to position syntax errors.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Inspect the next token without consuming it.
    ///
    /// Idempotent: repeated peeks return the same token and do not advance
    /// the scanner.
    pub fn peek(&mut self) -> Result<&Token> {
        if self.peeked.is_none() {
            self.peeked = Some(self.scan_token()?);
        }
        // Freshly filled above, so the unwrap cannot fail.
        Ok(self.peeked.as_ref().unwrap())
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        match self.peeked.take() {
            Some(tok) => Ok(tok),
            None => self.scan_token(),
        }
    }

    // -- helpers ------------------------------------------------------------

    fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.input.get(self.pos).copied()?;
        self.pos += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_byte() {
            if ch == b'\n' {
                self.line += 1;
                self.pos += 1;
            } else if ch.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    // -- main scanner -------------------------------------------------------

    fn scan_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let ch = match self.peek_byte() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        // ----- string literal -----
        if ch == b'"' {
            return self.read_string_literal();
        }

        // ----- numeric literal -----
        if ch.is_ascii_digit() {
            return self.read_number();
        }

        // ----- identifier / keyword -----
        if ch.is_ascii_alphabetic() || ch == b'_' {
            return self.read_identifier_or_keyword();
        }

        // ----- operators & punctuation -----
        self.read_operator()
    }

    // -- token readers ------------------------------------------------------

    fn read_string_literal(&mut self) -> Result<Token> {
        self.advance(); // consume opening "
        let start = self.pos;
        loop {
            match self.advance() {
                None => {
                    return Err(SiftError::syntax(
                        self.line,
                        "unterminated string literal",
                    ));
                }
                Some(b'"') => break,
                Some(b'\n') => {
                    // Strings cannot span lines.
                    return Err(SiftError::syntax(
                        self.line,
                        "unterminated string literal",
                    ));
                }
                Some(_) => {}
            }
        }
        // pos sits just past the closing quote; slice the contents whole so
        // multi-byte UTF-8 sequences survive intact.
        let s = std::str::from_utf8(&self.input[start..self.pos - 1])
            .map_err(|_| SiftError::syntax(self.line, "invalid UTF-8 in string literal"))?;
        Ok(Token::Str(s.to_string()))
    }

    fn read_number(&mut self) -> Result<Token> {
        let start = self.pos;

        while self.peek_byte().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Fractional part requires at least one digit after the dot;
        // otherwise the dot is not part of the number.
        if self.peek_byte() == Some(b'.')
            && self
                .input
                .get(self.pos + 1)
                .map_or(false, |c| c.is_ascii_digit())
        {
            self.advance(); // consume '.'
            while self.peek_byte().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| SiftError::syntax(self.line, "invalid numeric literal"))?;
        Ok(Token::Number(text.to_string()))
    }

    fn read_identifier_or_keyword(&mut self) -> Result<Token> {
        let start = self.pos;
        while self
            .peek_byte()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.advance();
        }
        let word = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| SiftError::syntax(self.line, "invalid identifier"))?;
        let upper = word.to_ascii_uppercase();

        if let Some(kw) = keyword_token(&upper) {
            Ok(kw)
        } else {
            Ok(Token::Identifier(word.to_string()))
        }
    }

    fn read_operator(&mut self) -> Result<Token> {
        let line = self.line;
        let ch = match self.advance() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };
        match ch {
            b'*' => Ok(Token::Star),
            b',' => Ok(Token::Comma),
            b'(' => Ok(Token::LeftParen),
            b')' => Ok(Token::RightParen),
            b'=' => Ok(Token::Eq),
            b'!' => {
                if self.peek_byte() == Some(b'=') {
                    self.advance();
                    Ok(Token::NotEq)
                } else {
                    Err(SiftError::syntax(line, "expected '=' after '!'"))
                }
            }
            b'<' => {
                if self.peek_byte() == Some(b'=') {
                    self.advance();
                    Ok(Token::LtEq)
                } else {
                    Ok(Token::Lt)
                }
            }
            b'>' => {
                if self.peek_byte() == Some(b'=') {
                    self.advance();
                    Ok(Token::GtEq)
                } else {
                    Ok(Token::Gt)
                }
            }
            _ => Err(SiftError::syntax(
                line,
                format!("unrecognized character: '{}'", ch as char),
            )),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token().unwrap();
            let is_eof = tok == Token::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tokens
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let tokens = lex("select FROM Where aNd oR TRUE false");
        assert_eq!(tokens[0], Token::Select);
        assert_eq!(tokens[1], Token::From);
        assert_eq!(tokens[2], Token::Where);
        assert_eq!(tokens[3], Token::And);
        assert_eq!(tokens[4], Token::Or);
        assert_eq!(tokens[5], Token::True);
        assert_eq!(tokens[6], Token::False);
    }

    #[test]
    fn identifiers() {
        let tokens = lex("name _private age2");
        assert_eq!(tokens[0], Token::Identifier("name".into()));
        assert_eq!(tokens[1], Token::Identifier("_private".into()));
        assert_eq!(tokens[2], Token::Identifier("age2".into()));
    }

    #[test]
    fn number_literals_keep_raw_text() {
        let tokens = lex("42 19.0 007");
        assert_eq!(tokens[0], Token::Number("42".into()));
        assert_eq!(tokens[1], Token::Number("19.0".into()));
        assert_eq!(tokens[2], Token::Number("007".into()));
    }

    #[test]
    fn string_literal_quotes_stripped() {
        let tokens = lex("\"vip\" \"\"");
        assert_eq!(tokens[0], Token::Str("vip".into()));
        assert_eq!(tokens[1], Token::Str("".into()));
    }

    #[test]
    fn non_ascii_string_literal_survives_intact() {
        let tokens = lex("\"café\" \"naïve 日本\"");
        assert_eq!(tokens[0], Token::Str("café".into()));
        assert_eq!(tokens[1], Token::Str("naïve 日本".into()));
    }

    #[test]
    fn comparison_operators() {
        let tokens = lex("= != < <= > >=");
        assert_eq!(tokens[0], Token::Eq);
        assert_eq!(tokens[1], Token::NotEq);
        assert_eq!(tokens[2], Token::Lt);
        assert_eq!(tokens[3], Token::LtEq);
        assert_eq!(tokens[4], Token::Gt);
        assert_eq!(tokens[5], Token::GtEq);
    }

    #[test]
    fn punctuation() {
        let tokens = lex("* , ( )");
        assert_eq!(tokens[0], Token::Star);
        assert_eq!(tokens[1], Token::Comma);
        assert_eq!(tokens[2], Token::LeftParen);
        assert_eq!(tokens[3], Token::RightParen);
    }

    #[test]
    fn peek_is_idempotent() {
        let mut lexer = Lexer::new("SELECT name");
        assert_eq!(lexer.peek().unwrap(), &Token::Select);
        assert_eq!(lexer.peek().unwrap(), &Token::Select);
        assert_eq!(lexer.next_token().unwrap(), Token::Select);
        assert_eq!(lexer.peek().unwrap(), &Token::Identifier("name".into()));
        assert_eq!(
            lexer.next_token().unwrap(),
            Token::Identifier("name".into())
        );
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }

    #[test]
    fn line_numbers_track_newlines() {
        let mut lexer = Lexer::new("SELECT *\nFROM t\nWHERE a = 1");
        while lexer.next_token().unwrap() != Token::Eof {}
        assert_eq!(lexer.line(), 3);
    }

    #[test]
    fn unterminated_string_is_error() {
        let mut lexer = Lexer::new("\"vip");
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn bare_bang_is_error() {
        let mut lexer = Lexer::new("a ! b");
        lexer.next_token().unwrap();
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn unrecognized_character_is_error() {
        let mut lexer = Lexer::new("a ; b");
        lexer.next_token().unwrap();
        let err = lexer.next_token().unwrap_err();
        assert!(err.to_string().contains("unrecognized character"));
    }

    #[test]
    fn dot_without_trailing_digit_is_not_a_number_part() {
        let mut lexer = Lexer::new("12.");
        assert_eq!(lexer.next_token().unwrap(), Token::Number("12".into()));
        // The dangling dot is not a recognized symbol.
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn empty_input() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }

    #[test]
    fn full_query_token_stream() {
        let tokens = lex("SELECT name, age FROM Customers WHERE age >= 21");
        assert_eq!(tokens[0], Token::Select);
        assert_eq!(tokens[1], Token::Identifier("name".into()));
        assert_eq!(tokens[2], Token::Comma);
        assert_eq!(tokens[3], Token::Identifier("age".into()));
        assert_eq!(tokens[4], Token::From);
        assert_eq!(tokens[5], Token::Identifier("Customers".into()));
        assert_eq!(tokens[6], Token::Where);
        assert_eq!(tokens[7], Token::Identifier("age".into()));
        assert_eq!(tokens[8], Token::GtEq);
        assert_eq!(tokens[9], Token::Number("21".into()));
        assert_eq!(tokens[10], Token::Eof);
    }
}
