//! Recursive-descent parser for the siftql query language.
//!
//! The entry point is [`Parser::parse`], which scans and parses a single
//! query into a [`Query`]. The grammar, lowest to highest binding:
//!
//! ```text
//! Query     := SELECT FieldList FROM ident [WHERE BoolExpr]
//! BoolExpr  := BoolTerm (OR BoolTerm)*
//! BoolTerm  := BoolFactor (AND BoolFactor)*
//! BoolFactor:= '(' BoolExpr ')' | Predicate
//! Predicate := ident CompOp Literal
//! FieldList := '*' | ident (',' ident)*
//! ```
//!
//! Precedence is encoded directly by the grammar layering: OR binds loosest,
//! AND tighter, parentheses override both. The parser consumes tokens left
//! to right with exactly one token of lookahead and never backtracks. The
//! first unexpected token aborts the parse; no partial [`Query`] is ever
//! returned.

use tracing::debug;

use crate::error::{Result, SiftError};
use crate::sql::ast::*;
use crate::sql::lexer::{Lexer, Token};

/// A recursive-descent parser that transforms query text into an AST.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    /// Parse a query string into a [`Query`].
    pub fn parse(text: &'a str) -> Result<Query> {
        debug!(target: "siftql::parser", "parsing query: {text}");
        let mut parser = Parser {
            lexer: Lexer::new(text),
        };
        let query = parser.parse_query()?;
        // Anything left over after a complete query is a syntax error.
        if *parser.lexer.peek()? != Token::Eof {
            let got = parser.lexer.peek()?.describe();
            return Err(parser.unexpected("end of input", got));
        }
        Ok(query)
    }

    // =======================================================================
    // Token helpers
    // =======================================================================

    /// Consume the next token if it equals `expected`.
    fn accept(&mut self, expected: &Token) -> Result<bool> {
        if self.lexer.peek()? == expected {
            self.lexer.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Require the next token to equal `expected`, or fail with a message
    /// naming what was required.
    fn expect(&mut self, expected: &Token, wanted: &str) -> Result<()> {
        if self.accept(expected)? {
            Ok(())
        } else {
            let got = self.lexer.peek()?.describe();
            Err(self.unexpected(wanted, got))
        }
    }

    /// Require an identifier and return its text.
    fn expect_identifier(&mut self, context: &str) -> Result<String> {
        match self.lexer.peek()? {
            Token::Identifier(_) => match self.lexer.next_token()? {
                Token::Identifier(name) => Ok(name),
                _ => unreachable!("peek/next disagree on token kind"),
            },
            other => {
                let got = other.describe();
                Err(self.unexpected(context, got))
            }
        }
    }

    fn unexpected(&self, wanted: &str, got: String) -> SiftError {
        SiftError::syntax(self.lexer.line(), format!("expected {wanted}, got {got}"))
    }

    // =======================================================================
    // Grammar productions
    // =======================================================================

    fn parse_query(&mut self) -> Result<Query> {
        self.expect(&Token::Select, "SELECT")?;

        let (select_all, fields) = self.parse_field_list()?;

        self.expect(&Token::From, "FROM")?;
        let from = self.expect_identifier("identifier after FROM")?;

        let where_clause = if self.accept(&Token::Where)? {
            Some(self.parse_bool_expr()?)
        } else {
            None
        };

        Ok(Query {
            select_all,
            fields,
            from,
            where_clause,
        })
    }

    fn parse_field_list(&mut self) -> Result<(bool, Vec<String>)> {
        if self.accept(&Token::Star)? {
            return Ok((true, Vec::new()));
        }

        if let Token::Identifier(_) = self.lexer.peek()? {
            let mut fields = vec![self.expect_identifier("identifier")?];
            while self.accept(&Token::Comma)? {
                fields.push(self.expect_identifier("identifier after ',' in field list")?);
            }
            return Ok((false, fields));
        }

        let got = self.lexer.peek()?.describe();
        Err(self.unexpected("'*' or identifier list after SELECT", got))
    }

    fn parse_bool_expr(&mut self) -> Result<BoolExpr> {
        let first = self.parse_bool_term()?;

        // A single term with no following OR collapses to the term itself.
        if !self.accept(&Token::Or)? {
            return Ok(first);
        }

        let mut terms = vec![first];
        loop {
            terms.push(self.parse_bool_term()?);
            if !self.accept(&Token::Or)? {
                break;
            }
        }
        Ok(BoolExpr::Or(terms))
    }

    fn parse_bool_term(&mut self) -> Result<BoolExpr> {
        let first = self.parse_bool_factor()?;

        if !self.accept(&Token::And)? {
            return Ok(first);
        }

        let mut factors = vec![first];
        loop {
            factors.push(self.parse_bool_factor()?);
            if !self.accept(&Token::And)? {
                break;
            }
        }
        Ok(BoolExpr::And(factors))
    }

    fn parse_bool_factor(&mut self) -> Result<BoolExpr> {
        if self.accept(&Token::LeftParen)? {
            let inner = self.parse_bool_expr()?;
            self.expect(&Token::RightParen, "')'")?;
            return Ok(BoolExpr::Paren(Box::new(inner)));
        }
        self.parse_predicate()
    }

    fn parse_predicate(&mut self) -> Result<BoolExpr> {
        let field = self.expect_identifier("identifier at start of predicate")?;
        let op = self.parse_comp_op()?;
        let literal = self.parse_literal()?;

        Ok(BoolExpr::Predicate(Predicate { field, op, literal }))
    }

    fn parse_comp_op(&mut self) -> Result<CompOp> {
        let op = match self.lexer.peek()? {
            Token::Eq => CompOp::Eq,
            Token::NotEq => CompOp::NotEq,
            Token::Lt => CompOp::Lt,
            Token::LtEq => CompOp::LtEq,
            Token::Gt => CompOp::Gt,
            Token::GtEq => CompOp::GtEq,
            other => {
                let got = other.describe();
                return Err(
                    self.unexpected("comparison operator (=, !=, <, <=, >, >=)", got)
                );
            }
        };
        self.lexer.next_token()?;
        Ok(op)
    }

    fn parse_literal(&mut self) -> Result<Literal> {
        let literal = match self.lexer.peek()? {
            Token::Number(text) => Literal::number(text.clone()),
            Token::Str(text) => Literal::string(text.clone()),
            Token::True => Literal::boolean(true),
            Token::False => Literal::boolean(false),
            other => {
                let got = other.describe();
                return Err(self.unexpected("literal (number, string, true, false)", got));
            }
        };
        self.lexer.next_token()?;
        Ok(literal)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
