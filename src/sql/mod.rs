//! Query-language front-end for siftql.
//!
//! This module contains the lexer (tokenizer), abstract syntax tree (AST)
//! definitions, and a recursive-descent parser that transforms raw query
//! text into a structured AST suitable for semantic checking and
//! evaluation.

pub mod lexer;
pub mod ast;
pub mod parser;

pub use ast::*;
pub use lexer::Token;
