//! # siftql
//!
//! A minimal query language over in-memory tables of text values.
//! Queries of the form `SELECT <fields|*> FROM <ident> [WHERE <bool-expr>]`
//! are tokenized, parsed into an AST, optionally type-checked against a
//! declared [`schema::Schema`], and evaluated row by row to produce a
//! filtered, projected result table.
//!
//! ```
//! use siftql::{run_query, table};
//!
//! let input = table::parse_json(
//!     r#"[{"name": "Alice", "age": 25, "status": "vip", "active": true},
//!         {"name": "Ben",   "age": 22, "status": "regular", "active": true}]"#,
//! ).unwrap();
//!
//! let out = run_query(
//!     "SELECT name FROM Customers WHERE (age >= 21 AND active = true) OR status = \"vip\"",
//!     &input,
//! ).unwrap();
//! assert_eq!(out.len(), 2);
//! ```

pub mod error;
pub mod sql;
pub mod schema;
pub mod table;
pub mod execution;

pub use error::{Result, SiftError};
pub use execution::evaluate_query;
pub use sql::ast::Query;
pub use sql::parser::Parser;
pub use table::{Row, Table};

/// Parse a query and evaluate it against a table in one call.
///
/// Fails only on syntax errors; evaluation itself is total. No semantic
/// check is run — call [`schema::check_query`] first to reject ill-typed
/// queries.
pub fn run_query(text: &str, input: &Table) -> Result<Table> {
    let query = Parser::parse(text)?;
    Ok(evaluate_query(&query, input))
}
