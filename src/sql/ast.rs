//! Abstract syntax tree definitions for the siftql query language.
//!
//! Every query parsed by the [`super::parser::Parser`] is represented as a
//! [`Query`] holding an optional [`BoolExpr`] tree. The AST is consumed
//! downstream by the semantic checker and the evaluator, and is never
//! mutated after construction.

use std::fmt;

/// A parsed `SELECT ... FROM ... [WHERE ...]` query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// `SELECT *` — when true, `fields` is empty.
    pub select_all: bool,
    /// Projected field names, in source order. Non-empty unless `select_all`.
    pub fields: Vec<String>,
    /// The source-table identifier after FROM.
    pub from: String,
    /// The WHERE tree; `None` means every row matches.
    pub where_clause: Option<BoolExpr>,
}

/// A boolean-expression tree node.
///
/// Composite nodes exclusively own their children; the tree is acyclic and
/// built bottom-up by the parser. A lone predicate parses to a bare
/// `Predicate` node — the parser never wraps single terms in one-child
/// `Or`/`And` nodes, so tree shape matches source structure.
#[derive(Debug, Clone, PartialEq)]
pub enum BoolExpr {
    /// Disjunction over two or more terms, evaluated left to right with
    /// short-circuiting.
    Or(Vec<BoolExpr>),
    /// Conjunction over two or more factors, evaluated left to right with
    /// short-circuiting.
    And(Vec<BoolExpr>),
    /// An explicitly parenthesized subexpression. Semantically transparent;
    /// kept so the printed tree reflects the source grouping.
    Paren(Box<BoolExpr>),
    /// A leaf comparison of one field against one literal.
    Predicate(Predicate),
}

/// A leaf condition: `field <op> literal`.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub op: CompOp,
    pub literal: Literal,
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

/// A literal value as written in the query: a kind tag plus the raw text.
///
/// The kind is recorded at parse time rather than re-inferred from the text
/// at comparison time, keeping the evaluator aligned with the grammar's
/// literal categories.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: String,
}

/// The closed set of literal kinds accepted after a comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Number,
    Str,
    True,
    False,
}

impl Literal {
    pub fn number(text: impl Into<String>) -> Self {
        Literal {
            kind: LiteralKind::Number,
            text: text.into(),
        }
    }

    pub fn string(text: impl Into<String>) -> Self {
        Literal {
            kind: LiteralKind::Str,
            text: text.into(),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Literal {
            kind: if value {
                LiteralKind::True
            } else {
                LiteralKind::False
            },
            text: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tree printing
// ---------------------------------------------------------------------------

impl fmt::Display for CompOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompOp::Eq => "=",
            CompOp::NotEq => "!=",
            CompOp::Lt => "<",
            CompOp::LtEq => "<=",
            CompOp::Gt => ">",
            CompOp::GtEq => ">=",
        };
        f.write_str(s)
    }
}

impl BoolExpr {
    /// Write an indented tree rendering of this node.
    fn write_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = " ".repeat(indent);
        match self {
            BoolExpr::Or(terms) => {
                writeln!(f, "{pad}OR")?;
                for term in terms {
                    term.write_tree(f, indent + 2)?;
                }
                Ok(())
            }
            BoolExpr::And(factors) => {
                writeln!(f, "{pad}AND")?;
                for factor in factors {
                    factor.write_tree(f, indent + 2)?;
                }
                Ok(())
            }
            BoolExpr::Paren(inner) => {
                writeln!(f, "{pad}(")?;
                inner.write_tree(f, indent + 2)?;
                writeln!(f, "{pad})")
            }
            BoolExpr::Predicate(pred) => {
                let lit = match pred.literal.kind {
                    LiteralKind::True => "true",
                    LiteralKind::False => "false",
                    _ => pred.literal.text.as_str(),
                };
                writeln!(f, "{pad}PREDICATE {} {} {}", pred.field, pred.op, lit)
            }
        }
    }
}

impl fmt::Display for BoolExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "QUERY")?;
        if self.select_all {
            writeln!(f, "  SELECT *")?;
        } else {
            writeln!(f, "  SELECT {}", self.fields.join(", "))?;
        }
        writeln!(f, "  FROM {}", self.from)?;
        if let Some(ref where_clause) = self.where_clause {
            writeln!(f, "  WHERE")?;
            where_clause.write_tree(f, 4)?;
        }
        Ok(())
    }
}
