//! Query evaluation over in-memory tables.
//!
//! [`evaluate_query`] is a pure, total function: it never mutates its
//! inputs and never fails. Every query that parses evaluates to a result
//! for every row, even when comparisons are ill-typed with respect to a
//! schema — a predicate over a field the row lacks is simply false, and a
//! named projection fills missing fields with the empty string. Rejecting
//! ill-typed queries up front is the job of [`crate::schema::check_query`],
//! which the evaluator never consults.

use std::cmp::Ordering;

use tracing::debug;

use crate::sql::ast::{BoolExpr, CompOp, LiteralKind, Predicate, Query};
use crate::table::{Row, Table};

/// Evaluate a parsed query against a table, producing a new table.
///
/// Rows are visited in input order; rows passing the WHERE clause (or all
/// rows, when there is none) are projected and appended, so the output
/// preserves input order.
pub fn evaluate_query(query: &Query, input: &Table) -> Table {
    let mut result = Table::new();

    for row in input {
        let keep = match query.where_clause {
            Some(ref expr) => eval_bool_expr(expr, row),
            None => true,
        };
        if !keep {
            continue;
        }
        result.push(project_row(query, row));
    }

    debug!(
        target: "siftql::execution",
        rows_in = input.len(),
        rows_out = result.len(),
        "evaluated query against {}",
        query.from
    );
    result
}

fn project_row(query: &Query, row: &Row) -> Row {
    if query.select_all {
        return row.clone();
    }
    let mut out = Row::new();
    for field in &query.fields {
        // A field the row lacks projects as the empty string rather than
        // being omitted or raising an error.
        let value = row.get(field).cloned().unwrap_or_default();
        out.insert(field.clone(), value);
    }
    out
}

/// Evaluate a boolean-expression tree against a single row.
pub fn eval_bool_expr(expr: &BoolExpr, row: &Row) -> bool {
    match expr {
        BoolExpr::Or(terms) => terms.iter().any(|term| eval_bool_expr(term, row)),
        BoolExpr::And(factors) => factors.iter().all(|factor| eval_bool_expr(factor, row)),
        BoolExpr::Paren(inner) => eval_bool_expr(inner, row),
        BoolExpr::Predicate(pred) => eval_predicate(pred, row),
    }
}

fn eval_predicate(pred: &Predicate, row: &Row) -> bool {
    // Missing field: the predicate silently fails. This is the evaluator's
    // only implicit-failure path.
    let Some(value) = row.get(&pred.field) else {
        return false;
    };
    let literal = normalize_literal(pred);
    pred.op.accepts(compare(value, &literal))
}

/// Normalize a predicate's literal to the text it compares against.
///
/// `true`/`false` kinds normalize to their keyword spelling. A string
/// literal still wrapped in its surrounding quotes has exactly one leading
/// and one trailing quote stripped — the lexer already strips them, so this
/// only fires on literals built by hand, and is idempotent either way.
fn normalize_literal(pred: &Predicate) -> String {
    match pred.literal.kind {
        LiteralKind::True => "true".to_string(),
        LiteralKind::False => "false".to_string(),
        LiteralKind::Str => {
            let text = &pred.literal.text;
            if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
                text[1..text.len() - 1].to_string()
            } else {
                text.clone()
            }
        }
        LiteralKind::Number => pred.literal.text.clone(),
    }
}

/// Three-way comparison of a row value against a literal value.
///
/// If both sides parse fully as numbers the comparison is numeric, so
/// `"19"` equals `"19.0"` and `"9"` sorts before `"10"`. Otherwise both
/// sides compare as plain text in lexicographic order. A numeric parse
/// succeeds only when the entire string is consumed.
pub fn compare(row_value: &str, literal_value: &str) -> Ordering {
    if let (Ok(a), Ok(b)) = (row_value.parse::<f64>(), literal_value.parse::<f64>()) {
        // NaN never orders against anything; treat it as equal, matching
        // the fallthrough of a three-way numeric compare.
        return a.partial_cmp(&b).unwrap_or(Ordering::Equal);
    }
    row_value.cmp(literal_value)
}

impl CompOp {
    /// Whether this operator accepts the given three-way comparison result.
    pub fn accepts(self, ord: Ordering) -> bool {
        match self {
            CompOp::Eq => ord == Ordering::Equal,
            CompOp::NotEq => ord != Ordering::Equal,
            CompOp::Lt => ord == Ordering::Less,
            CompOp::LtEq => ord != Ordering::Greater,
            CompOp::Gt => ord == Ordering::Greater,
            CompOp::GtEq => ord != Ordering::Less,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
