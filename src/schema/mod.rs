//! Declared field types and the optional pre-evaluation semantic check.
//!
//! A [`Schema`] maps field names to a [`FieldType`]; [`check_query`] walks
//! a parsed [`Query`] against it and collects every violation it finds.
//! The check is advisory: the evaluator never consults a schema and gives
//! ill-typed comparisons a defined result regardless (see
//! [`crate::execution`]).

use std::collections::BTreeMap;
use std::fmt;

use crate::sql::ast::{BoolExpr, CompOp, LiteralKind, Predicate, Query};
use crate::table::Table;

/// The declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Number,
    Text,
    Bool,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldType::Number => "number",
            FieldType::Text => "string",
            FieldType::Bool => "bool",
        };
        f.write_str(s)
    }
}

fn literal_kind_name(kind: LiteralKind) -> &'static str {
    match kind {
        LiteralKind::Number => "number literal",
        LiteralKind::Str => "string literal",
        LiteralKind::True => "true literal",
        LiteralKind::False => "false literal",
    }
}

/// A declared mapping from field names to types.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: BTreeMap<String, FieldType>,
}

impl Schema {
    pub fn new() -> Self {
        Schema::default()
    }

    pub fn add_field(&mut self, name: impl Into<String>, ty: FieldType) {
        self.fields.insert(name.into(), ty);
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).copied()
    }

    /// Iterate over the declared fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.fields.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    /// Infer a schema from table data: a field is `Number` if every
    /// non-empty value it takes parses fully as a number, `Bool` if every
    /// value is exactly `true` or `false`, otherwise `Text`. Fields missing
    /// from some rows are typed from the rows that have them.
    pub fn infer(table: &Table) -> Self {
        let mut schema = Schema::new();
        // Per field: (numeric so far, boolean so far, any non-empty value).
        let mut seen: BTreeMap<String, (bool, bool, bool)> = BTreeMap::new();

        for row in table {
            for (name, value) in row {
                let entry = seen.entry(name.clone()).or_insert((true, true, false));
                if !value.is_empty() {
                    entry.2 = true;
                    if value.parse::<f64>().is_err() {
                        entry.0 = false;
                    }
                }
                if value != "true" && value != "false" {
                    entry.1 = false;
                }
            }
        }

        for (name, (numeric, boolean, nonempty)) in seen {
            // A field with no non-empty values carries no type evidence.
            let ty = if !nonempty {
                FieldType::Text
            } else if boolean {
                FieldType::Bool
            } else if numeric {
                FieldType::Number
            } else {
                FieldType::Text
            };
            schema.add_field(name, ty);
        }
        schema
    }
}

/// A single finding from [`check_query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    UnknownSelectField(String),
    UnknownWhereField(String),
    LiteralTypeMismatch {
        field: String,
        field_type: FieldType,
        literal: &'static str,
    },
    RelationalOnNonNumber {
        field: String,
        field_type: FieldType,
    },
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticError::UnknownSelectField(name) => {
                write!(f, "unknown field in SELECT list: '{name}'")
            }
            SemanticError::UnknownWhereField(name) => {
                write!(f, "unknown field in WHERE: '{name}'")
            }
            SemanticError::LiteralTypeMismatch {
                field,
                field_type,
                literal,
            } => write!(
                f,
                "field '{field}' is a {field_type}, but compared with {literal}"
            ),
            SemanticError::RelationalOnNonNumber { field, field_type } => write!(
                f,
                "relational operator (<, <=, >, >=) used on non-number field '{field}' of type {field_type}"
            ),
        }
    }
}

/// Validate a query against a schema, collecting every violation.
///
/// Returns an empty vec when the query is well-typed. Unlike the parser,
/// which stops at the first syntax error, the checker keeps going so a
/// caller can report all problems at once.
pub fn check_query(query: &Query, schema: &Schema) -> Vec<SemanticError> {
    let mut errors = Vec::new();

    if !query.select_all {
        for field in &query.fields {
            if !schema.has_field(field) {
                errors.push(SemanticError::UnknownSelectField(field.clone()));
            }
        }
    }

    if let Some(ref where_clause) = query.where_clause {
        check_bool_expr(where_clause, schema, &mut errors);
    }

    errors
}

fn check_bool_expr(expr: &BoolExpr, schema: &Schema, errors: &mut Vec<SemanticError>) {
    match expr {
        BoolExpr::Or(terms) => {
            for term in terms {
                check_bool_expr(term, schema, errors);
            }
        }
        BoolExpr::And(factors) => {
            for factor in factors {
                check_bool_expr(factor, schema, errors);
            }
        }
        BoolExpr::Paren(inner) => check_bool_expr(inner, schema, errors),
        BoolExpr::Predicate(pred) => check_predicate(pred, schema, errors),
    }
}

fn check_predicate(pred: &Predicate, schema: &Schema, errors: &mut Vec<SemanticError>) {
    let field_type = match schema.field_type(&pred.field) {
        Some(ty) => ty,
        None => {
            // Without a declared type there is nothing further to check.
            errors.push(SemanticError::UnknownWhereField(pred.field.clone()));
            return;
        }
    };

    let kind = pred.literal.kind;
    let mismatched = match field_type {
        FieldType::Number => kind != LiteralKind::Number,
        FieldType::Text => kind != LiteralKind::Str,
        FieldType::Bool => !matches!(kind, LiteralKind::True | LiteralKind::False),
    };
    if mismatched {
        errors.push(SemanticError::LiteralTypeMismatch {
            field: pred.field.clone(),
            field_type,
            literal: literal_kind_name(kind),
        });
    }

    let relational = matches!(
        pred.op,
        CompOp::Lt | CompOp::LtEq | CompOp::Gt | CompOp::GtEq
    );
    if relational && field_type != FieldType::Number {
        errors.push(SemanticError::RelationalOnNonNumber {
            field: pred.field.clone(),
            field_type,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::parser::Parser;
    use crate::table::Row;

    fn customer_schema() -> Schema {
        let mut schema = Schema::new();
        schema.add_field("name", FieldType::Text);
        schema.add_field("age", FieldType::Number);
        schema.add_field("active", FieldType::Bool);
        schema
    }

    fn check(text: &str, schema: &Schema) -> Vec<SemanticError> {
        check_query(&Parser::parse(text).unwrap(), schema)
    }

    #[test]
    fn well_typed_query_passes() {
        let schema = customer_schema();
        let errors = check(
            "SELECT name FROM t WHERE age >= 21 AND active = true AND name = \"Ada\"",
            &schema,
        );
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }

    #[test]
    fn select_all_skips_field_list_check() {
        let schema = customer_schema();
        assert!(check("SELECT * FROM t", &schema).is_empty());
    }

    #[test]
    fn unknown_select_field() {
        let schema = customer_schema();
        let errors = check("SELECT nickname FROM t", &schema);
        assert_eq!(
            errors,
            vec![SemanticError::UnknownSelectField("nickname".into())]
        );
    }

    #[test]
    fn unknown_where_field_stops_predicate_checks() {
        let schema = customer_schema();
        // No cascading type errors for a field that is not in the schema.
        let errors = check("SELECT * FROM t WHERE nickname < 3", &schema);
        assert_eq!(
            errors,
            vec![SemanticError::UnknownWhereField("nickname".into())]
        );
    }

    #[test]
    fn number_field_with_string_literal() {
        let schema = customer_schema();
        let errors = check("SELECT * FROM t WHERE age = \"old\"", &schema);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("is a number"));
    }

    #[test]
    fn text_field_with_number_literal() {
        let schema = customer_schema();
        let errors = check("SELECT * FROM t WHERE name = 7", &schema);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("is a string"));
    }

    #[test]
    fn bool_field_with_non_bool_literal() {
        let schema = customer_schema();
        let errors = check("SELECT * FROM t WHERE active = 1", &schema);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("is a bool"));
    }

    #[test]
    fn relational_on_text_field() {
        let schema = customer_schema();
        let errors = check("SELECT * FROM t WHERE name < \"m\"", &schema);
        assert_eq!(
            errors,
            vec![SemanticError::RelationalOnNonNumber {
                field: "name".into(),
                field_type: FieldType::Text,
            }]
        );
    }

    #[test]
    fn all_violations_are_collected() {
        let schema = customer_schema();
        let errors = check(
            "SELECT nickname, name FROM t WHERE age = \"old\" OR active > 2",
            &schema,
        );
        // unknown select field, number/string mismatch, bool/number mismatch,
        // relational on bool.
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn infer_types_from_table_data() {
        let mut r1 = Row::new();
        r1.insert("name".into(), "Alice".into());
        r1.insert("age".into(), "25".into());
        r1.insert("active".into(), "true".into());
        let mut r2 = Row::new();
        r2.insert("name".into(), "Ben".into());
        r2.insert("age".into(), "22.5".into());
        r2.insert("active".into(), "false".into());

        let schema = Schema::infer(&vec![r1, r2]);
        assert_eq!(schema.field_type("name"), Some(FieldType::Text));
        assert_eq!(schema.field_type("age"), Some(FieldType::Number));
        assert_eq!(schema.field_type("active"), Some(FieldType::Bool));
        assert!(!schema.has_field("missing"));
    }

    #[test]
    fn infer_all_empty_field_is_text() {
        let mut r1 = Row::new();
        r1.insert("note".into(), "".into());
        let mut r2 = Row::new();
        r2.insert("note".into(), "".into());

        let schema = Schema::infer(&vec![r1, r2]);
        assert_eq!(schema.field_type("note"), Some(FieldType::Text));

        // So an equality check against the empty string is well-typed.
        let errors = check("SELECT * FROM t WHERE note = \"\"", &schema);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }

    #[test]
    fn infer_mixed_values_fall_back_to_text() {
        let mut r1 = Row::new();
        r1.insert("v".into(), "12".into());
        let mut r2 = Row::new();
        r2.insert("v".into(), "twelve".into());

        let schema = Schema::infer(&vec![r1, r2]);
        assert_eq!(schema.field_type("v"), Some(FieldType::Text));
    }
}
