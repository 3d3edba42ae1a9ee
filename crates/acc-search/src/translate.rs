//! Filter to index query translation.
//!
//! Every node of the filter tree becomes exactly one query node:
//!
//! | Filter | Query |
//! |--------|-------|
//! | `eq` | `TermQuery` |
//! | `ne`, `not` | `BooleanQuery` of everything minus the operand |
//! | `lt le gt ge` | `RangeQuery` |
//! | `and`, `or` | `BooleanQuery` intersection / union |
//! | `startswith endswith contains` | `RegexQuery` on the escaped literal |

use std::ops::Bound;

use acc_model::EntityKind;
use tantivy::Term;
use tantivy::query::{
    AllQuery, BooleanQuery, Occur, Query, RangeQuery, RegexQuery, TermQuery,
};
use tantivy::schema::IndexRecordOption;

use crate::error::{SearchError, SearchResult};
use crate::filter::{CompareOp, Expr, Literal, Operand, StringFunction};
use crate::schema::{IndexField, IndexSchema};

/// Value type of an indexed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Exact-match text.
    String,
    /// 64-bit signed integer.
    Integer,
    /// Boolean.
    Boolean,
}

/// Which entity kinds carry a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliesTo {
    /// Accounts and groups.
    Both,
    /// Accounts only.
    Account,
    /// Groups only.
    Group,
}

impl AppliesTo {
    const fn includes(self, kind: EntityKind) -> bool {
        match self {
            Self::Both => true,
            Self::Account => matches!(kind, EntityKind::Account),
            Self::Group => matches!(kind, EntityKind::Group),
        }
    }
}

/// Maps a filter property to an index field.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    /// Property name as used in the JSON representation.
    pub property: &'static str,
    /// Index field.
    pub field: IndexField,
    /// Value type.
    pub field_type: FieldType,
    /// Entity kinds carrying the property.
    pub applies_to: AppliesTo,
}

const fn mapping(
    property: &'static str,
    field: IndexField,
    field_type: FieldType,
    applies_to: AppliesTo,
) -> FieldMapping {
    FieldMapping {
        property,
        field,
        field_type,
        applies_to,
    }
}

/// Filterable properties.
pub static FIELDS: [FieldMapping; 11] = [
    mapping("id", IndexField::Id, FieldType::String, AppliesTo::Both),
    mapping("displayName", IndexField::DisplayName, FieldType::String, AppliesTo::Both),
    mapping("preferredName", IndexField::PreferredName, FieldType::String, AppliesTo::Account),
    mapping(
        "onPremisesSamAccountName",
        IndexField::OnPremisesSamAccountName,
        FieldType::String,
        AppliesTo::Both,
    ),
    mapping("mail", IndexField::Mail, FieldType::String, AppliesTo::Account),
    mapping("description", IndexField::Description, FieldType::String, AppliesTo::Both),
    mapping("uidNumber", IndexField::UidNumber, FieldType::Integer, AppliesTo::Account),
    mapping("gidNumber", IndexField::GidNumber, FieldType::Integer, AppliesTo::Both),
    mapping("accountEnabled", IndexField::AccountEnabled, FieldType::Boolean, AppliesTo::Account),
    mapping("memberOf", IndexField::MemberOf, FieldType::String, AppliesTo::Account),
    mapping("members", IndexField::Members, FieldType::String, AppliesTo::Group),
];

/// Looks up a property by its JSON name or its index field name.
///
/// ## Errors
///
/// Returns `SearchError::UnknownField` if the property is not indexed for
/// the given kind.
pub fn lookup(property: &str, kind: EntityKind) -> SearchResult<&'static FieldMapping> {
    FIELDS
        .iter()
        .find(|m| m.property == property || m.field.name() == property)
        .filter(|m| m.applies_to.includes(kind))
        .ok_or_else(|| SearchError::UnknownField(property.to_string()))
}

/// Query matching every document of one kind.
#[must_use]
pub fn kind_query(schema: &IndexSchema, kind: EntityKind) -> Box<dyn Query> {
    Box::new(TermQuery::new(
        Term::from_field_text(schema.kind_field(), kind.as_str()),
        IndexRecordOption::Basic,
    ))
}

/// Translates a parsed filter into an index query for one entity kind.
///
/// ## Errors
///
/// Returns `SearchError::UnknownField` for properties that are not indexed
/// and `SearchError::UnsupportedQuery` for type mismatches, `null`
/// comparisons, ranges on booleans, string functions on non-string fields
/// and comparisons between two properties.
pub fn translate(
    schema: &IndexSchema,
    kind: EntityKind,
    expr: &Expr,
) -> SearchResult<Box<dyn Query>> {
    match expr {
        Expr::And(left, right) => Ok(Box::new(BooleanQuery::intersection(vec![
            translate(schema, kind, left)?,
            translate(schema, kind, right)?,
        ]))),
        Expr::Or(left, right) => Ok(Box::new(BooleanQuery::union(vec![
            translate(schema, kind, left)?,
            translate(schema, kind, right)?,
        ]))),
        Expr::Not(inner) => Ok(negate(translate(schema, kind, inner)?)),
        Expr::Compare { op, left, right } => compare(schema, kind, *op, left, right),
        Expr::Function { function, args } => string_function(schema, kind, *function, args),
        Expr::Value(Operand::Property(property)) => {
            let mapping = lookup(property, kind)?;
            if mapping.field_type != FieldType::Boolean {
                return Err(SearchError::unsupported(format!(
                    "'{property}' is not a boolean property"
                )));
            }
            Ok(term_query(Term::from_field_bool(
                schema.field(mapping.field),
                true,
            )))
        }
        Expr::Value(Operand::Literal(_)) => {
            Err(SearchError::unsupported("a literal is not a condition"))
        }
    }
}

fn compare(
    schema: &IndexSchema,
    kind: EntityKind,
    op: CompareOp,
    left: &Operand,
    right: &Operand,
) -> SearchResult<Box<dyn Query>> {
    let (op, property, literal) = match (left, right) {
        (Operand::Property(property), Operand::Literal(literal)) => (op, property, literal),
        (Operand::Literal(literal), Operand::Property(property)) => {
            (op.flipped(), property, literal)
        }
        (Operand::Property(_), Operand::Property(_)) => {
            return Err(SearchError::unsupported(
                "comparing two properties is not supported",
            ));
        }
        (Operand::Literal(_), Operand::Literal(_)) => {
            return Err(SearchError::unsupported(
                "comparing two literals is not supported",
            ));
        }
    };

    let mapping = lookup(property, kind)?;
    let field = schema.field(mapping.field);

    let query: Box<dyn Query> = match (mapping.field_type, literal) {
        (_, Literal::Null) => {
            return Err(SearchError::unsupported(format!(
                "'{property} {op} null' is not supported"
            )));
        }
        (FieldType::String, Literal::String(value)) => {
            if op.is_range() {
                Box::new(RangeQuery::new_str_bounds(
                    mapping.field.name().to_string(),
                    lower(op, value.as_str()),
                    upper(op, value.as_str()),
                ))
            } else {
                term_query(Term::from_field_text(field, value))
            }
        }
        (FieldType::Integer, Literal::Integer(value)) => {
            if op.is_range() {
                Box::new(RangeQuery::new_i64_bounds(
                    mapping.field.name().to_string(),
                    lower(op, *value),
                    upper(op, *value),
                ))
            } else {
                term_query(Term::from_field_i64(field, *value))
            }
        }
        (FieldType::Boolean, Literal::Boolean(value)) => {
            if op.is_range() {
                return Err(SearchError::unsupported(format!(
                    "'{op}' on boolean property '{property}'"
                )));
            }
            term_query(Term::from_field_bool(field, *value))
        }
        (field_type, _) => {
            return Err(SearchError::unsupported(format!(
                "literal type does not match {field_type:?} property '{property}'"
            )));
        }
    };

    Ok(if op == CompareOp::Ne {
        negate(query)
    } else {
        query
    })
}

fn string_function(
    schema: &IndexSchema,
    kind: EntityKind,
    function: StringFunction,
    args: &[Operand],
) -> SearchResult<Box<dyn Query>> {
    let [Operand::Property(property), Operand::Literal(literal)] = args else {
        return Err(SearchError::unsupported(format!(
            "'{function}' expects a property and a string literal"
        )));
    };
    let Literal::String(value) = literal else {
        return Err(SearchError::unsupported(format!(
            "'{function}' expects a string literal"
        )));
    };

    let mapping = lookup(property, kind)?;
    if mapping.field_type != FieldType::String {
        return Err(SearchError::unsupported(format!(
            "'{function}' on non-string property '{property}'"
        )));
    }

    let escaped = regex::escape(value);
    let pattern = match function {
        StringFunction::StartsWith => format!("{escaped}.*"),
        StringFunction::EndsWith => format!(".*{escaped}"),
        StringFunction::Contains => format!(".*{escaped}.*"),
    };

    let query = RegexQuery::from_pattern(&pattern, schema.field(mapping.field))?;
    Ok(Box::new(query))
}

fn term_query(term: Term) -> Box<dyn Query> {
    Box::new(TermQuery::new(term, IndexRecordOption::Basic))
}

fn negate(query: Box<dyn Query>) -> Box<dyn Query> {
    Box::new(BooleanQuery::new(vec![
        (Occur::Must, Box::new(AllQuery) as Box<dyn Query>),
        (Occur::MustNot, query),
    ]))
}

fn lower<T>(op: CompareOp, value: T) -> Bound<T> {
    match op {
        CompareOp::Gt => Bound::Excluded(value),
        CompareOp::Ge => Bound::Included(value),
        _ => Bound::Unbounded,
    }
}

fn upper<T>(op: CompareOp, value: T) -> Bound<T> {
    match op {
        CompareOp::Lt => Bound::Excluded(value),
        CompareOp::Le => Bound::Included(value),
        _ => Bound::Unbounded,
    }
}
