//! Query expression evaluation for in-memory document filtering.

use std::collections::HashMap;
use bson::Bson;

use docgate_core::{
    query::{QueryVisitor, Expr},
    error::{DocumentStoreError, DocumentStoreResult},
};


/// Type-erased, comparable representation of BSON values.
///
/// Integers compare exactly; an integer and a double compare by numeric value.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(&'a str),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
    /// Anything else compares equal only to an identical BSON value.
    Other(&'a Bson),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Int(i64::from(*value)),
            Bson::Int64(value) => Comparable::Int(*value),
            Bson::Double(value) => Comparable::Double(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
            other => Comparable::Other(other),
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Int(a), Comparable::Int(b)) => a == b,
            (Comparable::Double(a), Comparable::Double(b)) => a == b,
            (Comparable::Int(a), Comparable::Double(b))
            | (Comparable::Double(b), Comparable::Int(a)) => (*a as f64) == *b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            (Comparable::Other(a), Comparable::Other(b)) => a == b,
            _ => false,
        }
    }
}


pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Bson,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Bson) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> DocumentStoreResult<bool> {
        self.visit_expr(expr)
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error> {
        // Non-document values have no fields, so no field filter can match them.
        Ok(
            self.document
                .as_document()
                .and_then(|doc| doc.get(field))
                .is_some_and(|field_value| Comparable::from(field_value) == Comparable::from(value))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use docgate_core::query::Filter;

    fn matches(document: &Bson, expr: &Expr) -> bool {
        DocumentEvaluator::new(document).evaluate(expr).unwrap()
    }

    #[test]
    fn equality_across_integer_widths() {
        let document = Bson::Document(doc! { "uid": 7_i32 });

        assert!(matches(&document, &Filter::eq("uid", 7_i64)));
        assert!(matches(&document, &Filter::eq("uid", 7.0_f64)));
        assert!(!matches(&document, &Filter::eq("uid", 8_i64)));
        assert!(!matches(&document, &Filter::eq("uid", "7")));
    }

    #[test]
    fn large_integers_compare_exactly() {
        let document = Bson::Document(doc! { "uid": i64::MAX });

        assert!(matches(&document, &Filter::eq("uid", i64::MAX)));
        assert!(!matches(&document, &Filter::eq("uid", i64::MAX - 1)));
    }

    #[test]
    fn missing_fields_and_non_documents_never_match() {
        let document = Bson::Document(doc! { "name": "a" });
        assert!(!matches(&document, &Filter::eq("uid", 1_i64)));

        let list = Bson::Array(vec![Bson::Int64(1)]);
        assert!(!matches(&list, &Filter::eq("uid", 1_i64)));
    }

    #[test]
    fn conjunction_requires_every_branch() {
        let document = Bson::Document(doc! { "uid": 1_i64, "kind": "widget" });

        let both = Filter::and([Filter::eq("uid", 1_i64), Filter::eq("kind", "widget")]);
        let one = Filter::and([Filter::eq("uid", 1_i64), Filter::eq("kind", "gadget")]);

        assert!(matches(&document, &both));
        assert!(!matches(&document, &one));
        assert!(matches(&document, &Filter::and([])));
    }

    #[test]
    fn nested_values_compare_structurally() {
        let document = Bson::Document(doc! { "tags": ["a", "b"], "meta": { "x": 1_i64 } });

        assert!(matches(&document, &Filter::eq("tags", vec!["a", "b"])));
        assert!(matches(&document, &Filter::eq("meta", doc! { "x": 1_i32 })));
        assert!(!matches(&document, &Filter::eq("tags", vec!["b", "a"])));
    }
}
