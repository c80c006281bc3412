//! Query translation from docgate expressions to MongoDB filter documents.

use bson::{Document, Bson, doc};

use docgate_core::{
    query::{QueryVisitor, Expr},
    error::DocumentStoreError,
};

use crate::sanitizer::KeySanitizer;


/// Translates docgate expressions into MongoDB's native BSON filter syntax.
///
/// Field names are escaped the same way stored keys are, so a filter on a client field
/// containing a dot still targets that field rather than a nested path.
pub(crate) struct MongoQueryTranslator;

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        if exprs.is_empty() {
            return Ok(doc! {});
        }

        Ok(doc! {
            "$and": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error> {
        let field = KeySanitizer::sanitize_string(field);

        Ok(doc! {
            field: { "$eq": KeySanitizer::sanitize_value(value) },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgate_core::query::Filter;

    #[test]
    fn equality_translates_to_eq_operator() {
        let filter = MongoQueryTranslator.visit_expr(&Filter::eq("uid", 3_i64)).unwrap();

        assert_eq!(filter, doc! { "uid": { "$eq": 3_i64 } });
    }

    #[test]
    fn conjunction_translates_to_and() {
        let expr = Filter::and([Filter::eq("uid", 1_i64), Filter::eq("a.b", "x")]);

        let filter = MongoQueryTranslator.visit_expr(&expr).unwrap();

        assert_eq!(
            filter,
            doc! { "$and": [ { "uid": { "$eq": 1_i64 } }, { "a%2Eb": { "$eq": "x" } } ] }
        );
        assert_eq!(MongoQueryTranslator.visit_expr(&Filter::and([])).unwrap(), doc! {});
    }
}
