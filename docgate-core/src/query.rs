//! Query construction for document lookups.
//!
//! The gateway only ever looks documents up by equality, so the expression language is
//! deliberately small: field equality and conjunction. Backends execute a [`Query`] by
//! implementing [`QueryVisitor`] over its filter.
//!
//! ```ignore
//! use docgate::query::{Filter, Query};
//!
//! let query = Query::builder()
//!     .filter(Filter::eq("uid", 7_i64))
//!     .limit(1)
//!     .build();
//! ```

use bson::Bson;

use crate::error::DocumentStoreError;

/// A filter expression for querying documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Logical AND of multiple expressions (all must match).
    And(Vec<Expr>),
    /// The field must be present and equal to the value.
    Eq {
        /// The field name to compare.
        field: String,
        /// The value to compare against.
        value: Bson,
    },
}

impl Expr {
    /// Combines this expression with another using logical AND.
    ///
    /// If this expression is already an AND, the other expression is appended
    /// to the list. Otherwise, a new AND expression is created.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut list) => {
                list.push(other);
                Expr::And(list)
            }
            _ => Expr::And(vec![self, other]),
        }
    }
}

/// A structured lookup against a single collection.
///
/// A query without a filter matches every document. Results come back in the
/// backend's native order.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Optional filter expression to match documents.
    pub filter: Option<Expr>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
}

impl Query {
    /// Creates a query that matches every document.
    pub fn new() -> Self {
        Query::default()
    }

    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }
}

/// Helper for constructing filter expressions.
pub struct Filter;

impl Filter {
    /// Matches documents where the field equals the specified value.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::Eq { field: field.into(), value: value.into() }
    }

    /// Combines multiple expressions such that all must match.
    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(exprs.into_iter().collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Creates a new query builder.
    pub fn new() -> Self {
        QueryBuilder { query: Query::default() }
    }

    /// Sets the filter expression for this query.
    pub fn filter(mut self, filter: Expr) -> Self {
        self.query.filter = Some(filter);
        self
    }

    /// Sets the maximum number of documents to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Builds and returns the final query.
    pub fn build(self) -> Query {
        self.query
    }
}

pub trait QueryVisitor {
    type Output;
    type Error: Into<DocumentStoreError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Eq { field, value } => self.visit_eq(field, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_flattens_into_existing_conjunction() {
        let expr = Filter::eq("a", 1_i64)
            .and(Filter::eq("b", 2_i64))
            .and(Filter::eq("c", 3_i64));

        match expr {
            Expr::And(list) => assert_eq!(list.len(), 3),
            other => panic!("expected conjunction, got {other:?}"),
        }
    }

    #[test]
    fn builder_sets_filter_and_limit() {
        let query = Query::builder()
            .filter(Filter::eq("uid", 4_i64))
            .limit(1)
            .build();

        assert_eq!(query.limit, Some(1));
        assert_eq!(
            query.filter,
            Some(Expr::Eq { field: "uid".to_string(), value: Bson::Int64(4) })
        );
        assert!(Query::new().filter.is_none());
    }
}
