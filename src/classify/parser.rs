//! SQL parsing and classification logic.
//!
//! Uses sqlparser-rs with the PostgreSQL dialect to parse SQL and determine
//! the statement kind. Classification is a pure function of the input text:
//! no I/O, no shared state, identical input always yields identical output.

use sqlparser::ast::{Query, Select, SetExpr, Statement, TableFactor, TableWithJoins};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

use crate::error::{Result, WardenError};

use super::{SqlStatement, StatementKind};

/// SQL classifier that parses raw text and admits only single, read-only
/// SELECT statements.
#[derive(Debug)]
pub struct SqlClassifier {
    dialect: PostgreSqlDialect,
}

impl Default for SqlClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlClassifier {
    /// Creates a new SQL classifier.
    pub fn new() -> Self {
        Self {
            dialect: PostgreSqlDialect {},
        }
    }

    /// Classifies a SQL string, returning a normalized statement on acceptance.
    ///
    /// Rejected input falls into one of three validation errors:
    /// [`WardenError::Malformed`] for empty or unparseable text,
    /// [`WardenError::MultipleStatements`] for batches (even all-SELECT ones),
    /// and [`WardenError::Forbidden`] for any statement kind other than a
    /// read-only SELECT. Normalization re-renders the parsed AST, so comments
    /// are stripped and whitespace is canonical.
    pub fn classify(&self, sql: &str) -> Result<SqlStatement> {
        if sql.trim().is_empty() {
            return Err(WardenError::malformed("empty SQL statement"));
        }

        let statements = Parser::parse_sql(&self.dialect, sql)
            .map_err(|e| WardenError::malformed(format!("SQL parse error: {e}")))?;

        match statements.len() {
            0 => Err(WardenError::malformed("no statement found in input")),
            1 => {
                let kind = statement_kind(&statements[0]);
                if !kind.is_allowed() {
                    return Err(WardenError::forbidden(
                        kind,
                        "only read-only SELECT statements are allowed",
                    ));
                }
                Ok(SqlStatement::new(sql, kind, statements[0].to_string()))
            }
            count => Err(WardenError::MultipleStatements { count }),
        }
    }

    /// Returns the detected statement kind without deciding acceptance.
    ///
    /// Unparseable input maps to [`StatementKind::Other`] and batches to
    /// [`StatementKind::Multi`]. Useful for diagnostics and log output.
    pub fn statement_kind(&self, sql: &str) -> StatementKind {
        match Parser::parse_sql(&self.dialect, sql) {
            Ok(statements) => match statements.len() {
                0 => StatementKind::Other,
                1 => statement_kind(&statements[0]),
                _ => StatementKind::Multi,
            },
            Err(_) => StatementKind::Other,
        }
    }
}

/// Convenience function to classify SQL without creating a classifier instance.
pub fn classify_sql(sql: &str) -> Result<SqlStatement> {
    SqlClassifier::new().classify(sql)
}

/// Determines the kind of a single parsed statement.
fn statement_kind(statement: &Statement) -> StatementKind {
    match statement {
        // Queries may hide data-modifying CTEs or derived tables, so recurse.
        Statement::Query(query) => match query_mutation(query) {
            Some(kind) => kind,
            None => StatementKind::Select,
        },

        Statement::Insert { .. } => StatementKind::Insert,
        Statement::Update { .. } => StatementKind::Update,
        Statement::Delete { .. } => StatementKind::Delete,

        Statement::Drop { .. }
        | Statement::Truncate { .. }
        | Statement::AlterTable { .. }
        | Statement::AlterIndex { .. }
        | Statement::AlterView { .. }
        | Statement::AlterRole { .. }
        | Statement::CreateTable { .. }
        | Statement::CreateIndex { .. }
        | Statement::CreateView { .. }
        | Statement::CreateSchema { .. }
        | Statement::CreateDatabase { .. }
        | Statement::CreateFunction { .. }
        | Statement::CreateProcedure { .. }
        | Statement::CreateRole { .. }
        | Statement::CreateSequence { .. }
        | Statement::CreateType { .. }
        | Statement::Grant { .. }
        | Statement::Revoke { .. } => StatementKind::Ddl,

        // MERGE, CALL, SET, COPY, transaction control, and anything else.
        _ => StatementKind::Other,
    }
}

/// Searches a Query for embedded data-modifying operations.
///
/// Returns the kind of the first mutation found, or None for a pure read.
fn query_mutation(query: &Query) -> Option<StatementKind> {
    if let Some(with) = &query.with {
        for cte in &with.cte_tables {
            if let Some(kind) = query_mutation(&cte.query) {
                return Some(kind);
            }
        }
    }

    set_expr_mutation(&query.body)
}

fn set_expr_mutation(set_expr: &SetExpr) -> Option<StatementKind> {
    match set_expr {
        // Direct mutations in CTE bodies arrive wrapped as statements.
        SetExpr::Insert(stmt)
        | SetExpr::Update(stmt)
        | SetExpr::Delete(stmt)
        | SetExpr::Merge(stmt) => Some(statement_kind(stmt)),

        SetExpr::Query(query) => query_mutation(query),
        SetExpr::Select(select) => select_mutation(select),

        // Set operations (UNION, INTERSECT, EXCEPT): check both sides.
        SetExpr::SetOperation { left, right, .. } => {
            set_expr_mutation(left).or_else(|| set_expr_mutation(right))
        }

        // VALUES and TABLE cannot contain subqueries.
        _ => None,
    }
}

/// Checks a SELECT's FROM clause for mutations hidden in derived tables.
fn select_mutation(select: &Select) -> Option<StatementKind> {
    select.from.iter().find_map(table_with_joins_mutation)
}

fn table_with_joins_mutation(twj: &TableWithJoins) -> Option<StatementKind> {
    table_factor_mutation(&twj.relation)
        .or_else(|| twj.joins.iter().find_map(|j| table_factor_mutation(&j.relation)))
}

fn table_factor_mutation(factor: &TableFactor) -> Option<StatementKind> {
    match factor {
        TableFactor::Derived { subquery, .. } => query_mutation(subquery),
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => table_with_joins_mutation(table_with_joins),
        // Plain tables and table functions are read-only here.
        _ => None,
    }
}
