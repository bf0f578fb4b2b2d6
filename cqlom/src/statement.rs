use serde::{Deserialize, Serialize};

use crate::errors::ExecError;
use crate::executor::StatementExecutor;

/// Resolved table coordinates for a statement.
///
/// The keyspace is optional: an unqualified statement relies on the default
/// keyspace of the execution context it is eventually run against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub keyspace: Option<String>,
    pub table: String,
}

impl TableRef {
    pub fn new(keyspace: Option<&str>, table: &str) -> Self {
        Self {
            keyspace: keyspace.map(str::to_string),
            table: table.to_string(),
        }
    }

    /// The name as it appears in statement text: `keyspace.table`, or the
    /// bare table name when no keyspace is set.
    pub fn qualified(&self) -> String {
        match &self.keyspace {
            Some(keyspace) => format!("{keyspace}.{}", self.table),
            None => self.table.clone(),
        }
    }

    /// Fails when this table is unqualified and the engine has no ambient
    /// default keyspace to fall back to.
    pub fn ensure_keyspace<X>(&self, engine: &X) -> Result<(), ExecError>
    where
        X: StatementExecutor + ?Sized,
    {
        if self.keyspace.is_none() && engine.default_keyspace().is_none() {
            return Err(ExecError::MissingKeyspace {
                table: self.table.clone(),
            });
        }
        Ok(())
    }
}

/// How a bound term participates in the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermRole {
    /// Additive counter update: `col = col + :marker`.
    Set,
    /// Plain assignment: `col = :marker`.
    Assign,
    /// Primary-key equality: `col = :marker` in the WHERE clause.
    Where,
}

/// One column bound in the statement. The marker name always equals the
/// column name; external correlation tooling relies on that equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundTerm {
    pub role: TermRole,
    pub column: String,
    pub marker: String,
}

impl BoundTerm {
    fn new(role: TermRole, column: &str) -> Self {
        Self {
            role,
            column: column.to_string(),
            marker: column.to_string(),
        }
    }
}

/// Abstract description of one parameterized statement.
///
/// Term order is significant and rendering is deterministic: the same plan
/// always renders to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementPlan {
    pub kind: String,
    pub entity: String,
    pub table: TableRef,
    pub terms: Vec<BoundTerm>,
}

impl StatementPlan {
    /// Start an UPDATE-form plan for the given method kind and entity.
    pub fn update(kind: &str, entity: &str, table: TableRef) -> Self {
        Self {
            kind: kind.to_string(),
            entity: entity.to_string(),
            table,
            terms: Vec::new(),
        }
    }

    /// Append an additive SET term (`col = col + :col`).
    pub fn set(mut self, column: &str) -> Self {
        self.terms.push(BoundTerm::new(TermRole::Set, column));
        self
    }

    /// Append a plain assignment term (`col = :col`).
    pub fn assign(mut self, column: &str) -> Self {
        self.terms.push(BoundTerm::new(TermRole::Assign, column));
        self
    }

    /// Append a WHERE equality term (`col = :col`).
    pub fn where_eq(mut self, column: &str) -> Self {
        self.terms.push(BoundTerm::new(TermRole::Where, column));
        self
    }

    /// Statement identity: two plans with the same identity describe the same
    /// logical statement and share one prepared slot.
    pub fn identity(&self) -> String {
        format!("{}:{}@{}", self.kind, self.entity, self.table.qualified())
    }

    /// All bind-marker names, in term order.
    pub fn markers(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|term| term.marker.as_str())
    }

    /// Render the statement text.
    pub fn render(&self) -> String {
        let mut text = format!("UPDATE {}", self.table.qualified());
        let mut assignments = 0usize;
        for term in &self.terms {
            match term.role {
                TermRole::Set | TermRole::Assign => {
                    text.push_str(if assignments == 0 { " SET " } else { ", " });
                    match term.role {
                        TermRole::Set => {
                            text.push_str(&format!(
                                "{c} = {c} + :{m}",
                                c = term.column,
                                m = term.marker
                            ));
                        }
                        _ => {
                            text.push_str(&format!("{c} = :{m}", c = term.column, m = term.marker));
                        }
                    }
                    assignments += 1;
                }
                TermRole::Where => {}
            }
        }
        let mut relations = 0usize;
        for term in &self.terms {
            if term.role == TermRole::Where {
                text.push_str(if relations == 0 { " WHERE " } else { " AND " });
                text.push_str(&format!("{c} = :{m}", c = term.column, m = term.marker));
                relations += 1;
            }
        }
        text
    }
}
