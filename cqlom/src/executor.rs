use serde_json::Value;

use crate::binding::BoundStatement;
use crate::errors::ExecError;

/// One result row, as a dynamic value.
pub type Row = Value;

/// Raw outcome of executing a statement.
#[derive(Debug, Clone, Default)]
pub struct ExecutionOutcome {
    pub rows: Vec<Row>,
}

impl ExecutionOutcome {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// The external execution engine. Network I/O, retries and consistency
/// negotiation all live behind this trait; the runtime never inspects or
/// recovers from its failures, it only relays them.
#[allow(async_fn_in_trait)]
pub trait StatementExecutor {
    /// Whether the wire protocol supports leaving bind markers unset.
    fn supports_unset_values(&self) -> bool {
        true
    }

    /// Ambient keyspace applied to unqualified statements, if any.
    fn default_keyspace(&self) -> Option<&str> {
        None
    }

    async fn execute(&self, statement: BoundStatement) -> Result<ExecutionOutcome, ExecError>;
}
