use std::borrow::Cow;

use thiserror::Error;

/// Top-level error type surfaced by cqlom runtime operations.
///
/// Engine failures are opaque: they originate in the external execution
/// engine and are relayed verbatim through whichever channel the declared
/// return shape implies (synchronous `Err`, future error, stream error item).
#[derive(Debug, Clone, Error)]
pub enum ExecError {
    /// An unqualified statement was prepared against an execution context
    /// that has no default keyspace.
    #[error("statement on `{table}` has no keyspace and the execution context has no default")]
    MissingKeyspace { table: String },

    /// Entity values could not be encoded for binding.
    #[error("failed to encode entity values: {message}")]
    Encode { message: String },

    /// Opaque failure reported by the execution engine.
    #[error("{message}")]
    Engine { message: Cow<'static, str> },
}

impl ExecError {
    /// Convenience constructor used by engine implementations.
    pub fn engine(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Engine {
            message: message.into(),
        }
    }
}
