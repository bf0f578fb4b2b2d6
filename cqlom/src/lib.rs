//! cqlom runtime library.
//!
//! Everything a cqlom-generated data access object calls into at runtime:
//! the abstract statement plan and its deterministic rendering, bound
//! statement building with null-handling policies, prepared-statement slots,
//! entity helpers, the opaque execution-engine trait, and the return-shape
//! adapters (blocking, async, reactive).

pub mod binding;
pub mod errors;
pub mod execution;
pub mod executor;
pub mod helper;
pub mod prepared;
pub mod statement;

pub use binding::{BoundStatement, BoundStatementBuilder, NullSavingStrategy, StatementAttributes};
pub use errors::ExecError;
pub use execution::{ReactiveExecution, execute_async, execute_blocking};
pub use executor::{ExecutionOutcome, Row, StatementExecutor};
pub use helper::{EntityHelper, PropertyBinding, entity_values};
pub use prepared::{PreparedStatement, PreparedStore};
pub use statement::{BoundTerm, StatementPlan, TableRef, TermRole};
