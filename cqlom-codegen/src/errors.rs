use thiserror::Error;

use crate::config::ReturnShape;

/// Structurally invalid entity or method metadata. Detected purely at
/// generation time and attributed to the declaration site; never fatal to
/// sibling methods or other entities.
#[derive(Debug, Clone, Error)]
pub enum DeclarationError {
    #[error("entity `{entity}`: duplicate column name `{column}`")]
    DuplicateColumn { entity: String, column: String },

    #[error(
        "entity `{entity}` is immutable and must expose a constructor taking \
         all non-transient properties"
    )]
    MissingAllArgsConstructor { entity: String },

    #[error("entity `{entity}`: {segment} key positions must form a contiguous sequence starting at 0")]
    BrokenKeyOrder {
        entity: String,
        segment: &'static str,
    },

    #[error("{kind} methods must take the entity to update as the first parameter")]
    FirstParameterNotEntity { kind: &'static str },

    #[error("{kind} methods take a single entity parameter and an optional trailing statement customizer")]
    UnexpectedParameter { kind: &'static str },

    #[error("a statement customizer must be the last parameter of `{method}`")]
    MisplacedCustomizer { method: String },

    #[error("entity `{entity}` does not have any non PK columns, {kind} is not possible")]
    NoRegularColumns {
        entity: String,
        kind: &'static str,
    },

    #[error("invalid return shape {shape:?} for a {kind} method (supported: {supported})")]
    UnsupportedReturnShape {
        kind: &'static str,
        shape: ReturnShape,
        supported: String,
    },

    #[error("unknown entity type `{entity}`")]
    UnknownEntity { entity: String },
}

/// Conflicting strategy signals during defaulting.
#[derive(Debug, Clone, Error)]
#[error("entity `{entity}`: conflicting property strategy fragments ({detail})")]
pub struct AmbiguityError {
    pub entity: String,
    pub detail: String,
}

/// Any generation-time failure.
#[derive(Debug, Clone, Error)]
pub enum CodegenError {
    #[error(transparent)]
    Declaration(#[from] DeclarationError),
    #[error(transparent)]
    Ambiguity(#[from] AmbiguityError),
}
