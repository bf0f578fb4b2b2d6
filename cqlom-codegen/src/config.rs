//! Declaration records: the generator's input surface.
//!
//! Entity and method metadata arrive as plain configuration records with an
//! enumerated set of recognized options. They are serde-deserializable so an
//! offline build step can load them from manifests.

use serde::{Deserialize, Serialize};

use cqlom::StatementAttributes;

/// Semantic value kinds recognized by the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Text,
    Int,
    BigInt,
    Counter,
    Boolean,
    Double,
    Uuid,
    Timestamp,
    Blob,
}

/// Primary-key role declared on a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyRole {
    Partition,
    Clustering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDeclaration {
    pub role: KeyRole,
    /// Ordinal position within the key segment, 0-based.
    pub position: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDeclaration {
    pub name: String,
    pub kind: ValueKind,
    #[serde(default)]
    pub key: Option<KeyDeclaration>,
    /// Explicit column-name override; wins over the naming convention.
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub transient: bool,
}

impl PropertyDeclaration {
    pub fn new(name: &str, kind: ValueKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            key: None,
            column: None,
            transient: false,
        }
    }

    pub fn partition_key(mut self, position: u16) -> Self {
        self.key = Some(KeyDeclaration {
            role: KeyRole::Partition,
            position,
        });
        self
    }

    pub fn clustering_key(mut self, position: u16) -> Self {
        self.key = Some(KeyDeclaration {
            role: KeyRole::Clustering,
            position,
        });
        self
    }

    pub fn column(mut self, column: &str) -> Self {
        self.column = Some(column.to_string());
        self
    }

    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }
}

/// How generated code reads entity properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorStyle {
    /// `get_x()` / `set_x()` pairs.
    Conventional,
    /// Bare `x()` accessors.
    Short,
}

/// One explicit strategy fragment. Fields left unset fall back to the global
/// default once any fragment is present; two fragments disagreeing on the
/// same field is an ambiguity error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyDeclaration {
    #[serde(default)]
    pub mutable: Option<bool>,
    #[serde(default)]
    pub accessor_style: Option<AccessorStyle>,
}

/// Structural facts about the declared entity type, as introspected by the
/// declaration surface. Idiom detectors read these.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ShapeDeclaration {
    #[serde(default)]
    pub has_all_args_constructor: bool,
    #[serde(default)]
    pub has_setters: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDeclaration {
    pub name: String,
    #[serde(default)]
    pub keyspace: Option<String>,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub strategy: Vec<StrategyDeclaration>,
    #[serde(default)]
    pub shape: ShapeDeclaration,
    pub properties: Vec<PropertyDeclaration>,
}

impl EntityDeclaration {
    pub fn new(name: &str, properties: Vec<PropertyDeclaration>) -> Self {
        Self {
            name: name.to_string(),
            keyspace: None,
            table: None,
            strategy: Vec::new(),
            shape: ShapeDeclaration::default(),
            properties,
        }
    }
}

/// Method kinds understood by the analyzer. The counter-increment kind is
/// the representative instance of the shared kind contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    Increment,
}

impl MethodKind {
    /// Human-readable name used in diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Self::Increment => "Increment",
        }
    }

    /// Tag used in statement identities and generated field names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Increment => "increment",
        }
    }
}

/// Declared return shapes. Each method kind supports a subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnShape {
    /// Synchronous, no result; blocks until execution completes.
    Unit,
    /// Future resolving to no value.
    AsyncUnit,
    /// Cold reactive stream of result rows.
    RowStream,
    /// A single mapped entity (used by lookup kinds).
    Entity,
    /// An optional mapped entity (used by lookup kinds).
    OptionalEntity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterDeclaration {
    /// An entity-typed parameter.
    Entity {
        name: String,
        entity: String,
        /// A column-name override is meaningless on an entity parameter and
        /// only draws a warning.
        #[serde(default)]
        column: Option<String>,
    },
    /// Trailing statement customizer: a pure transform over the statement
    /// builder, applied immediately before execution.
    Customizer { name: String },
    /// A scalar parameter (used by kinds with positional bind parameters).
    Scalar { name: String, kind: ValueKind },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDeclaration {
    pub name: String,
    pub kind: MethodKind,
    pub parameters: Vec<ParameterDeclaration>,
    pub return_shape: ReturnShape,
    #[serde(default)]
    pub keyspace: Option<String>,
    #[serde(default)]
    pub table: Option<String>,
    /// Static statement attributes, passed through uninterpreted.
    #[serde(default)]
    pub attributes: Option<StatementAttributes>,
}

impl MethodDeclaration {
    pub fn increment(name: &str, entity: &str, return_shape: ReturnShape) -> Self {
        Self {
            name: name.to_string(),
            kind: MethodKind::Increment,
            parameters: vec![ParameterDeclaration::Entity {
                name: "deltas".to_string(),
                entity: entity.to_string(),
                column: None,
            }],
            return_shape,
            keyspace: None,
            table: None,
            attributes: None,
        }
    }
}

/// One declared data access object: a named set of methods plus optional
/// keyspace/table overrides that sit between the per-method override and the
/// entity default in the resolution chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaoDeclaration {
    pub name: String,
    #[serde(default)]
    pub keyspace: Option<String>,
    #[serde(default)]
    pub table: Option<String>,
    pub methods: Vec<MethodDeclaration>,
}

impl DaoDeclaration {
    pub fn new(name: &str, methods: Vec<MethodDeclaration>) -> Self {
        Self {
            name: name.to_string(),
            keyspace: None,
            table: None,
            methods,
        }
    }
}
