//! Entity model builder: turns property declarations into the immutable
//! [`EntityDefinition`] the rest of the pipeline works from.

use std::collections::HashSet;

use cqlom::TableRef;

use crate::config::{AccessorStyle, EntityDeclaration, KeyRole, ValueKind};
use crate::errors::{CodegenError, DeclarationError};
use crate::idiom::{IdiomChain, resolve_strategy};
use crate::naming::NamingConvention;

/// Where a property sits in the primary key, with its ordinal position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySlot {
    None,
    Partition(u16),
    Clustering(u16),
}

#[derive(Debug, Clone)]
pub struct PropertyDefinition {
    pub name: String,
    pub column: String,
    pub kind: ValueKind,
    pub key: KeySlot,
}

impl PropertyDefinition {
    pub fn is_key(&self) -> bool {
        !matches!(self.key, KeySlot::None)
    }
}

/// Fully resolved entity model. Built once per distinct entity per
/// generation session; immutable after construction.
#[derive(Debug, Clone)]
pub struct EntityDefinition {
    pub name: String,
    pub keyspace: Option<String>,
    pub table: String,
    pub mutable: bool,
    pub accessor_style: AccessorStyle,
    properties: Vec<PropertyDefinition>,
}

impl EntityDefinition {
    /// All properties, in declaration order.
    pub fn properties(&self) -> &[PropertyDefinition] {
        &self.properties
    }

    /// Partition-key properties in ordinal order.
    pub fn partition_key(&self) -> Vec<&PropertyDefinition> {
        let mut keyed: Vec<_> = self
            .properties
            .iter()
            .filter_map(|property| match property.key {
                KeySlot::Partition(position) => Some((position, property)),
                _ => None,
            })
            .collect();
        keyed.sort_by_key(|(position, _)| *position);
        keyed.into_iter().map(|(_, property)| property).collect()
    }

    /// Clustering-key properties in ordinal order.
    pub fn clustering_columns(&self) -> Vec<&PropertyDefinition> {
        let mut keyed: Vec<_> = self
            .properties
            .iter()
            .filter_map(|property| match property.key {
                KeySlot::Clustering(position) => Some((position, property)),
                _ => None,
            })
            .collect();
        keyed.sort_by_key(|(position, _)| *position);
        keyed.into_iter().map(|(_, property)| property).collect()
    }

    /// The full primary key: partition key first, then clustering columns.
    pub fn primary_key(&self) -> Vec<&PropertyDefinition> {
        let mut key = self.partition_key();
        key.extend(self.clustering_columns());
        key
    }

    /// Everything outside the primary key, in declaration order.
    pub fn regular_columns(&self) -> Vec<&PropertyDefinition> {
        self.properties
            .iter()
            .filter(|property| !property.is_key())
            .collect()
    }

    /// The entity's default table coordinates.
    pub fn table_ref(&self) -> TableRef {
        TableRef::new(self.keyspace.as_deref(), &self.table)
    }
}

/// Build an [`EntityDefinition`] from its declaration.
pub fn build_entity(
    declaration: &EntityDeclaration,
    chain: &IdiomChain,
    naming: NamingConvention,
) -> Result<EntityDefinition, CodegenError> {
    let strategy = resolve_strategy(declaration, chain)?;

    if !strategy.mutable && !declaration.shape.has_all_args_constructor {
        return Err(DeclarationError::MissingAllArgsConstructor {
            entity: declaration.name.clone(),
        }
        .into());
    }

    let mut properties = Vec::new();
    let mut seen_columns = HashSet::new();
    for property in &declaration.properties {
        if property.transient {
            continue;
        }
        let column = property
            .column
            .clone()
            .unwrap_or_else(|| naming.apply(&property.name));
        if !seen_columns.insert(column.clone()) {
            return Err(DeclarationError::DuplicateColumn {
                entity: declaration.name.clone(),
                column,
            }
            .into());
        }
        let key = match property.key {
            Some(key) => match key.role {
                KeyRole::Partition => KeySlot::Partition(key.position),
                KeyRole::Clustering => KeySlot::Clustering(key.position),
            },
            None => KeySlot::None,
        };
        properties.push(PropertyDefinition {
            name: property.name.clone(),
            column,
            kind: property.kind,
            key,
        });
    }

    let definition = EntityDefinition {
        name: declaration.name.clone(),
        keyspace: declaration.keyspace.clone(),
        table: declaration
            .table
            .clone()
            .unwrap_or_else(|| naming.apply(&declaration.name)),
        mutable: strategy.mutable,
        accessor_style: strategy.accessor_style,
        properties,
    };

    check_key_segment(&definition, "partition", &definition.partition_key())?;
    check_key_segment(&definition, "clustering", &definition.clustering_columns())?;

    log::debug!(
        "built entity {} ({} properties, table {})",
        definition.name,
        definition.properties.len(),
        definition.table
    );
    Ok(definition)
}

/// Key ordinals must form a contiguous 0-based sequence within the segment.
fn check_key_segment(
    definition: &EntityDefinition,
    segment: &'static str,
    properties: &[&PropertyDefinition],
) -> Result<(), CodegenError> {
    for (index, property) in properties.iter().enumerate() {
        let position = match property.key {
            KeySlot::Partition(position) | KeySlot::Clustering(position) => position,
            KeySlot::None => continue,
        };
        if usize::from(position) != index {
            return Err(DeclarationError::BrokenKeyOrder {
                entity: definition.name.clone(),
                segment,
            }
            .into());
        }
    }
    Ok(())
}
