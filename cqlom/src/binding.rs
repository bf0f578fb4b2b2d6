use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::executor::StatementExecutor;
use crate::statement::StatementPlan;

/// Governs what happens to a bind marker whose property value is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullSavingStrategy {
    /// Send an explicit null for the marker.
    SetToNull,
    /// Leave the marker unset; the column is not touched by the write.
    DoNotSet,
}

impl NullSavingStrategy {
    /// Pick the strategy from the engine's protocol capability: engines that
    /// understand unset values get `DoNotSet`, older ones get `SetToNull`.
    pub fn for_engine<X>(engine: &X) -> Self
    where
        X: StatementExecutor + ?Sized,
    {
        if engine.supports_unset_values() {
            Self::DoNotSet
        } else {
            Self::SetToNull
        }
    }
}

/// Static per-statement attributes declared on a method. Opaque passthrough:
/// the runtime hands them to the engine without interpreting them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementAttributes {
    #[serde(default)]
    pub page_size: Option<i32>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub execution_profile: Option<String>,
}

/// Mutable builder for one execution of a prepared statement.
#[derive(Debug, Clone)]
pub struct BoundStatementBuilder {
    plan: StatementPlan,
    text: String,
    values: BTreeMap<String, Value>,
    attributes: StatementAttributes,
}

impl BoundStatementBuilder {
    pub(crate) fn new(plan: StatementPlan, text: String) -> Self {
        Self {
            plan,
            text,
            values: BTreeMap::new(),
            attributes: StatementAttributes::default(),
        }
    }

    pub fn with_attributes(mut self, attributes: &StatementAttributes) -> Self {
        if let Some(page_size) = attributes.page_size {
            self.attributes.page_size = Some(page_size);
        }
        if let Some(timeout_ms) = attributes.timeout_ms {
            self.attributes.timeout_ms = Some(timeout_ms);
        }
        if let Some(profile) = &attributes.execution_profile {
            self.attributes.execution_profile = Some(profile.clone());
        }
        self
    }

    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.attributes.page_size = Some(page_size);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.attributes.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_execution_profile(mut self, profile: &str) -> Self {
        self.attributes.execution_profile = Some(profile.to_string());
        self
    }

    /// Bind one marker. An absent value follows the null-handling strategy.
    pub fn set(&mut self, marker: &str, value: Option<Value>, strategy: NullSavingStrategy) {
        match (value, strategy) {
            (Some(value), _) => {
                self.values.insert(marker.to_string(), value);
            }
            (None, NullSavingStrategy::SetToNull) => {
                self.values.insert(marker.to_string(), Value::Null);
            }
            (None, NullSavingStrategy::DoNotSet) => {}
        }
    }

    /// Finalize into an immutable bound statement.
    pub fn build(self) -> BoundStatement {
        BoundStatement {
            plan: self.plan,
            text: self.text,
            values: self.values,
            attributes: self.attributes,
        }
    }
}

/// An immutable, fully bound statement ready for execution.
#[derive(Debug, Clone)]
pub struct BoundStatement {
    pub plan: StatementPlan,
    pub text: String,
    pub values: BTreeMap<String, Value>,
    pub attributes: StatementAttributes,
}
