use std::collections::BTreeMap;
use std::sync::Arc;

use crate::binding::BoundStatementBuilder;
use crate::statement::StatementPlan;

/// A statement registered with the execution engine, with its rendered text.
#[derive(Debug)]
pub struct PreparedStatement {
    plan: StatementPlan,
    text: String,
}

impl PreparedStatement {
    pub fn prepare(plan: StatementPlan) -> Self {
        let text = plan.render();
        Self { plan, text }
    }

    pub fn plan(&self) -> &StatementPlan {
        &self.plan
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Start a new execution of this statement.
    pub fn bound_builder(&self) -> BoundStatementBuilder {
        BoundStatementBuilder::new(self.plan.clone(), self.text.clone())
    }
}

/// Slot map owned by one generated data access object. Populated during
/// construction, read-only afterwards; a plan with an identity already
/// present reuses the existing slot instead of preparing a second one.
#[derive(Debug, Default)]
pub struct PreparedStore {
    slots: BTreeMap<String, Arc<PreparedStatement>>,
}

impl PreparedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_prepare(&mut self, plan: StatementPlan) -> Arc<PreparedStatement> {
        let identity = plan.identity();
        if let Some(existing) = self.slots.get(&identity) {
            log::debug!("reusing prepared statement slot for {identity}");
            return Arc::clone(existing);
        }
        let prepared = Arc::new(PreparedStatement::prepare(plan));
        self.slots.insert(identity, Arc::clone(&prepared));
        prepared
    }

    pub fn get(&self, identity: &str) -> Option<&Arc<PreparedStatement>> {
        self.slots.get(identity)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
