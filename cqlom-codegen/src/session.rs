//! Session-scoped state for generating one data access object.
//!
//! The session is passed explicitly to each analyzer call; there is no
//! ambient or global mutable state. It caches entity definitions, hands out
//! deduplicated helper fields and prepared-statement slots, and carries the
//! diagnostic sink for the run.

use std::collections::BTreeMap;
use std::sync::Arc;

use heck::ToSnakeCase;

use cqlom::StatementPlan;

use crate::config::EntityDeclaration;
use crate::diagnostics::DiagnosticSink;
use crate::entity::{EntityDefinition, build_entity};
use crate::errors::{CodegenError, DeclarationError};
use crate::idiom::IdiomChain;
use crate::naming::NamingConvention;

/// One prepared-statement slot owned by the generated object: the struct
/// field holding it and the plan used to prepare it at construction time.
#[derive(Debug, Clone)]
pub struct StatementSlot {
    pub field: String,
    pub plan: StatementPlan,
}

pub struct GenerationSession {
    naming: NamingConvention,
    chain: IdiomChain,
    sink: Arc<DiagnosticSink>,
    declarations: BTreeMap<String, EntityDeclaration>,
    definitions: BTreeMap<String, EntityDefinition>,
    helper_fields: BTreeMap<String, String>,
    slots: BTreeMap<String, StatementSlot>,
}

impl GenerationSession {
    /// Snake-case naming, the standard detector chain, a fresh sink.
    pub fn standard() -> Self {
        Self::new(
            NamingConvention::default(),
            IdiomChain::standard(),
            Arc::new(DiagnosticSink::new()),
        )
    }

    /// A session sharing a run-wide sink (one sink may serve the sessions of
    /// several generated objects).
    pub fn new(naming: NamingConvention, chain: IdiomChain, sink: Arc<DiagnosticSink>) -> Self {
        Self {
            naming,
            chain,
            sink,
            declarations: BTreeMap::new(),
            definitions: BTreeMap::new(),
            helper_fields: BTreeMap::new(),
            slots: BTreeMap::new(),
        }
    }

    pub fn naming(&self) -> NamingConvention {
        self.naming
    }

    pub fn sink(&self) -> &DiagnosticSink {
        &self.sink
    }

    /// Make an entity declaration visible to method analysis.
    pub fn declare_entity(&mut self, declaration: EntityDeclaration) {
        self.declarations
            .insert(declaration.name.clone(), declaration);
    }

    pub fn knows_entity(&self, entity: &str) -> bool {
        self.declarations.contains_key(entity)
    }

    /// The definition for a declared entity, built on first use and cached
    /// for the rest of the session.
    pub fn entity_definition(&mut self, entity: &str) -> Result<EntityDefinition, CodegenError> {
        if let Some(definition) = self.definitions.get(entity) {
            return Ok(definition.clone());
        }
        let declaration = self.declarations.get(entity).ok_or_else(|| {
            CodegenError::from(DeclarationError::UnknownEntity {
                entity: entity.to_string(),
            })
        })?;
        let definition = build_entity(declaration, &self.chain, self.naming)?;
        self.definitions
            .insert(entity.to_string(), definition.clone());
        Ok(definition)
    }

    /// Definition already built earlier in this session, if any.
    pub fn cached_definition(&self, entity: &str) -> Option<&EntityDefinition> {
        self.definitions.get(entity)
    }

    /// The struct field holding the entity's helper, allocated on first
    /// request and reused afterwards.
    pub fn entity_helper_field(&mut self, entity: &str) -> String {
        if let Some(field) = self.helper_fields.get(entity) {
            return field.clone();
        }
        let field = format!("{}_helper", entity.to_snake_case());
        self.helper_fields.insert(entity.to_string(), field.clone());
        field
    }

    /// The struct field holding the prepared slot for this plan. At most one
    /// slot exists per statement identity; an identical (kind, entity,
    /// table) triple reuses the existing slot.
    pub fn prepared_statement_slot(&mut self, plan: StatementPlan) -> String {
        let identity = plan.identity();
        if let Some(slot) = self.slots.get(&identity) {
            log::debug!("reusing statement slot {} for {identity}", slot.field);
            return slot.field.clone();
        }
        let base = format!("{}_{}_stmt", plan.kind, plan.table.table.to_snake_case());
        let mut field = base.clone();
        let mut suffix = 1usize;
        while self.slots.values().any(|slot| slot.field == field) {
            field = format!("{base}_{suffix}");
            suffix += 1;
        }
        self.slots.insert(identity, StatementSlot { field: field.clone(), plan });
        field
    }

    /// Helper fields in deterministic (entity-name) order.
    pub fn helpers(&self) -> impl Iterator<Item = (&String, &String)> {
        self.helper_fields.iter()
    }

    /// Statement slots in deterministic (identity) order.
    pub fn slots(&self) -> impl Iterator<Item = &StatementSlot> {
        self.slots.values()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use cqlom::TableRef;

    use super::*;
    use crate::config::{PropertyDeclaration, ValueKind};

    fn plan() -> StatementPlan {
        StatementPlan::update("increment", "Votes", TableRef::new(None, "votes"))
            .set("up_votes")
            .where_eq("article_id")
    }

    #[test]
    fn definitions_are_built_once() {
        let mut session = GenerationSession::standard();
        session.declare_entity(EntityDeclaration::new(
            "Votes",
            vec![
                PropertyDeclaration::new("articleId", ValueKind::Int).partition_key(0),
                PropertyDeclaration::new("upVotes", ValueKind::Counter),
            ],
        ));
        let first = session.entity_definition("Votes").unwrap();
        let second = session.entity_definition("Votes").unwrap();
        assert_eq!(first.table, second.table);
        assert!(session.cached_definition("Votes").is_some());
        assert!(session.entity_definition("Missing").is_err());
    }

    #[test]
    fn identical_statements_share_one_slot() {
        let mut session = GenerationSession::standard();
        let first = session.prepared_statement_slot(plan());
        let second = session.prepared_statement_slot(plan());
        assert_eq!(first, second);
        assert_eq!(session.slot_count(), 1);
    }

    #[test]
    fn distinct_statements_get_distinct_fields() {
        let mut session = GenerationSession::standard();
        let first = session.prepared_statement_slot(plan());
        let qualified = StatementPlan::update("increment", "Votes", TableRef::new(Some("app"), "votes"))
            .set("up_votes")
            .where_eq("article_id");
        let second = session.prepared_statement_slot(qualified);
        assert_ne!(first, second);
        assert_eq!(session.slot_count(), 2);
    }

    #[test]
    fn helper_fields_are_reused_per_entity() {
        let mut session = GenerationSession::standard();
        assert_eq!(session.entity_helper_field("Votes"), "votes_helper");
        assert_eq!(session.entity_helper_field("Votes"), "votes_helper");
        assert_eq!(session.entity_helper_field("PageView"), "page_view_helper");
    }
}
