//! Statement template builder: a validated method plus its entity model
//! yields the abstract statement plan the emitter and runtime share.

use cqlom::StatementPlan;

use crate::analyzer::MethodSpec;
use crate::config::MethodKind;
use crate::entity::EntityDefinition;

/// Build the plan for one validated method. Deterministic: identical
/// definition and kind always produce identical term order and markers.
pub fn build_plan(spec: &MethodSpec, entity: &EntityDefinition) -> StatementPlan {
    match spec.kind {
        MethodKind::Increment => increment_plan(spec, entity),
    }
}

/// One additive SET term per regular column, one WHERE equality term per
/// primary-key column. The additive form `c = c + :c` also works against
/// older engine versions; the compound-assignment increment does not.
fn increment_plan(spec: &MethodSpec, entity: &EntityDefinition) -> StatementPlan {
    let mut plan = StatementPlan::update(spec.kind.as_str(), &entity.name, spec.table.clone());
    for property in entity.regular_columns() {
        plan = plan.set(&property.column);
    }
    for property in entity.primary_key() {
        plan = plan.where_eq(&property.column);
    }
    plan
}

#[cfg(test)]
mod tests {
    use cqlom::TableRef;

    use super::*;
    use crate::analyzer::analyze_method;
    use crate::config::{
        DaoDeclaration, EntityDeclaration, MethodDeclaration, PropertyDeclaration, ReturnShape,
        ValueKind,
    };
    use crate::session::GenerationSession;

    fn plan_for(entity: EntityDeclaration) -> StatementPlan {
        let mut session = GenerationSession::standard();
        let entity_name = entity.name.clone();
        session.declare_entity(entity);
        let dao = DaoDeclaration::new("Dao", Vec::new());
        let method = MethodDeclaration::increment("increment", &entity_name, ReturnShape::Unit);
        let spec = analyze_method(&dao, &method, &mut session).expect("valid method");
        let definition = session.entity_definition(&entity_name).unwrap();
        build_plan(&spec, &definition)
    }

    #[test]
    fn one_marker_per_column_in_declared_order() {
        let plan = plan_for(EntityDeclaration::new(
            "PageView",
            vec![
                PropertyDeclaration::new("visits", ValueKind::Counter),
                PropertyDeclaration::new("day", ValueKind::Text).clustering_key(0),
                PropertyDeclaration::new("siteId", ValueKind::Uuid).partition_key(0),
                PropertyDeclaration::new("uniques", ValueKind::Counter),
            ],
        ));
        // 2 regular + 2 key columns -> 4 distinct markers.
        let markers: Vec<_> = plan.markers().collect();
        assert_eq!(markers, ["visits", "uniques", "site_id", "day"]);
        assert_eq!(
            plan.render(),
            "UPDATE page_view SET visits = visits + :visits, uniques = uniques + :uniques \
             WHERE site_id = :site_id AND day = :day"
        );
    }

    #[test]
    fn unset_keyspace_renders_unqualified() {
        let mut entity = EntityDeclaration::new(
            "Votes",
            vec![
                PropertyDeclaration::new("articleId", ValueKind::Int).partition_key(0),
                PropertyDeclaration::new("upVotes", ValueKind::Counter),
            ],
        );
        let unqualified = plan_for(entity.clone());
        assert_eq!(unqualified.table, TableRef::new(None, "votes"));
        assert!(unqualified.render().starts_with("UPDATE votes "));

        entity.keyspace = Some("app".to_string());
        let qualified = plan_for(entity);
        assert!(qualified.render().starts_with("UPDATE app.votes "));
    }

    #[test]
    fn identical_inputs_yield_identical_plans() {
        let entity = EntityDeclaration::new(
            "Votes",
            vec![
                PropertyDeclaration::new("articleId", ValueKind::Int).partition_key(0),
                PropertyDeclaration::new("upVotes", ValueKind::Counter),
            ],
        );
        let first = plan_for(entity.clone());
        let second = plan_for(entity);
        assert_eq!(first, second);
        assert_eq!(first.render(), second.render());
    }
}
