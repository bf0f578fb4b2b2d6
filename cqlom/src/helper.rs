use serde::Serialize;
use serde_json::Value;

use crate::binding::{BoundStatementBuilder, NullSavingStrategy};
use crate::errors::ExecError;
use crate::statement::TableRef;

/// Encode an entity into the dynamic value map the helper binds from.
pub fn entity_values<T>(entity: &T) -> Result<Value, ExecError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_value(entity).map_err(|err| ExecError::Encode {
        message: err.to_string(),
    })
}

/// Maps one entity property to its bind marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyBinding {
    pub property: String,
    pub marker: String,
}

impl PropertyBinding {
    pub fn new(property: &str, marker: &str) -> Self {
        Self {
            property: property.to_string(),
            marker: marker.to_string(),
        }
    }
}

/// Per-entity runtime metadata: the default table coordinates and the
/// property-to-marker map used to bind entity values onto a statement.
///
/// One helper exists per entity per generated data access object; it is
/// built during construction and read-only afterwards.
#[derive(Debug, Clone)]
pub struct EntityHelper {
    entity: String,
    table: TableRef,
    bindings: Vec<PropertyBinding>,
}

impl EntityHelper {
    pub fn new(entity: &str, table: TableRef, bindings: Vec<PropertyBinding>) -> Self {
        Self {
            entity: entity.to_string(),
            table,
            bindings,
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    pub fn bindings(&self) -> &[PropertyBinding] {
        &self.bindings
    }

    /// Bind every property value onto the builder. A property that is missing
    /// from `values`, or present as null, counts as absent and follows the
    /// null-handling strategy.
    pub fn bind(
        &self,
        values: &Value,
        builder: &mut BoundStatementBuilder,
        strategy: NullSavingStrategy,
    ) {
        for binding in &self.bindings {
            let value = values
                .get(&binding.property)
                .filter(|value| !value.is_null())
                .cloned();
            builder.set(&binding.marker, value, strategy);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::statement::StatementPlan;

    fn votes_helper() -> EntityHelper {
        EntityHelper::new(
            "Votes",
            TableRef::new(None, "votes"),
            vec![
                PropertyBinding::new("articleId", "article_id"),
                PropertyBinding::new("upVotes", "up_votes"),
                PropertyBinding::new("downVotes", "down_votes"),
            ],
        )
    }

    fn builder() -> BoundStatementBuilder {
        let plan = StatementPlan::update("increment", "Votes", TableRef::new(None, "votes"))
            .set("up_votes")
            .set("down_votes")
            .where_eq("article_id");
        let text = plan.render();
        BoundStatementBuilder::new(plan, text)
    }

    #[test]
    fn binds_properties_to_markers() {
        let mut builder = builder();
        votes_helper().bind(
            &json!({"articleId": 7, "upVotes": 1, "downVotes": 0}),
            &mut builder,
            NullSavingStrategy::DoNotSet,
        );
        let statement = builder.build();
        assert_eq!(statement.values.get("article_id"), Some(&json!(7)));
        assert_eq!(statement.values.get("up_votes"), Some(&json!(1)));
        assert_eq!(statement.values.get("down_votes"), Some(&json!(0)));
    }

    #[test]
    fn absent_properties_follow_the_strategy() {
        let values = json!({"articleId": 7, "upVotes": 1, "downVotes": null});

        let mut omitting = builder();
        votes_helper().bind(&values, &mut omitting, NullSavingStrategy::DoNotSet);
        assert!(!omitting.build().values.contains_key("down_votes"));

        let mut nulling = builder();
        votes_helper().bind(&values, &mut nulling, NullSavingStrategy::SetToNull);
        assert_eq!(
            nulling.build().values.get("down_votes"),
            Some(&serde_json::Value::Null)
        );
    }
}
