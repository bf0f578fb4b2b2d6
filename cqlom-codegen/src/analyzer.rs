//! Method analyzer: validates one declared method against its kind's
//! contract and produces a [`MethodSpec`], or records a diagnostic and
//! yields nothing. A failed method never affects its siblings.

use cqlom::{StatementAttributes, TableRef};

use crate::config::{
    DaoDeclaration, MethodDeclaration, MethodKind, ParameterDeclaration, ReturnShape,
};
use crate::errors::DeclarationError;
use crate::session::GenerationSession;

/// What one method kind requires and supports.
pub struct KindContract {
    pub supported_shapes: &'static [ReturnShape],
    pub customizer_allowed: bool,
}

impl MethodKind {
    pub fn contract(self) -> KindContract {
        match self {
            Self::Increment => KindContract {
                supported_shapes: &[
                    ReturnShape::Unit,
                    ReturnShape::AsyncUnit,
                    ReturnShape::RowStream,
                ],
                customizer_allowed: true,
            },
        }
    }
}

/// A validated method, ready for statement planning and emission.
#[derive(Debug, Clone)]
pub struct MethodSpec {
    pub name: String,
    pub kind: MethodKind,
    pub entity: String,
    pub entity_param: String,
    pub customizer_param: Option<String>,
    pub return_shape: ReturnShape,
    pub table: TableRef,
    pub attributes: StatementAttributes,
}

/// Validate one declared method. Failures are recorded against the
/// declaration site and `None` is returned; the caller skips the method.
pub fn analyze_method(
    dao: &DaoDeclaration,
    method: &MethodDeclaration,
    session: &mut GenerationSession,
) -> Option<MethodSpec> {
    let site = format!("{}.{}", dao.name, method.name);
    let kind = method.kind.label();
    let contract = method.kind.contract();

    let mut parameters = method.parameters.as_slice();
    let mut customizer_param = None;
    if let Some(ParameterDeclaration::Customizer { name }) = parameters.last() {
        if !contract.customizer_allowed {
            session.sink().error(
                &site,
                DeclarationError::UnexpectedParameter { kind },
            );
            return None;
        }
        customizer_param = Some(name.clone());
        parameters = &parameters[..parameters.len() - 1];
    }
    if parameters
        .iter()
        .any(|parameter| matches!(parameter, ParameterDeclaration::Customizer { .. }))
    {
        session.sink().error(
            &site,
            DeclarationError::MisplacedCustomizer {
                method: method.name.clone(),
            },
        );
        return None;
    }

    let (entity_param, entity, column_override) = match parameters.first() {
        Some(ParameterDeclaration::Entity {
            name,
            entity,
            column,
        }) if session.knows_entity(entity) => (name.clone(), entity.clone(), column.clone()),
        _ => {
            session
                .sink()
                .error(&site, DeclarationError::FirstParameterNotEntity { kind });
            return None;
        }
    };
    if parameters.len() > 1 {
        session
            .sink()
            .error(&site, DeclarationError::UnexpectedParameter { kind });
        return None;
    }
    if column_override.is_some() {
        session.sink().warning(
            &site,
            "column-name override on an entity parameter is ignored",
        );
    }

    let definition = match session.entity_definition(&entity) {
        Ok(definition) => definition,
        Err(err) => {
            session.sink().error(&site, err);
            return None;
        }
    };

    if definition.regular_columns().is_empty() {
        session.sink().error(
            &site,
            DeclarationError::NoRegularColumns {
                entity: entity.clone(),
                kind,
            },
        );
        return None;
    }

    if !contract.supported_shapes.contains(&method.return_shape) {
        let supported = contract
            .supported_shapes
            .iter()
            .map(|shape| format!("{shape:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        session.sink().error(
            &site,
            DeclarationError::UnsupportedReturnShape {
                kind,
                shape: method.return_shape,
                supported,
            },
        );
        return None;
    }

    // Target resolution: method override, then DAO override, then the
    // entity's own coordinates (explicit override or naming convention).
    let table = method
        .table
        .clone()
        .or_else(|| dao.table.clone())
        .unwrap_or_else(|| definition.table.clone());
    let keyspace = method
        .keyspace
        .clone()
        .or_else(|| dao.keyspace.clone())
        .or_else(|| definition.keyspace.clone());

    Some(MethodSpec {
        name: method.name.clone(),
        kind: method.kind,
        entity,
        entity_param,
        customizer_param,
        return_shape: method.return_shape,
        table: TableRef::new(keyspace.as_deref(), &table),
        attributes: method.attributes.clone().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EntityDeclaration, PropertyDeclaration, ValueKind};

    fn session_with_votes() -> GenerationSession {
        let mut session = GenerationSession::standard();
        session.declare_entity(EntityDeclaration::new(
            "Votes",
            vec![
                PropertyDeclaration::new("articleId", ValueKind::Int).partition_key(0),
                PropertyDeclaration::new("upVotes", ValueKind::Counter),
                PropertyDeclaration::new("downVotes", ValueKind::Counter),
            ],
        ));
        session
    }

    #[test]
    fn accepts_entity_plus_trailing_customizer() {
        let mut session = session_with_votes();
        let dao = DaoDeclaration::new("VotesDao", Vec::new());
        let mut method = MethodDeclaration::increment("increment", "Votes", ReturnShape::Unit);
        method.parameters.push(ParameterDeclaration::Customizer {
            name: "customize".to_string(),
        });
        let spec = analyze_method(&dao, &method, &mut session).expect("valid method");
        assert_eq!(spec.customizer_param.as_deref(), Some("customize"));
        assert_eq!(spec.table, TableRef::new(None, "votes"));
        assert!(!session.sink().has_errors());
    }

    #[test]
    fn rejects_non_entity_first_parameter() {
        let mut session = session_with_votes();
        let dao = DaoDeclaration::new("VotesDao", Vec::new());
        let mut method = MethodDeclaration::increment("increment", "Votes", ReturnShape::Unit);
        method.parameters = vec![ParameterDeclaration::Scalar {
            name: "amount".to_string(),
            kind: ValueKind::BigInt,
        }];
        assert!(analyze_method(&dao, &method, &mut session).is_none());
        assert!(session.sink().has_errors());
    }

    #[test]
    fn rejects_unknown_entity() {
        let mut session = session_with_votes();
        let dao = DaoDeclaration::new("VotesDao", Vec::new());
        let method = MethodDeclaration::increment("increment", "Ratings", ReturnShape::Unit);
        assert!(analyze_method(&dao, &method, &mut session).is_none());
        assert!(session.sink().has_errors());
    }

    #[test]
    fn rejects_unsupported_return_shape() {
        let mut session = session_with_votes();
        let dao = DaoDeclaration::new("VotesDao", Vec::new());
        let method = MethodDeclaration::increment("increment", "Votes", ReturnShape::Entity);
        assert!(analyze_method(&dao, &method, &mut session).is_none());
        let records = session.sink().records();
        assert!(records[0].message.contains("return shape"));
    }

    #[test]
    fn rejects_entity_with_no_regular_columns() {
        let mut session = GenerationSession::standard();
        session.declare_entity(EntityDeclaration::new(
            "Lookup",
            vec![PropertyDeclaration::new("id", ValueKind::Uuid).partition_key(0)],
        ));
        let dao = DaoDeclaration::new("LookupDao", Vec::new());
        let method = MethodDeclaration::increment("bump", "Lookup", ReturnShape::Unit);
        assert!(analyze_method(&dao, &method, &mut session).is_none());
        let records = session.sink().records();
        assert!(records[0].message.contains("non PK columns"));
    }

    #[test]
    fn warns_on_entity_parameter_column_override() {
        let mut session = session_with_votes();
        let dao = DaoDeclaration::new("VotesDao", Vec::new());
        let mut method = MethodDeclaration::increment("increment", "Votes", ReturnShape::Unit);
        method.parameters = vec![ParameterDeclaration::Entity {
            name: "deltas".to_string(),
            entity: "Votes".to_string(),
            column: Some("votes".to_string()),
        }];
        let spec = analyze_method(&dao, &method, &mut session);
        assert!(spec.is_some());
        assert!(!session.sink().has_errors());
        assert!(!session.sink().is_empty());
    }

    #[test]
    fn target_resolution_prefers_method_then_dao() {
        let mut session = session_with_votes();
        let mut dao = DaoDeclaration::new("VotesDao", Vec::new());
        dao.keyspace = Some("analytics".to_string());
        dao.table = Some("vote_totals".to_string());

        let mut method = MethodDeclaration::increment("increment", "Votes", ReturnShape::Unit);
        let spec = analyze_method(&dao, &method, &mut session).unwrap();
        assert_eq!(spec.table, TableRef::new(Some("analytics"), "vote_totals"));

        method.table = Some("votes_by_article".to_string());
        method.keyspace = Some("reporting".to_string());
        let spec = analyze_method(&dao, &method, &mut session).unwrap();
        assert_eq!(
            spec.table,
            TableRef::new(Some("reporting"), "votes_by_article")
        );
    }
}
