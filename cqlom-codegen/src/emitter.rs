//! Code emitter: turns validated methods and session state into the
//! generated data access object: struct, constructor, and one method body
//! per valid declared method, with return-shape adaptation.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use cqlom::{StatementAttributes, TableRef, TermRole};

use crate::analyzer::{MethodSpec, analyze_method};
use crate::config::{DaoDeclaration, ReturnShape};
use crate::diagnostics::{Diagnostic, Severity};
use crate::plan::build_plan;
use crate::session::GenerationSession;

/// One generated method body.
#[derive(Debug, Clone)]
pub struct GeneratedMethod {
    pub name: String,
    pub shape: ReturnShape,
    pub tokens: TokenStream,
}

/// The generated data access object: struct, constructor and methods.
#[derive(Debug, Clone)]
pub struct GeneratedDao {
    pub name: String,
    pub methods: Vec<GeneratedMethod>,
    tokens: TokenStream,
}

impl GeneratedDao {
    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    /// Pretty-print the generated items as Rust source.
    pub fn render(&self) -> Result<String, syn::Error> {
        let file: syn::File = syn::parse2(self.tokens.clone())?;
        Ok(prettyplease::unparse(&file))
    }
}

/// Result of one generation run. A run with M failed methods still carries
/// the N−M methods that generated cleanly, but reports failure overall so a
/// partial artifact is never mistaken for a complete one.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub dao: GeneratedDao,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationOutcome {
    pub fn failed(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity == Severity::Error)
    }
}

/// Generate one data access object. Invalid methods are skipped after
/// recording a diagnostic; sibling methods are unaffected.
pub fn generate_dao(dao: &DaoDeclaration, session: &mut GenerationSession) -> GenerationOutcome {
    let mut methods = Vec::new();
    for method in &dao.methods {
        let Some(spec) = analyze_method(dao, method, session) else {
            continue;
        };
        let Ok(definition) = session.entity_definition(&spec.entity) else {
            continue;
        };
        let helper_field = session.entity_helper_field(&spec.entity);
        let plan = build_plan(&spec, &definition);
        let statement_field = session.prepared_statement_slot(plan);
        methods.push(emit_method(&spec, &helper_field, &statement_field));
    }
    log::debug!(
        "generated {}/{} methods for {}",
        methods.len(),
        dao.methods.len(),
        dao.name
    );
    let tokens = assemble(dao, session, &methods);
    GenerationOutcome {
        dao: GeneratedDao {
            name: format!("{}Impl", dao.name),
            methods,
            tokens,
        },
        diagnostics: session.sink().records(),
    }
}

fn attribute_tokens(attributes: &StatementAttributes) -> TokenStream {
    let mut tokens = TokenStream::new();
    if let Some(page_size) = attributes.page_size {
        tokens.extend(quote! { builder = builder.with_page_size(#page_size); });
    }
    if let Some(timeout_ms) = attributes.timeout_ms {
        tokens.extend(quote! { builder = builder.with_timeout_ms(#timeout_ms); });
    }
    if let Some(profile) = &attributes.execution_profile {
        tokens.extend(quote! { builder = builder.with_execution_profile(#profile); });
    }
    tokens
}

fn table_tokens(table: &TableRef) -> TokenStream {
    let name = table.table.as_str();
    match &table.keyspace {
        Some(keyspace) => {
            let keyspace = keyspace.as_str();
            quote! { cqlom::TableRef::new(Some(#keyspace), #name) }
        }
        None => quote! { cqlom::TableRef::new(None, #name) },
    }
}

fn emit_method(spec: &MethodSpec, helper_field: &str, statement_field: &str) -> GeneratedMethod {
    let method_ident = format_ident!("{}", spec.name);
    let entity_ident = format_ident!("{}", spec.entity);
    let entity_param = format_ident!("{}", spec.entity_param);
    let helper = format_ident!("{}", helper_field);
    let slot = format_ident!("{}", statement_field);

    let attributes = attribute_tokens(&spec.attributes);
    let customizer = spec
        .customizer_param
        .as_ref()
        .map(|name| format_ident!("{}", name));
    let customizer_apply = customizer
        .as_ref()
        .map(|ident| quote! { builder = #ident(builder); });
    let customizer_arg = customizer.as_ref().map(|ident| quote! { , #ident: C });

    let bind = quote! {
        let values = cqlom::entity_values(#entity_param)?;
        self.#helper.bind(
            &values,
            &mut builder,
            cqlom::NullSavingStrategy::for_engine(&self.executor),
        );
        let statement = builder.build();
    };

    let tokens = match spec.return_shape {
        ReturnShape::Unit => {
            let generics = customizer.as_ref().map(|_| quote! { <C> });
            let where_clause = customizer.as_ref().map(|_| {
                quote! { where C: Fn(cqlom::BoundStatementBuilder) -> cqlom::BoundStatementBuilder }
            });
            quote! {
                pub fn #method_ident #generics (
                    &self,
                    #entity_param: &#entity_ident
                    #customizer_arg
                ) -> Result<(), cqlom::ExecError> #where_clause {
                    let mut builder = self.#slot.bound_builder();
                    #attributes
                    #customizer_apply
                    #bind
                    cqlom::execute_blocking(&self.executor, statement)
                }
            }
        }
        ReturnShape::AsyncUnit => {
            let generics = customizer.as_ref().map(|_| quote! { <C> });
            let where_clause = customizer.as_ref().map(|_| {
                quote! { where C: Fn(cqlom::BoundStatementBuilder) -> cqlom::BoundStatementBuilder }
            });
            quote! {
                pub async fn #method_ident #generics (
                    &self,
                    #entity_param: &#entity_ident
                    #customizer_arg
                ) -> Result<(), cqlom::ExecError> #where_clause {
                    let mut builder = self.#slot.bound_builder();
                    #attributes
                    #customizer_apply
                    #bind
                    cqlom::execute_async(&self.executor, statement).await
                }
            }
        }
        ReturnShape::RowStream => {
            let generics = match &customizer {
                Some(_) => quote! { <'a, C> },
                None => quote! { <'a> },
            };
            let where_clause = customizer.as_ref().map(|_| {
                quote! {
                    where C: Fn(cqlom::BoundStatementBuilder) -> cqlom::BoundStatementBuilder + 'a
                }
            });
            quote! {
                pub fn #method_ident #generics (
                    &'a self,
                    #entity_param: &#entity_ident
                    #customizer_arg
                ) -> cqlom::ReactiveExecution<'a, X> #where_clause {
                    let values = cqlom::entity_values(#entity_param);
                    cqlom::ReactiveExecution::new(
                        &self.executor,
                        Box::new(move || {
                            let values = values.clone()?;
                            let mut builder = self.#slot.bound_builder();
                            #attributes
                            #customizer_apply
                            self.#helper.bind(
                                &values,
                                &mut builder,
                                cqlom::NullSavingStrategy::for_engine(&self.executor),
                            );
                            Ok(builder.build())
                        }),
                    )
                }
            }
        }
        // Shapes outside the kind contract never reach emission; the
        // analyzer has already rejected them.
        ReturnShape::Entity | ReturnShape::OptionalEntity => TokenStream::new(),
    };

    GeneratedMethod {
        name: spec.name.clone(),
        shape: spec.return_shape,
        tokens,
    }
}

fn assemble(
    dao: &DaoDeclaration,
    session: &GenerationSession,
    methods: &[GeneratedMethod],
) -> TokenStream {
    let impl_ident = format_ident!("{}Impl", dao.name);

    let mut field_idents = vec![format_ident!("executor")];
    let mut helper_decls = Vec::new();
    let mut helper_inits = Vec::new();
    for (entity, field) in session.helpers() {
        let Some(definition) = session.cached_definition(entity) else {
            continue;
        };
        let field_ident = format_ident!("{}", field);
        helper_decls.push(quote! { #field_ident: cqlom::EntityHelper });
        let entity_name = entity.as_str();
        let table = table_tokens(&definition.table_ref());
        let bindings = definition.properties().iter().map(|property| {
            let property_name = property.name.as_str();
            let marker = property.column.as_str();
            quote! { cqlom::PropertyBinding::new(#property_name, #marker) }
        });
        helper_inits.push(quote! {
            let #field_ident = cqlom::EntityHelper::new(
                #entity_name,
                #table,
                vec![#(#bindings),*],
            );
        });
        field_idents.push(field_ident);
    }

    let mut slot_decls = Vec::new();
    let mut slot_inits = Vec::new();
    for slot in session.slots() {
        let field_ident = format_ident!("{}", slot.field);
        slot_decls.push(quote! { #field_ident: std::sync::Arc<cqlom::PreparedStatement> });
        let kind = slot.plan.kind.as_str();
        let entity = slot.plan.entity.as_str();
        let table = table_tokens(&slot.plan.table);
        let mut chain = quote! { cqlom::StatementPlan::update(#kind, #entity, #table) };
        for term in &slot.plan.terms {
            let column = term.column.as_str();
            chain = match term.role {
                TermRole::Set => quote! { #chain.set(#column) },
                TermRole::Assign => quote! { #chain.assign(#column) },
                TermRole::Where => quote! { #chain.where_eq(#column) },
            };
        }
        slot_inits.push(quote! {
            let plan = #chain;
            plan.table.ensure_keyspace(&executor)?;
            let #field_ident = store.get_or_prepare(plan);
        });
        field_idents.push(field_ident);
    }

    let store_init =
        (!slot_inits.is_empty()).then(|| quote! { let mut store = cqlom::PreparedStore::new(); });
    let method_tokens = methods.iter().map(|method| &method.tokens);

    quote! {
        pub struct #impl_ident<X: cqlom::StatementExecutor> {
            executor: X,
            #(#helper_decls,)*
            #(#slot_decls,)*
        }

        impl<X: cqlom::StatementExecutor> #impl_ident<X> {
            /// Builds every entity helper and prepares every statement slot
            /// before the instance is exposed; this state is read-only
            /// afterwards, so methods need no locking.
            pub fn new(executor: X) -> Result<Self, cqlom::ExecError> {
                #(#helper_inits)*
                #store_init
                #(#slot_inits)*
                Ok(Self { #(#field_idents),* })
            }

            #(#method_tokens)*
        }
    }
}
