//! cqlom code generation engine.
//!
//! A small compiler pipeline over declarative mapping metadata: the entity
//! model builder and idiom detector chain form the front end, the statement
//! plan is the IR, and the emitter produces return-shape-polymorphic method
//! bodies wired to the `cqlom` runtime crate. Declaration-time failures are
//! collected per method in a diagnostic sink; one invalid method never stops
//! its siblings, but any recorded error fails the run as a whole.

pub mod analyzer;
pub mod config;
pub mod diagnostics;
pub mod emitter;
pub mod entity;
pub mod errors;
pub mod idiom;
pub mod naming;
pub mod plan;
pub mod session;

pub use analyzer::{KindContract, MethodSpec, analyze_method};
pub use config::{
    AccessorStyle, DaoDeclaration, EntityDeclaration, KeyDeclaration, KeyRole, MethodDeclaration,
    MethodKind, ParameterDeclaration, PropertyDeclaration, ReturnShape, ShapeDeclaration,
    StrategyDeclaration, ValueKind,
};
pub use diagnostics::{Diagnostic, DiagnosticSink, Severity};
pub use emitter::{GeneratedDao, GeneratedMethod, GenerationOutcome, generate_dao};
pub use entity::{EntityDefinition, KeySlot, PropertyDefinition, build_entity};
pub use errors::{AmbiguityError, CodegenError, DeclarationError};
pub use idiom::{GLOBAL_DEFAULT, IdiomChain, IdiomDetector, PropertyStrategy, RecordShapeDetector};
pub use naming::NamingConvention;
pub use plan::build_plan;
pub use session::{GenerationSession, StatementSlot};
