//! Context-dependent defaults for entity introspection.
//!
//! Detectors inspect the declared entity shape and, when they recognize a
//! convention, contribute a (mutability, accessor-style) default pair. The
//! chain is ordered and extensible: new detectors register without touching
//! the entity builder, and explicit per-entity strategy always wins.

use crate::config::{AccessorStyle, EntityDeclaration};
use crate::errors::AmbiguityError;

/// Resolved introspection strategy for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyStrategy {
    pub mutable: bool,
    pub accessor_style: AccessorStyle,
}

/// The global fallback: mutable entities with conventional get/set accessors.
pub const GLOBAL_DEFAULT: PropertyStrategy = PropertyStrategy {
    mutable: true,
    accessor_style: AccessorStyle::Conventional,
};

pub trait IdiomDetector {
    fn name(&self) -> &'static str;

    /// Inspect the declared shape; return defaults if the convention matches.
    fn detect(&self, entity: &EntityDeclaration) -> Option<PropertyStrategy>;
}

/// Recognizes immutable record shapes: an all-args constructor and no
/// setters means short accessors and no mutation.
pub struct RecordShapeDetector;

impl IdiomDetector for RecordShapeDetector {
    fn name(&self) -> &'static str {
        "record_shape"
    }

    fn detect(&self, entity: &EntityDeclaration) -> Option<PropertyStrategy> {
        if entity.shape.has_all_args_constructor && !entity.shape.has_setters {
            Some(PropertyStrategy {
                mutable: false,
                accessor_style: AccessorStyle::Short,
            })
        } else {
            None
        }
    }
}

/// Ordered list of detectors; the first match wins.
pub struct IdiomChain {
    detectors: Vec<Box<dyn IdiomDetector>>,
}

impl IdiomChain {
    pub fn standard() -> Self {
        Self {
            detectors: vec![Box::new(RecordShapeDetector)],
        }
    }

    pub fn empty() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    pub fn register(&mut self, detector: Box<dyn IdiomDetector>) {
        self.detectors.push(detector);
    }

    pub fn detect(&self, entity: &EntityDeclaration) -> Option<PropertyStrategy> {
        for detector in &self.detectors {
            if let Some(strategy) = detector.detect(entity) {
                log::debug!("entity {} matched idiom {}", entity.name, detector.name());
                return Some(strategy);
            }
        }
        None
    }
}

impl Default for IdiomChain {
    fn default() -> Self {
        Self::standard()
    }
}

/// Resolve the strategy for one entity.
///
/// Precedence: explicit fragments, then the first matching detector, then
/// the global default. Once any explicit fragment is present, fields it does
/// not set take the GLOBAL default, not the detector's.
pub fn resolve_strategy(
    entity: &EntityDeclaration,
    chain: &IdiomChain,
) -> Result<PropertyStrategy, AmbiguityError> {
    if entity.strategy.is_empty() {
        return Ok(chain.detect(entity).unwrap_or(GLOBAL_DEFAULT));
    }

    let mut mutable: Option<bool> = None;
    let mut accessor_style: Option<AccessorStyle> = None;
    for fragment in &entity.strategy {
        if let Some(value) = fragment.mutable {
            match mutable {
                Some(previous) if previous != value => {
                    return Err(AmbiguityError {
                        entity: entity.name.clone(),
                        detail: format!("mutable declared as both {previous} and {value}"),
                    });
                }
                _ => mutable = Some(value),
            }
        }
        if let Some(value) = fragment.accessor_style {
            match accessor_style {
                Some(previous) if previous != value => {
                    return Err(AmbiguityError {
                        entity: entity.name.clone(),
                        detail: format!(
                            "accessor style declared as both {previous:?} and {value:?}"
                        ),
                    });
                }
                _ => accessor_style = Some(value),
            }
        }
    }

    Ok(PropertyStrategy {
        mutable: mutable.unwrap_or(GLOBAL_DEFAULT.mutable),
        accessor_style: accessor_style.unwrap_or(GLOBAL_DEFAULT.accessor_style),
    })
}
