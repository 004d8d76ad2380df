//! Errores del motor de combinaciones.
//!
//! Todos los errores son `Clone + PartialEq` porque viajan como datos dentro
//! de las combinaciones centinela (`TestDataCombination::data_generation_error`)
//! y un mismo error se replica en cada repetición.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Restricción genérica que no se cumplió, con el tipo que la violó.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    pub parameter: String,
    pub kind: ViolationKind,
    pub actual: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    ReferenceType,
    ValueType,
    DefaultConstructor,
    Interface(String),
    BaseClass(String),
}

impl std::fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (p, a) = (&self.parameter, &self.actual);
        match &self.kind {
            ViolationKind::ReferenceType => {
                write!(f, "Type parameter '{p}' has a class constraint but '{a}' is a value type")
            }
            ViolationKind::ValueType => {
                write!(f, "Type parameter '{p}' has a struct constraint but '{a}' is not a value type")
            }
            ViolationKind::DefaultConstructor => write!(f,
                                                        "Type parameter '{p}' has a new() constraint but '{a}' does not have a \
                                                         parameterless constructor"),
            ViolationKind::Interface(i) => write!(f, "Type parameter '{p}' must implement '{i}' but '{a}' does not"),
            ViolationKind::BaseClass(b) => write!(f, "Type parameter '{p}' must derive from '{b}' but '{a}' does not"),
        }
    }
}

fn join_violations(violations: &[ConstraintViolation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
}

/// Fallos terminales del camino genérico.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum GenericResolutionError {
    #[error("Generic tests require typed data sources for type inference. Use an arguments source with literal values \
             or a typed generator that declares its type arguments.")]
    NoTypedSource,
    #[error("Untyped data source used with generic test but no typed parameter attributes found for type inference")]
    NoTypedAnnotations,
    #[error("Could not infer a concrete type for type parameter '{parameter}'")]
    Unresolved { parameter: String },
    #[error("Generic constraint validation failed:\n{}", join_violations(.0))]
    ConstraintViolations(Vec<ConstraintViolation>),
}

/// Error de una fuente de datos. Nunca cruza la frontera pública de iteración
/// salvo `Cancelled`; el resto se convierte en combinaciones centinela.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum DataSourceError {
    #[error("data source '{owner}.{member}' could not be found")]
    SourceUnavailable { owner: String, member: String },
    #[error("{0}")]
    Generation(String),
    #[error("Data source index {index} is out of range. Data source returned {len} items.")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("data source produced more than {limit} rows")]
    RowLimitExceeded { limit: usize },
    #[error(transparent)]
    GenericResolution(#[from] GenericResolutionError),
    #[error("data generation was cancelled")]
    Cancelled,
}

impl DataSourceError {
    /// Atajo para errores lanzados por código de usuario.
    pub fn generation(message: impl Into<String>) -> Self { Self::Generation(message.into()) }

    pub fn is_cancelled(&self) -> bool { matches!(self, Self::Cancelled) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_out_of_range_message() {
        let e = DataSourceError::IndexOutOfRange { index: 3, len: 2 };
        assert_eq!(e.to_string(), "Data source index 3 is out of range. Data source returned 2 items.");
    }

    #[test]
    fn constraint_violations_are_joined() {
        let e = GenericResolutionError::ConstraintViolations(vec![ConstraintViolation { parameter: "T".into(),
                                                                                        kind: ViolationKind::ReferenceType,
                                                                                        actual: "int".into() },
                                                                    ConstraintViolation { parameter: "U".into(),
                                                                                          kind: ViolationKind::Interface("IComparable".into()),
                                                                                          actual: "Widget".into() },]);
        assert_eq!(e.to_string(),
                   "Generic constraint validation failed:\nType parameter 'T' has a class constraint but 'int' is a value \
                    type\nType parameter 'U' must implement 'IComparable' but 'Widget' does not");
    }

    #[test]
    fn generic_error_is_transparent_inside_data_source_error() {
        let e: DataSourceError = GenericResolutionError::Unresolved { parameter: "T".into() }.into();
        assert_eq!(e.to_string(), "Could not infer a concrete type for type parameter 'T'");
    }
}
