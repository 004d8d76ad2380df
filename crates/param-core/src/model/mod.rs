//! Modelo neutral: valores, tipos, descriptores, metadatos y combinaciones.

pub mod combination;
pub mod descriptor;
pub mod factory;
pub mod format;
pub mod metadata;
pub mod types;
pub mod value;

pub use combination::{CombinationSummary, GenericBinding, TestDataCombination};
pub use descriptor::{DataSourceDescriptor, DataSourceKind, DataSourceLevel, MethodRef};
pub use factory::{ArgumentFactory, ValueFactory, ValueThunk};
pub use metadata::{ClassMetadata, GenericConstraint, GenericParameter, MethodMetadata, ParameterMetadata, PropertySource,
                   TestMetadata};
pub use types::{builtins, RuntimeType, TypeDescriptor, TypeExpr, TypeKind};
pub use value::TestValue;
