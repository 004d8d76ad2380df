//! param-core: motor de combinaciones de datos de test.
//!
//! Define el modelo (valores, tipos, descriptores, combinaciones), los
//! contratos de fuentes (`source`), el registro de métodos de datos, el
//! resolvedor genérico y el ensamblador que produce la secuencia perezosa de
//! `TestDataCombination`. Las implementaciones concretas de los adapters viven
//! en `param-adapters`.
pub mod cancel;
pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod generics;
pub mod hashing;
pub mod model;
pub mod registry;
pub mod source;

pub use cancel::CancellationToken;
pub use config::{EngineConfig, GenericFallback};
pub use engine::{CombinationEngine, CombinationStream};
pub use errors::{ConstraintViolation, DataSourceError, GenericResolutionError};
pub use model::{DataSourceDescriptor, DataSourceKind, DataSourceLevel, GenericBinding, TestDataCombination, TestMetadata,
                TestValue};
pub use registry::{GlobalRegistry, SourceRegistry};
pub use source::{AdapterProvider, DataGenerator, AsyncDataGenerator, DataMethod, SourceAdapter};
