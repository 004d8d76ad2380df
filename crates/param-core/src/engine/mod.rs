//! Motor de combinaciones: ensamblador, camino genérico, canal de errores,
//! secuencia perezosa e identidad.

mod assembler;
pub mod builder;
mod generic_path;
pub mod identity;
mod sentinel;
pub mod stream;

use std::sync::Arc;

use uuid::Uuid;

pub use builder::{EngineBuilder, EngineBuilderInit};
pub use stream::CombinationStream;

use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::model::{TestDataCombination, TestMetadata};
use crate::registry::SourceRegistry;
use crate::source::AdapterProvider;

/// Punto de entrada: produce las combinaciones de un test.
///
/// El engine no guarda estado entre pasadas; cada `discover` arranca una
/// secuencia nueva e independiente.
pub struct CombinationEngine {
    provider: Arc<dyn AdapterProvider>,
    registry: SourceRegistry,
    config: EngineConfig,
}

impl CombinationEngine {
    pub fn builder() -> EngineBuilderInit { EngineBuilderInit }

    pub fn config(&self) -> &EngineConfig { &self.config }

    pub fn registry(&self) -> &SourceRegistry { &self.registry }

    /// Secuencia perezosa de combinaciones para `metadata`. Nada se evalúa
    /// hasta el primer `next`.
    pub fn discover(&self, metadata: Arc<TestMetadata>, cancel: CancellationToken) -> CombinationStream {
        CombinationStream::new(assembler::Assembler { metadata,
                                                      provider: Arc::clone(&self.provider),
                                                      registry: self.registry.clone(),
                                                      config: self.config.clone(),
                                                      cancel,
                                                      session_id: Uuid::new_v4() })
    }

    /// Atajo: una pasada completa sin cancelación.
    pub async fn combinations(&self, metadata: Arc<TestMetadata>) -> Vec<TestDataCombination> {
        self.discover(metadata, CancellationToken::new()).collect_all().await
    }
}

impl std::fmt::Debug for CombinationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinationEngine")
         .field("registry", &self.registry)
         .field("config", &self.config)
         .finish_non_exhaustive()
    }
}
