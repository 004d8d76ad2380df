//! Builder para `CombinationEngine`.
//!
//! El estado inicial (`EngineBuilderInit`) no puede construir nada: primero
//! hay que fijar el proveedor de adapters, que es la única pieza sin valor por
//! defecto razonable en el core. Después se puede ajustar registro y
//! configuración.
//!
//! ```ignore
//! let engine = CombinationEngine::builder()
//!     .adapters(StandardAdapters)
//!     .registry(registry)
//!     .config(EngineConfig::default())
//!     .build();
//! ```

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::engine::CombinationEngine;
use crate::registry::SourceRegistry;
use crate::source::AdapterProvider;

#[derive(Debug, Default)]
pub struct EngineBuilderInit;

impl EngineBuilderInit {
    /// Fija el proveedor de adapters y transiciona al builder completo.
    #[inline]
    pub fn adapters<P>(self, provider: P) -> EngineBuilder
        where P: AdapterProvider + 'static
    {
        EngineBuilder { provider: Arc::new(provider),
                        registry: SourceRegistry::new(),
                        config: EngineConfig::default() }
    }
}

pub struct EngineBuilder {
    provider: Arc<dyn AdapterProvider>,
    registry: SourceRegistry,
    config: EngineConfig,
}

impl EngineBuilder {
    /// Registro donde se resuelven los métodos de datos. Por defecto uno
    /// vacío y privado del engine.
    #[inline]
    pub fn registry(mut self, registry: SourceRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[inline]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn build(self) -> CombinationEngine {
        CombinationEngine { provider: self.provider,
                            registry: self.registry,
                            config: self.config }
    }
}
