//! paramflow
//!
//! Fachada del motor de combinaciones de datos de test:
//! - Reexporta `param_core` (modelo, motor, identidad) y `param_adapters`
//!   (adapters estándar y generadores auxiliares).
//! - Expone `config` para leer la configuración desde el entorno y
//!   `logging` para instalar el logger.
//! - `engine()` y `discover()` montan un motor con los adapters estándar, el
//!   registro global y la configuración de `SETTINGS`.

pub mod config;
pub mod errors;
pub mod logging;

use std::sync::Arc;

pub use param_adapters;
pub use param_core;

pub use param_adapters::StandardAdapters;
pub use param_core::engine::identity::{fingerprint, test_id};
pub use param_core::{CancellationToken, CombinationEngine, CombinationStream, DataSourceDescriptor, DataSourceError,
                     DataSourceLevel, EngineConfig, GenericFallback, GlobalRegistry, SourceRegistry,
                     TestDataCombination, TestMetadata, TestValue};

use config::SETTINGS;

/// Motor con los adapters estándar sobre el registro global del proceso.
pub fn engine() -> CombinationEngine {
    CombinationEngine::builder().adapters(StandardAdapters)
                                .registry(GlobalRegistry::get().registry())
                                .config(SETTINGS.engine_config())
                                .build()
}

/// Atajo: secuencia de combinaciones de `metadata` con el motor por defecto.
pub fn discover(metadata: TestMetadata, cancel: CancellationToken) -> CombinationStream {
    engine().discover(Arc::new(metadata), cancel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use param_core::model::{ClassMetadata, MethodMetadata};

    #[test]
    fn default_engine_uses_settings() {
        assert_eq!(engine().config(), &SETTINGS.engine_config());
    }

    #[tokio::test]
    async fn discover_runs_with_defaults() {
        let md = TestMetadata::new(ClassMetadata::new("C"), MethodMetadata::new("M").repeat(1));
        assert_eq!(discover(md, CancellationToken::new()).collect_all().await.len(), 2);
    }
}
