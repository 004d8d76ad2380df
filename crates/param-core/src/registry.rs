//! Registro de métodos de datos y activadores de tipos.
//!
//! `SourceRegistry` es un handle clonable (comparte el estado interno). El
//! registro global del proceso se expone a través de `GlobalRegistry`, con un
//! ciclo de vida explícito: `initialize_with` corre una sola vez hasta que
//! alguien llama a `reset`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::errors::DataSourceError;
use crate::model::TestValue;
use crate::source::DataMethod;

/// Crea una instancia nueva de un tipo (receptor de métodos de instancia).
pub type Activator = Arc<dyn Fn() -> Result<TestValue, DataSourceError> + Send + Sync>;

#[derive(Default)]
struct RegistryInner {
    methods: DashMap<(String, String), Arc<dyn DataMethod>>,
    activators: DashMap<String, Activator>,
}

#[derive(Clone, Default)]
pub struct SourceRegistry {
    inner: Arc<RegistryInner>,
}

impl SourceRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn register_method(&self, owner: impl Into<String>, name: impl Into<String>, method: Arc<dyn DataMethod>) {
        self.inner.methods.insert((owner.into(), name.into()), method);
    }

    pub fn register_activator(&self, owner: impl Into<String>, activator: Activator) {
        self.inner.activators.insert(owner.into(), activator);
    }

    pub fn method(&self, owner: &str, name: &str) -> Option<Arc<dyn DataMethod>> {
        self.inner
            .methods
            .get(&(owner.to_string(), name.to_string()))
            .map(|m| Arc::clone(m.value()))
    }

    /// Nueva instancia de `owner`, o `None` si no hay activador registrado.
    pub fn activate(&self, owner: &str) -> Option<Result<TestValue, DataSourceError>> {
        let activator = self.inner.activators.get(owner).map(|a| Arc::clone(a.value()))?;
        Some(activator())
    }

    pub fn method_count(&self) -> usize { self.inner.methods.len() }

    pub fn clear(&self) {
        self.inner.methods.clear();
        self.inner.activators.clear();
    }
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
         .field("methods", &self.inner.methods.len())
         .field("activators", &self.inner.activators.len())
         .finish()
    }
}

/// Estado de registro del proceso con ciclo init-once / reset.
pub struct GlobalRegistry {
    registry: SourceRegistry,
    initialized: AtomicBool,
}

static GLOBAL: Lazy<GlobalRegistry> = Lazy::new(|| GlobalRegistry { registry: SourceRegistry::new(),
                                                                    initialized: AtomicBool::new(false) });

impl GlobalRegistry {
    pub fn get() -> &'static GlobalRegistry { &GLOBAL }

    /// Ejecuta `init` sobre el registro sólo si nadie lo ha inicializado aún.
    /// Devuelve `true` si esta llamada fue la que inicializó.
    pub fn initialize_with<F: FnOnce(&SourceRegistry)>(&self, init: F) -> bool {
        if self.initialized
               .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
               .is_err()
        {
            return false;
        }
        init(&self.registry);
        true
    }

    pub fn is_initialized(&self) -> bool { self.initialized.load(Ordering::SeqCst) }

    /// Handle al registro (comparte estado con el global).
    pub fn registry(&self) -> SourceRegistry { self.registry.clone() }

    /// Vacía el registro y permite volver a inicializarlo.
    pub fn reset(&self) {
        self.registry.clear();
        self.initialized.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activators_produce_fresh_values() {
        let reg = SourceRegistry::new();
        assert!(reg.activate("Missing").is_none());
        reg.register_activator("Counter", Arc::new(|| Ok::<_, DataSourceError>(TestValue::Int(0))));
        assert_eq!(reg.activate("Counter"), Some(Ok(TestValue::Int(0))));
    }

    #[test]
    fn global_lifecycle_is_init_once_until_reset() {
        let global = GlobalRegistry::get();
        global.reset();
        assert!(global.initialize_with(|r| r.register_activator("A", Arc::new(|| Ok::<_, DataSourceError>(TestValue::Null)))));
        assert!(!global.initialize_with(|_| panic!("second init must not run")));
        assert!(global.registry().activate("A").is_some());
        global.reset();
        assert!(!global.is_initialized());
        assert!(global.registry().activate("A").is_none());
    }
}
