//! Inicialización del logger (`env_logger`) con el filtro de `SETTINGS`.
//! Las librerías sólo usan la fachada `log`; quien ejecuta decide si hay
//! salida.
use once_cell::sync::Lazy;

use crate::config::{ENV_LOG, SETTINGS};

static LOGGER: Lazy<()> = Lazy::new(|| {
    let env = env_logger::Env::default().filter_or(ENV_LOG, SETTINGS.log_filter.as_str());
    // otro logger ya instalado (p. ej. por el binario de tests) no es un error
    let _ = env_logger::Builder::from_env(env).format_timestamp_millis().try_init();
});

/// Idempotente: sólo la primera llamada instala el logger.
pub fn init() { Lazy::force(&LOGGER); }
