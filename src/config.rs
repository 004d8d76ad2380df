//! Configuración central de la fachada.
//! Carga variables de entorno (.env) y expone una instancia inmutable
//! (`SETTINGS`) a partir de la cual se construye el `EngineConfig` del motor.
use std::env;
use std::str::FromStr;

use log::warn;
use once_cell::sync::Lazy;
use param_core::{EngineConfig, GenericFallback};
use serde::Serialize;

use crate::errors::ConfigError;

pub const ENV_DEFAULT_REPEAT: &str = "PARAMFLOW_DEFAULT_REPEAT";
pub const ENV_GENERIC_FALLBACK: &str = "PARAMFLOW_GENERIC_FALLBACK";
pub const ENV_MAX_ROWS_PER_SOURCE: &str = "PARAMFLOW_MAX_ROWS_PER_SOURCE";
pub const ENV_LOG: &str = "PARAMFLOW_LOG";

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenvy::dotenv(); // ignora error si no existe .env
});

/// Configuración global, evaluada una sola vez. Si el entorno trae valores
/// inválidos se avisa y se usan los valores por defecto.
pub static SETTINGS: Lazy<Settings> = Lazy::new(|| {
    Settings::from_env().unwrap_or_else(|e| {
                            warn!("{e}; using default settings");
                            Settings::default()
                        })
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Repeticiones cuando ni el test, ni la clase, ni el ensamblado declaran.
    pub default_repeat: u32,
    pub generic_fallback: GenericFallback,
    pub max_rows_per_source: Option<usize>,
    /// Filtro de `env_logger`.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self { default_repeat: 0,
               generic_fallback: GenericFallback::Placeholder,
               max_rows_per_source: None,
               log_filter: "info".to_string() }
    }
}

fn parse_number<T: FromStr>(var: &str, raw: Option<String>) -> Result<Option<T>, ConfigError> {
    match raw {
        None => Ok(None),
        Some(v) => v.trim()
                    .parse()
                    .map(Some)
                    .map_err(|_| ConfigError::InvalidNumber { var: var.to_string(),
                                                              value: v.clone() }),
    }
}

fn parse_fallback(raw: Option<String>) -> Result<GenericFallback, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None => Ok(GenericFallback::Placeholder),
        Some(v) if v.eq_ignore_ascii_case("placeholder") => Ok(GenericFallback::Placeholder),
        Some(v) if v.eq_ignore_ascii_case("fail") => Ok(GenericFallback::Fail),
        Some(v) => Err(ConfigError::UnknownFallback(v.to_string())),
    }
}

impl Settings {
    /// Lee `.env` (una vez) y las variables `PARAMFLOW_*`.
    pub fn from_env() -> Result<Self, ConfigError> {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
        where F: Fn(&str) -> Option<String>
    {
        let defaults = Self::default();
        Ok(Self { default_repeat: parse_number(ENV_DEFAULT_REPEAT, lookup(ENV_DEFAULT_REPEAT))?.unwrap_or(defaults.default_repeat),
                  generic_fallback: parse_fallback(lookup(ENV_GENERIC_FALLBACK))?,
                  max_rows_per_source: parse_number(ENV_MAX_ROWS_PER_SOURCE, lookup(ENV_MAX_ROWS_PER_SOURCE))?,
                  log_filter: lookup(ENV_LOG).unwrap_or(defaults.log_filter) })
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig { default_repeat: self.default_repeat,
                       generic_fallback: self.generic_fallback,
                       max_rows_per_source: self.max_rows_per_source }
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() { Lazy::force(&DOTENV_LOADED); }

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(Settings::from_lookup(lookup(&[])), Ok(Settings::default()));
    }

    #[test]
    fn reads_every_variable() {
        let s = Settings::from_lookup(lookup(&[(ENV_DEFAULT_REPEAT, "2"),
                                               (ENV_GENERIC_FALLBACK, "FAIL"),
                                               (ENV_MAX_ROWS_PER_SOURCE, " 500 "),
                                               (ENV_LOG, "paramflow=debug")])).unwrap();
        assert_eq!(s.default_repeat, 2);
        assert_eq!(s.generic_fallback, GenericFallback::Fail);
        assert_eq!(s.max_rows_per_source, Some(500));
        assert_eq!(s.log_filter, "paramflow=debug");
        assert_eq!(s.engine_config().max_rows_per_source, Some(500));
    }

    #[test]
    fn invalid_values_are_reported() {
        assert_eq!(Settings::from_lookup(lookup(&[(ENV_DEFAULT_REPEAT, "-1")])),
                   Err(ConfigError::InvalidNumber { var: ENV_DEFAULT_REPEAT.into(),
                                                    value: "-1".into() }));
        assert_eq!(Settings::from_lookup(lookup(&[(ENV_GENERIC_FALLBACK, "guess")])),
                   Err(ConfigError::UnknownFallback("guess".into())));
    }
}
